//! GitHub-issues-backed store
//!
//! Uses a repository's issue list as the append-only entry store: one
//! issue per annotation, filed under the category label plus a
//! page-scoped label. A missing token means read-only; listing works
//! unauthenticated against public repositories.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::Config;

use super::{AnnotationStore, StoreEntry, StoreError};

const ACCEPT_HEADER: &str = "application/vnd.github.v3+json";
const PAGE_SIZE: usize = 100;
/// Label color for labels we create on the fly.
const LABEL_COLOR: &str = "c5def5";

#[derive(Debug, Deserialize)]
struct GitHubIssue {
    id: i64,
    body: Option<String>,
    html_url: String,
}

/// Issue-tracker store client.
pub struct IssueStore {
    client: reqwest::Client,
    api_base: String,
    owner: String,
    repo: String,
    category_label: String,
    token: Option<String>,
}

impl IssueStore {
    pub fn new(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            owner: config.owner.clone(),
            repo: config.repo.clone(),
            category_label: config.label.clone(),
            token: config.token.clone(),
        }
    }

    fn issues_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/issues",
            self.api_base, self.owner, self.repo
        )
    }

    fn list_url(&self, page_label: Option<&str>, page: usize) -> String {
        let labels = match page_label {
            Some(label) => format!("{},{}", self.category_label, label),
            None => self.category_label.clone(),
        };
        format!(
            "{}?labels={}&state=open&per_page={}&page={}",
            self.issues_url(),
            urlencoding::encode(&labels),
            PAGE_SIZE,
            page
        )
    }

    fn request(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let builder = builder.header("Accept", ACCEPT_HEADER);
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Create the labels an entry will carry. Best effort: a label that
    /// already exists comes back as an error we ignore.
    async fn ensure_labels(&self, labels: &[String]) {
        let url = format!("{}/repos/{}/{}/labels", self.api_base, self.owner, self.repo);
        for label in labels {
            let body = serde_json::json!({ "name": label, "color": LABEL_COLOR });
            if let Err(err) = self.request(self.client.post(&url)).json(&body).send().await {
                tracing::debug!(label, error = %err, "label creation skipped");
            }
        }
    }
}

#[async_trait]
impl AnnotationStore for IssueStore {
    fn read_only(&self) -> bool {
        self.token.is_none()
    }

    async fn list(&self, page_label: Option<&str>) -> Result<Vec<StoreEntry>, StoreError> {
        let mut entries = Vec::new();
        let mut page = 1;

        loop {
            let url = self.list_url(page_label, page);
            let response = self.request(self.client.get(&url)).send().await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let message = response.text().await.unwrap_or_default();
                return Err(StoreError::Api { status, message });
            }

            let issues: Vec<GitHubIssue> = response.json().await?;
            let batch_len = issues.len();

            for issue in issues {
                let Some(body) = issue.body else {
                    continue;
                };
                entries.push(StoreEntry {
                    id: issue.id,
                    body,
                    url: issue.html_url,
                });
            }

            if batch_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        tracing::debug!(count = entries.len(), "listed store entries");
        Ok(entries)
    }

    async fn create(
        &self,
        title: &str,
        body: &str,
        labels: &[String],
    ) -> Result<StoreEntry, StoreError> {
        if self.read_only() {
            return Err(StoreError::ReadOnly);
        }

        self.ensure_labels(labels).await;

        let payload = serde_json::json!({
            "title": title,
            "body": body,
            "labels": labels,
        });
        let response = self
            .request(self.client.post(&self.issues_url()))
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, message });
        }

        let issue: GitHubIssue = response.json().await?;
        Ok(StoreEntry {
            id: issue.id,
            body: issue.body.unwrap_or_default(),
            url: issue.html_url,
        })
    }
}
