//! Viewer session
//!
//! Wires the pieces together the way the UI consumes them: one snapshot
//! of annotations per render pass (replaced wholesale, never patched),
//! the transient selection and pending highlight, and the command
//! channel that carries scroll requests between the annotation list and
//! the rendering surface instead of query-by-identifier side channels.

use chrono::Utc;
use tokio::sync::mpsc;

use crate::annotations::{
    Annotation, AnnotationError, AnnotationId, AnnotationMeta, AnnotationService, Highlight,
    PageIndex,
};
use crate::overlay::{self, OverlayRect, ScrollTarget};
use crate::render::RenderCoordinator;
use crate::selection::{PointerTarget, SelectionSource, SelectionTracker, TextSelection};
use crate::store::AnnotationStore;
use crate::viewport::ViewportTracker;

/// Cross-component commands delivered over the session's channel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewerCommand {
    /// Scroll the surface to a highlight's first rectangle and pulse it.
    /// Re-issued on every request, so the pulse re-fires even when the
    /// target is already visible.
    ScrollToHighlight(ScrollTarget),
    /// Scroll the annotation list to the card for this annotation.
    ScrollToCard(AnnotationId),
}

/// An in-progress comment. Owned by the UI; the session only borrows it,
/// so a failed submission never loses the author's text.
#[derive(Debug, Clone, Default)]
pub struct CommentDraft {
    pub author: String,
    pub body: String,
}

/// One viewing session over a document and its annotation store.
pub struct ViewerSession<S> {
    service: AnnotationService<S>,
    coordinator: RenderCoordinator,
    tracker: SelectionTracker,
    viewport: ViewportTracker,
    annotations: Vec<Annotation>,
    pending: Option<Highlight>,
    active: Option<AnnotationId>,
    commands: mpsc::UnboundedSender<ViewerCommand>,
}

impl<S: AnnotationStore> ViewerSession<S> {
    /// Build a session and the receiving end of its command channel.
    pub fn new(
        service: AnnotationService<S>,
        coordinator: RenderCoordinator,
    ) -> (Self, mpsc::UnboundedReceiver<ViewerCommand>) {
        let (commands, receiver) = mpsc::unbounded_channel();
        let session = Self {
            service,
            coordinator,
            tracker: SelectionTracker::new(),
            viewport: ViewportTracker::new(),
            annotations: Vec::new(),
            pending: None,
            active: None,
            commands,
        };
        (session, receiver)
    }

    /// The current annotation snapshot.
    pub fn annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    /// Annotations filed under one page, for the page-scoped list.
    pub fn annotations_for_page(&self, page: PageIndex) -> Vec<&Annotation> {
        self.annotations.iter().filter(|a| a.page() == page).collect()
    }

    /// Whether creation is disabled for lack of a write credential.
    pub fn read_only(&self) -> bool {
        self.service.read_only()
    }

    pub fn coordinator(&self) -> &RenderCoordinator {
        &self.coordinator
    }

    /// Reload the annotation list from the store, replacing the snapshot
    /// wholesale. On failure the previous snapshot stays in place:
    /// stale-but-present beats empty-and-wrong.
    pub async fn refresh(&mut self) -> Result<(), AnnotationError> {
        match self.service.fetch_all().await {
            Ok(annotations) => {
                self.annotations = annotations;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "annotation reload failed; keeping previous list");
                Err(err)
            }
        }
    }

    // --- selection lifecycle -------------------------------------------------

    pub fn pointer_released<Src: SelectionSource>(&mut self, source: &mut Src) -> Option<&TextSelection> {
        self.tracker.pointer_released(source)
    }

    pub fn pointer_pressed(&mut self, target: PointerTarget) {
        self.tracker.pointer_pressed(target);
    }

    pub fn escape_pressed(&mut self, input_focused: bool) {
        self.tracker.escape_pressed(input_focused);
    }

    pub fn selection(&self) -> Option<&TextSelection> {
        self.tracker.selection()
    }

    /// Tooltip action: convert the live selection into the pending
    /// highlight the next submission will anchor to.
    pub fn promote_selection(&mut self) -> Option<&Highlight> {
        if let Some(highlight) = self.tracker.take_for_annotation() {
            self.pending = Some(highlight);
        }
        self.pending.as_ref()
    }

    pub fn pending_highlight(&self) -> Option<&Highlight> {
        self.pending.as_ref()
    }

    pub fn clear_pending(&mut self) {
        self.pending = None;
    }

    // --- viewport ------------------------------------------------------------

    /// Record a page's visible ratio as reported by the surface.
    pub fn page_visibility(&mut self, page: PageIndex, ratio: f64) {
        self.viewport.update(page, ratio);
    }

    pub fn dominant_page(&self) -> PageIndex {
        self.viewport.dominant_page()
    }

    // --- overlays ------------------------------------------------------------

    /// Overlay rectangles for one page. Empty until the page's raster
    /// dimensions are stable; percentage geometry painted against a page
    /// that has not finished rasterizing would land nowhere meaningful.
    pub async fn overlay_for_page(&self, page: PageIndex) -> Vec<OverlayRect> {
        if !self.coordinator.is_rendered(page).await {
            return Vec::new();
        }
        overlay::overlay_for_page(
            page,
            &self.annotations,
            self.pending.as_ref(),
            self.tracker.selection(),
        )
    }

    /// Surface reported a click on a persisted overlay rectangle:
    /// activate the annotation and scroll the list to its card.
    pub fn highlight_clicked(&mut self, id: AnnotationId) {
        self.active = Some(id);
        self.send(ViewerCommand::ScrollToCard(id));
    }

    /// List reported a click on an annotation card: activate it and, if
    /// its page is rendered, scroll the surface to the highlight with a
    /// pulse. An unrendered page makes this a no-op, not an error.
    pub async fn card_clicked(&mut self, id: AnnotationId) {
        self.active = Some(id);

        let Some(page) = self
            .annotations
            .iter()
            .find(|a| a.id == id)
            .and_then(|a| a.highlight())
            .map(|h| h.page)
        else {
            return;
        };
        let rendered = self.coordinator.is_rendered(page).await;

        if let Some(target) =
            overlay::scroll_target(&self.annotations, id, |p| p == page && rendered)
        {
            self.send(ViewerCommand::ScrollToHighlight(target));
        }
    }

    pub fn active_annotation(&self) -> Option<AnnotationId> {
        self.active
    }

    // --- creation ------------------------------------------------------------

    /// Submit a comment draft. Anchors to the pending highlight when one
    /// exists, otherwise scopes to the dominant page. The draft is only
    /// borrowed; on failure the caller still holds the text.
    pub async fn submit_comment(&mut self, draft: &CommentDraft) -> Result<AnnotationId, AnnotationError> {
        let body = draft.body.trim();
        let author = draft.author.trim();

        let meta = match &self.pending {
            Some(highlight) => AnnotationMeta::anchored(author, Utc::now(), highlight.clone()),
            None => AnnotationMeta::page_scoped(self.dominant_page(), author, Utc::now()),
        };

        let created = self.service.create(&meta, body).await?;
        let id = created.id;

        self.pending = None;
        self.annotations.insert(0, created);
        Ok(id)
    }

    fn send(&self, command: ViewerCommand) {
        if self.commands.send(command).is_err() {
            tracing::debug!("command receiver dropped");
        }
    }
}
