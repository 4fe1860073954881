//! Render coordination
//!
//! Owns the set of requested/rendered page indices, the only mutable
//! shared state in the core. Triggering is a single check-then-mark
//! critical section, so re-entrant triggers from overlapping async
//! completions stay idempotent. A re-render for a page with a request
//! still in flight aborts the stale one; the abort is a cancellation,
//! never a failure. A page that genuinely fails to render does not stop
//! any other page.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use crate::annotations::PageIndex;

use super::rasterizer::{PageRaster, PageRasterizer, RasterizeError};

#[derive(Default)]
struct CoordinatorState {
    /// Pages a render has been triggered for (marked at trigger time).
    requested: HashSet<PageIndex>,
    /// Monotonic per-page generation; completions from superseded
    /// requests are discarded by comparing against it.
    epochs: HashMap<PageIndex, u64>,
    inflight: HashMap<PageIndex, JoinHandle<()>>,
    /// Completed rasters; a page's overlay geometry is only computed
    /// once its entry exists.
    rasters: HashMap<PageIndex, PageRaster>,
}

/// Coordinates asynchronous page rasterization across a document.
#[derive(Clone)]
pub struct RenderCoordinator {
    rasterizer: Arc<dyn PageRasterizer>,
    state: Arc<Mutex<CoordinatorState>>,
}

impl RenderCoordinator {
    pub fn new(rasterizer: Arc<dyn PageRasterizer>) -> Self {
        Self {
            rasterizer,
            state: Arc::new(Mutex::new(CoordinatorState::default())),
        }
    }

    /// Trigger rendering for a page unless it was already triggered.
    /// Returns whether this call started a render.
    pub async fn ensure_rendered(&self, page: PageIndex, scale: f32) -> bool {
        let mut state = self.state.lock().await;
        if !state.requested.insert(page) {
            return false;
        }
        self.spawn_render(&mut state, page, scale);
        true
    }

    /// Force a fresh render for a page (viewport or pixel-density
    /// change), aborting any request still in flight for it.
    pub async fn rerender(&self, page: PageIndex, scale: f32) {
        let mut state = self.state.lock().await;
        if let Some(stale) = state.inflight.remove(&page) {
            tracing::debug!(page, "superseding in-flight rasterization");
            stale.abort();
        }
        state.requested.insert(page);
        self.spawn_render(&mut state, page, scale);
    }

    /// Trigger rendering for every page the rasterizer reports. Pages
    /// render independently; completion order is arbitrary.
    pub async fn render_all(&self, scale: f32) -> Result<usize, RasterizeError> {
        let count = self.rasterizer.page_count().await?;
        let triggers = (1..=count as PageIndex).map(|page| self.ensure_rendered(page, scale));
        futures::future::join_all(triggers).await;
        Ok(count)
    }

    /// Whether a page has completed rasterization (its pixel dimensions
    /// are known and stable).
    pub async fn is_rendered(&self, page: PageIndex) -> bool {
        self.state.lock().await.rasters.contains_key(&page)
    }

    /// Pixel dimensions for a completed page.
    pub async fn page_raster(&self, page: PageIndex) -> Option<PageRaster> {
        self.state.lock().await.rasters.get(&page).copied()
    }

    /// Await completion of every in-flight render.
    pub async fn wait_for_idle(&self) {
        loop {
            let handles: Vec<JoinHandle<()>> = {
                let mut state = self.state.lock().await;
                let pages: Vec<PageIndex> = state.inflight.keys().copied().collect();
                pages
                    .into_iter()
                    .filter_map(|page| state.inflight.remove(&page))
                    .collect()
            };
            if handles.is_empty() {
                return;
            }
            for handle in handles {
                // Aborted handles resolve with a cancellation, which is
                // not an error here.
                let _ = handle.await;
            }
        }
    }

    fn spawn_render(&self, state: &mut CoordinatorState, page: PageIndex, scale: f32) {
        let epoch = state.epochs.entry(page).and_modify(|e| *e += 1).or_insert(0);
        let epoch = *epoch;

        let rasterizer = Arc::clone(&self.rasterizer);
        let shared = Arc::clone(&self.state);
        let handle = tokio::spawn(async move {
            let result = rasterizer.rasterize(page, scale).await;

            let mut state = shared.lock().await;
            if state.epochs.get(&page) != Some(&epoch) {
                // A newer request took over this page.
                return;
            }
            state.inflight.remove(&page);
            match result {
                Ok(raster) => {
                    tracing::debug!(
                        page,
                        width = raster.pixel_width,
                        height = raster.pixel_height,
                        "page rasterized"
                    );
                    state.rasters.insert(page, raster);
                }
                Err(err) if err.is_cancellation() => {
                    // Superseded at the boundary; unmark so a later
                    // trigger can pick the page up again.
                    tracing::debug!(page, "rasterization cancelled");
                    state.requested.remove(&page);
                }
                Err(err) => {
                    tracing::warn!(page, error = %err, "page rasterization failed");
                    state.requested.remove(&page);
                }
            }
        });

        state.inflight.insert(page, handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::time::{sleep, Duration};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    /// Scripted rasterizer: per-page delays and failures, with a call
    /// counter per page.
    struct MockRasterizer {
        pages: usize,
        slow_pages: Vec<PageIndex>,
        failing_pages: Vec<PageIndex>,
        calls: AtomicUsize,
    }

    impl MockRasterizer {
        fn new(pages: usize) -> Self {
            Self {
                pages,
                slow_pages: Vec::new(),
                failing_pages: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait::async_trait]
    impl PageRasterizer for MockRasterizer {
        async fn page_count(&self) -> Result<usize, RasterizeError> {
            Ok(self.pages)
        }

        async fn rasterize(
            &self,
            page: PageIndex,
            scale: f32,
        ) -> Result<PageRaster, RasterizeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.slow_pages.contains(&page) {
                sleep(Duration::from_millis(200)).await;
            }
            if self.failing_pages.contains(&page) {
                return Err(RasterizeError::CorruptSource(format!("page {page}")));
            }
            Ok(PageRaster {
                page,
                pixel_width: (800.0 * scale) as u32,
                pixel_height: (1000.0 * scale) as u32,
            })
        }
    }

    #[tokio::test]
    async fn test_ensure_rendered_is_idempotent() {
        let rasterizer = Arc::new(MockRasterizer::new(3));
        let coordinator = RenderCoordinator::new(rasterizer.clone());

        assert!(coordinator.ensure_rendered(1, 1.5).await);
        assert!(!coordinator.ensure_rendered(1, 1.5).await);
        coordinator.wait_for_idle().await;

        assert!(!coordinator.ensure_rendered(1, 1.5).await);
        assert_eq!(rasterizer.call_count(), 1);
        assert!(coordinator.is_rendered(1).await);
    }

    #[tokio::test]
    async fn test_raster_dimensions_are_recorded() {
        let coordinator = RenderCoordinator::new(Arc::new(MockRasterizer::new(1)));
        coordinator.ensure_rendered(1, 2.0).await;
        coordinator.wait_for_idle().await;

        let raster = coordinator.page_raster(1).await.unwrap();
        assert_eq!(raster.pixel_width, 1600);
        assert_eq!(raster.pixel_height, 2000);
    }

    #[tokio::test]
    async fn test_render_all_triggers_every_page() {
        let rasterizer = Arc::new(MockRasterizer::new(4));
        let coordinator = RenderCoordinator::new(rasterizer.clone());

        let count = coordinator.render_all(1.5).await.unwrap();
        assert_eq!(count, 4);
        coordinator.wait_for_idle().await;

        for page in 1..=4 {
            assert!(coordinator.is_rendered(page).await, "page {page} missing");
        }
        assert_eq!(rasterizer.call_count(), 4);
    }

    #[tokio::test]
    async fn test_failure_does_not_block_other_pages() {
        init_tracing();
        let rasterizer = Arc::new(MockRasterizer {
            failing_pages: vec![2],
            ..MockRasterizer::new(3)
        });
        let coordinator = RenderCoordinator::new(rasterizer);

        coordinator.render_all(1.5).await.unwrap();
        coordinator.wait_for_idle().await;

        assert!(coordinator.is_rendered(1).await);
        assert!(!coordinator.is_rendered(2).await);
        assert!(coordinator.is_rendered(3).await);

        // The failed page can be triggered again.
        assert!(coordinator.ensure_rendered(2, 1.5).await);
    }

    #[tokio::test]
    async fn test_rerender_supersedes_inflight_request() {
        init_tracing();
        let rasterizer = Arc::new(MockRasterizer {
            slow_pages: vec![1],
            ..MockRasterizer::new(1)
        });
        let coordinator = RenderCoordinator::new(rasterizer.clone());

        coordinator.ensure_rendered(1, 1.0).await;
        // Supersede while the slow render is still in flight; the stale
        // task is aborted and its result discarded.
        coordinator.rerender(1, 2.0).await;
        coordinator.wait_for_idle().await;

        let raster = coordinator.page_raster(1).await.unwrap();
        assert_eq!(raster.pixel_width, 1600);
    }

    #[tokio::test]
    async fn test_pages_complete_out_of_order() {
        let rasterizer = Arc::new(MockRasterizer {
            slow_pages: vec![1],
            ..MockRasterizer::new(2)
        });
        let coordinator = RenderCoordinator::new(rasterizer);

        coordinator.ensure_rendered(1, 1.5).await;
        coordinator.ensure_rendered(2, 1.5).await;

        // Page 2 finishes while page 1 is still rendering.
        sleep(Duration::from_millis(50)).await;
        assert!(coordinator.is_rendered(2).await);
        assert!(!coordinator.is_rendered(1).await);

        coordinator.wait_for_idle().await;
        assert!(coordinator.is_rendered(1).await);
    }
}
