//! Progress-callback trait for per-chunk summarization events.
//!
//! Inject an [`Arc<dyn SummarizeProgressCallback>`] via
//! [`crate::config::SummarizeConfigBuilder::progress_callback`] to receive
//! real-time events as the pipeline works through each chunk.
//!
//! # Why callbacks instead of channels?
//!
//! The callback approach is the least-invasive integration point: callers can
//! forward events to a terminal progress bar, a WebSocket, or a log sink
//! without the library knowing anything about how the host application
//! communicates. The trait is `Send + Sync` so a future version may fan
//! chunk calls out across tasks without changing the contract.

use std::sync::Arc;

/// Called by the pipeline as it processes each chunk.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Chunk numbers are 1-indexed positions in the
/// original chunk sequence, so skipped chunks leave visible gaps.
pub trait SummarizeProgressCallback: Send + Sync {
    /// Called once after chunking, before any remote call.
    ///
    /// # Arguments
    /// * `total_chunks` — number of chunks produced by the splitter
    fn on_run_start(&self, total_chunks: usize) {
        let _ = total_chunks;
    }

    /// Called just before the summarization request is sent for a chunk.
    fn on_chunk_start(&self, chunk_num: usize, total_chunks: usize) {
        let _ = (chunk_num, total_chunks);
    }

    /// Called when a chunk is dropped for being under the minimum length.
    /// No summarization request is made for skipped chunks.
    fn on_chunk_skipped(&self, chunk_num: usize, total_chunks: usize) {
        let _ = (chunk_num, total_chunks);
    }

    /// Called when a chunk is successfully summarized.
    ///
    /// # Arguments
    /// * `summary_len` — character length of the produced summary
    fn on_chunk_complete(&self, chunk_num: usize, total_chunks: usize, summary_len: usize) {
        let _ = (chunk_num, total_chunks, summary_len);
    }

    /// Called when a chunk fails after the fallback transport was exhausted.
    fn on_chunk_error(&self, chunk_num: usize, total_chunks: usize, error: &str) {
        let _ = (chunk_num, total_chunks, error);
    }

    /// Called when the reducer sends the combined chunk summaries off for
    /// one final condensing pass. Not called when the combination is short
    /// enough to return as-is, or when nothing succeeded.
    fn on_reduce_start(&self, combined_len: usize) {
        let _ = combined_len;
    }

    /// Called once after the final summary is settled.
    ///
    /// # Arguments
    /// * `success_count` — chunks that summarized without error
    fn on_run_complete(&self, total_chunks: usize, success_count: usize) {
        let _ = (total_chunks, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl SummarizeProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::SummarizeConfig`].
pub type ProgressCallback = Arc<dyn SummarizeProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TrackingCallback {
        starts: AtomicUsize,
        skips: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
        reduces: AtomicUsize,
        final_successes: AtomicUsize,
    }

    impl SummarizeProgressCallback for TrackingCallback {
        fn on_chunk_start(&self, _chunk_num: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_skipped(&self, _chunk_num: usize, _total: usize) {
            self.skips.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_complete(&self, _chunk_num: usize, _total: usize, _summary_len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_chunk_error(&self, _chunk_num: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }

        fn on_reduce_start(&self, _combined_len: usize) {
            self.reduces.fetch_add(1, Ordering::SeqCst);
        }

        fn on_run_complete(&self, _total: usize, success_count: usize) {
            self.final_successes.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(4);
        cb.on_chunk_start(1, 4);
        cb.on_chunk_skipped(2, 4);
        cb.on_chunk_complete(1, 4, 42);
        cb.on_chunk_error(3, 4, "some error");
        cb.on_reduce_start(800);
        cb.on_run_complete(4, 2);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback {
            starts: AtomicUsize::new(0),
            skips: AtomicUsize::new(0),
            completes: AtomicUsize::new(0),
            errors: AtomicUsize::new(0),
            reduces: AtomicUsize::new(0),
            final_successes: AtomicUsize::new(0),
        };

        tracker.on_run_start(3);
        tracker.on_chunk_start(1, 3);
        tracker.on_chunk_complete(1, 3, 120);
        tracker.on_chunk_skipped(2, 3);
        tracker.on_chunk_start(3, 3);
        tracker.on_chunk_error(3, 3, "fallback failed");
        tracker.on_reduce_start(120);
        tracker.on_run_complete(3, 1);

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.skips.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.reduces.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.final_successes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: Arc<dyn SummarizeProgressCallback> = Arc::new(NoopProgressCallback);
        cb.on_run_start(10);
        cb.on_chunk_start(1, 10);
        cb.on_chunk_complete(1, 10, 512);
    }
}
