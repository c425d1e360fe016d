//! Progress-callback trait for batch extraction events.
//!
//! Inject an [`Arc<dyn ExtractionProgressCallback>`] via
//! [`crate::config::ExtractionConfigBuilder::progress_callback`] to receive
//! events as [`crate::extract_many`] works through its inputs.
//!
//! # Example
//!
//! ```rust
//! use edgequake_doc2md::{ExtractionConfig, ExtractionProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl ExtractionProgressCallback for CountingCallback {
//!     fn on_document_complete(&self, index: usize, total: usize, markdown_len: usize) {
//!         let done = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}/{total} done (#{index}, {markdown_len} bytes)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = ExtractionConfig::builder()
//!     .progress_callback(counter as Arc<dyn ExtractionProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use std::sync::Arc;

/// Called by batch extraction as it processes each document.
///
/// All methods have default no-op implementations so callers only override
/// what they care about.
///
/// # Thread safety
///
/// Documents are extracted concurrently, so `on_document_start`,
/// `on_document_complete` and `on_document_error` may be called from
/// different threads in any order. Protect shared mutable state with
/// `Mutex` or atomics.
pub trait ExtractionProgressCallback: Send + Sync {
    /// Called once before any document is started.
    fn on_batch_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before a document is handed to its extractor.
    ///
    /// # Arguments
    /// * `index` — 1-indexed position of the document in the batch
    /// * `total` — number of documents in the batch
    /// * `input` — the input path or URL as given
    fn on_document_start(&self, index: usize, total: usize, input: &str) {
        let _ = (index, total, input);
    }

    /// Called when a document produced output (possibly empty).
    ///
    /// # Arguments
    /// * `markdown_len` — byte length of the produced Markdown
    fn on_document_complete(&self, index: usize, total: usize, markdown_len: usize) {
        let _ = (index, total, markdown_len);
    }

    /// Called when a document failed with a fatal error.
    fn on_document_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after every document has been attempted.
    ///
    /// # Arguments
    /// * `success_count` — documents that completed without a fatal error
    fn on_batch_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ExtractionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ExtractionConfig`].
pub type ProgressCallback = Arc<dyn ExtractionProgressCallback>;
