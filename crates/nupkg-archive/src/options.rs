use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Clone)]
pub struct ExtractOptions {
    pub skip_packaging_parts: bool,
    /// Top-level names (case-insensitive) that are validated but never
    /// written, together with everything beneath them.
    pub reserved_names: Vec<String>,
    pub cancel: Option<CancelFlag>,
    pub on_progress: Option<Arc<dyn Fn(Progress) + Send + Sync>>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            skip_packaging_parts: true,
            reserved_names: Vec::new(),
            cancel: None,
            on_progress: None,
        }
    }
}

impl std::fmt::Debug for ExtractOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractOptions")
            .field("skip_packaging_parts", &self.skip_packaging_parts)
            .field("reserved_names", &self.reserved_names)
            .field("cancel", &self.cancel)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl ExtractOptions {
    pub fn skip_packaging_parts(mut self, skip: bool) -> Self {
        self.skip_packaging_parts = skip;
        self
    }

    pub fn reserve(mut self, name: impl Into<String>) -> Self {
        self.reserved_names.push(name.into());
        self
    }

    pub fn cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn on_progress(mut self, callback: Arc<dyn Fn(Progress) + Send + Sync>) -> Self {
        self.on_progress = Some(callback);
        self
    }

    pub(crate) fn is_skipped(&self, relative_name: &str) -> bool {
        (self.skip_packaging_parts && is_packaging_part(relative_name)) || self.is_reserved(relative_name)
    }

    fn is_reserved(&self, relative_name: &str) -> bool {
        let first = relative_name.split(['/', '\\']).next().unwrap_or_default();
        self.reserved_names
            .iter()
            .any(|reserved| reserved.eq_ignore_ascii_case(first))
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

#[derive(Clone, Debug)]
pub struct Progress {
    pub entries_processed: usize,
    pub total_entries: usize,
    pub bytes_written: u64,
    pub current_entry: String,
}

/// Shared cancellation request, checked between entries.
///
/// An entry that has started writing always finishes (or fails) on its own;
/// cancellation never leaves a half-written file behind.
#[derive(Clone, Debug, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Open Packaging Convention bookkeeping that is not package content.
pub fn is_packaging_part(relative_name: &str) -> bool {
    let lower = relative_name.replace('\\', "/").to_ascii_lowercase();
    let lower = lower.trim_start_matches("./");
    lower == "[content_types].xml" || lower.starts_with("_rels/") || lower.starts_with("package/")
}
