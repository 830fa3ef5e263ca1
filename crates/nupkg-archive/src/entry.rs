use std::path::PathBuf;

/// An archive entry after extraction.
#[derive(Clone, Debug)]
pub struct Entry {
    pub name: String,
    pub target_path: PathBuf,
    pub size: u64,
    pub kind: EntryKind,
}

impl Entry {
    pub fn is_file(&self) -> bool {
        matches!(self.kind, EntryKind::File)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Validated but not materialized (packaging bookkeeping).
    Skipped,
}

#[derive(Clone, Debug, Default)]
pub struct ExtractReport {
    /// Every entry listed by the archive, including skipped ones.
    pub entry_count: usize,
    pub files_extracted: usize,
    pub total_bytes: u64,
    pub entries: Vec<Entry>,
}
