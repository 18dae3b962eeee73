use super::{FileRecord, SizeFilter};
use std::path::Path;
use walkdir::WalkDir;

/// Best-effort recursive traversal of one root.
///
/// Every qualifying regular file under the root yields exactly one
/// `FileRecord`. Per-entry I/O failures (permission denied, vanished
/// files, unreadable attributes) are swallowed at that entry and the walk
/// continues with the rest of the tree; nothing entry-level ever reaches
/// the caller. Symbolic links are not followed, so link cycles cannot
/// prevent termination.
pub struct TreeWalker {
    filter: SizeFilter,
}

impl TreeWalker {
    pub fn new(filter: SizeFilter) -> Self {
        Self { filter }
    }

    /// Lazily walks `root`, emitting records as files are visited. Each
    /// call starts a fresh traversal.
    pub fn walk<'a>(&'a self, root: &Path) -> impl Iterator<Item = FileRecord> + 'a {
        WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .filter_map(move |entry| {
                let size = entry.metadata().ok()?.len();
                if self.filter.includes(size) {
                    Some(FileRecord::new(entry.into_path(), size))
                } else {
                    None
                }
            })
    }
}
