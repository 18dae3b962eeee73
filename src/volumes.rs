use crate::error::ScanError;
use std::path::{Path, PathBuf};

/// What the user asked to scan. Resolved once per scan into a concrete,
/// ordered list of root paths; the resolution is a snapshot, volumes
/// mounted afterwards are not picked up mid-scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanRoot {
    /// Every currently mounted volume.
    AllVolumes,
    /// A single mounted volume, identified by its mount path.
    Volume(PathBuf),
    /// An arbitrary directory subtree.
    Subtree(PathBuf),
}

impl ScanRoot {
    /// Resolves to concrete root paths using `list` as the volume source.
    ///
    /// `Volume` and `Subtree` roots must exist and be directories at call
    /// time; anything else is `InvalidRoot`, surfaced before any traversal.
    pub fn resolve<F>(&self, list: F) -> Result<Vec<PathBuf>, ScanError>
    where
        F: Fn() -> Vec<PathBuf>,
    {
        match self {
            ScanRoot::AllVolumes => Ok(list()),
            ScanRoot::Volume(path) | ScanRoot::Subtree(path) => {
                if path.is_dir() {
                    Ok(vec![path.clone()])
                } else {
                    Err(ScanError::InvalidRoot { path: path.clone() })
                }
            }
        }
    }
}

/// Lists the currently mounted volume roots: the OS volume first, then
/// entries under /Volumes in directory order.
#[cfg(unix)]
pub fn list_volume_roots() -> Vec<PathBuf> {
    let mut roots = vec![PathBuf::from("/")];

    if let Ok(entries) = std::fs::read_dir("/Volumes") {
        for entry in entries.flatten() {
            let path = entry.path();
            // The boot volume appears in /Volumes as a symlink to /.
            if path.is_dir() && !path.is_symlink() {
                roots.push(path);
            }
        }
    }

    roots
}

#[cfg(windows)]
pub fn list_volume_roots() -> Vec<PathBuf> {
    (b'A'..=b'Z')
        .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
        .filter(|root| root.is_dir())
        .collect()
}

/// Derives the volume identifier for a path from its prefix:
/// `/Volumes/<name>/...` belongs to `/Volumes/<name>`, everything else
/// lives on the OS volume `/`.
#[cfg(unix)]
pub fn volume_id(path: &Path) -> String {
    let mut components = path.components();

    if components.next() == Some(std::path::Component::RootDir) {
        if let Some(std::path::Component::Normal(first)) = components.next() {
            if first == "Volumes" {
                if let Some(std::path::Component::Normal(name)) = components.next() {
                    return format!("/Volumes/{}", name.to_string_lossy());
                }
            }
        }
    }

    "/".to_string()
}

#[cfg(windows)]
pub fn volume_id(path: &Path) -> String {
    use std::path::{Component, Prefix};

    if let Some(Component::Prefix(prefix)) = path.components().next() {
        if let Prefix::Disk(letter) | Prefix::VerbatimDisk(letter) = prefix.kind() {
            return format!("{}:", letter as char);
        }
    }

    String::new()
}
