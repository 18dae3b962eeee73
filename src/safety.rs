use crate::volumes;
use std::path::Path;

/// Decides whether deleting a path needs explicit user confirmation.
///
/// The gate fires for paths living on the designated system volume (the
/// volume hosting the OS). It only decides whether to ask; collecting the
/// answer is the caller's job.
#[derive(Debug, Clone)]
pub struct PolicyGate {
    system_volume: String,
}

impl PolicyGate {
    pub fn new(system_volume: impl Into<String>) -> Self {
        Self {
            system_volume: system_volume.into(),
        }
    }

    pub fn requires_confirmation(&self, path: &Path) -> bool {
        volumes::volume_id(path) == self.system_volume
    }
}

impl Default for PolicyGate {
    fn default() -> Self {
        #[cfg(unix)]
        let system_volume = "/";
        #[cfg(windows)]
        let system_volume = "C:";

        Self::new(system_volume)
    }
}
