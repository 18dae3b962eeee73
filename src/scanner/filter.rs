/// Default threshold for large files: 100 MiB.
pub const DEFAULT_THRESHOLD: u64 = 100 * 1024 * 1024;

/// Pure inclusion predicate over a file's byte size. The threshold is
/// fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SizeFilter {
    threshold: u64,
}

impl SizeFilter {
    pub fn new(threshold: u64) -> Self {
        Self { threshold }
    }

    pub fn includes(&self, size_bytes: u64) -> bool {
        size_bytes >= self.threshold
    }
}

impl Default for SizeFilter {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn includes_at_and_above_threshold() {
        let filter = SizeFilter::default();
        assert!(filter.includes(DEFAULT_THRESHOLD));
        assert!(filter.includes(DEFAULT_THRESHOLD + 1));
        assert!(filter.includes(u64::MAX));
        assert!(!filter.includes(DEFAULT_THRESHOLD - 1));
        assert!(!filter.includes(0));
    }

    #[test]
    fn threshold_boundary_in_bytes() {
        // 50 MB and 150 MB / 200 MB files against the 100 MiB default.
        let filter = SizeFilter::default();
        assert!(!filter.includes(52_428_800));
        assert!(filter.includes(157_286_400));
        assert!(filter.includes(209_715_200));
    }
}
