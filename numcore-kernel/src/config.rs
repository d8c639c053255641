//! Kernel tuning knobs.

/// Minimum number of elements to justify multi-threaded execution.
pub const MINTHREADLENGTH: usize = 1 << 15;

/// Environment variable read by [`KernelConfig::from_env`].
pub const MIN_PARALLEL_LEN_ENV: &str = "NUMCORE_MIN_PARALLEL_LEN";

/// Execution settings shared by every operation a [`Dispatcher`] builds.
///
/// [`Dispatcher`]: crate::Dispatcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Flat loops with at least this many elements are split across rayon
    /// workers. Ignored without the `parallel` feature.
    pub min_parallel_len: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            min_parallel_len: MINTHREADLENGTH,
        }
    }
}

impl KernelConfig {
    /// Never split work across threads.
    pub fn sequential() -> Self {
        Self {
            min_parallel_len: usize::MAX,
        }
    }

    pub fn with_min_parallel_len(mut self, len: usize) -> Self {
        self.min_parallel_len = len;
        self
    }

    /// Defaults, overridden by `NUMCORE_MIN_PARALLEL_LEN` when it parses.
    pub fn from_env() -> Self {
        match std::env::var(MIN_PARALLEL_LEN_ENV) {
            Ok(raw) => Self::parse_min_parallel_len(&raw),
            Err(_) => Self::default(),
        }
    }

    fn parse_min_parallel_len(raw: &str) -> Self {
        match raw.trim().parse::<usize>() {
            Ok(len) => Self::default().with_min_parallel_len(len),
            Err(err) => {
                tracing::warn!(
                    var = MIN_PARALLEL_LEN_ENV,
                    value = raw,
                    error = %err,
                    "ignoring unparsable kernel setting"
                );
                Self::default()
            }
        }
    }

    /// Whether a flat loop of `len` elements should run in parallel.
    #[inline]
    pub fn should_parallelize(&self, len: usize) -> bool {
        cfg!(feature = "parallel") && len >= self.min_parallel_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold() {
        assert_eq!(KernelConfig::default().min_parallel_len, 1 << 15);
        assert!(!KernelConfig::sequential().should_parallelize(usize::MAX - 1));
    }

    #[test]
    fn test_parse_min_parallel_len() {
        assert_eq!(
            KernelConfig::parse_min_parallel_len(" 128 ").min_parallel_len,
            128
        );
        assert_eq!(
            KernelConfig::parse_min_parallel_len("lots"),
            KernelConfig::default()
        );
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_should_parallelize() {
        let config = KernelConfig::default().with_min_parallel_len(10);
        assert!(config.should_parallelize(10));
        assert!(!config.should_parallelize(9));
    }
}
