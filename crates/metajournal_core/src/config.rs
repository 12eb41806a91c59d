//! Formatter configuration.

/// Default capacity of a reader's reusable payload buffer.
pub const DEFAULT_SCRATCH_CAPACITY: usize = 1024;

/// Default upper bound on a single frame's payload.
pub const DEFAULT_MAX_FRAME_SIZE: usize = 64 * 1024 * 1024;

/// Configuration shared by frame writers and readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatterConfig {
    /// Payloads up to this size are read into a buffer owned by the reader
    /// and reused across frames. Larger payloads get a one-off allocation.
    pub scratch_capacity: usize,

    /// Largest payload a writer emits and a reader accepts. A length prefix
    /// above this on read is treated as a torn tail.
    pub max_frame_size: usize,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            scratch_capacity: DEFAULT_SCRATCH_CAPACITY,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl FormatterConfig {
    /// Creates a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reusable buffer capacity.
    #[must_use]
    pub const fn scratch_capacity(mut self, capacity: usize) -> Self {
        self.scratch_capacity = capacity;
        self
    }

    /// Sets the maximum frame payload size.
    #[must_use]
    pub const fn max_frame_size(mut self, size: usize) -> Self {
        self.max_frame_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = FormatterConfig::default();
        assert_eq!(config.scratch_capacity, 1024);
        assert_eq!(config.max_frame_size, 64 * 1024 * 1024);
    }

    #[test]
    fn builder_pattern() {
        let config = FormatterConfig::new()
            .scratch_capacity(16)
            .max_frame_size(4096);

        assert_eq!(config.scratch_capacity, 16);
        assert_eq!(config.max_frame_size, 4096);
    }
}
