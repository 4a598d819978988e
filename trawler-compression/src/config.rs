//! Configuration for the decompression stage.

/// Configuration for
/// [`HttpDecompressionMiddleware`](crate::HttpDecompressionMiddleware).
#[derive(Debug, Clone)]
pub struct DecompressionConfig {
    /// Whether the stage is installed at all. A disabled stage refuses
    /// construction through
    /// [`from_config`](crate::HttpDecompressionMiddleware::from_config).
    pub enabled: bool,

    /// Ceiling on the decoded size of a response body, in bytes. `0`
    /// disables the check. Responses inflating past the ceiling are
    /// dropped before anything reaches downstream stages.
    pub max_decompressed_size: usize,
}

impl Default for DecompressionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_decompressed_size: 0,
        }
    }
}

impl DecompressionConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for configuration.
    pub fn builder() -> DecompressionConfigBuilder {
        DecompressionConfigBuilder::new()
    }
}

/// Builder for [`DecompressionConfig`].
#[derive(Debug, Clone, Default)]
pub struct DecompressionConfigBuilder {
    config: DecompressionConfig,
}

impl DecompressionConfigBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            config: DecompressionConfig::default(),
        }
    }

    /// Enable or disable the stage.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Set the decoded-size ceiling in bytes (`0` disables the check).
    pub fn max_decompressed_size(mut self, bytes: usize) -> Self {
        self.config.max_decompressed_size = bytes;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DecompressionConfig {
        self.config
    }
}
