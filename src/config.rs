//! Configuration for the Prisma instrumentation.

use std::time::Duration;

/// Namespace under which flattened request arguments are recorded.
pub const DEFAULT_ARGS_NAMESPACE: &str = "prisma.args";

/// Value of the `component` attribute on every request span.
pub const DEFAULT_COMPONENT: &str = "prisma";

/// Configuration options for request tracing.
///
/// # Example
///
/// ```rust
/// use prisma_tracing::InstrumentationConfig;
/// use std::time::Duration;
///
/// let config = InstrumentationConfig::default()
///     .with_args_recording(false)
///     .with_slow_request_threshold(Duration::from_millis(100));
/// ```
#[derive(Debug, Clone)]
pub struct InstrumentationConfig {
    /// Component tag recorded on each span.
    /// Default: `"prisma"`
    pub component: String,

    /// Name identifying this instrumentation in diagnostics.
    /// Default: `"prisma-tracing"`
    pub instrumentation_name: String,

    /// Version identifier emitted alongside the instrumentation name.
    /// Default: the crate version
    pub version: String,

    /// Whether `install` attaches the wrapper at all.
    /// Default: `true`
    pub enabled: bool,

    /// Whether to record the flattened request arguments on spans.
    /// Default: `true`
    pub record_args: bool,

    /// Dotted prefix for flattened argument attributes.
    /// Default: `"prisma.args"`
    pub args_namespace: String,

    /// Threshold for logging slow requests at WARN level.
    /// Default: 500ms
    pub slow_request_threshold: Duration,
}

impl Default for InstrumentationConfig {
    fn default() -> Self {
        Self {
            component: DEFAULT_COMPONENT.to_string(),
            instrumentation_name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            enabled: true,
            record_args: true,
            args_namespace: DEFAULT_ARGS_NAMESPACE.to_string(),
            slow_request_threshold: Duration::from_millis(500),
        }
    }
}

impl InstrumentationConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the component tag recorded on every span.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = component.into();
        self
    }

    /// Set the instrumentation name and version reported in diagnostics.
    pub fn with_instrumentation(
        mut self,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.instrumentation_name = name.into();
        self.version = version.into();
        self
    }

    /// Enable or disable the instrumentation.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Enable or disable argument recording in spans.
    ///
    /// **Security Warning**: request arguments often contain user input such as
    /// email addresses or identifiers. Disable in environments where traces leave
    /// your control.
    pub fn with_args_recording(mut self, enabled: bool) -> Self {
        self.record_args = enabled;
        self
    }

    /// Set the dotted prefix used for flattened argument attributes.
    pub fn with_args_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.args_namespace = namespace.into();
        self
    }

    /// Set the threshold for slow request warnings.
    ///
    /// Requests taking longer than this duration will be logged at WARN level
    /// with the `slow_request` field set to `true`.
    pub fn with_slow_request_threshold(mut self, threshold: Duration) -> Self {
        self.slow_request_threshold = threshold;
        self
    }

    /// Create a development-friendly configuration with argument recording
    /// and an aggressive slow request threshold.
    pub fn development() -> Self {
        Self {
            slow_request_threshold: Duration::from_millis(100),
            ..Self::default()
        }
    }

    /// Create a production-safe configuration that keeps arguments out of spans.
    pub fn production() -> Self {
        Self {
            record_args: false,
            slow_request_threshold: Duration::from_secs(1),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InstrumentationConfig::default();
        assert_eq!(config.component, "prisma");
        assert_eq!(config.args_namespace, "prisma.args");
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert!(config.enabled);
        assert!(config.record_args);
    }

    #[test]
    fn test_config_builder() {
        let config = InstrumentationConfig::new()
            .with_component("orm")
            .with_instrumentation("my-instrumentation", "9.9.9")
            .with_args_recording(false)
            .with_args_namespace("db.args");

        assert_eq!(config.component, "orm");
        assert_eq!(config.instrumentation_name, "my-instrumentation");
        assert_eq!(config.version, "9.9.9");
        assert!(!config.record_args);
        assert_eq!(config.args_namespace, "db.args");
    }

    #[test]
    fn test_development_config() {
        let config = InstrumentationConfig::development();
        assert!(config.record_args);
        assert_eq!(config.slow_request_threshold, Duration::from_millis(100));
    }

    #[test]
    fn test_production_config() {
        let config = InstrumentationConfig::production();
        assert!(!config.record_args);
        assert_eq!(config.slow_request_threshold, Duration::from_secs(1));
    }
}
