//! Root configuration type and its builder.

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, LogFormat, RoutingSection, ServerSection, TelemetrySection};

/// Complete Ariadne configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use ariadne_config::AriadneConfig;
///
/// let config = AriadneConfig::default();
/// assert_eq!(config.server.http_addr, "0.0.0.0:8080");
/// assert!(!config.routing.strict);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct AriadneConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerSection,

    /// Routing configuration.
    #[serde(default)]
    pub routing: RoutingSection,

    /// Telemetry configuration (logging, metrics).
    #[serde(default)]
    pub telemetry: TelemetrySection,
}

impl AriadneConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> AriadneConfigBuilder {
        AriadneConfigBuilder::new()
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - the server address is not a socket address
    /// - metrics are enabled and the metrics address is not a socket address
    /// - the histogram buckets are empty or not strictly increasing
    /// - the log level is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.http_addr.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid_value(
                "server.http_addr",
                format!("invalid socket address: {}", self.server.http_addr),
            ));
        }

        let metrics = &self.telemetry.metrics;
        if metrics.enabled {
            if metrics.addr.parse::<SocketAddr>().is_err() {
                return Err(ConfigError::invalid_value(
                    "telemetry.metrics.addr",
                    format!("invalid socket address: {}", metrics.addr),
                ));
            }
            let increasing = metrics.histogram_buckets.windows(2).all(|w| w[0] < w[1]);
            if metrics.histogram_buckets.is_empty() || !increasing {
                return Err(ConfigError::invalid_value(
                    "telemetry.metrics.histogram_buckets",
                    "must be non-empty and strictly increasing",
                ));
            }
        }

        if self.telemetry.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "telemetry.logging.level",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Local development preset: pretty debug logs with source locations.
    ///
    /// # Example
    ///
    /// ```
    /// use ariadne_config::AriadneConfig;
    ///
    /// let config = AriadneConfig::development();
    /// assert_eq!(config.telemetry.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.server.http_addr = "127.0.0.1:8080".to_string();
        config.server.shutdown_timeout_secs = 5;
        config.telemetry.logging.level = "debug".to_string();
        config.telemetry.logging.format = LogFormat::Pretty;
        config.telemetry.logging.include_location = true;
        config
    }

    /// Production preset: JSON info logs and the Prometheus exporter.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.telemetry.logging.level = "info".to_string();
        config.telemetry.logging.format = LogFormat::Json;
        config.telemetry.metrics.enabled = true;
        config
    }
}

/// Builder for [`AriadneConfig`].
#[derive(Debug, Default)]
pub struct AriadneConfigBuilder {
    server: Option<ServerSection>,
    routing: Option<RoutingSection>,
    telemetry: Option<TelemetrySection>,
}

impl AriadneConfigBuilder {
    /// Create a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the server section.
    #[must_use]
    pub fn server(mut self, server: ServerSection) -> Self {
        self.server = Some(server);
        self
    }

    /// Set the routing section.
    #[must_use]
    pub fn routing(mut self, routing: RoutingSection) -> Self {
        self.routing = Some(routing);
        self
    }

    /// Set the telemetry section.
    #[must_use]
    pub fn telemetry(mut self, telemetry: TelemetrySection) -> Self {
        self.telemetry = Some(telemetry);
        self
    }

    /// Build the configuration. Unset sections use their defaults.
    #[must_use]
    pub fn build(self) -> AriadneConfig {
        AriadneConfig {
            server: self.server.unwrap_or_default(),
            routing: self.routing.unwrap_or_default(),
            telemetry: self.telemetry.unwrap_or_default(),
        }
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if validation fails.
    pub fn build_validated(self) -> Result<AriadneConfig, ConfigError> {
        let config = self.build();
        config.validate()?;
        Ok(config)
    }
}
