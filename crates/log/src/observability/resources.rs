//! [`LoggerResource`]: a per-context bundle of error-reporting and
//! notification settings, attached to [`super::context::ExecutionContext`]
//! and [`super::context::NodeContext`] resource maps and merged by
//! [`super::span::get_current_logger_resource`].

use serde::{Deserialize, Serialize};

/// Minimum severity for an outbound notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NotificationSeverity {
    /// Send on any recorded event.
    Info,
    /// Send on warnings and above.
    Warn,
    /// Send only on errors.
    #[default]
    Error,
}

/// Channel preferences for out-of-band alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPrefs {
    /// Whether email notifications are enabled.
    pub email_enabled: bool,
    /// Addresses to notify, when enabled.
    pub email_addresses: Vec<String>,
    /// Whether webhook notifications are enabled.
    pub webhook_enabled: bool,
    /// Minimum severity that triggers a notification.
    pub min_severity: NotificationSeverity,
    /// Caps outbound notification volume.
    pub rate_limit_per_hour: u32,
}

impl Default for NotificationPrefs {
    fn default() -> Self {
        Self {
            email_enabled: false,
            email_addresses: Vec::new(),
            webhook_enabled: false,
            min_severity: NotificationSeverity::Error,
            rate_limit_per_hour: 10,
        }
    }
}

/// The level at which `sampling_rate` applies, or at which a context opts
/// into verbose logging. Not an `EnvFilter` directive — a coarse dial for
/// error-reporting integrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

/// Error-reporting and alerting settings scoped to an execution or node
/// context, merged across nesting by [`super::span::merge_logger_resources`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggerResource {
    pub(crate) sentry_dsn: Option<String>,
    pub(crate) webhook_url: Option<String>,
    pub(crate) log_level: LogLevel,
    pub(crate) tags: Vec<(String, String)>,
    pub(crate) notification_prefs: NotificationPrefs,
    pub(crate) sampling_enabled: bool,
    pub(crate) sampling_rate: f64,
}

impl LoggerResource {
    /// An empty resource with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Sentry DSN this context's errors should report to.
    #[must_use]
    pub fn with_sentry_dsn(mut self, dsn: impl Into<String>) -> Self {
        self.sentry_dsn = Some(dsn.into());
        self
    }

    /// Sets the webhook URL this context's alerts should post to.
    #[must_use]
    pub fn with_webhook(mut self, url: impl Into<String>) -> Self {
        self.webhook_url = Some(url.into());
        self
    }

    /// Sets the minimum log level this context reports at.
    #[must_use]
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Attaches a tag, kept (not overwritten) when merged with other
    /// contexts' tags.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push((key.into(), value.into()));
        self
    }

    /// Sets notification preferences.
    #[must_use]
    pub fn with_notification_prefs(mut self, prefs: NotificationPrefs) -> Self {
        self.notification_prefs = prefs;
        self
    }

    /// Enables sampling at `rate` (0.0–1.0).
    #[must_use]
    pub fn with_sampling(mut self, rate: f64) -> Self {
        self.sampling_enabled = true;
        self.sampling_rate = rate;
        self
    }

    /// The configured Sentry DSN, if any.
    #[must_use]
    pub fn sentry_dsn(&self) -> Option<&str> {
        self.sentry_dsn.as_deref()
    }

    /// The configured webhook URL, if any.
    #[must_use]
    pub fn webhook_url(&self) -> Option<&str> {
        self.webhook_url.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_methods_set_expected_fields() {
        let resource = LoggerResource::new()
            .with_sentry_dsn("dsn")
            .with_webhook("hook")
            .with_tag("k", "v")
            .with_sampling(0.5);

        assert_eq!(resource.sentry_dsn(), Some("dsn"));
        assert_eq!(resource.webhook_url(), Some("hook"));
        assert_eq!(resource.tags, vec![("k".to_string(), "v".to_string())]);
        assert!(resource.sampling_enabled);
        assert_eq!(resource.sampling_rate, 0.5);
    }

    #[test]
    fn defaults_match_documented_values() {
        let prefs = NotificationPrefs::default();
        assert_eq!(prefs.min_severity, NotificationSeverity::Error);
        assert_eq!(prefs.rate_limit_per_hour, 10);
        assert!(!prefs.email_enabled);
    }
}
