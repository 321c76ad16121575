//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Notification (WhatsApp) configuration.
    #[serde(default)]
    pub notify: NotifyConfig,
    /// Document (quotation/invoice) configuration.
    #[serde(default)]
    pub documents: DocumentConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// WhatsApp notification configuration.
///
/// The original system kept message templates and the stage-complete prompt
/// flag in browser-local storage; here they are explicit configuration
/// injected into the sender at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    /// Whether notifications are offered at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Whether completing a workflow stage offers a notification.
    #[serde(default = "default_true")]
    pub notify_on_stage_complete: bool,
    /// Country code prefixed onto bare 10-digit numbers.
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Base URL for WhatsApp deep links.
    #[serde(default = "default_deep_link_base")]
    pub deep_link_base: String,
    /// Optional API host for server-side, fire-and-forget delivery.
    /// When unset, the service only produces deep links.
    #[serde(default)]
    pub api_url: Option<String>,
    /// Message templates.
    #[serde(default)]
    pub templates: MessageTemplates,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            notify_on_stage_complete: true,
            country_code: default_country_code(),
            deep_link_base: default_deep_link_base(),
            api_url: None,
            templates: MessageTemplates::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_country_code() -> String {
    "91".to_string()
}

fn default_deep_link_base() -> String {
    "https://wa.me".to_string()
}

/// Message templates with `{placeholder}` substitution.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageTemplates {
    /// Sent when a quotation is confirmed into an order.
    #[serde(default = "default_confirmation_template")]
    pub confirmation: String,
    /// Sent when a quotation is declined.
    #[serde(default = "default_decline_template")]
    pub decline: String,
    /// Sent when a production stage is completed.
    #[serde(default = "default_stage_complete_template")]
    pub stage_complete: String,
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self {
            confirmation: default_confirmation_template(),
            decline: default_decline_template(),
            stage_complete: default_stage_complete_template(),
        }
    }
}

fn default_confirmation_template() -> String {
    "Dear {customer_name}, your booking is confirmed! Order {order_number} \
     for {event_type} on {event_date}. Total amount: Rs. {total_amount}. \
     Thank you for choosing us."
        .to_string()
}

fn default_decline_template() -> String {
    "Dear {customer_name}, quotation {quotation_number} has been closed. \
     We hope to work with you on a future occasion."
        .to_string()
}

fn default_stage_complete_template() -> String {
    "Dear {customer_name}, an update on order {order_number}: {stage} is now \
     complete."
        .to_string()
}

/// Document rendering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentConfig {
    /// Studio code embedded in document numbers (e.g., `QT_AKP_26_0001`).
    #[serde(default = "default_studio_code")]
    pub studio_code: String,
    /// Studio display name printed on documents.
    #[serde(default = "default_studio_name")]
    pub studio_name: String,
    /// Days a quotation stays valid after creation.
    #[serde(default = "default_validity_days")]
    pub validity_days: i64,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            studio_code: default_studio_code(),
            studio_name: default_studio_name(),
            validity_days: default_validity_days(),
        }
    }
}

fn default_studio_code() -> String {
    "AKP".to_string()
}

fn default_studio_name() -> String {
    "Aperture Studio".to_string()
}

fn default_validity_days() -> i64 {
    30
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("APERTURE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notify_defaults() {
        let notify = NotifyConfig::default();
        assert!(notify.enabled);
        assert_eq!(notify.country_code, "91");
        assert_eq!(notify.deep_link_base, "https://wa.me");
        assert!(notify.api_url.is_none());
        assert!(notify.templates.confirmation.contains("{order_number}"));
    }

    #[test]
    fn test_document_defaults() {
        let docs = DocumentConfig::default();
        assert_eq!(docs.studio_code, "AKP");
        assert_eq!(docs.validity_days, 30);
    }
}
