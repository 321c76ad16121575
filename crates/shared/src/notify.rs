//! WhatsApp notification sender.
//!
//! Best-effort delivery: no retries, no delivery confirmation. The service
//! either produces a `wa.me` deep link for the caller to open, or (when an
//! API host is configured) fires a single POST and forgets about it.

use reqwest::Url;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::config::NotifyConfig;
use crate::types::money::format_inr;

/// Notification errors.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The phone number has fewer than 10 digits after normalization.
    #[error("Phone number too short to notify: {0}")]
    PhoneTooShort(String),
    /// The deep link could not be constructed.
    #[error("Failed to build deep link: {0}")]
    BadLink(String),
    /// The API host rejected or never received the message.
    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// Outcome of a notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Notifications are disabled by configuration.
    Disabled,
    /// A deep link the caller should open to send the message.
    Link(String),
    /// The message was handed to the configured API host.
    Sent,
}

/// WhatsApp notification service.
#[derive(Clone)]
pub struct WhatsAppService {
    config: NotifyConfig,
    client: reqwest::Client,
}

impl WhatsAppService {
    /// Creates a new notification service.
    #[must_use]
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Returns true if stage-complete notifications should be offered.
    #[must_use]
    pub const fn notify_on_stage_complete(&self) -> bool {
        self.config.enabled && self.config.notify_on_stage_complete
    }

    /// Normalizes a phone number for WhatsApp addressing.
    ///
    /// Strips non-digits, drops a single leading zero, and prefixes the
    /// configured country code onto bare 10-digit numbers. Returns `None`
    /// for numbers shorter than 10 digits.
    #[must_use]
    pub fn normalize_phone(&self, raw: &str) -> Option<String> {
        let mut digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if digits.starts_with('0') {
            digits.remove(0);
        }

        if digits.len() < 10 {
            return None;
        }
        if digits.len() == 10 {
            return Some(format!("{}{}", self.config.country_code, digits));
        }
        Some(digits)
    }

    /// Builds a `wa.me`-style deep link for the given phone and text.
    pub fn deep_link(&self, phone: &str, text: &str) -> Result<String, NotifyError> {
        let normalized = self
            .normalize_phone(phone)
            .ok_or_else(|| NotifyError::PhoneTooShort(phone.to_string()))?;

        let mut url = Url::parse(&format!("{}/{normalized}", self.config.deep_link_base))
            .map_err(|e| NotifyError::BadLink(e.to_string()))?;
        url.query_pairs_mut().append_pair("text", text);

        Ok(url.to_string())
    }

    /// Sends a message, best-effort.
    ///
    /// With an API host configured the message is POSTed once and the result
    /// logged; otherwise the caller receives a deep link to open.
    ///
    /// # Errors
    ///
    /// Returns an error if the phone number is unusable or the link cannot
    /// be built. API-host delivery failures are logged, not returned: the
    /// contract is fire-and-forget.
    pub async fn send(&self, phone: &str, text: &str) -> Result<Delivery, NotifyError> {
        if !self.config.enabled {
            return Ok(Delivery::Disabled);
        }

        let Some(api_url) = &self.config.api_url else {
            return self.deep_link(phone, text).map(Delivery::Link);
        };

        let normalized = self
            .normalize_phone(phone)
            .ok_or_else(|| NotifyError::PhoneTooShort(phone.to_string()))?;

        let result = self
            .client
            .post(api_url)
            .json(&serde_json::json!({ "phone": normalized, "message": text }))
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => Ok(Delivery::Sent),
            Ok(response) => {
                warn!(status = %response.status(), "WhatsApp API host rejected message");
                Ok(Delivery::Sent)
            }
            Err(e) => {
                warn!(error = %e, "WhatsApp API host unreachable");
                Ok(Delivery::Sent)
            }
        }
    }

    // ========================================================================
    // Message templates
    // ========================================================================

    /// Renders the order-confirmation message.
    #[must_use]
    pub fn confirmation_message(
        &self,
        customer_name: &str,
        order_number: &str,
        event_type: &str,
        event_date: &str,
        total_amount: Decimal,
    ) -> String {
        self.config
            .templates
            .confirmation
            .replace("{customer_name}", customer_name)
            .replace("{order_number}", order_number)
            .replace("{event_type}", event_type)
            .replace("{event_date}", event_date)
            .replace("{total_amount}", &format_inr(total_amount))
    }

    /// Renders the quotation-declined message.
    #[must_use]
    pub fn decline_message(&self, customer_name: &str, quotation_number: &str) -> String {
        self.config
            .templates
            .decline
            .replace("{customer_name}", customer_name)
            .replace("{quotation_number}", quotation_number)
    }

    /// Renders the stage-complete message.
    #[must_use]
    pub fn stage_complete_message(
        &self,
        customer_name: &str,
        order_number: &str,
        stage: &str,
    ) -> String {
        self.config
            .templates
            .stage_complete
            .replace("{customer_name}", customer_name)
            .replace("{order_number}", order_number)
            .replace("{stage}", stage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotifyConfig;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn service() -> WhatsAppService {
        WhatsAppService::new(NotifyConfig::default())
    }

    #[rstest]
    #[case("98765 43210", Some("919876543210"))]
    #[case("098765-43210", Some("919876543210"))]
    #[case("+91 98765 43210", Some("919876543210"))]
    #[case("12345", None)]
    #[case("", None)]
    fn test_normalize_phone(#[case] raw: &str, #[case] expected: Option<&str>) {
        assert_eq!(
            service().normalize_phone(raw),
            expected.map(ToString::to_string)
        );
    }

    #[test]
    fn test_deep_link_encodes_text() {
        let link = service()
            .deep_link("9876543210", "Hello & welcome")
            .unwrap();
        assert!(link.starts_with("https://wa.me/919876543210?text="));
        assert!(!link.contains(' '));
        assert!(!link.contains('&'));
    }

    #[test]
    fn test_deep_link_rejects_short_phone() {
        let err = service().deep_link("12345", "hi").unwrap_err();
        assert!(matches!(err, NotifyError::PhoneTooShort(_)));
    }

    #[test]
    fn test_confirmation_message_fills_placeholders() {
        let msg = service().confirmation_message(
            "Priya",
            "ORD_AKP_26_0001",
            "Wedding",
            "2026-11-20",
            dec!(45000),
        );
        assert!(msg.contains("Priya"));
        assert!(msg.contains("ORD_AKP_26_0001"));
        assert!(msg.contains("45,000"));
        assert!(!msg.contains('{'));
    }

    #[test]
    fn test_decline_message_fills_placeholders() {
        let msg = service().decline_message("Priya", "QT_AKP_26_0002");
        assert!(msg.contains("QT_AKP_26_0002"));
        assert!(!msg.contains('{'));
    }
}
