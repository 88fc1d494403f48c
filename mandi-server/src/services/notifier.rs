//! Payment reminder delivery
//!
//! Fire-and-forget HTTP POST to an external notification gateway. Delivery
//! failures are logged and swallowed; the ledger acknowledgement never
//! depends on the gateway being reachable.

use serde::Serialize;

/// Reminder payload sent to the notification gateway
#[derive(Debug, Clone, Serialize)]
pub struct ReminderMessage {
    /// Acknowledgement reference, also returned to the caller
    pub reference: String,
    pub vendor_name: String,
    pub contact: String,
    pub supplier_name: String,
    pub amount_due: f64,
}

/// Outbound reminder client
///
/// With no gateway configured (`NOTIFIER_URL` unset) sends degrade to a log
/// line, which keeps single-node deployments self-contained.
#[derive(Debug, Clone)]
pub struct ReminderNotifier {
    base_url: Option<String>,
    client: reqwest::Client,
}

impl ReminderNotifier {
    pub fn new(base_url: Option<String>) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Dispatch a payment reminder without blocking the request
    pub fn send_payment_reminder(&self, message: ReminderMessage) {
        let Some(base_url) = self.base_url.clone() else {
            tracing::info!(
                target: "notifier",
                reference = %message.reference,
                vendor = %message.vendor_name,
                amount_due = message.amount_due,
                "No notification gateway configured, reminder logged only"
            );
            return;
        };

        let client = self.client.clone();
        tokio::spawn(async move {
            let url = format!("{}/notify/payment-reminder", base_url.trim_end_matches('/'));
            match client.post(&url).json(&message).send().await {
                Ok(resp) if resp.status().is_success() => {
                    tracing::info!(
                        target: "notifier",
                        reference = %message.reference,
                        "Payment reminder delivered"
                    );
                }
                Ok(resp) => {
                    tracing::warn!(
                        target: "notifier",
                        reference = %message.reference,
                        status = %resp.status(),
                        "Notification gateway returned non-success status"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        target: "notifier",
                        reference = %message.reference,
                        error = %e,
                        "Failed to reach notification gateway"
                    );
                }
            }
        });
    }
}
