//! Outbound mail.
//!
//! Handlers hand a template name and its data to a [`Mailer`]. Delivery runs
//! on the background task group, so a slow or failing mail server never holds
//! up the response. [`send_with_retry`] retries a failed send with
//! exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Attempts made by [`send_with_retry`], including the first one.
pub const MAIL_ATTEMPTS: usize = 3;

/// Template used for the welcome mail carrying the activation token.
pub const WELCOME_TEMPLATE: &str = "user_welcome";

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, recipient: &str, template: &str, data: Value) -> anyhow::Result<()>;
}

/// Mailer that writes a log line instead of delivering.
///
/// Only the recipient and template are logged; template data can hold a
/// plaintext token.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, recipient: &str, template: &str, _data: Value) -> anyhow::Result<()> {
        tracing::info!(recipient, template, "mail queued for delivery");
        Ok(())
    }
}

/// Sends through `mailer`, retrying up to [`MAIL_ATTEMPTS`] times in total.
///
/// Backoff starts at `base_delay` and doubles, with jitter.
pub async fn send_with_retry(
    mailer: &dyn Mailer,
    recipient: &str,
    template: &str,
    data: &Value,
    base_delay: Duration,
) -> anyhow::Result<()> {
    // from_millis(2) yields 2, 4, 8...; the factor scales that to base_delay.
    let factor = (base_delay.as_millis() as u64 / 2).max(1);
    let strategy = ExponentialBackoff::from_millis(2)
        .factor(factor)
        .map(jitter)
        .take(MAIL_ATTEMPTS - 1);

    Retry::start(strategy, || async {
        mailer
            .send(recipient, template, data.clone())
            .await
            .inspect_err(|e| tracing::warn!(recipient, template, error = %e, "mail send failed"))
    })
    .await
}
