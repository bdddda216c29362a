//! Fire-and-forget e-mail delivery.
//!
//! Messages are handed to the configured sender on a spawned task so a slow
//! or failing relay never holds up the request that triggered it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::config::PLACEHOLDER_EMAIL_DOMAIN;
use crate::infra::{Email, EmailSender};

/// Whether an address can actually receive mail.
pub fn is_deliverable(address: &str) -> bool {
    let address = address.trim();
    !address.is_empty()
        && address.contains('@')
        && !address
            .to_ascii_lowercase()
            .ends_with(&format!("@{}", PLACEHOLDER_EMAIL_DOMAIN))
}

/// Send `email` in the background. Failures are logged and dropped.
///
/// Returns `None` when the recipient is a synthesized placeholder.
pub fn dispatch(mailer: Arc<dyn EmailSender>, email: Email) -> Option<JoinHandle<()>> {
    if !is_deliverable(&email.to) {
        tracing::debug!(to = %email.to, "skipping email to undeliverable address");
        return None;
    }

    Some(tokio::spawn(async move {
        let to = email.to.clone();
        let subject = email.subject.clone();
        match mailer.send(email).await {
            Ok(()) => tracing::info!(%to, %subject, "email sent"),
            Err(e) => tracing::error!(%to, %subject, error = %e, "email delivery failed"),
        }
    }))
}
