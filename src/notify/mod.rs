//! Outbound delivery of ranked results.

pub mod email;

pub use email::{SmtpConfig, SmtpMailer};

use anyhow::Result;

use crate::table::RankedTable;

/// Anything that can deliver a ranked result table to a recipient.
///
/// The web layer holds one behind an `Arc`, so tests can substitute a
/// recording stub instead of a live SMTP relay.
#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send_results(&self, to: &str, filename: &str, table: &RankedTable) -> Result<()>;
}
