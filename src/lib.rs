// src/lib.rs
// Public library surface for the CLI, the service binary and integration tests.

pub mod api;
pub mod config;
pub mod criteria;
pub mod engine;
pub mod metrics;
pub mod notify;
pub mod report;
pub mod table;

// ---- Re-exports for stable public API ----
pub use crate::api::{create_router, AppState};
pub use crate::criteria::Criteria;
pub use crate::engine::{score, EngineError, Impact, Ranking};
pub use crate::notify::{Mailer, SmtpConfig, SmtpMailer};
pub use crate::table::{DataTable, RankedRow, RankedTable};
