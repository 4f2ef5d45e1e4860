//! Binary entrypoint for the ranking webservice. Boots the Axum HTTP
//! server, wiring routes, shared state and middleware.

use std::sync::Arc;

use anyhow::{Context, Result};

use topsis_ranker::api::{create_router, AppState};
use topsis_ranker::config::ServiceConfig;
use topsis_ranker::metrics::Metrics;
use topsis_ranker::notify::{Mailer, SmtpMailer};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topsis_ranker=info")),
        )
        .init();

    let cfg = ServiceConfig::from_env()?;

    let mailer: Option<Arc<dyn Mailer>> = match &cfg.smtp {
        Some(smtp) => Some(Arc::new(SmtpMailer::new(smtp)?)),
        None => {
            tracing::warn!("SMTP_HOST not set, result emails are disabled");
            None
        }
    };

    let metrics = Metrics::init();
    let app = create_router(AppState { mailer }).merge(metrics.router());

    let listener = tokio::net::TcpListener::bind(cfg.bind)
        .await
        .with_context(|| format!("binding {}", cfg.bind))?;
    tracing::info!("listening on {}", cfg.bind);
    axum::serve(listener, app).await.context("serving http")?;
    Ok(())
}
