use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use metrics::{counter, histogram};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::criteria::Criteria;
use crate::engine;
use crate::metrics::ensure_metrics_described;
use crate::notify::Mailer;
use crate::report;
use crate::table::{DataTable, RankedTable};

static FORM_PAGE: &str = include_str!("../static/index.html");

#[derive(Clone, Default)]
pub struct AppState {
    /// Absent when SMTP is not configured; ranking still works, email
    /// requests are answered with an explanation instead.
    pub mailer: Option<Arc<dyn Mailer>>,
}

pub fn create_router(state: AppState) -> Router {
    ensure_metrics_described();

    Router::new()
        .route("/", get(|| async { Html(FORM_PAGE) }))
        .route("/health", get(|| async { "ok" }))
        .route("/rank", post(rank))
        .layer(CorsLayer::very_permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[derive(serde::Deserialize)]
struct RankRequest {
    /// Raw CSV text: header row, identifier column, criteria columns.
    csv: String,
    /// Comma-separated weights, e.g. "0.25,0.25,0.25,0.25".
    weights: String,
    /// Comma-separated impacts, e.g. "+,+,+,-".
    impacts: String,
    /// When set, the ranked table is also emailed to this address.
    #[serde(default)]
    email: Option<String>,
    /// Original upload name, used to derive the attachment name.
    #[serde(default)]
    filename: Option<String>,
}

#[derive(serde::Serialize)]
struct RankResponse {
    table: RankedTable,
    emailed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    email_error: Option<String>,
}

#[derive(serde::Serialize)]
struct ErrorBody {
    error: String,
}

async fn rank(
    State(state): State<AppState>,
    Json(req): Json<RankRequest>,
) -> Result<Json<RankResponse>, (StatusCode, Json<ErrorBody>)> {
    counter!("rank_requests_total").increment(1);

    let ranked = match compute(&req) {
        Ok(table) => table,
        Err(e) => {
            counter!("rank_failures_total").increment(1);
            tracing::warn!("rank request rejected: {e:#}");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: format!("{e:#}"),
                }),
            ));
        }
    };
    histogram!("rank_rows").record(ranked.rows.len() as f64);

    let (emailed, email_error) = match (&req.email, &state.mailer) {
        (None, _) => (false, None),
        (Some(_), None) => (
            false,
            Some("email delivery is not configured on this server".to_string()),
        ),
        (Some(to), Some(mailer)) => {
            let filename = report::result_filename(req.filename.as_deref().unwrap_or(""));
            match mailer.send_results(to, &filename, &ranked).await {
                Ok(()) => {
                    counter!("emails_sent_total").increment(1);
                    (true, None)
                }
                Err(e) => {
                    counter!("email_failures_total").increment(1);
                    tracing::warn!("result email failed: {e:#}");
                    (false, Some(format!("{e:#}")))
                }
            }
        }
    };

    Ok(Json(RankResponse {
        table: ranked,
        emailed,
        email_error,
    }))
}

/// Parse, validate and rank. Pure apart from the allocation, so the error
/// paths are easy to exercise in tests.
fn compute(req: &RankRequest) -> anyhow::Result<RankedTable> {
    let table = DataTable::from_csv_str(&req.csv)?;
    let criteria = Criteria::parse(&req.weights, &req.impacts)?;
    let matrix = table.numeric_matrix()?;
    let ranking = engine::score(&matrix, &criteria.weights, &criteria.impacts)?;
    table.into_ranked(&ranking)
}
