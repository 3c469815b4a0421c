//! Display page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use order_counter_core::Period;
use tracing::instrument;

use crate::state::AppState;

/// A period button on the display page.
pub struct PeriodOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Display page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    /// Period selector buttons.
    pub periods: Vec<PeriodOption>,
    /// Seconds between automatic refreshes.
    pub refresh_interval_secs: u64,
    /// Number of flip digits to render before the first count arrives.
    pub digits: usize,
}

/// Number of flip digits shown while loading.
const INITIAL_DIGITS: usize = 6;

/// Display the flip counter page.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> impl IntoResponse {
    let periods = Period::ALL
        .into_iter()
        .map(|period| PeriodOption {
            value: period.as_str(),
            label: period.label(),
            selected: period == Period::default(),
        })
        .collect();

    IndexTemplate {
        periods,
        refresh_interval_secs: state.config().refresh_interval.as_secs(),
        digits: INITIAL_DIGITS,
    }
}
