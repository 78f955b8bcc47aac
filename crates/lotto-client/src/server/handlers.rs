use axum::{
    extract::{Query, State},
    response::Html,
};
use chrono::NaiveDate;
use serde_json::json;

use super::types::{
    ApiFailure, ApiResult, FrequencyQuery, FrequencyView, LastDrawView, RouterState, ok_value,
    respond,
};
use crate::{
    models::draw::DATE_FORMAT,
    service::{DateRange, FrequencyReport, QueryError, get_last_draw},
};

/// Rows and columns of the most-frequent grid.
const TOP_ROWS: usize = 3;
const TOP_WIDTH: usize = 6;

const DASHBOARD_PAGE: &str = include_str!("../../assets/dashboard.html");

pub(super) async fn index() -> Html<&'static str> {
    Html(DASHBOARD_PAGE)
}

pub(super) async fn health(State(state): State<RouterState>) -> ApiResult {
    ok_value(json!({"status": "ok", "draws": state.dashboard.table.len()}))
}

pub(super) async fn get_frequency(
    State(state): State<RouterState>,
    Query(query): Query<FrequencyQuery>,
) -> ApiResult {
    respond(frequency_view(&state, &query))
}

pub(super) async fn get_last_draw_handler(State(state): State<RouterState>) -> ApiResult {
    respond(
        get_last_draw(&state.dashboard.table)
            .map(LastDrawView::from)
            .map_err(|e| match e {
                QueryError::NoData => ApiFailure::no_data(e.to_string()),
            }),
    )
}

fn frequency_view(state: &RouterState, query: &FrequencyQuery) -> Result<FrequencyView, ApiFailure> {
    let defaults = state.dashboard.default_range;
    let start = parse_bound("start_date", query.start_date.as_deref())?.unwrap_or(defaults.start);
    let end = parse_bound("end_date", query.end_date.as_deref())?.unwrap_or(defaults.end);

    let report = FrequencyReport::build(
        &state.dashboard.table,
        DateRange::new(start, end),
        TOP_ROWS,
        TOP_WIDTH,
    );
    log::debug!(
        "Frequency query {start}..={end}: {} draws, {} balls",
        report.draws,
        report.frequencies.total()
    );
    Ok(report.into())
}

/// An absent or blank bound falls back to the default.
fn parse_bound(name: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, ApiFailure> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
            .map(Some)
            .map_err(|e| ApiFailure::bad_request(format!("invalid {name} `{s}`: {e}"))),
    }
}
