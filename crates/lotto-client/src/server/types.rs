use std::sync::Arc;

use axum::{Json, http::StatusCode};
use chrono::NaiveDate;
use lotto_stats::{BallColour, BallFrequency};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::DashboardState;
use crate::service::{FrequencyReport, LastDraw};

#[derive(Clone)]
pub(super) struct RouterState {
    pub(super) dashboard: Arc<DashboardState>,
}

#[derive(Serialize, JsonSchema)]
pub(super) struct ApiResponse {
    success: bool,
    data: Option<Value>,
    error: Option<ApiError>,
}

#[derive(Serialize, JsonSchema)]
pub(super) struct ApiError {
    code: &'static str,
    message: String,
}

pub(super) type ApiResult = (StatusCode, Json<ApiResponse>);

pub(super) fn ok_value(value: Value) -> ApiResult {
    (
        StatusCode::OK,
        Json(ApiResponse {
            success: true,
            data: Some(value),
            error: None,
        }),
    )
}

pub(super) fn err_response(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> ApiResult {
    (
        status,
        Json(ApiResponse {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
            }),
        }),
    )
}

pub(super) struct ApiFailure {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiFailure {
    pub(super) fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "bad_request",
            message: message.into(),
        }
    }

    pub(super) fn no_data(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "no_data",
            message: message.into(),
        }
    }

    pub(super) fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "internal_error",
            message: message.into(),
        }
    }
}

/// Turn a handler outcome into the response envelope.
pub(super) fn respond<T: Serialize>(result: Result<T, ApiFailure>) -> ApiResult {
    match result.and_then(|data| {
        serde_json::to_value(data).map_err(|e| ApiFailure::internal(e.to_string()))
    }) {
        Ok(value) => ok_value(value),
        Err(err) => err_response(err.status, err.code, err.message),
    }
}

/// Query string of `/api/frequency`. Dates are `YYYY-MM-DD`.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub(super) struct FrequencyQuery {
    pub(super) start_date: Option<String>,
    pub(super) end_date: Option<String>,
}

#[derive(Serialize)]
pub(super) struct BallView {
    ball: u8,
    colour: BallColour,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency: Option<u32>,
}

impl BallView {
    fn plain(ball: u8) -> Self {
        Self {
            ball,
            colour: BallColour::for_number(ball),
            frequency: None,
        }
    }
}

impl From<BallFrequency> for BallView {
    fn from(entry: BallFrequency) -> Self {
        Self {
            ball: entry.ball,
            colour: entry.colour(),
            frequency: Some(entry.frequency),
        }
    }
}

#[derive(Serialize)]
pub(super) struct FrequencyView {
    start_date: NaiveDate,
    end_date: NaiveDate,
    draws: usize,
    total: u64,
    /// All 53 slots, ball 0 included.
    frequencies: Vec<BallView>,
    most_frequent: Vec<Vec<BallView>>,
}

impl From<FrequencyReport> for FrequencyView {
    fn from(report: FrequencyReport) -> Self {
        Self {
            start_date: report.range.start,
            end_date: report.range.end,
            draws: report.draws,
            total: report.frequencies.total(),
            frequencies: report
                .frequencies
                .entries()
                .into_iter()
                .map(BallView::from)
                .collect(),
            most_frequent: report
                .top_rows
                .into_iter()
                .map(|row| row.into_iter().map(BallView::from).collect())
                .collect(),
        }
    }
}

#[derive(Serialize)]
pub(super) struct LastDrawView {
    draw_number: u32,
    draw_date: NaiveDate,
    main: Vec<BallView>,
    bonus: BallView,
}

impl From<LastDraw> for LastDrawView {
    fn from(last: LastDraw) -> Self {
        Self {
            draw_number: last.draw_number,
            draw_date: last.draw_date,
            main: last.balls.main.iter().map(|&b| BallView::plain(b)).collect(),
            bonus: BallView::plain(last.balls.bonus),
        }
    }
}
