//! Handler for `GET /stats`: KPI numbers and chart series for the analytics page.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use waypoint_core::analytics::{
    activity_series, activity_window_start, completions_per_day, win_rate, ChartSeries,
    UNCATEGORIZED_LABEL,
};
use waypoint_core::lifecycle::GoalStatus;
use waypoint_core::timezone::{local_day, start_of_day};
use waypoint_db::repositories::StatsRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct Kpi {
    pub total: i64,
    pub completed: i64,
    /// Percent, one decimal place.
    pub win_rate: f64,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub kpi: Kpi,
    pub pie_category: ChartSeries,
    pub pie_status: ChartSeries,
    /// Completions per day over the last week, today last. Days are
    /// calendar days in the caller's zone.
    pub bar: ChartSeries,
}

/// GET /api/v1/stats
pub async fn get_stats(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<StatsResponse>>> {
    let totals = StatsRepo::totals(&state.pool, auth.user_id).await?;

    let mut pie_category = ChartSeries::default();
    for row in StatsRepo::by_category(&state.pool, auth.user_id).await? {
        pie_category.push(row.name, row.count);
    }
    if totals.uncategorized > 0 {
        pie_category.push(UNCATEGORIZED_LABEL, totals.uncategorized);
    }

    let mut pie_status = ChartSeries::default();
    for row in StatsRepo::by_status(&state.pool, auth.user_id).await? {
        match GoalStatus::from_id(row.status_id) {
            Some(status) => pie_status.push(status.label(), row.count),
            None => tracing::warn!(status_id = row.status_id, "Skipping unknown goal status"),
        }
    }

    let tz = auth.timezone(&state).await?;
    let today = local_day(state.now(), tz);
    let since = start_of_day(activity_window_start(today), tz);
    let finished = StatsRepo::completion_times_since(&state.pool, auth.user_id, since).await?;
    let counts = completions_per_day(&finished, tz);

    let response = StatsResponse {
        kpi: Kpi {
            total: totals.total,
            completed: totals.completed,
            win_rate: win_rate(totals.completed, totals.total),
        },
        pie_category,
        pie_status,
        bar: activity_series(today, &counts),
    };
    Ok(Json(DataResponse { data: response }))
}
