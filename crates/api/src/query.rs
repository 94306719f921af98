//! Query parameter types for the goal listing endpoints.
//!
//! Values arrive as raw strings and are interpreted by the parsers in
//! `waypoint_core::listing`, so unknown sort keys fall back to the default
//! instead of rejecting the request.

use serde::Deserialize;
use waypoint_core::types::DbId;

/// `GET /goals?category_id=&status=&q=&sort_by=&page=`
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub category_id: Option<DbId>,
    /// `pending`, `in_progress`, `completed`, `archived` or `overdue`.
    /// Missing means every goal except archived ones.
    pub status: Option<String>,
    pub q: Option<String>,
    pub sort_by: Option<String>,
    /// 1-based page number.
    pub page: Option<i64>,
}

/// `GET /goals/calendar?date=&status=&category_id=&q=&sort_by=`
#[derive(Debug, Default, Deserialize)]
pub struct CalendarParams {
    /// `YYYY-MM-DD`; malformed values are ignored.
    pub date: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<DbId>,
    pub q: Option<String>,
    pub sort_by: Option<String>,
}
