//! Listing contract shared by the dashboard and calendar views: status
//! filters, sort keys, search patterns, pagination and priority tiers.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::CoreError;
use crate::lifecycle::{is_overdue, GoalStatus};
use crate::types::Timestamp;

/// Dashboard page size when none is configured.
pub const DEFAULT_PAGE_SIZE: i64 = 5;

/// Upper bound for a configured page size.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Query-string value selecting the derived overdue filter.
pub const OVERDUE_FILTER: &str = "overdue";

// ---------------------------------------------------------------------------
// Status filter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    /// Everything except archived goals.
    Active,
    Exact(GoalStatus),
    /// Pending goals whose deadline has passed.
    Overdue,
}

impl StatusFilter {
    /// Parse the `status` query parameter. Missing or empty means [`StatusFilter::Active`].
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.map(str::trim) {
            None | Some("") => Ok(StatusFilter::Active),
            Some(OVERDUE_FILTER) => Ok(StatusFilter::Overdue),
            Some(other) => other.parse().map(StatusFilter::Exact),
        }
    }
}

// ---------------------------------------------------------------------------
// Sort keys
// ---------------------------------------------------------------------------

/// Dashboard ordering. Deadline orderings put undated goals last both ways.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    DeadlineAsc,
    DeadlineDesc,
    CreatedAsc,
    CreatedDesc,
    TitleAsc,
}

impl SortKey {
    /// Unknown or missing keys fall back to [`SortKey::DeadlineAsc`].
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "deadline_desc" => SortKey::DeadlineDesc,
            "created_asc" => SortKey::CreatedAsc,
            "created_desc" => SortKey::CreatedDesc,
            "title_asc" => SortKey::TitleAsc,
            _ => SortKey::DeadlineAsc,
        }
    }
}

/// Secondary ordering inside a priority tier on the calendar view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieredSortKey {
    #[default]
    DateAsc,
    DateDesc,
    CreatedDesc,
}

impl TieredSortKey {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "date_desc" => TieredSortKey::DateDesc,
            "created_desc" => TieredSortKey::CreatedDesc,
            _ => TieredSortKey::DateAsc,
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// Build a `LIKE`/`ILIKE` substring pattern from user input.
///
/// Blank input disables the filter. Wildcards in the input are escaped so the
/// search matches them literally.
pub fn search_pattern(raw: Option<&str>) -> Option<String> {
    let q = raw?.trim();
    if q.is_empty() {
        return None;
    }
    let mut escaped = String::with_capacity(q.len() + 2);
    escaped.push('%');
    for ch in q.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}

/// Parse the calendar `date=YYYY-MM-DD` filter. Malformed dates are ignored.
pub fn parse_day(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// A 1-based page request with a fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Pages below 1 are clamped to 1; the page size is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, per_page: i64) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            per_page: per_page.clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        if total <= 0 {
            0
        } else {
            (total + self.per_page - 1) / self.per_page
        }
    }
}

/// One page of a listing plus the counts needed to render pagination.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total: i64) -> Self {
        Self {
            items,
            page: request.page,
            per_page: request.per_page,
            total,
            total_pages: request.total_pages(total),
        }
    }
}

// ---------------------------------------------------------------------------
// Priority tiers
// ---------------------------------------------------------------------------

/// The fields the tiered ordering needs from a goal row.
pub trait Schedulable {
    fn status(&self) -> GoalStatus;
    fn deadline(&self) -> Option<Timestamp>;
    fn created_at(&self) -> Timestamp;
}

/// Calendar priority tier; lower sorts first. Archived goals have no tier.
pub fn priority_tier(status: GoalStatus, deadline: Option<Timestamp>, now: Timestamp) -> Option<u8> {
    match status {
        GoalStatus::InProgress => Some(0),
        GoalStatus::Pending if is_overdue(status, deadline, now) => Some(1),
        GoalStatus::Pending => Some(2),
        GoalStatus::Completed => Some(3),
        GoalStatus::Archived => None,
    }
}

fn cmp_nulls_last(a: Option<Timestamp>, b: Option<Timestamp>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Drop archived goals and order the rest by tier, then by `key`.
pub fn arrange_tiered<T: Schedulable>(items: Vec<T>, key: TieredSortKey, now: Timestamp) -> Vec<T> {
    let mut tiered: Vec<(u8, T)> = items
        .into_iter()
        .filter_map(|item| priority_tier(item.status(), item.deadline(), now).map(|t| (t, item)))
        .collect();

    tiered.sort_by(|(ta, a), (tb, b)| {
        ta.cmp(tb).then_with(|| match key {
            TieredSortKey::DateAsc => cmp_nulls_last(a.deadline(), b.deadline(), false),
            TieredSortKey::DateDesc => cmp_nulls_last(a.deadline(), b.deadline(), true),
            TieredSortKey::CreatedDesc => b.created_at().cmp(&a.created_at()),
        })
    });

    tiered.into_iter().map(|(_, item)| item).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, TimeZone, Utc};

    #[derive(Debug, Clone)]
    struct Row {
        name: &'static str,
        status: GoalStatus,
        deadline: Option<Timestamp>,
        created_at: Timestamp,
    }

    impl Schedulable for Row {
        fn status(&self) -> GoalStatus {
            self.status
        }
        fn deadline(&self) -> Option<Timestamp> {
            self.deadline
        }
        fn created_at(&self) -> Timestamp {
            self.created_at
        }
    }

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap()
    }

    fn row(name: &'static str, status: GoalStatus, deadline_hours: Option<i64>, created_hours: i64) -> Row {
        Row {
            name,
            status,
            deadline: deadline_hours.map(|h| now() + Duration::hours(h)),
            created_at: now() + Duration::hours(created_hours),
        }
    }

    fn names(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.name).collect()
    }

    // -----------------------------------------------------------------------
    // Filters and keys
    // -----------------------------------------------------------------------

    #[test]
    fn status_filter_defaults_to_active() {
        assert_eq!(StatusFilter::parse(None).unwrap(), StatusFilter::Active);
        assert_eq!(StatusFilter::parse(Some("")).unwrap(), StatusFilter::Active);
    }

    #[test]
    fn status_filter_recognises_overdue_and_statuses() {
        assert_eq!(StatusFilter::parse(Some("overdue")).unwrap(), StatusFilter::Overdue);
        assert_eq!(
            StatusFilter::parse(Some("archived")).unwrap(),
            StatusFilter::Exact(GoalStatus::Archived)
        );
    }

    #[test]
    fn unknown_status_filter_is_rejected() {
        assert_matches!(StatusFilter::parse(Some("done")), Err(CoreError::Validation(_)));
    }

    #[test]
    fn unknown_sort_key_falls_back_to_deadline_asc() {
        assert_eq!(SortKey::parse(None), SortKey::DeadlineAsc);
        assert_eq!(SortKey::parse(Some("bogus")), SortKey::DeadlineAsc);
        assert_eq!(SortKey::parse(Some("title_asc")), SortKey::TitleAsc);
        assert_eq!(TieredSortKey::parse(Some("bogus")), TieredSortKey::DateAsc);
        assert_eq!(TieredSortKey::parse(Some("created_desc")), TieredSortKey::CreatedDesc);
    }

    #[test]
    fn search_pattern_wraps_and_escapes() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some("gym")).as_deref(), Some("%gym%"));
        assert_eq!(search_pattern(Some("50%_off")).as_deref(), Some("%50\\%\\_off%"));
    }

    #[test]
    fn parse_day_ignores_malformed_input() {
        assert_eq!(parse_day(Some("2024-03-10")), NaiveDate::from_ymd_opt(2024, 3, 10));
        assert_eq!(parse_day(Some("03/10/2024")), None);
        assert_eq!(parse_day(None), None);
    }

    // -----------------------------------------------------------------------
    // Pagination
    // -----------------------------------------------------------------------

    #[test]
    fn page_request_clamps_inputs() {
        let req = PageRequest::new(Some(0), DEFAULT_PAGE_SIZE);
        assert_eq!(req.page, 1);
        assert_eq!(req.offset(), 0);
        assert_eq!(PageRequest::new(None, 10_000).per_page, MAX_PAGE_SIZE);
    }

    #[test]
    fn page_offsets_and_totals() {
        let req = PageRequest::new(Some(3), 5);
        assert_eq!(req.offset(), 10);
        assert_eq!(req.total_pages(0), 0);
        assert_eq!(req.total_pages(5), 1);
        assert_eq!(req.total_pages(11), 3);
    }

    // -----------------------------------------------------------------------
    // Tiers
    // -----------------------------------------------------------------------

    #[test]
    fn tiers_follow_priority_order() {
        let past = Some(now() - Duration::hours(1));
        let future = Some(now() + Duration::hours(1));
        assert_eq!(priority_tier(GoalStatus::InProgress, past, now()), Some(0));
        assert_eq!(priority_tier(GoalStatus::Pending, past, now()), Some(1));
        assert_eq!(priority_tier(GoalStatus::Pending, future, now()), Some(2));
        assert_eq!(priority_tier(GoalStatus::Pending, None, now()), Some(2));
        assert_eq!(priority_tier(GoalStatus::Completed, past, now()), Some(3));
        assert_eq!(priority_tier(GoalStatus::Archived, future, now()), None);
    }

    #[test]
    fn arrange_orders_by_tier_then_date() {
        let rows = vec![
            row("done", GoalStatus::Completed, Some(-5), 0),
            row("later", GoalStatus::Pending, Some(48), 0),
            row("undated", GoalStatus::Pending, None, 0),
            row("soon", GoalStatus::Pending, Some(2), 0),
            row("late", GoalStatus::Pending, Some(-2), 0),
            row("shelved", GoalStatus::Archived, Some(1), 0),
            row("working", GoalStatus::InProgress, Some(10), 0),
        ];

        let out = arrange_tiered(rows, TieredSortKey::DateAsc, now());
        assert_eq!(names(&out), ["working", "late", "soon", "later", "undated", "done"]);
    }

    #[test]
    fn date_desc_keeps_undated_last() {
        let rows = vec![
            row("undated", GoalStatus::Pending, None, 0),
            row("soon", GoalStatus::Pending, Some(2), 0),
            row("later", GoalStatus::Pending, Some(48), 0),
        ];

        let out = arrange_tiered(rows, TieredSortKey::DateDesc, now());
        assert_eq!(names(&out), ["later", "soon", "undated"]);
    }

    #[test]
    fn created_desc_orders_within_tier() {
        let rows = vec![
            row("old", GoalStatus::Pending, Some(5), -10),
            row("new", GoalStatus::Pending, Some(50), -1),
            row("working", GoalStatus::InProgress, None, -20),
        ];

        let out = arrange_tiered(rows, TieredSortKey::CreatedDesc, now());
        assert_eq!(names(&out), ["working", "new", "old"]);
    }
}
