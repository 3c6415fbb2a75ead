//! Calendar arithmetic for goal periods.
//!
//! Goal windows are anchored at civil midnight in a configured timezone:
//! days start at 00:00, weeks on a configured weekday, months on the 1st.
//! All functions here are pure and total. Civil times that fall into a DST
//! gap or ambiguity are resolved to the earliest valid instant (chrono's
//! `LocalResult` semantics), so a window crossing a transition keeps its
//! civil boundaries and its length in seconds absorbs the shift.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use chrono_tz::Tz;

use crate::goals::GoalPeriodUnit;

/// Default timezone for period anchoring.
/// This is the canonical timezone used to derive civil day/week/month
/// boundaries from UTC instants when the host has not configured one.
pub const DEFAULT_PRACTICE_TZ: Tz = chrono_tz::Europe::Berlin;

/// Timezone and week-start configuration for all period arithmetic.
///
/// The host application derives this from user preferences once and passes
/// it to the services; the functions below never read ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodAnchor {
    pub timezone: Tz,
    /// First day of the week (ISO 8601: Monday).
    pub week_start: Weekday,
}

impl Default for PeriodAnchor {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_PRACTICE_TZ,
            week_start: Weekday::Mon,
        }
    }
}

/// Earliest valid instant of the given civil date in `tz`.
fn civil_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
        return dt.with_timezone(&Utc);
    }
    // Midnight itself is inside a DST gap (some zones shift at 00:00).
    // The first valid instant of the day is at most a few hours later.
    for offset_minutes in [30i64, 60, 120] {
        let shifted = naive + Duration::minutes(offset_minutes);
        if let Some(dt) = tz.from_local_datetime(&shifted).earliest() {
            return dt.with_timezone(&Utc);
        }
    }
    // Unreachable for real timezone data.
    Utc.from_utc_datetime(&naive)
}

/// Canonical start of the day containing `instant`.
pub fn start_of_day(instant: DateTime<Utc>, anchor: &PeriodAnchor) -> DateTime<Utc> {
    let local_date = instant.with_timezone(&anchor.timezone).date_naive();
    civil_midnight(local_date, anchor.timezone)
}

/// Canonical start of the week containing `instant`, on `anchor.week_start`.
pub fn start_of_week(instant: DateTime<Utc>, anchor: &PeriodAnchor) -> DateTime<Utc> {
    let local_date = instant.with_timezone(&anchor.timezone).date_naive();
    let days_into_week = (local_date.weekday().num_days_from_monday() + 7
        - anchor.week_start.num_days_from_monday())
        % 7;
    civil_midnight(
        local_date - Duration::days(i64::from(days_into_week)),
        anchor.timezone,
    )
}

/// Canonical start of the month containing `instant`.
pub fn start_of_month(instant: DateTime<Utc>, anchor: &PeriodAnchor) -> DateTime<Utc> {
    let local = instant.with_timezone(&anchor.timezone).date_naive();
    let first = local.with_day(1).unwrap_or(local);
    civil_midnight(first, anchor.timezone)
}

/// Canonical start of the period of the given unit containing `instant`.
pub fn start_of_period(
    instant: DateTime<Utc>,
    unit: GoalPeriodUnit,
    anchor: &PeriodAnchor,
) -> DateTime<Utc> {
    match unit {
        GoalPeriodUnit::Day => start_of_day(instant, anchor),
        GoalPeriodUnit::Week => start_of_week(instant, anchor),
        GoalPeriodUnit::Month => start_of_month(instant, anchor),
    }
}

/// The instant exactly `count` calendar units after `start`.
///
/// `start` is expected to be a canonical period start; the result is the
/// advanced civil date re-anchored at midnight. Month addition is
/// calendar-safe: it clamps at the end of shorter months instead of
/// overflowing (Jan 31 + 1 month is Feb 28/29).
pub fn add_periods(
    start: DateTime<Utc>,
    count: u32,
    unit: GoalPeriodUnit,
    anchor: &PeriodAnchor,
) -> DateTime<Utc> {
    let local_date = start.with_timezone(&anchor.timezone).date_naive();
    let advanced = match unit {
        GoalPeriodUnit::Day => local_date + Duration::days(i64::from(count)),
        GoalPeriodUnit::Week => local_date + Duration::weeks(i64::from(count)),
        GoalPeriodUnit::Month => local_date + Months::new(count),
    };
    civil_midnight(advanced, anchor.timezone)
}

/// Materialized length in seconds of the period starting at `start`.
///
/// Varies with month lengths and DST transitions; once a goal instance is
/// created the returned value fixes its window for good.
pub fn period_in_seconds(
    start: DateTime<Utc>,
    count: u32,
    unit: GoalPeriodUnit,
    anchor: &PeriodAnchor,
) -> i64 {
    (add_periods(start, count, unit, anchor) - start).num_seconds()
}
