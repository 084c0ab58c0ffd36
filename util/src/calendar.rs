//! Calendar grid construction for attendance views.
//!
//! Produces the month/week display grid used by attendance and event
//! overlays: whole weeks only, Monday-aligned regardless of locale, each row
//! annotated with a semester "school week" number where one applies.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which span of days a grid covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    Month,
    Week,
}

/// Semester framing for week numbering and holiday marking.
#[derive(Debug, Clone)]
pub struct SemesterCalendar {
    pub start_date: NaiveDate,
    pub total_weeks: u32,
    /// ISO `YYYY-MM-DD` strings, matching how holidays are configured.
    pub holidays: HashSet<String>,
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    /// False for leading/trailing days pulled in from adjacent months.
    pub in_month: bool,
    pub holiday: bool,
}

/// One row of seven days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarWeek {
    /// 1-based school week number, `None` when the row falls outside the
    /// semester (rendered as "-").
    pub school_week: Option<u32>,
    pub days: Vec<CalendarDay>,
}

/// The Monday on or before `date`.
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// The Sunday on or after `date`.
pub fn sunday_on_or_after(date: NaiveDate) -> NaiveDate {
    date + Duration::days((6 - date.weekday().num_days_from_monday()) as i64)
}

/// Last day of the month containing `date`.
fn last_day_of_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
        .expect("first of month is always valid")
        .pred_opt()
        .expect("day before first of month is always valid")
}

impl SemesterCalendar {
    /// School week number for the row starting at `monday`.
    ///
    /// The week difference is Monday-aligned against the semester start and
    /// 1-based. Rows before the semester or at/after `total_weeks` get `None`.
    pub fn school_week(&self, monday: NaiveDate) -> Option<u32> {
        let semester_monday = monday_on_or_before(self.start_date);
        let offset_days = (monday - semester_monday).num_days();
        if offset_days < 0 {
            return None;
        }
        let week = (offset_days / 7) as u32;
        if week >= self.total_weeks {
            return None;
        }
        Some(week + 1)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date.format("%Y-%m-%d").to_string())
    }
}

/// Builds the display grid for `reference` in the given view mode.
///
/// Month view spans the Monday on/before the 1st through the Sunday on/after
/// the last day of the month; week view spans the Monday-Sunday containing
/// `reference`. The result is always whole rows of seven days.
pub fn build_grid(
    reference: NaiveDate,
    view: ViewMode,
    semester: &SemesterCalendar,
) -> Vec<CalendarWeek> {
    let (start, end) = match view {
        ViewMode::Month => {
            let first = reference.with_day(1).expect("day 1 is always valid");
            (
                monday_on_or_before(first),
                sunday_on_or_after(last_day_of_month(reference)),
            )
        }
        ViewMode::Week => (monday_on_or_before(reference), sunday_on_or_after(reference)),
    };

    let mut weeks = Vec::new();
    let mut monday = start;
    while monday <= end {
        let days = (0..7)
            .map(|i| {
                let date = monday + Duration::days(i);
                CalendarDay {
                    date,
                    in_month: date.month() == reference.month() && date.year() == reference.year(),
                    holiday: semester.is_holiday(date),
                }
            })
            .collect();
        weeks.push(CalendarWeek {
            school_week: semester.school_week(monday),
            days,
        });
        monday += Duration::days(7);
    }
    weeks
}
