//! US federal holiday table
//!
//! Observed dates for the ten standard federal holidays, computed from fixed
//! rules and shifted off weekends the way the Federal Reserve observes them.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use super::error::CalendarError;

/// Earliest year the rule table is defined for.
pub const MIN_HOLIDAY_YEAR: i32 = 1970;

/// A holiday as the ACH network observes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FederalHoliday {
    pub id: String,
    pub name: String,
    /// Observed date, already moved off a weekend
    pub date: NaiveDate,
    pub year: i32,
    pub recurring: bool,
}

/// How a holiday's nominal date is found.
#[derive(Debug, Clone, Copy)]
enum HolidayRule {
    Fixed { month: u32, day: u32 },
    NthWeekday { month: u32, weekday: Weekday, occurrence: u32 },
    LastWeekday { month: u32, weekday: Weekday },
}

const FEDERAL_RULES: [(&str, &str, HolidayRule); 10] = [
    ("new-years", "New Year's Day", HolidayRule::Fixed { month: 1, day: 1 }),
    (
        "mlk-day",
        "Martin Luther King Jr. Day",
        HolidayRule::NthWeekday { month: 1, weekday: Weekday::Mon, occurrence: 3 },
    ),
    (
        "presidents-day",
        "Presidents Day",
        HolidayRule::NthWeekday { month: 2, weekday: Weekday::Mon, occurrence: 3 },
    ),
    (
        "memorial-day",
        "Memorial Day",
        HolidayRule::LastWeekday { month: 5, weekday: Weekday::Mon },
    ),
    ("independence-day", "Independence Day", HolidayRule::Fixed { month: 7, day: 4 }),
    (
        "labor-day",
        "Labor Day",
        HolidayRule::NthWeekday { month: 9, weekday: Weekday::Mon, occurrence: 1 },
    ),
    (
        "columbus-day",
        "Columbus Day",
        HolidayRule::NthWeekday { month: 10, weekday: Weekday::Mon, occurrence: 2 },
    ),
    ("veterans-day", "Veterans Day", HolidayRule::Fixed { month: 11, day: 11 }),
    (
        "thanksgiving",
        "Thanksgiving Day",
        HolidayRule::NthWeekday { month: 11, weekday: Weekday::Thu, occurrence: 4 },
    ),
    ("christmas", "Christmas Day", HolidayRule::Fixed { month: 12, day: 25 }),
];

/// Generate the observed federal holidays for `year`.
///
/// Saturday holidays are observed the preceding Friday, Sunday holidays the
/// following Monday. A Saturday New Year's Day is therefore observed on
/// December 31 of the previous year.
pub fn generate_default_holidays(year: i32) -> Result<Vec<FederalHoliday>, CalendarError> {
    if year < MIN_HOLIDAY_YEAR {
        return Err(CalendarError::InvalidYear(year));
    }

    FEDERAL_RULES
        .iter()
        .map(|(slug, name, rule)| {
            let nominal = rule.resolve(year)?;
            Ok(FederalHoliday {
                id: format!("{slug}-{year}"),
                name: (*name).to_string(),
                date: observed_date(nominal),
                year,
                recurring: true,
            })
        })
        .collect()
}

/// Shift a weekend holiday to the weekday it is observed on.
pub fn observed_date(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date - Duration::days(1),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}

impl HolidayRule {
    fn resolve(&self, year: i32) -> Result<NaiveDate, CalendarError> {
        match *self {
            HolidayRule::Fixed { month, day } => {
                NaiveDate::from_ymd_opt(year, month, day).ok_or(CalendarError::InvalidYear(year))
            }
            HolidayRule::NthWeekday { month, weekday, occurrence } => {
                nth_weekday_of_month(year, month, weekday, occurrence)
            }
            HolidayRule::LastWeekday { month, weekday } => {
                last_weekday_of_month(year, month, weekday)
            }
        }
    }
}

/// The `occurrence`-th `weekday` of the month, counting from 1.
pub fn nth_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
    occurrence: u32,
) -> Result<NaiveDate, CalendarError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or(CalendarError::InvalidYear(year))?;
    let first_offset = (weekday.num_days_from_sunday() + 7
        - first.weekday().num_days_from_sunday())
        % 7;
    let days = first_offset + occurrence.saturating_sub(1) * 7;
    Ok(first + Duration::days(i64::from(days)))
}

/// The last `weekday` of the month, counted backward from its last day.
pub fn last_weekday_of_month(
    year: i32,
    month: u32,
    weekday: Weekday,
) -> Result<NaiveDate, CalendarError> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or(CalendarError::InvalidYear(year))?;
    let back = (last.weekday().num_days_from_sunday() + 7 - weekday.num_days_from_sunday()) % 7;
    Ok(last - Duration::days(i64::from(back)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn holiday(holidays: &[FederalHoliday], slug: &str) -> NaiveDate {
        holidays
            .iter()
            .find(|h| h.id.starts_with(slug))
            .map(|h| h.date)
            .unwrap()
    }

    #[test]
    fn test_ten_holidays() {
        let holidays = generate_default_holidays(2025).unwrap();
        assert_eq!(holidays.len(), 10);
        assert!(holidays.iter().all(|h| h.recurring && h.year == 2025));
        assert_eq!(holidays[0].id, "new-years-2025");
    }

    #[test]
    fn test_2026_calendar() {
        let h = generate_default_holidays(2026).unwrap();
        assert_eq!(holiday(&h, "new-years"), ymd(2026, 1, 1));
        assert_eq!(holiday(&h, "mlk-day"), ymd(2026, 1, 19));
        assert_eq!(holiday(&h, "presidents-day"), ymd(2026, 2, 16));
        assert_eq!(holiday(&h, "memorial-day"), ymd(2026, 5, 25));
        // July 4, 2026 is a Saturday
        assert_eq!(holiday(&h, "independence-day"), ymd(2026, 7, 3));
        assert_eq!(holiday(&h, "labor-day"), ymd(2026, 9, 7));
        assert_eq!(holiday(&h, "columbus-day"), ymd(2026, 10, 12));
        assert_eq!(holiday(&h, "veterans-day"), ymd(2026, 11, 11));
        assert_eq!(holiday(&h, "thanksgiving"), ymd(2026, 11, 26));
        assert_eq!(holiday(&h, "christmas"), ymd(2026, 12, 25));
    }

    #[test]
    fn test_independence_day_2023_not_shifted() {
        // Tuesday
        let h = generate_default_holidays(2023).unwrap();
        assert_eq!(holiday(&h, "independence-day"), ymd(2023, 7, 4));
    }

    #[test]
    fn test_sunday_holiday_observed_monday() {
        // Christmas 2022 fell on a Sunday
        let h = generate_default_holidays(2022).unwrap();
        assert_eq!(holiday(&h, "christmas"), ymd(2022, 12, 26));
    }

    #[test]
    fn test_saturday_new_year_moves_to_previous_year() {
        let h = generate_default_holidays(2022).unwrap();
        assert_eq!(holiday(&h, "new-years"), ymd(2021, 12, 31));
    }

    #[test]
    fn test_memorial_day_when_month_ends_on_monday() {
        // May 31, 2021 was a Monday
        assert_eq!(last_weekday_of_month(2021, 5, Weekday::Mon).unwrap(), ymd(2021, 5, 31));
    }

    #[test]
    fn test_nth_weekday_when_month_starts_on_weekday() {
        // September 1, 2025 was a Monday
        assert_eq!(nth_weekday_of_month(2025, 9, Weekday::Mon, 1).unwrap(), ymd(2025, 9, 1));
    }

    #[test]
    fn test_observed_holidays_never_on_weekend() {
        for year in 1970..=2100 {
            for h in generate_default_holidays(year).unwrap() {
                let wd = h.date.weekday();
                assert!(wd != Weekday::Sat && wd != Weekday::Sun, "{} {}", h.id, h.date);
            }
        }
    }

    #[test]
    fn test_invalid_year() {
        assert_eq!(generate_default_holidays(1969), Err(CalendarError::InvalidYear(1969)));
    }
}
