//! Business day calculator
//!
//! Classifies dates against a weekend rule and a resolved set of holiday
//! dates, and steps across business days.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use super::error::CalendarError;
use super::holidays::generate_default_holidays;

/// Business days credits settle after their linked debit.
pub const CREDIT_SETTLEMENT_LAG_DAYS: u32 = 2;

/// Business-day calendar for ACH settlement.
///
/// The calculator owns nothing but the resolved holiday dates and the weekend
/// rule, so it can be shared freely between threads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessDayCalculator {
    holidays: BTreeSet<NaiveDate>,
    include_weekends: bool,
}

impl BusinessDayCalculator {
    /// Create a calculator from observed holiday dates. Weekends are excluded.
    pub fn new<I>(holidays: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        Self {
            holidays: holidays.into_iter().collect(),
            include_weekends: false,
        }
    }

    /// Seed the default federal holidays for every year in `years`.
    pub fn for_years<I>(years: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = i32>,
    {
        let mut dates = BTreeSet::new();
        for year in years {
            dates.extend(generate_default_holidays(year)?.into_iter().map(|h| h.date));
        }
        tracing::debug!(holiday_count = dates.len(), "Seeded federal holiday calendar");
        Ok(Self {
            holidays: dates,
            include_weekends: false,
        })
    }

    /// Extend the resolved set with configured dates.
    pub fn with_additional_holidays<I>(mut self, dates: I) -> Self
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        self.holidays.extend(dates);
        self
    }

    /// `false` counts Saturdays and Sundays as business days; `true` is the default.
    pub fn with_weekends_excluded(mut self, excluded: bool) -> Self {
        self.include_weekends = !excluded;
        self
    }

    pub fn is_weekend(date: NaiveDate) -> bool {
        matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.holidays.contains(&date)
    }

    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        if !self.include_weekends && Self::is_weekend(date) {
            return false;
        }
        !self.is_holiday(date)
    }

    /// Step forward `days` business days, one calendar day at a time.
    ///
    /// `days == 0` returns `date` unchanged, even if it is not a business day.
    pub fn add_business_days(
        &self,
        date: NaiveDate,
        days: u32,
    ) -> Result<NaiveDate, CalendarError> {
        self.step(date, days, Step::Forward)
    }

    pub fn subtract_business_days(
        &self,
        date: NaiveDate,
        days: u32,
    ) -> Result<NaiveDate, CalendarError> {
        self.step(date, days, Step::Backward)
    }

    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.add_business_days(date, 1)
    }

    pub fn previous_business_day(&self, date: NaiveDate) -> Result<NaiveDate, CalendarError> {
        self.subtract_business_days(date, 1)
    }

    /// Business days after `start` up to and including `end`.
    ///
    /// Negative when `end` is before `start`.
    pub fn business_days_between(&self, start: NaiveDate, end: NaiveDate) -> i64 {
        let (from, to, sign) = if end >= start { (start, end, 1) } else { (end, start, -1) };
        let count = from
            .iter_days()
            .skip(1)
            .take_while(|d| *d <= to)
            .filter(|d| self.is_business_day(*d))
            .count();
        sign * count as i64
    }

    /// The settlement date for a requested debit date: unchanged when it is a
    /// business day, otherwise the next business day.
    pub fn resolve_effective_date(&self, requested: NaiveDate) -> Result<NaiveDate, CalendarError> {
        if self.is_business_day(requested) {
            return Ok(requested);
        }
        self.next_business_day(requested)
    }

    /// Credits settle two business days after the linked debit.
    pub fn resolve_credit_effective_date(
        &self,
        debit_effective: NaiveDate,
    ) -> Result<NaiveDate, CalendarError> {
        self.add_business_days(debit_effective, CREDIT_SETTLEMENT_LAG_DAYS)
    }

    fn step(&self, mut date: NaiveDate, days: u32, step: Step) -> Result<NaiveDate, CalendarError> {
        let mut remaining = days;
        while remaining > 0 {
            date = match step {
                Step::Forward => date.succ_opt(),
                Step::Backward => date.pred_opt(),
            }
            .ok_or(CalendarError::OutOfRange)?;

            if self.is_business_day(date) {
                remaining -= 1;
            }
        }
        Ok(date)
    }
}

#[derive(Debug, Clone, Copy)]
enum Step {
    Forward,
    Backward,
}
