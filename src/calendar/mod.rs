//! Settlement calendar
//!
//! ACH business days and the US federal holidays they skip.

mod business_day;
mod error;
mod holidays;

pub use business_day::{BusinessDayCalculator, CREDIT_SETTLEMENT_LAG_DAYS};
pub use error::CalendarError;
pub use holidays::{
    generate_default_holidays, last_weekday_of_month, nth_weekday_of_month, observed_date,
    FederalHoliday, MIN_HOLIDAY_YEAR,
};
