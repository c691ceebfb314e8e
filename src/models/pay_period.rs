//! Pay period and pay frequency models.
//!
//! This module contains the [`PayPeriod`] and [`PayFrequency`] types used to define
//! the window a payroll run covers and how periods follow one another.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{PayrollError, PayrollResult};

/// How often a company pays its employees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayFrequency {
    /// Every 7 days.
    Weekly,
    /// Every 14 days.
    BiWeekly,
    /// Once per calendar month.
    Monthly,
}

impl PayFrequency {
    /// Returns the pay period that starts on `start`.
    ///
    /// Weekly and bi-weekly periods span 7 and 14 days. A monthly period ends the
    /// day before the same day of the following month.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ledger::models::PayFrequency;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    /// let period = PayFrequency::Weekly.period_starting(start).unwrap();
    /// assert_eq!(period.end_date, NaiveDate::from_ymd_opt(2026, 1, 11).unwrap());
    /// ```
    pub fn period_starting(self, start: NaiveDate) -> PayrollResult<PayPeriod> {
        let next_start = match self {
            PayFrequency::Weekly => start.checked_add_days(chrono::Days::new(7)),
            PayFrequency::BiWeekly => start.checked_add_days(chrono::Days::new(14)),
            PayFrequency::Monthly => start.checked_add_months(Months::new(1)),
        };

        let end_date = next_start
            .and_then(|d| d.pred_opt())
            .ok_or_else(|| PayrollError::CalculationError {
                message: format!("pay period starting {} is out of the supported date range", start),
            })?;

        Ok(PayPeriod {
            start_date: start,
            end_date,
        })
    }

    /// Counts the whole periods that have elapsed between `from` and `to`.
    ///
    /// Returns zero when `to` is on or before `from`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_ledger::models::PayFrequency;
    /// use chrono::NaiveDate;
    ///
    /// let from = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
    /// let to = NaiveDate::from_ymd_opt(2026, 1, 26).unwrap();
    /// assert_eq!(PayFrequency::Weekly.elapsed_periods(from, to), 3);
    /// assert_eq!(PayFrequency::BiWeekly.elapsed_periods(from, to), 1);
    /// ```
    pub fn elapsed_periods(self, from: NaiveDate, to: NaiveDate) -> u32 {
        if to <= from {
            return 0;
        }

        match self {
            PayFrequency::Weekly => ((to - from).num_days() / 7) as u32,
            PayFrequency::BiWeekly => ((to - from).num_days() / 14) as u32,
            PayFrequency::Monthly => {
                let months = (to.year() - from.year()) * 12 + to.month() as i32
                    - from.month() as i32;
                let mut months = months.max(0) as u32;
                // Step back when the anniversary day in `to`'s month has not been reached yet
                while months > 0
                    && from
                        .checked_add_months(Months::new(months))
                        .is_none_or(|d| d > to)
                {
                    months -= 1;
                }
                months
            }
        }
    }
}

/// Represents a pay period with its inclusive date range.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let pay_period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 1, 11).unwrap(),
/// };
///
/// assert!(pay_period.contains_date(NaiveDate::from_ymd_opt(2026, 1, 8).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The start date of the pay period (inclusive).
    pub start_date: NaiveDate,
    /// The end date of the pay period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Checks if a given date falls within this pay period.
    ///
    /// The check is inclusive of both start and end dates.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns the first day after this period, which is where the next period starts.
    pub fn next_start(&self) -> PayrollResult<NaiveDate> {
        self.end_date
            .succ_opt()
            .ok_or_else(|| PayrollError::CalculationError {
                message: format!("no date follows {}", self.end_date),
            })
    }
}
