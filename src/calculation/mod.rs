//! Calculation logic for the payroll ledger.
//!
//! This module contains the pay arithmetic: counting days present, looking up
//! the daily wage in effect, deriving loan balances and per-period repayments,
//! combining everything into a period pay calculation, and grouping attendance
//! by day.

use rust_decimal::Decimal;

use crate::error::{PayrollError, PayrollResult};

mod attendance_summary;
mod loan_balance;
mod period_pay;
mod wage;

pub use attendance_summary::{AttendanceSummary, DayAttendance, group_attendance_by_day};
pub use loan_balance::{
    LoanRepaymentResult, calculate_loan_repayments, loan_balance, loan_repayment_for_period,
};
pub use period_pay::{PeriodPayInput, calculate_period_pay};
pub use wage::{
    DaysPresentResult, WageLookupResult, count_days_present, current_wage, days_present,
    lookup_wage,
};

/// Adds up money amounts, failing instead of overflowing.
pub fn checked_sum(what: &str, amounts: impl IntoIterator<Item = Decimal>) -> PayrollResult<Decimal> {
    amounts
        .into_iter()
        .try_fold(Decimal::ZERO, |total, amount| {
            total.checked_add(amount).ok_or_else(|| overflow(what))
        })
}

fn overflow(what: &str) -> PayrollError {
    PayrollError::CalculationError {
        message: format!("{} is outside the representable range", what),
    }
}
