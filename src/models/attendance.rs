//! Attendance model.
//!
//! Attendance is tracked per employee as a map of weekday to present/absent
//! for the current pay period only. It is reset when a period is closed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A day of the week on which attendance can be marked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkDay {
    /// Monday.
    Monday,
    /// Tuesday.
    Tuesday,
    /// Wednesday.
    Wednesday,
    /// Thursday.
    Thursday,
    /// Friday.
    Friday,
    /// Saturday.
    Saturday,
    /// Sunday.
    Sunday,
}

impl WorkDay {
    /// All days, Monday first.
    pub const ALL: [WorkDay; 7] = [
        WorkDay::Monday,
        WorkDay::Tuesday,
        WorkDay::Wednesday,
        WorkDay::Thursday,
        WorkDay::Friday,
        WorkDay::Saturday,
        WorkDay::Sunday,
    ];
}

impl From<chrono::Weekday> for WorkDay {
    fn from(day: chrono::Weekday) -> Self {
        match day {
            chrono::Weekday::Mon => WorkDay::Monday,
            chrono::Weekday::Tue => WorkDay::Tuesday,
            chrono::Weekday::Wed => WorkDay::Wednesday,
            chrono::Weekday::Thu => WorkDay::Thursday,
            chrono::Weekday::Fri => WorkDay::Friday,
            chrono::Weekday::Sat => WorkDay::Saturday,
            chrono::Weekday::Sun => WorkDay::Sunday,
        }
    }
}

impl fmt::Display for WorkDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkDay::Monday => "monday",
            WorkDay::Tuesday => "tuesday",
            WorkDay::Wednesday => "wednesday",
            WorkDay::Thursday => "thursday",
            WorkDay::Friday => "friday",
            WorkDay::Saturday => "saturday",
            WorkDay::Sunday => "sunday",
        };
        f.write_str(name)
    }
}

/// Per-employee attendance for the current pay period.
///
/// Days that were never marked count as absent.
///
/// # Example
///
/// ```
/// use payroll_ledger::models::{Attendance, WorkDay};
///
/// let mut attendance = Attendance::default();
/// attendance.mark(WorkDay::Monday, true);
/// attendance.mark(WorkDay::Tuesday, false);
///
/// assert!(attendance.is_present(WorkDay::Monday));
/// assert!(!attendance.is_present(WorkDay::Wednesday));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attendance(BTreeMap<WorkDay, bool>);

impl Attendance {
    /// Records the employee as present or absent on `day`.
    pub fn mark(&mut self, day: WorkDay, present: bool) {
        self.0.insert(day, present);
    }

    /// Returns true if the employee was marked present on `day`.
    pub fn is_present(&self, day: WorkDay) -> bool {
        self.0.get(&day).copied().unwrap_or(false)
    }

    /// Iterates over the days that have been marked, in weekday order.
    pub fn iter(&self) -> impl Iterator<Item = (WorkDay, bool)> + '_ {
        self.0.iter().map(|(day, present)| (*day, *present))
    }

    /// Clears every mark, as done at the start of a new pay period.
    pub fn reset(&mut self) {
        self.0.clear();
    }
}

impl FromIterator<(WorkDay, bool)> for Attendance {
    fn from_iter<I: IntoIterator<Item = (WorkDay, bool)>>(iter: I) -> Self {
        Attendance(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmarked_day_is_absent() {
        let attendance = Attendance::default();
        for day in WorkDay::ALL {
            assert!(!attendance.is_present(day));
        }
    }

    #[test]
    fn test_mark_overwrites_previous_value() {
        let mut attendance = Attendance::default();
        attendance.mark(WorkDay::Friday, true);
        attendance.mark(WorkDay::Friday, false);
        assert!(!attendance.is_present(WorkDay::Friday));
    }

    #[test]
    fn test_reset_clears_all_days() {
        let mut attendance: Attendance =
            [(WorkDay::Monday, true), (WorkDay::Tuesday, true)].into_iter().collect();
        attendance.reset();
        assert_eq!(attendance.iter().count(), 0);
    }

    #[test]
    fn test_serializes_as_lowercase_day_map() {
        let attendance: Attendance =
            [(WorkDay::Monday, true), (WorkDay::Sunday, false)].into_iter().collect();
        let json = serde_json::to_string(&attendance).unwrap();
        assert_eq!(json, r#"{"monday":true,"sunday":false}"#);
    }

    #[test]
    fn test_deserialize_day_map() {
        let attendance: Attendance =
            serde_json::from_str(r#"{"wednesday": true, "thursday": false}"#).unwrap();
        assert!(attendance.is_present(WorkDay::Wednesday));
        assert!(!attendance.is_present(WorkDay::Thursday));
    }

    #[test]
    fn test_from_chrono_weekday() {
        assert_eq!(WorkDay::from(chrono::Weekday::Sat), WorkDay::Saturday);
        assert_eq!(WorkDay::from(chrono::Weekday::Mon).to_string(), "monday");
    }
}
