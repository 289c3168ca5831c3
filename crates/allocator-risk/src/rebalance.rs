//! Quarterly rebalancing calendar.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fixed yearly rebalancing dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RebalanceCalendar {
    /// Months (1-12) with a rebalancing date
    pub months: Vec<u32>,
    /// Day of month of each rebalancing date
    pub day: u32,
    /// Days ahead at which a reminder is raised
    pub reminder_days: i64,
}

impl Default for RebalanceCalendar {
    fn default() -> Self {
        Self {
            months: vec![3, 6, 9, 12],
            day: 15,
            reminder_days: 7,
        }
    }
}

/// Upcoming rebalancing date close enough to warn about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebalanceReminder {
    pub date: NaiveDate,
    pub days_remaining: i64,
}

impl RebalanceCalendar {
    fn dates_in(&self, year: i32) -> impl Iterator<Item = NaiveDate> + '_ {
        self.months
            .iter()
            .filter_map(move |&month| NaiveDate::from_ymd_opt(year, month, self.day))
    }

    /// First rebalancing date strictly after `today`.
    ///
    /// `None` only when no configured month/day forms a valid date.
    pub fn next_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        let this_year = self.dates_in(today.year()).filter(|d| *d > today).min();
        this_year.or_else(|| self.dates_in(today.year() + 1).min())
    }

    pub fn days_until_next(&self, today: NaiveDate) -> Option<i64> {
        self.next_date(today)
            .map(|date| (date - today).num_days())
    }

    /// Reminder when the next date is at most `reminder_days` away.
    pub fn reminder(&self, today: NaiveDate) -> Option<RebalanceReminder> {
        let date = self.next_date(today)?;
        let days_remaining = (date - today).num_days();
        (days_remaining > 0 && days_remaining <= self.reminder_days).then_some(RebalanceReminder {
            date,
            days_remaining,
        })
    }
}
