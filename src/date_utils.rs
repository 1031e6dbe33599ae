use crate::clock::{Clock, SystemClock};
use chrono::{NaiveDate, Timelike};
use std::sync::Arc;

pub const BANKING_HOURS: [u32; 9] = [9, 10, 11, 12, 13, 14, 15, 16, 17];

const DATE_FORMAT: &str = "%Y-%m-%d";
const DISPLAY_FORMAT: &str = "%a, %-d %b %Y";

/// Decides which hours are still selectable for a calendar date.
pub struct DateUtils {
    clock: Arc<dyn Clock>,
}

#[derive(Debug, Clone)]
struct DayBasis {
    date: NaiveDate,
    formatted: String,
    current_hour: u32,
}

impl Default for DateUtils {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl DateUtils {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    fn basis(&self) -> DayBasis {
        let now = self.clock.now();
        DayBasis {
            date: now.date(),
            formatted: now.date().format(DATE_FORMAT).to_string(),
            current_hour: now.hour(),
        }
    }

    pub fn today(&self) -> String {
        self.basis().formatted
    }

    pub fn current_hour(&self) -> u32 {
        self.basis().current_hour
    }

    pub fn is_today(&self, date: &str) -> bool {
        date == self.basis().formatted
    }

    /// Today counts as a valid future date.
    pub fn is_valid_future_date(&self, date: &str) -> bool {
        match parse_date(date) {
            Some(date) => date >= self.basis().date,
            None => false,
        }
    }

    pub fn format_date_for_display(&self, date: &str) -> String {
        if date.is_empty() {
            return String::new();
        }
        match parse_date(date) {
            Some(date) => date.format(DISPLAY_FORMAT).to_string(),
            None => "Invalid Date".into(),
        }
    }

    pub fn available_hours(&self, date: &str) -> Vec<u32> {
        if date.is_empty() {
            return vec![];
        }

        let basis = self.basis();
        if date == basis.formatted {
            return BANKING_HOURS
                .into_iter()
                .filter(|hour| *hour > basis.current_hour)
                .collect();
        }

        BANKING_HOURS.to_vec()
    }

    pub fn time_options(&self, date: &str) -> Vec<String> {
        self.available_hours(date)
            .into_iter()
            .map(|hour| format!("{hour:02}:00"))
            .collect()
    }
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).ok()
}
