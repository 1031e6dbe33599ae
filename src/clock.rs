use chrono::{Local, NaiveDateTime};

/// Source of the local wall-clock time.
#[cfg_attr(test, mockall::automock)]
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[cfg(test)]
pub fn fixed_clock(datetime: &str) -> MockClock {
    let now = NaiveDateTime::parse_from_str(datetime, "%Y-%m-%d %H:%M").unwrap();
    let mut clock = MockClock::new();
    clock.expect_now().return_const(now);
    clock
}
