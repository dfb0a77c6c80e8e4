//! Display timestamps for new messages.

use chrono::{DateTime, Local, TimeZone};

/// Source of message timestamps
pub trait Clock: Send + Sync {
    /// Current time formatted for display
    fn now_display(&self) -> String;
}

/// Wall clock in the local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now_display(&self) -> String {
        format_display(&Local::now())
    }
}

/// Always reports the same time
#[derive(Debug, Clone)]
pub struct FixedClock(String);

impl FixedClock {
    pub fn new(display: impl Into<String>) -> Self {
        Self(display.into())
    }
}

impl Clock for FixedClock {
    fn now_display(&self) -> String {
        self.0.clone()
    }
}

/// 12-hour clock with minutes, e.g. `2:30 PM`
pub fn format_display<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format("%-I:%M %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_format_display() {
        let afternoon = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
        assert_eq!(format_display(&afternoon), "2:30 PM");

        let morning = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
        assert_eq!(format_display(&morning), "9:05 AM");
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new("7:00 AM");
        assert_eq!(clock.now_display(), "7:00 AM");
        assert_eq!(clock.now_display(), "7:00 AM");
    }
}
