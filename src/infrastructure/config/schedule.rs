//! Nightly analysis schedule

use chrono::{DateTime, Days, Duration, LocalResult, NaiveDateTime, NaiveTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::application::errors::ConfigError;

/// When the nightly chat analysis runs, in the chat's local time
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleConfig {
    pub hour: u32,
    pub minute: u32,
    pub timezone: Tz,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            hour: 3,
            minute: 0,
            timezone: chrono_tz::Europe::Kiev,
        }
    }
}

impl ScheduleConfig {
    pub fn parse_timezone(name: &str) -> Result<Tz, ConfigError> {
        name.trim()
            .parse::<Tz>()
            .map_err(|e| ConfigError::invalid("TIMEZONE", e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hour > 23 {
            return Err(ConfigError::invalid(
                "NIGHTLY_ANALYSIS_HOUR",
                format!("{} is not an hour of the day", self.hour),
            ));
        }
        if self.minute > 59 {
            return Err(ConfigError::invalid(
                "NIGHTLY_ANALYSIS_MINUTE",
                format!("{} is not a minute of the hour", self.minute),
            ));
        }
        Ok(())
    }

    /// First scheduled run strictly after `now`.
    ///
    /// DST transitions resolve with the standard (pre-transition) offset: a
    /// local time inside a spring-forward gap still fires that day, shifted
    /// by the gap, and a repeated local time fires on its second occurrence.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> Option<DateTime<Tz>> {
        let time = NaiveTime::from_hms_opt(self.hour, self.minute, 0)?;
        let local_now = now.with_timezone(&self.timezone);
        let today = local_now.date_naive();

        (0..=2u64)
            .filter_map(|offset| today.checked_add_days(Days::new(offset)))
            .map(|date| self.localize(date.and_time(time)))
            .find(|candidate| *candidate > local_now)
    }

    fn localize(&self, naive: NaiveDateTime) -> DateTime<Tz> {
        match self.timezone.from_local_datetime(&naive) {
            LocalResult::Single(at) => at,
            LocalResult::Ambiguous(_, standard) => standard,
            LocalResult::None => {
                // offset in force before the gap opened
                let before = self
                    .timezone
                    .offset_from_utc_datetime(&(naive - Duration::days(1)))
                    .fix();
                let utc = naive - Duration::seconds(i64::from(before.local_minus_utc()));
                self.timezone.from_utc_datetime(&utc)
            }
        }
    }
}
