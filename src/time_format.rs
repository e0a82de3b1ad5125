//! Textual time-of-day notations accepted at the input boundary.

use crate::error::{Result, ScheduleError};
use chrono::NaiveTime;
use clap::ValueEnum;
use std::fmt;

/// A notation for a time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum TimeFormat {
    /// 24-hour clock, `HH:MM`
    #[default]
    #[value(name = "24h")]
    TwentyFourHour,
    /// Military time, `HHMM` (three digits are zero-padded)
    Military,
    /// 12-hour clock with AM/PM, `h:MM AM`
    Standard,
}

impl TimeFormat {
    pub const ALL: [TimeFormat; 3] = [
        TimeFormat::TwentyFourHour,
        TimeFormat::Military,
        TimeFormat::Standard,
    ];

    /// Human-readable description of the expected input
    pub fn description(&self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "HH:mm (e.g., 09:00, 14:30)",
            TimeFormat::Military => "Military Time (HHmm, e.g., 0900, 1430)",
            TimeFormat::Standard => "Standard Time (h:mm AM/PM, e.g., 9:00 AM, 2:30 PM)",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFormat::TwentyFourHour => "24h",
            TimeFormat::Military => "military",
            TimeFormat::Standard => "standard",
        }
    }

    /// Parse `input` into a time of day
    pub fn parse(&self, input: &str) -> Result<NaiveTime> {
        let trimmed = input.trim();
        let parsed = match self {
            TimeFormat::TwentyFourHour => parse_24h(trimmed),
            TimeFormat::Military => parse_military(trimmed),
            TimeFormat::Standard => parse_standard(trimmed),
        };
        parsed.ok_or_else(|| ScheduleError::InvalidTimeFormat {
            input: input.to_string(),
            expected: self.description(),
        })
    }

    /// Render `time` in this notation
    pub fn format(&self, time: NaiveTime) -> String {
        match self {
            TimeFormat::TwentyFourHour => time.format("%H:%M").to_string(),
            TimeFormat::Military => time.format("%H%M").to_string(),
            TimeFormat::Standard => time.format("%-I:%M %p").to_string(),
        }
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn hm(hour: &str, minute: &str) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(hour.parse().ok()?, minute.parse().ok()?, 0)
}

fn parse_24h(s: &str) -> Option<NaiveTime> {
    let (hour, minute) = s.split_once(':')?;
    if hour.len() != 2 || minute.len() != 2 || !all_digits(hour) || !all_digits(minute) {
        return None;
    }
    hm(hour, minute)
}

fn parse_military(s: &str) -> Option<NaiveTime> {
    if !all_digits(s) {
        return None;
    }
    let padded = match s.len() {
        3 => format!("0{s}"),
        4 => s.to_string(),
        _ => return None,
    };
    hm(&padded[..2], &padded[2..])
}

fn parse_standard(s: &str) -> Option<NaiveTime> {
    let (clock, meridiem) = s.rsplit_once(char::is_whitespace)?;
    let pm = match meridiem.to_ascii_uppercase().as_str() {
        "AM" => false,
        "PM" => true,
        _ => return None,
    };
    let (hour, minute) = clock.trim_end().split_once(':')?;
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return None;
    }
    if !all_digits(hour) || !all_digits(minute) {
        return None;
    }
    let hour: u32 = hour.parse().ok()?;
    if !(1..=12).contains(&hour) {
        return None;
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    NaiveTime::from_hms_opt(hour, minute.parse().ok()?, 0)
}
