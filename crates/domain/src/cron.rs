//! Cron expression parsing and next-run computation.
//!
//! One parser serves both "does this time match" and "when is the next
//! fire after t", so the two can never disagree. The standard five-field
//! form (`minute hour day month weekday`) is accepted, optionally
//! followed by a sixth seconds field. Each field supports wildcards
//! (`*`), single values, lists (`1,3,5`), ranges (`9-17`) and steps
//! (`*/15`).

use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, Timelike, Utc};

/// Upper bound on the forward scan: a valid expression fires at least
/// once a year (leap years included).
const MAX_MINUTE_SCAN: u32 = 366 * 24 * 60;

/// Errors raised while parsing a cron expression.
#[derive(Debug, thiserror::Error)]
pub enum CronError {
    /// The expression does not have five or six whitespace-separated fields.
    #[error("cron expression must have 5 or 6 fields, got {0}")]
    FieldCount(usize),

    /// One field is malformed or out of range.
    #[error("invalid {name} field `{value}`")]
    Field {
        /// Which field failed (`minute`, `hour`, ...).
        name: &'static str,
        /// The offending field text.
        value: String,
    },
}

/// A single field in a cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
enum CronField {
    /// Wildcard (`*`) — matches all values.
    Any,
    /// A specific value.
    Value(u32),
    /// A list of values (`1,3,5`).
    List(Vec<u32>),
    /// An inclusive range (`9-17`).
    Range(u32, u32),
    /// A step (`*/5`).
    Step(u32),
}

impl CronField {
    fn matches(&self, value: u32) -> bool {
        match self {
            Self::Any => true,
            Self::Value(v) => *v == value,
            Self::List(values) => values.contains(&value),
            Self::Range(start, end) => value >= *start && value <= *end,
            Self::Step(step) => value % step == 0,
        }
    }

    fn parse(field: &str, name: &'static str, min: u32, max: u32) -> Result<Self, CronError> {
        let invalid = || CronError::Field {
            name,
            value: field.to_string(),
        };

        if field == "*" {
            return Ok(Self::Any);
        }

        if let Some(step) = field.strip_prefix("*/") {
            let step: u32 = step.parse().map_err(|_| invalid())?;
            if step == 0 || step > max {
                return Err(invalid());
            }
            return Ok(Self::Step(step));
        }

        if field.contains(',') {
            let values = field
                .split(',')
                .map(|v| match v.trim().parse::<u32>() {
                    Ok(n) if n >= min && n <= max => Ok(n),
                    _ => Err(invalid()),
                })
                .collect::<Result<Vec<u32>, CronError>>()?;
            return Ok(Self::List(values));
        }

        if let Some((start, end)) = field.split_once('-') {
            let start: u32 = start.parse().map_err(|_| invalid())?;
            let end: u32 = end.parse().map_err(|_| invalid())?;
            if start < min || end > max || start > end {
                return Err(invalid());
            }
            return Ok(Self::Range(start, end));
        }

        let value: u32 = field.parse().map_err(|_| invalid())?;
        if value < min || value > max {
            return Err(invalid());
        }
        Ok(Self::Value(value))
    }
}

/// A parsed cron expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CronExpression {
    /// Minute (0-59).
    minute: CronField,
    /// Hour (0-23).
    hour: CronField,
    /// Day of month (1-31).
    day: CronField,
    /// Month (1-12).
    month: CronField,
    /// Day of week (0-6, Sunday = 0).
    weekday: CronField,
    /// Optional second (0-59); absent expressions run at minute resolution.
    second: Option<CronField>,
}

impl FromStr for CronExpression {
    type Err = CronError;

    fn from_str(expr: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = expr.split_whitespace().collect();
        if parts.len() != 5 && parts.len() != 6 {
            return Err(CronError::FieldCount(parts.len()));
        }

        Ok(Self {
            minute: CronField::parse(parts[0], "minute", 0, 59)?,
            hour: CronField::parse(parts[1], "hour", 0, 23)?,
            day: CronField::parse(parts[2], "day", 1, 31)?,
            month: CronField::parse(parts[3], "month", 1, 12)?,
            weekday: CronField::parse(parts[4], "weekday", 0, 6)?,
            second: parts
                .get(5)
                .map(|field| CronField::parse(field, "second", 0, 59))
                .transpose()?,
        })
    }
}

impl CronExpression {
    /// Check whether this expression matches the given time.
    ///
    /// Five-field expressions ignore the seconds component of `time`.
    #[must_use]
    pub fn matches(&self, time: &DateTime<Utc>) -> bool {
        let second_matches = match &self.second {
            Some(field) => field.matches(time.second()),
            None => true,
        };
        second_matches && self.matches_minute(time)
    }

    /// Match everything except the seconds field.
    fn matches_minute(&self, time: &DateTime<Utc>) -> bool {
        self.minute.matches(time.minute())
            && self.hour.matches(time.hour())
            && self.day.matches(time.day())
            && self.month.matches(time.month())
            && self.weekday.matches(time.weekday().num_days_from_sunday())
    }

    /// Compute the next fire time strictly after `after`.
    ///
    /// Returns `None` when no matching time exists within the next year
    /// (e.g. `0 0 30 2 *`).
    #[must_use]
    pub fn next_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let minute_start = after.with_second(0)?.with_nanosecond(0)?;

        if let Some(seconds) = &self.second {
            // The remainder of the current minute may still contain a fire.
            if self.matches_minute(after) {
                for s in (after.second() + 1)..60 {
                    if seconds.matches(s) {
                        return Some(minute_start + Duration::seconds(i64::from(s)));
                    }
                }
            }
            let mut candidate = minute_start + Duration::minutes(1);
            for _ in 0..MAX_MINUTE_SCAN {
                if self.matches_minute(&candidate) {
                    for s in 0..60 {
                        if seconds.matches(s) {
                            return Some(candidate + Duration::seconds(i64::from(s)));
                        }
                    }
                }
                candidate += Duration::minutes(1);
            }
            return None;
        }

        let mut candidate = minute_start + Duration::minutes(1);
        for _ in 0..MAX_MINUTE_SCAN {
            if self.matches_minute(&candidate) {
                return Some(candidate);
            }
            candidate += Duration::minutes(1);
        }
        None
    }
}
