//! Calendar-day deadline arithmetic shared by display and the sweep.
//!
//! Everything here works on `NaiveDate`, so both operands are already
//! normalized to midnight: the deadline day itself yields 0 days remaining,
//! and a deadline only counts as expired once its entire calendar day has
//! elapsed. The sweep and the proximity classifier share this one definition.

use chrono::NaiveDate;
use serde::Serialize;

/// Whole days between today and the deadline; negative once the deadline day
/// has passed.
pub fn days_remaining(deadline: NaiveDate, today: NaiveDate) -> i64 {
    (deadline - today).num_days()
}

/// Display urgency for a deadline relative to today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeadlineProximity {
    Expired,
    Critical,
    Warning,
    Normal,
}

impl DeadlineProximity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Expired => "Expired",
            Self::Critical => "Critical",
            Self::Warning => "Warning",
            Self::Normal => "Normal",
        }
    }
}

pub fn classify(deadline: NaiveDate, today: NaiveDate) -> DeadlineProximity {
    match days_remaining(deadline, today) {
        days if days < 0 => DeadlineProximity::Expired,
        0..=2 => DeadlineProximity::Critical,
        3..=6 => DeadlineProximity::Warning,
        _ => DeadlineProximity::Normal,
    }
}

/// True once the deadline's calendar day has fully elapsed.
pub fn is_expired(deadline: NaiveDate, today: NaiveDate) -> bool {
    days_remaining(deadline, today) < 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 8, 7).expect("valid date")
    }

    #[test]
    fn classification_boundaries() {
        let today = today();
        let cases = [
            (-30, DeadlineProximity::Expired),
            (-1, DeadlineProximity::Expired),
            (0, DeadlineProximity::Critical),
            (1, DeadlineProximity::Critical),
            (2, DeadlineProximity::Critical),
            (3, DeadlineProximity::Warning),
            (6, DeadlineProximity::Warning),
            (7, DeadlineProximity::Normal),
            (120, DeadlineProximity::Normal),
        ];

        for (offset, expected) in cases {
            let deadline = today + Duration::days(offset);
            assert_eq!(classify(deadline, today), expected, "offset {offset}");
        }
    }

    #[test]
    fn levels_partition_the_day_axis() {
        let today = today();
        for offset in -60..60 {
            let deadline = today + Duration::days(offset);
            let days = days_remaining(deadline, today);
            let level = classify(deadline, today);

            assert_eq!(days < 0, level == DeadlineProximity::Expired);
            assert_eq!((0..3).contains(&days), level == DeadlineProximity::Critical);
            assert_eq!((3..7).contains(&days), level == DeadlineProximity::Warning);
            assert_eq!(days >= 7, level == DeadlineProximity::Normal);
        }
    }

    #[test]
    fn deadline_day_is_critical_not_expired() {
        let today = today();
        assert_eq!(days_remaining(today, today), 0);
        assert!(!is_expired(today, today));
        assert_eq!(classify(today, today), DeadlineProximity::Critical);
    }

    #[test]
    fn expiration_agrees_with_the_expired_level() {
        let today = today();
        for offset in -10..10 {
            let deadline = today + Duration::days(offset);
            assert_eq!(
                is_expired(deadline, today),
                classify(deadline, today) == DeadlineProximity::Expired
            );
        }
    }
}
