//! Subscription/trial access window as reported by the remote API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

const DAY_MS: i64 = 24 * 60 * 60 * 1000;

/// Access window returned by `GET /user/access`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessWindow {
    pub plan: String,
    /// Parsed defensively; an unparsable server value becomes `None`.
    pub access_until: Option<DateTime<Utc>>,
    pub has_access: bool,
    pub days_remaining: i64,
}

/// Gating decision for the application shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessState {
    LoggedOut,
    Blocked { access_until: Option<DateTime<Utc>> },
    Allowed { access_until: Option<DateTime<Utc>> },
}

impl AccessState {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessState::Allowed { .. })
    }
}

/// Whole days of access left, rounded up, never negative.
pub fn days_left(access_until: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let ms = access_until.signed_duration_since(now).num_milliseconds();
    if ms <= 0 {
        return 0;
    }
    (ms + DAY_MS - 1) / DAY_MS
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn days_left_rounds_partial_days_up() {
        assert_eq!(days_left(now() + Duration::hours(1), now()), 1);
        assert_eq!(days_left(now() + Duration::hours(25), now()), 2);
    }

    #[test]
    fn days_left_exact_days_are_not_inflated() {
        assert_eq!(days_left(now() + Duration::days(7), now()), 7);
    }

    #[test]
    fn days_left_floors_at_zero_once_expired() {
        assert_eq!(days_left(now() - Duration::hours(1), now()), 0);
        assert_eq!(days_left(now(), now()), 0);
    }

    #[test]
    fn allowed_state_reports_access() {
        assert!(AccessState::Allowed { access_until: None }.is_allowed());
        assert!(!AccessState::Blocked { access_until: None }.is_allowed());
        assert!(!AccessState::LoggedOut.is_allowed());
    }
}
