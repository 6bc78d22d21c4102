//! The access token persisted in the sheet.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Long-lived social access token stored in a designated sheet cell pair.
///
/// The token is externally-owned state: read once at run start, written
/// back only when a refresh succeeds. Nothing is cached in-process
/// across runs because the process does not persist between invocations.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use confessio_core::SheetToken;
///
/// let token = SheetToken {
///     value: "EAAB...".to_string(),
///     refreshed_at: NaiveDate::from_ymd_opt(2025, 6, 1),
/// };
/// let today = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
/// assert!(token.needs_refresh(45, today));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetToken {
    /// The bearer token value
    pub value: String,
    /// Date of the last successful refresh, if recorded
    pub refreshed_at: Option<NaiveDate>,
}

impl SheetToken {
    /// Whether the token is old enough to exchange for a fresh one.
    ///
    /// A token with no recorded refresh date is treated as stale, so the
    /// first run after the date cell is introduced performs a refresh
    /// and starts the clock.
    pub fn needs_refresh(&self, max_age_days: i64, today: NaiveDate) -> bool {
        match self.refreshed_at {
            Some(date) => (today - date).num_days() >= max_age_days,
            None => true,
        }
    }

    /// Whether a usable token value is present.
    pub fn is_present(&self) -> bool {
        !self.value.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fresh_token_is_not_refreshed() {
        let token = SheetToken {
            value: "t".into(),
            refreshed_at: Some(date(2025, 8, 1)),
        };
        assert!(!token.needs_refresh(45, date(2025, 8, 20)));
    }

    #[test]
    fn stale_token_is_refreshed() {
        let token = SheetToken {
            value: "t".into(),
            refreshed_at: Some(date(2025, 6, 1)),
        };
        assert!(token.needs_refresh(45, date(2025, 8, 20)));
    }

    #[test]
    fn unknown_refresh_date_counts_as_stale() {
        let token = SheetToken {
            value: "t".into(),
            refreshed_at: None,
        };
        assert!(token.needs_refresh(45, date(2025, 8, 20)));
    }

    #[test]
    fn blank_value_is_absent() {
        let token = SheetToken {
            value: "  ".into(),
            refreshed_at: None,
        };
        assert!(!token.is_present());
    }
}
