//! Decides whether "now" falls inside the configured alert window.

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

use super::types::{MarketWindowConfig, TestOverrides};

/// Outcome of a window check, kept distinct so skips can be logged with a reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCheck {
    Open,
    GatingDisabled,
    Bypassed,
    Weekend,
    OutsideHours,
}

impl WindowCheck {
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            WindowCheck::Open | WindowCheck::GatingDisabled | WindowCheck::Bypassed
        )
    }
}

/// Classify `now` against the alert window.
///
/// Order of checks:
///   - gating disabled → always open
///   - test bypass → always open
///   - weekend (if `weekdays_only`) → closed
///   - local hour in `[start_hour, end_hour)` → open
pub fn check_trading_window(
    now: DateTime<Utc>,
    cfg: &MarketWindowConfig,
    test: &TestOverrides,
) -> WindowCheck {
    if !cfg.enabled {
        return WindowCheck::GatingDisabled;
    }

    if test.bypasses_clock() {
        return WindowCheck::Bypassed;
    }

    let local = now.with_timezone(&cfg.timezone);

    if cfg.weekdays_only && matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
        return WindowCheck::Weekend;
    }

    let hour = local.hour();
    if cfg.start_hour <= hour && hour < cfg.end_hour {
        WindowCheck::Open
    } else {
        WindowCheck::OutsideHours
    }
}

pub fn is_trading_window(
    now: DateTime<Utc>,
    cfg: &MarketWindowConfig,
    test: &TestOverrides,
) -> bool {
    check_trading_window(now, cfg, test).is_open()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn berlin_window() -> MarketWindowConfig {
        MarketWindowConfig {
            enabled: true,
            timezone: chrono_tz::Europe::Berlin,
            start_hour: 8,
            end_hour: 22,
            weekdays_only: true,
        }
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn disabled_gate_is_always_open() {
        let cfg = MarketWindowConfig {
            enabled: false,
            ..berlin_window()
        };

        // Sunday 03:00 UTC
        let out = check_trading_window(utc(2025, 9, 14, 3, 0), &cfg, &TestOverrides::default());
        assert_eq!(out, WindowCheck::GatingDisabled);
        assert!(out.is_open());
    }

    #[test]
    fn saturday_is_closed_even_within_hours() {
        // Saturday 2025-09-13 12:00 UTC = 14:00 Berlin
        let out = check_trading_window(
            utc(2025, 9, 13, 12, 0),
            &berlin_window(),
            &TestOverrides::default(),
        );
        assert_eq!(out, WindowCheck::Weekend);
    }

    #[test]
    fn weekend_allowed_when_filter_off() {
        let cfg = MarketWindowConfig {
            weekdays_only: false,
            ..berlin_window()
        };
        assert!(is_trading_window(
            utc(2025, 9, 13, 12, 0),
            &cfg,
            &TestOverrides::default()
        ));
    }

    #[test]
    fn hour_range_is_half_open_in_local_time() {
        let cfg = berlin_window();
        let test = TestOverrides::default();

        // Berlin is UTC+2 in September.
        // 05:59 UTC = 07:59 local → closed
        assert_eq!(
            check_trading_window(utc(2025, 9, 15, 5, 59), &cfg, &test),
            WindowCheck::OutsideHours
        );
        // 06:00 UTC = 08:00 local → open
        assert_eq!(
            check_trading_window(utc(2025, 9, 15, 6, 0), &cfg, &test),
            WindowCheck::Open
        );
        // 19:59 UTC = 21:59 local → open
        assert!(is_trading_window(utc(2025, 9, 15, 19, 59), &cfg, &test));
        // 20:00 UTC = 22:00 local → closed
        assert!(!is_trading_window(utc(2025, 9, 15, 20, 0), &cfg, &test));
    }

    #[test]
    fn winter_offset_is_applied() {
        // Berlin is UTC+1 in January. 07:00 UTC = 08:00 local.
        assert!(is_trading_window(
            utc(2025, 1, 15, 7, 0),
            &berlin_window(),
            &TestOverrides::default()
        ));
        assert!(!is_trading_window(
            utc(2025, 1, 15, 6, 59),
            &berlin_window(),
            &TestOverrides::default()
        ));
    }

    #[test]
    fn weekday_is_taken_from_local_date() {
        // Friday 23:30 UTC is already Saturday 01:30 in Berlin.
        let cfg = MarketWindowConfig {
            start_hour: 0,
            end_hour: 24,
            ..berlin_window()
        };
        assert_eq!(
            check_trading_window(utc(2025, 9, 12, 23, 30), &cfg, &TestOverrides::default()),
            WindowCheck::Weekend
        );
    }

    #[test]
    fn test_bypass_requires_test_mode() {
        let sunday = utc(2025, 9, 14, 12, 0);

        let bypass_only = TestOverrides {
            bypass_market_hours: true,
            ..Default::default()
        };
        assert!(!is_trading_window(sunday, &berlin_window(), &bypass_only));

        let active = TestOverrides {
            enabled: true,
            bypass_market_hours: true,
            ..Default::default()
        };
        assert_eq!(
            check_trading_window(sunday, &berlin_window(), &active),
            WindowCheck::Bypassed
        );
    }

    #[test]
    fn new_york_window() {
        let cfg = MarketWindowConfig {
            enabled: true,
            timezone: chrono_tz::America::New_York,
            start_hour: 9,
            end_hour: 16,
            weekdays_only: true,
        };
        // Monday 2025-09-15 13:30 UTC = 09:30 EDT
        assert!(is_trading_window(
            utc(2025, 9, 15, 13, 30),
            &cfg,
            &TestOverrides::default()
        ));
        // 20:00 UTC = 16:00 EDT → closed
        assert!(!is_trading_window(
            utc(2025, 9, 15, 20, 0),
            &cfg,
            &TestOverrides::default()
        ));
    }
}
