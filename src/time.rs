//! Simulation clock measured in days since the J2000 epoch.

use chrono::{DateTime, Duration, TimeZone, Utc};

pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// The clock stays within ±100,000 years of J2000, inside chrono's range.
pub const MAX_SIM_DAYS: f64 = 100_000.0 * 365.25;

pub fn j2000_epoch() -> DateTime<Utc> {
    // 2000-01-01T12:00:00Z
    Utc.timestamp_opt(946_728_000, 0).single().unwrap_or_default()
}

pub fn days_since_j2000(timestamp: DateTime<Utc>) -> f64 {
    (timestamp - j2000_epoch()).num_milliseconds() as f64 / (1000.0 * SECONDS_PER_DAY)
}

/// `None` when `days` is not finite or falls outside the representable dates.
pub fn timestamp_from_days(days: f64) -> Option<DateTime<Utc>> {
    if !days.is_finite() {
        return None;
    }
    let millis = (days * SECONDS_PER_DAY * 1000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64).and_then(|d| j2000_epoch().checked_add_signed(d))
}

#[derive(Clone, Debug)]
pub struct SimClock {
    pub days_since_j2000: f64,
    /// Simulated days per real second. Negative runs backwards.
    pub speed: f64,
    pub running: bool,
}

impl SimClock {
    pub fn starting_at(timestamp: DateTime<Utc>, speed: f64) -> Self {
        Self {
            days_since_j2000: days_since_j2000(timestamp),
            speed,
            running: false,
        }
    }

    pub fn now(speed: f64) -> Self {
        Self::starting_at(Utc::now(), speed)
    }

    /// Moves the clock on. Reaching `MAX_SIM_DAYS` either way stops it there.
    pub fn advance(&mut self, real_dt_seconds: f64) {
        if !self.running {
            return;
        }
        let next = self.days_since_j2000 + self.speed * real_dt_seconds;
        if !next.is_finite() {
            log::warn!("clock step is not finite, stopping");
            self.running = false;
            return;
        }
        if next.abs() > MAX_SIM_DAYS {
            log::warn!("clock reached the end of the supported date range");
            self.days_since_j2000 = next.clamp(-MAX_SIM_DAYS, MAX_SIM_DAYS);
            self.running = false;
            return;
        }
        self.days_since_j2000 = next;
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        timestamp_from_days(self.days_since_j2000)
    }

    pub fn reset_to_now(&mut self) {
        self.days_since_j2000 = days_since_j2000(Utc::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_day_zero() {
        assert_eq!(days_since_j2000(j2000_epoch()), 0.0);
        assert_eq!(j2000_epoch().to_rfc3339(), "2000-01-01T12:00:00+00:00");
    }

    #[test]
    fn days_round_trip_through_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 20, 3, 6, 0).unwrap();
        let days = days_since_j2000(ts);
        assert_eq!(timestamp_from_days(days), Some(ts));
    }

    #[test]
    fn stopped_clock_does_not_move() {
        let mut clock = SimClock::starting_at(j2000_epoch(), 10.0);
        clock.advance(5.0);
        assert_eq!(clock.days_since_j2000, 0.0);
        clock.running = true;
        clock.advance(0.5);
        assert!((clock.days_since_j2000 - 5.0).abs() < 1e-12);
    }

    #[test]
    fn fast_clock_stops_at_range_limit() {
        let mut clock = SimClock::starting_at(j2000_epoch(), 36_525.0);
        clock.running = true;
        for _ in 0..2_700 {
            clock.advance(1.0);
        }
        assert_eq!(clock.days_since_j2000, MAX_SIM_DAYS);
        assert!(!clock.running);
        assert!(clock.timestamp().is_some());

        clock.speed = -36_525.0;
        clock.running = true;
        for _ in 0..6_000 {
            clock.advance(1.0);
        }
        assert_eq!(clock.days_since_j2000, -MAX_SIM_DAYS);
        assert!(clock.timestamp().is_some());
    }

    #[test]
    fn out_of_range_days_have_no_timestamp() {
        assert!(timestamp_from_days(98_617_500.0).is_none());
        assert!(timestamp_from_days(-1e30).is_none());
        assert!(timestamp_from_days(f64::NAN).is_none());
        assert!(timestamp_from_days(MAX_SIM_DAYS).is_some());
    }
}
