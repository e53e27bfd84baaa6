use chrono::{
    DateTime,
    Duration,
    Utc,
};

use super::errors::GoldlistError;

/// Furthest the clock may be moved away from the real date in either direction.
pub const MAX_OFFSET_DAYS: i64 = 100 * 365;

/// Wall clock shifted by a whole number of days, so a learner can preview how their
/// notebook and review queue look on a later date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VirtualClock {
    offset_days: i64,
}

impl VirtualClock {
    /// Offsets beyond `MAX_OFFSET_DAYS` are clamped to it.
    pub fn new(offset_days: i64) -> Self {
        Self { offset_days: offset_days.clamp(-MAX_OFFSET_DAYS, MAX_OFFSET_DAYS) }
    }

    pub fn in_range(offset_days: i64) -> bool {
        (-MAX_OFFSET_DAYS..=MAX_OFFSET_DAYS).contains(&offset_days)
    }

    pub fn offset_days(&self) -> i64 {
        self.offset_days
    }

    /// Moves the clock by `days`. The offset is left unchanged when the result would fall
    /// outside `MAX_OFFSET_DAYS`.
    pub fn shift(&mut self, days: i64) -> Result<(), GoldlistError> {
        match self.offset_days.checked_add(days) {
            Some(offset) if Self::in_range(offset) => {
                self.offset_days = offset;
                Ok(())
            }
            _ => Err(GoldlistError::ClockOutOfRange(days)),
        }
    }

    pub fn reset(&mut self) {
        self.offset_days = 0;
    }

    pub fn is_shifted(&self) -> bool {
        self.offset_days != 0
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.at(Utc::now())
    }

    /// Applies the offset to a given real instant, saturating at the ends of the
    /// representable range.
    pub fn at(&self, real: DateTime<Utc>) -> DateTime<Utc> {
        Duration::try_days(self.offset_days)
            .and_then(|offset| real.checked_add_signed(offset))
            .unwrap_or(if self.offset_days < 0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_shift_and_reset() {
        let real = Utc.with_ymd_and_hms(2024, 1, 30, 12, 0, 0).unwrap();
        let mut clock = VirtualClock::default();
        assert_eq!(clock.at(real), real);

        clock.shift(3).unwrap();
        clock.shift(-1).unwrap();
        assert!(clock.is_shifted());
        assert_eq!(clock.at(real), Utc.with_ymd_and_hms(2024, 2, 1, 12, 0, 0).unwrap());

        clock.reset();
        assert_eq!(clock.offset_days(), 0);
    }

    #[test]
    fn test_huge_offsets_are_clamped() {
        let clock = VirtualClock::new(1_000_000_000);
        assert_eq!(clock.offset_days(), MAX_OFFSET_DAYS);
        assert!(clock.now() > Utc::now());

        let clock = VirtualClock::new(i64::MIN);
        assert_eq!(clock.offset_days(), -MAX_OFFSET_DAYS);
        assert!(clock.now() < Utc::now());
    }

    #[test]
    fn test_shift_out_of_range_is_rejected() {
        let mut clock = VirtualClock::new(10);
        assert!(matches!(clock.shift(i64::MAX), Err(GoldlistError::ClockOutOfRange(i64::MAX))));
        assert!(matches!(clock.shift(MAX_OFFSET_DAYS), Err(GoldlistError::ClockOutOfRange(_))));
        assert_eq!(clock.offset_days(), 10);

        clock.shift(MAX_OFFSET_DAYS - 10).unwrap();
        assert_eq!(clock.offset_days(), MAX_OFFSET_DAYS);
    }

    #[test]
    fn test_at_saturates_instead_of_overflowing() {
        let near_end = DateTime::<Utc>::MAX_UTC - Duration::days(1);
        assert_eq!(VirtualClock::new(5).at(near_end), DateTime::<Utc>::MAX_UTC);

        let near_start = DateTime::<Utc>::MIN_UTC + Duration::days(1);
        assert_eq!(VirtualClock::new(-5).at(near_start), DateTime::<Utc>::MIN_UTC);
    }
}
