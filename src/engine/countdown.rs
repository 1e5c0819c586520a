use tracing::warn;

use super::{error::SessionError, types::ChallengeDuration};

/// Odlicza czas minigry: zamienia delty klatek na postęp (z uwzględnieniem
/// `time_scale`) i udostępnia ułamek pozostałego czasu do narysowania paska.
#[derive(Debug, Clone)]
pub struct Countdown {
    duration: ChallengeDuration,
    elapsed_ms: f64,
    time_scale: f64,
    running: bool,
}

impl Countdown {
    pub fn new(duration: ChallengeDuration) -> Self {
        Self {
            duration,
            elapsed_ms: 0.0,
            time_scale: 1.0,
            running: false,
        }
    }

    pub fn duration(&self) -> ChallengeDuration {
        self.duration
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Zamraża odliczanie (kolejne `advance` nic nie robią).
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        if !self.running {
            return;
        }
        if !delta_ms.is_finite() || delta_ms < 0.0 {
            warn!(delta_ms, "ignoring malformed frame delta");
            return;
        }
        self.elapsed_ms += delta_ms * self.time_scale;
    }

    pub fn set_time_scale(&mut self, scale: f64) -> Result<(), SessionError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SessionError::InvalidTimeScale(scale));
        }
        self.time_scale = scale;
        Ok(())
    }

    pub fn set_duration(&mut self, duration: ChallengeDuration) {
        self.duration = duration;
    }

    /// `true` gdy limit czasu został przekroczony (nigdy dla `Untimed`).
    pub fn expired(&self) -> bool {
        match self.duration {
            ChallengeDuration::Timed(ms) => self.elapsed_ms > ms as f64,
            ChallengeDuration::Untimed => false,
        }
    }

    /// Pozostały czas w ms; `None` dla minigry bez limitu.
    pub fn time_left_ms(&self) -> Option<f64> {
        self.duration.as_ms().map(|ms| ms as f64 - self.elapsed_ms)
    }

    pub fn fraction_remaining(&self) -> f64 {
        match self.duration {
            ChallengeDuration::Untimed => 1.0,
            ChallengeDuration::Timed(0) => 0.0,
            ChallengeDuration::Timed(ms) => (1.0 - self.elapsed_ms / ms as f64).clamp(0.0, 1.0),
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.time_scale = 1.0;
    }
}

/// Jednorazowe opóźnione zadanie (komunikat przed startem) odliczane deltami
/// klatek. Anulowanie jest idempotentne.
#[derive(Debug, Clone, Default)]
pub struct AlertTimer {
    remaining_ms: Option<f64>,
}

impl AlertTimer {
    pub fn schedule(&mut self, delay_ms: f64) {
        self.remaining_ms = Some(delay_ms);
    }

    pub fn cancel(&mut self) {
        self.remaining_ms = None;
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Zwraca `true` dokładnie raz, w klatce w której opóźnienie minęło.
    pub fn advance(&mut self, delta_ms: f64) -> bool {
        let Some(left) = self.remaining_ms.as_mut() else {
            return false;
        };
        if delta_ms.is_finite() && delta_ms > 0.0 {
            *left -= delta_ms;
        }
        if *left <= 0.0 {
            self.remaining_ms = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn running(duration: ChallengeDuration) -> Countdown {
        let mut c = Countdown::new(duration);
        c.start();
        c
    }

    #[test]
    fn stopped_countdown_does_not_accumulate() {
        let mut c = Countdown::new(ChallengeDuration::Timed(1000));
        c.advance(500.0);
        assert_eq!(c.elapsed_ms(), 0.0);

        c.start();
        c.advance(500.0);
        c.stop();
        c.advance(500.0);
        assert_eq!(c.elapsed_ms(), 500.0);
    }

    #[test]
    fn time_scale_multiplies_delta() {
        let mut c = running(ChallengeDuration::Timed(10_000));
        c.set_time_scale(0.5).unwrap();
        c.advance(1000.0);
        assert_eq!(c.elapsed_ms(), 500.0);
    }

    #[test]
    fn rejects_non_positive_time_scale() {
        let mut c = running(ChallengeDuration::Untimed);
        assert_eq!(c.set_time_scale(0.0), Err(SessionError::InvalidTimeScale(0.0)));
        assert!(c.set_time_scale(-1.0).is_err());
        assert!(c.set_time_scale(f64::NAN).is_err());
        assert_eq!(c.time_scale(), 1.0);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut c = running(ChallengeDuration::Timed(1000));
        c.advance(-50.0);
        c.advance(f64::INFINITY);
        assert_eq!(c.elapsed_ms(), 0.0);
    }

    #[test]
    fn untimed_never_expires() {
        let mut c = running(ChallengeDuration::Untimed);
        c.advance(1.0e9);
        assert!(!c.expired());
        assert_eq!(c.fraction_remaining(), 1.0);
        assert_eq!(c.time_left_ms(), None);
    }

    #[test]
    fn large_delta_jumps_past_duration() {
        let mut c = running(ChallengeDuration::Timed(5000));
        c.advance(60_000.0);
        assert!(c.expired());
        assert_eq!(c.fraction_remaining(), 0.0);
    }

    #[test]
    fn exactly_at_duration_is_not_expired() {
        let mut c = running(ChallengeDuration::Timed(1000));
        c.advance(1000.0);
        assert!(!c.expired());
        assert_eq!(c.time_left_ms(), Some(0.0));
    }

    #[test]
    fn alert_fires_once_and_cancel_is_safe() {
        let mut t = AlertTimer::default();
        t.schedule(1000.0);
        assert!(!t.advance(600.0));
        assert!(t.advance(400.0));
        assert!(!t.advance(1000.0));

        t.schedule(1000.0);
        t.cancel();
        t.cancel();
        assert!(!t.is_pending());
        assert!(!t.advance(5000.0));
    }

    proptest! {
        #[test]
        fn prop_accumulation_is_sum_of_scaled_deltas(
            deltas in prop::collection::vec(0.0f64..100.0, 0..64),
            scale in 0.01f64..4.0,
        ) {
            let mut c = running(ChallengeDuration::Untimed);
            c.set_time_scale(scale).unwrap();
            let mut expected = 0.0;
            for d in &deltas {
                c.advance(*d);
                expected += d * scale;
            }
            prop_assert_eq!(c.elapsed_ms(), expected);
        }

        #[test]
        fn prop_fraction_remaining_in_unit_range(
            duration in 0u64..100_000,
            elapsed in 0.0f64..1.0e7,
        ) {
            let mut c = running(ChallengeDuration::Timed(duration));
            c.advance(elapsed);
            let f = c.fraction_remaining();
            prop_assert!((0.0..=1.0).contains(&f), "fraction {}", f);
        }

        #[test]
        fn prop_reset_is_idempotent(elapsed in 0.0f64..1.0e6, scale in 0.01f64..4.0) {
            let mut c = running(ChallengeDuration::Timed(10_000));
            c.set_time_scale(scale).unwrap();
            c.advance(elapsed);
            c.reset();
            let (e1, s1) = (c.elapsed_ms(), c.time_scale());
            c.reset();
            prop_assert_eq!((e1, s1), (0.0, 1.0));
            prop_assert_eq!((c.elapsed_ms(), c.time_scale()), (0.0, 1.0));
        }
    }
}
