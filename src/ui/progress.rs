use rand::Rng;

/// Highest value the simulated bar reaches before the transfer finishes.
const SIMULATED_CEILING: f32 = 0.95;
/// Largest random step per tick.
const MAX_STEP: f32 = 0.10;

/// Progress bar state. Shows real byte progress when the response carries
/// a length, otherwise creeps forward on each tick.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProgressIndicator {
    simulated: f32,
    actual: Option<f32>,
}

impl ProgressIndicator {
    pub fn value(&self) -> f32 {
        self.actual.unwrap_or(self.simulated)
    }

    pub fn is_simulated(&self) -> bool {
        self.actual.is_none()
    }

    pub fn report(&mut self, fraction: f32) {
        self.actual = Some(fraction.clamp(0.0, 1.0));
    }

    pub fn tick(&mut self) {
        let step = rand::rng().random_range(0.0..MAX_STEP);
        self.advance(step);
    }

    fn advance(&mut self, step: f32) {
        self.simulated = (self.simulated + step).min(SIMULATED_CEILING);
    }

    pub fn finish(&mut self) {
        self.actual = Some(1.0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulated_progress_caps_below_full() {
        let mut progress = ProgressIndicator::default();
        for _ in 0..100 {
            progress.tick();
        }
        assert!(progress.is_simulated());
        assert_eq!(progress.value(), SIMULATED_CEILING);
    }

    #[test]
    fn test_ticks_only_move_forward() {
        let mut progress = ProgressIndicator::default();
        let mut last = progress.value();
        for _ in 0..20 {
            progress.tick();
            assert!(progress.value() >= last);
            last = progress.value();
        }
    }

    #[test]
    fn test_reported_progress_wins() {
        let mut progress = ProgressIndicator::default();
        progress.advance(0.3);
        progress.report(0.1);
        assert_eq!(progress.value(), 0.1);
        assert!(!progress.is_simulated());

        progress.finish();
        assert_eq!(progress.value(), 1.0);

        progress.reset();
        assert_eq!(progress.value(), 0.0);
        assert!(progress.is_simulated());
    }
}
