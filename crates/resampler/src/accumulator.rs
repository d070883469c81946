//! Path length accumulation shared by both resamplers

/// Tracks distance travelled since the last emitted sample
#[derive(Debug, Clone)]
pub struct ArcAccumulator {
    spacing: f64,
    accumulated: f64,
}

impl ArcAccumulator {
    /// `spacing` must be positive; non-positive values are clamped to `f64::EPSILON`
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing: spacing.max(f64::EPSILON),
            accumulated: 0.0,
        }
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    /// Distance travelled since the last crossing
    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Consume a step of length `step`.
    ///
    /// Returns, for every spacing threshold crossed during the step, the
    /// fraction of the step (0, 1] at which the crossing lies. Fractions are
    /// increasing; interpolating the step's endpoints at them yields points
    /// exactly `spacing` apart.
    pub fn advance(&mut self, step: f64) -> Vec<f64> {
        let mut fractions = Vec::new();
        if !step.is_finite() || step <= 0.0 {
            return fractions;
        }

        let mut travelled = 0.0;
        let mut remaining = self.spacing - self.accumulated;
        while travelled + remaining <= step {
            travelled += remaining;
            fractions.push((travelled / step).min(1.0));
            remaining = self.spacing;
        }

        self.accumulated = (self.spacing - remaining) + (step - travelled);
        fractions
    }

    pub fn reset(&mut self) {
        self.accumulated = 0.0;
    }
}
