//! Fixed timestep accumulator.

/// Converts variable frame times into a whole number of fixed simulation
/// steps, carrying the remainder over to the next frame.
#[derive(Debug, Clone)]
pub struct FixedTimestepper {
    timestep: f64,
    accumulated: f64,
}

impl FixedTimestepper {
    pub fn new(timestep: f64) -> Self {
        Self {
            timestep: timestep.max(1e-6),
            accumulated: 0.0,
        }
    }

    pub fn timestep(&self) -> f64 {
        self.timestep
    }

    /// Runs `fixed_step` once per whole timestep contained in the
    /// accumulated time and returns how many steps ran.
    pub fn step(&mut self, dt: f64, mut fixed_step: impl FnMut(f64)) -> usize {
        self.accumulated += dt.max(0.0);
        let mut steps = 0;
        while self.accumulated >= self.timestep {
            self.accumulated -= self.timestep;
            fixed_step(self.timestep);
            steps += 1;
        }
        steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_steps_and_remainder() {
        let mut stepper = FixedTimestepper::new(0.25);
        let mut total = 0.0;
        assert_eq!(stepper.step(0.6, |dt| total += dt), 2);
        assert_eq!(total, 0.5);
        // the 0.1 carried over plus 0.2 covers one more step
        assert_eq!(stepper.step(0.2, |dt| total += dt), 1);
        assert_eq!(total, 0.75);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let mut stepper = FixedTimestepper::new(0.1);
        assert_eq!(stepper.step(-5.0, |_| {}), 0);
    }
}
