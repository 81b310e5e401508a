//! Strictly sequential traversal over the form steps.

use serde::Serialize;

use crate::wizard::steps::{StepDescriptor, STEPS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    Current,
    Upcoming,
}

/// Current position over a fixed, non-empty sequence of steps.
///
/// The index never leaves `0..steps.len()`.
#[derive(Debug, Clone)]
pub struct StepNavigator {
    steps: &'static [StepDescriptor],
    current: usize,
}

impl Default for StepNavigator {
    fn default() -> Self {
        Self::new(&STEPS)
    }
}

impl StepNavigator {
    /// # Panics
    /// If `steps` is empty.
    pub fn new(steps: &'static [StepDescriptor]) -> Self {
        assert!(!steps.is_empty(), "a wizard needs at least one step");
        Self { steps, current: 0 }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn steps(&self) -> &'static [StepDescriptor] {
        self.steps
    }

    pub fn current_step(&self) -> &'static StepDescriptor {
        &self.steps[self.current]
    }

    pub fn is_last_step(&self) -> bool {
        self.current == self.steps.len() - 1
    }

    /// Moves forward one step; no-op on the last step. Returns the new index.
    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1).min(self.steps.len() - 1);
        self.current
    }

    /// Moves back one step; no-op on the first step. Returns the new index.
    pub fn prev(&mut self) -> usize {
        self.current = self.current.saturating_sub(1);
        self.current
    }

    pub fn reset(&mut self) {
        self.current = 0;
    }

    pub fn step_statuses(&self) -> Vec<StepStatus> {
        (0..self.steps.len())
            .map(|i| match i.cmp(&self.current) {
                std::cmp::Ordering::Less => StepStatus::Completed,
                std::cmp::Ordering::Equal => StepStatus::Current,
                std::cmp::Ordering::Greater => StepStatus::Upcoming,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::steps::STEP_COUNT;

    #[test]
    fn test_starts_on_first_step() {
        let nav = StepNavigator::default();
        assert_eq!(nav.current(), 0);
        assert_eq!(nav.len(), STEP_COUNT);
        assert_eq!(nav.current_step().title, "Personal Information");
    }

    #[test]
    fn test_prev_at_first_step_is_noop() {
        let mut nav = StepNavigator::default();
        assert_eq!(nav.prev(), 0);
        assert_eq!(nav.prev(), 0);
    }

    #[test]
    fn test_next_at_last_step_is_noop() {
        let mut nav = StepNavigator::default();
        for _ in 0..STEP_COUNT - 1 {
            nav.next();
        }
        assert!(nav.is_last_step());
        assert_eq!(nav.next(), STEP_COUNT - 1);
        assert_eq!(nav.current_step().title, "Settings");
    }

    #[test]
    fn test_index_stays_in_bounds_over_any_walk() {
        let mut nav = StepNavigator::default();
        let walk = [1, 1, 1, 1, 1, 1, 1, -1, 1, -1, -1, -1, -1, -1, -1, -1, 1];
        for step in walk {
            let index = if step > 0 { nav.next() } else { nav.prev() };
            assert!(index < STEP_COUNT);
        }
    }

    #[test]
    fn test_step_statuses_track_position() {
        let mut nav = StepNavigator::default();
        nav.next();
        nav.next();
        assert_eq!(
            nav.step_statuses(),
            vec![
                StepStatus::Completed,
                StepStatus::Completed,
                StepStatus::Current,
                StepStatus::Upcoming,
                StepStatus::Upcoming,
            ]
        );
    }

    #[test]
    fn test_reset_returns_to_first_step() {
        let mut nav = StepNavigator::default();
        nav.next();
        nav.reset();
        assert_eq!(nav.current(), 0);
    }
}
