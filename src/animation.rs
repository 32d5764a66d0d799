use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Step size and turning point of the horizontal sweep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OffsetParams {
    pub step: f64,
    pub bound: f64,
}

impl Default for OffsetParams {
    fn default() -> Self {
        Self {
            step: 0.005,
            bound: 0.5,
        }
    }
}

impl OffsetParams {
    /// Offset magnitude at which the sweep turns around. Slightly below
    /// `bound` so accumulated rounding cannot skip the turn by one step.
    fn turn_at(&self) -> f64 {
        self.bound - self.step * 1e-6
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OffsetState {
    pub offset: f64,
    pub forward: bool,
}

impl Default for OffsetState {
    fn default() -> Self {
        Self {
            offset: 0.0,
            forward: true,
        }
    }
}

impl OffsetState {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(self.offset as f32, 0.0, 0.0))
    }
}

/// Moves the offset one step. The step that reaches the bound is applied in
/// full and the direction flips for the following call.
pub fn advance_offset(state: OffsetState, params: &OffsetParams) -> OffsetState {
    let offset = if state.forward {
        state.offset + params.step
    } else {
        state.offset - params.step
    };

    let forward = if offset.abs() >= params.turn_at() {
        !state.forward
    } else {
        state.forward
    };

    OffsetState { offset, forward }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn run(steps: usize) -> OffsetState {
        let params = OffsetParams::default();
        (0..steps).fold(OffsetState::default(), |state, _| advance_offset(state, &params))
    }

    #[test]
    fn test_single_step() {
        let state = run(1);
        assert!((state.offset - 0.005).abs() < EPSILON);
        assert!(state.forward);
    }

    #[test]
    fn test_turns_at_bound() {
        let before = run(99);
        assert!(before.forward);
        assert!(before.offset < 0.5);

        let state = run(100);
        assert!((state.offset - 0.5).abs() < EPSILON);
        assert!(!state.forward);
    }

    #[test]
    fn test_sweeps_back_symmetrically() {
        let state = run(150);
        assert!((state.offset - 0.25).abs() < EPSILON);
        assert!(!state.forward);

        let state = run(200);
        assert!(state.offset.abs() < EPSILON);
        assert!(!state.forward);

        let state = run(300);
        assert!((state.offset + 0.5).abs() < EPSILON);
        assert!(state.forward);

        let state = run(400);
        assert!(state.offset.abs() < EPSILON);
        assert!(state.forward);
    }

    #[test]
    fn test_never_leaves_bound() {
        let params = OffsetParams::default();
        let mut state = OffsetState::default();
        for _ in 0..10_000 {
            state = advance_offset(state, &params);
            assert!(state.offset.abs() <= params.bound + EPSILON);
        }
    }

    #[test]
    fn test_crossing_step_is_applied_before_turning() {
        let params = OffsetParams {
            step: 0.3,
            bound: 0.5,
        };
        let state = advance_offset(OffsetState::default(), &params);
        let state = advance_offset(state, &params);
        assert!((state.offset - 0.6).abs() < EPSILON);
        assert!(!state.forward);

        let state = advance_offset(state, &params);
        assert!((state.offset - 0.3).abs() < EPSILON);
    }

    #[test]
    fn test_model_matrix_translates_x() {
        let state = OffsetState {
            offset: 0.25,
            forward: true,
        };
        let moved = state.model_matrix().transform_point3(Vec3::new(-0.5, -0.5, 0.0));
        assert_eq!(moved, Vec3::new(-0.25, -0.5, 0.0));
    }
}
