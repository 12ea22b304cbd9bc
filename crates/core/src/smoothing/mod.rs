//! Exponential follow of the rendered position toward the raw target.

use crate::{PointerState, Timestep};

/// Frame duration the damping factor is tuned for.
pub const REFERENCE_FRAME_MS: f64 = 1000.0 / 60.0;

/// Advances the rendered position by `damping` of the remaining distance.
pub fn step(state: PointerState, damping: f64) -> PointerState {
    PointerState {
        rendered_x: state.rendered_x + (state.target_x - state.rendered_x) * damping,
        rendered_y: state.rendered_y + (state.target_y - state.rendered_y) * damping,
        ..state
    }
}

/// Damping actually applied for a frame under the given timestep policy.
///
/// `elapsed_ms` is `None` on the first frame, which always uses the full
/// factor.
pub fn effective_damping(damping: f64, timestep: Timestep, elapsed_ms: Option<f64>) -> f64 {
    match (timestep, elapsed_ms) {
        (Timestep::Normalized, Some(elapsed)) if elapsed.is_finite() && elapsed >= 0.0 => {
            damping * (elapsed / REFERENCE_FRAME_MS).min(1.0)
        }
        _ => damping,
    }
}

/// Number of fixed steps after which a jump of `distance` is within
/// `epsilon` of its target: `ceil(ln(epsilon / distance) / ln(1 - damping))`.
///
/// Returns `None` for non-finite inputs, a damping outside `(0, 1)`, a
/// non-positive epsilon, or a count that does not fit in a `u32`.
pub fn steps_to_settle(distance: f64, damping: f64, epsilon: f64) -> Option<u32> {
    if !(distance.is_finite() && epsilon.is_finite() && epsilon > 0.0) {
        return None;
    }
    if !(damping > 0.0 && damping < 1.0) {
        return None;
    }
    let distance = distance.abs();
    if distance < epsilon {
        return Some(0);
    }
    let steps = ((epsilon / distance).ln() / (1.0 - damping).ln()).ceil();
    if steps.is_finite() && steps <= f64::from(u32::MAX) {
        Some(steps.max(0.0) as u32)
    } else {
        None
    }
}

/// Runs [`step`] until the 1-D lag drops below `epsilon`, returning the
/// number of steps taken. Gives up after `max_steps`.
pub fn simulate_settle(distance: f64, damping: f64, epsilon: f64, max_steps: u32) -> Option<u32> {
    let mut state = PointerState {
        target_x: distance,
        ..Default::default()
    };
    for taken in 0..=max_steps {
        if (state.target_x - state.rendered_x).abs() < epsilon {
            return Some(taken);
        }
        state = step(state, damping);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn towards(x: f64, y: f64) -> PointerState {
        PointerState {
            target_x: x,
            target_y: y,
            ..Default::default()
        }
    }

    #[test]
    fn first_two_steps_match_reference_values() {
        let one = step(towards(100.0, 100.0), 0.15);
        assert!((one.rendered_x - 15.0).abs() < 0.01);
        assert!((one.rendered_y - 15.0).abs() < 0.01);

        let two = step(one, 0.15);
        assert!((two.rendered_x - 27.75).abs() < 0.01);
        assert!((two.rendered_y - 27.75).abs() < 0.01);
    }

    #[test]
    fn lag_shrinks_strictly_while_target_is_held() {
        let mut state = towards(1000.0, -250.0);
        let mut previous = state.lag().0.abs();
        while previous > 1e-6 {
            state = step(state, 0.15);
            let lag = state.lag().0.abs();
            assert!(lag < previous, "lag grew from {previous} to {lag}");
            previous = lag;
        }
    }

    #[test]
    fn stepping_at_rest_is_a_no_op() {
        let state = PointerState {
            target_x: 42.0,
            target_y: 7.0,
            rendered_x: 42.0,
            rendered_y: 7.0,
            ..Default::default()
        };
        assert_eq!(step(state, 0.15), state);
    }

    #[test]
    fn settles_a_thousand_pixel_jump_within_closed_form_bound() {
        let bound = steps_to_settle(1000.0, 0.15, 0.01).unwrap();
        assert_eq!(bound, 71);
        assert_eq!(simulate_settle(1000.0, 0.15, 0.01, 500), Some(bound));
    }

    #[test]
    fn unbounded_settle_counts_are_rejected() {
        assert_eq!(steps_to_settle(f64::INFINITY, 0.15, 0.01), None);
        assert_eq!(steps_to_settle(f64::NAN, 0.15, 0.01), None);
        assert_eq!(steps_to_settle(1000.0, 1e-12, 0.01), None);
        assert_eq!(steps_to_settle(1000.0, 0.15, 0.0), None);
        assert_eq!(steps_to_settle(1000.0, 1.0, 0.01), None);
    }

    #[test]
    fn already_settled_needs_no_steps() {
        assert_eq!(steps_to_settle(0.001, 0.15, 0.01), Some(0));
        assert_eq!(simulate_settle(0.0, 0.15, 0.01, 10), Some(0));
    }

    #[test]
    fn fixed_timestep_ignores_elapsed_time() {
        assert_eq!(effective_damping(0.15, Timestep::Fixed, Some(4.0)), 0.15);
        assert_eq!(effective_damping(0.15, Timestep::Fixed, Some(100.0)), 0.15);
    }

    #[test]
    fn normalized_timestep_scales_short_frames_only() {
        let half = effective_damping(0.15, Timestep::Normalized, Some(REFERENCE_FRAME_MS / 2.0));
        assert!((half - 0.075).abs() < 1e-9);
        assert_eq!(effective_damping(0.15, Timestep::Normalized, Some(50.0)), 0.15);
        assert_eq!(effective_damping(0.15, Timestep::Normalized, None), 0.15);
    }
}
