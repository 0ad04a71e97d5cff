//! Angles and Critically Damped Smoothing
//!
//! Degree-based helpers for yaw handling. All yaw values in the crate are
//! degrees; radians only appear at the trig boundary.

/// Radians to degrees.
pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

/// Degrees to radians.
pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

/// Lower bound for smoothing time constants.
pub const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Wrap `t` into `[0, length)`.
#[inline]
pub fn repeat(t: f32, length: f32) -> f32 {
    (t - (t / length).floor() * length).clamp(0.0, length)
}

/// Normalize a yaw to `[0, 360)`.
#[inline]
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = repeat(degrees, 360.0);
    // repeat can land exactly on the upper bound through rounding
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Shortest signed difference from `current` to `target`, in `(-180, 180]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = repeat(target - current, 360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Critically damped spring toward `target`.
///
/// `velocity` is the smoother's carried state and must be kept between
/// calls. Never overshoots the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;

    // Pade approximation of exp(-omega * dt)
    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // Clamp overshoot
    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = if dt > 0.0 { (output - target) / dt } else { 0.0 };
    }

    output
}

/// [`smooth_damp`] for angles in degrees, taking the shortest way around.
///
/// The result is not wrapped; callers normalize when storing a yaw.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_delta_angle_wraps_shortest_way() {
        assert_eq!(delta_angle(350.0, 10.0), 20.0);
        assert_eq!(delta_angle(10.0, 350.0), -20.0);
        assert_eq!(delta_angle(0.0, 180.0), 180.0);
        assert_eq!(delta_angle(90.0, 90.0), 0.0);
        assert_eq!(delta_angle(-170.0, 170.0), -20.0);
    }

    #[test]
    fn test_normalize_degrees() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(-90.0), 270.0);
        assert_eq!(normalize_degrees(450.0), 90.0);
    }

    #[test]
    fn test_smooth_damp_moves_toward_target_without_overshoot() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        let mut last = value;
        for _ in 0..200 {
            value = smooth_damp(value, 10.0, &mut velocity, 0.1, 0.02);
            assert!(value >= last, "smooth damp must be monotonic here");
            assert!(value <= 10.0, "smooth damp must not overshoot");
            last = value;
        }
        assert!((value - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_smooth_damp_zero_dt_holds() {
        let mut velocity = 3.0;
        let value = smooth_damp(1.0, 5.0, &mut velocity, 0.1, 0.0);
        assert_eq!(value, 1.0);
        assert_eq!(velocity, 3.0);
    }

    #[test]
    fn test_smooth_damp_angle_crosses_wrap_boundary() {
        // 350 -> 10 should go up through 360, not down through 180
        let mut velocity = 0.0;
        let next = smooth_damp_angle(350.0, 10.0, &mut velocity, 0.1, 0.02);
        assert!(next > 350.0, "expected to turn toward 360, got {}", next);
        assert!(velocity > 0.0);

        let mut velocity = 0.0;
        let next = smooth_damp_angle(10.0, 350.0, &mut velocity, 0.1, 0.02);
        assert!(next < 10.0, "expected to turn toward 0, got {}", next);
        assert!(velocity < 0.0);
    }

    proptest! {
        #[test]
        fn prop_delta_angle_in_half_open_range(a in -1000.0f32..1000.0, b in -1000.0f32..1000.0) {
            let d = delta_angle(a, b);
            prop_assert!(d > -180.0 - 1e-3 && d <= 180.0 + 1e-3);
        }

        #[test]
        fn prop_normalize_in_range(a in -10_000.0f32..10_000.0) {
            let n = normalize_degrees(a);
            prop_assert!((0.0..360.0).contains(&n));
        }

        #[test]
        fn prop_smooth_damp_angle_converges(start in 0.0f32..360.0, target in -360.0f32..720.0) {
            let mut velocity = 0.0;
            let mut yaw = start;
            for _ in 0..500 {
                yaw = normalize_degrees(smooth_damp_angle(yaw, target, &mut velocity, 0.1, 0.02));
            }
            prop_assert!(delta_angle(yaw, target).abs() < 0.01);
        }
    }
}
