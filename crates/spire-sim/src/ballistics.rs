//! Aiming and steering math for tower projectiles.
//!
//! Provides the distance-scaled launch angle, iterative lead prediction for
//! arcing shots, launch velocities, and the homing steer force. All functions
//! are pure; callers own the bodies.

use glam::DVec3;

use spire_core::constants::*;
use spire_core::types::Planar;

/// Below this horizontal launch speed the flight time estimate is meaningless.
const MIN_HORIZONTAL_SPEED: f64 = 0.1;
/// Flight time assumed when the horizontal estimate is meaningless.
const FALLBACK_FLIGHT_SECS: f64 = 1.0;

/// Launch elevation for a target `horizontal_distance` away.
///
/// Interpolates linearly from `angle_min` at the foot of the tower to
/// `angle_max` at `LAUNCH_ANGLE_FULL_RANGE` and beyond.
pub fn launch_angle(horizontal_distance: f64, angle_min: f64, angle_max: f64) -> f64 {
    let factor = (horizontal_distance / LAUNCH_ANGLE_FULL_RANGE).clamp(0.0, 1.0);
    angle_min + (angle_max - angle_min) * factor
}

/// Flight time to reach the aim height, from the vertical launch speed.
///
/// Solves `dy = vy*t - g*t²/2` for the later root, where `dy` is the aim
/// height relative to the muzzle. Falls back to `fallback` when the shot
/// never climbs.
fn vertical_flight_time(vy: f64, dy: f64, gravity: f64, fallback: f64) -> f64 {
    if vy <= 0.0 || gravity <= 0.0 {
        return fallback;
    }
    let disc = (vy * vy - 2.0 * gravity * dy).max(0.0);
    (vy + disc.sqrt()) / gravity
}

/// Predict where a ground target will be when an arcing shot arrives.
///
/// Runs `LEAD_ITERATIONS` refinements: estimate the flight time from the
/// current guess, move the target along its horizontal velocity for that
/// long, repeat. The returned point keeps the target's current height.
pub fn predict_intercept(
    origin: DVec3,
    target_position: DVec3,
    target_velocity: DVec3,
    speed: f64,
    angle: f64,
    gravity: f64,
) -> DVec3 {
    let mut predicted = target_position;

    for _ in 0..LEAD_ITERATIONS {
        let horizontal = origin.horizontal_distance(predicted);
        let horizontal_speed = angle.cos() * speed;
        let t_horizontal = if horizontal_speed > MIN_HORIZONTAL_SPEED {
            horizontal / horizontal_speed
        } else {
            FALLBACK_FLIGHT_SECS
        };

        let dy = target_position.y + AIM_HEIGHT_OFFSET - origin.y;
        let t_vertical = vertical_flight_time(angle.sin() * speed, dy, gravity, t_horizontal);
        let t = t_horizontal.min(t_vertical);

        predicted = DVec3::new(
            target_position.x + target_velocity.x * t,
            target_position.y,
            target_position.z + target_velocity.z * t,
        );
    }

    predicted
}

/// Initial velocity for an arcing shot toward `aim`.
///
/// Horizontal speed is `cos(angle) * speed` along the ground direction to the
/// aim point; if the aim point is practically straight below, the shot goes
/// straight up instead.
pub fn ballistic_launch_velocity(origin: DVec3, aim: DVec3, speed: f64, angle: f64) -> DVec3 {
    let offset = (aim - origin).flat();
    let distance = offset.length();
    let horizontal = if distance > MIN_STEER_DISTANCE {
        offset / distance * angle.cos() * speed
    } else {
        DVec3::ZERO
    };
    horizontal + DVec3::Y * angle.sin() * speed
}

/// Initial velocity for a homing bolt: a lazy lob toward the target that
/// the steering takes over from.
pub fn homing_launch_velocity(
    origin: DVec3,
    target: DVec3,
    max_speed: f64,
    horizontal_frac: f64,
    up_frac: f64,
) -> DVec3 {
    let offset = (target - origin).flat();
    let distance = offset.length();
    let dir = if distance > 0.0 {
        offset / distance
    } else {
        DVec3::ZERO
    };
    dir * max_speed * horizontal_frac + DVec3::Y * max_speed * up_frac
}

/// Steering force pulling a homing body at `position` toward `aim`.
/// `None` when already on top of it.
pub fn homing_steer_force(position: DVec3, aim: DVec3, steer_force: f64) -> Option<DVec3> {
    let offset = aim - position;
    let distance = offset.length();
    if distance < MIN_STEER_DISTANCE {
        return None;
    }
    Some(offset / distance * steer_force)
}

/// Scale `velocity` down to `max_speed` if it is faster.
pub fn clamp_speed(velocity: DVec3, max_speed: f64) -> DVec3 {
    let speed = velocity.length();
    if speed > max_speed && speed > 0.0 {
        velocity * (max_speed / speed)
    } else {
        velocity
    }
}

/// Scale the horizontal part of `velocity` down to `max_speed`, leaving the
/// vertical part alone so walkers still fall and bounce.
pub fn clamp_horizontal_speed(velocity: DVec3, max_speed: f64) -> DVec3 {
    let speed = velocity.horizontal_length();
    if speed > max_speed && speed > 0.0 {
        let scale = max_speed / speed;
        DVec3::new(velocity.x * scale, velocity.y, velocity.z * scale)
    } else {
        velocity
    }
}
