//! Waypoint following and the idle/moving state machine.
//!
//! Algorithm, one call per tick while moving:
//! 1. Path exhausted → go idle, report completion
//! 2. Target = current waypoint (height pinned to cruise altitude for flyers)
//! 3. Within [`ARRIVAL_EPSILON`] → advance the cursor; the unit does not move
//!    this tick, so arrival and the final approach are separate ticks
//! 4. Otherwise step `speed * dt` toward the target, clamped so it never
//!    overshoots, and turn to face the target on the ground plane
//! 5. Cursor past the last waypoint → go idle, report completion

use serde::{Deserialize, Serialize};

use crate::capability::Movable;
use crate::vector::Vec3;

/// Distance (world units) under which a waypoint counts as reached.
pub const ARRIVAL_EPSILON: f32 = 0.2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveState {
    #[default]
    Idle,
    Moving,
}

/// What a single [`Movable::advance`] call did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Advance {
    /// Not moving; nothing happened.
    Idle,
    /// Moved toward the current waypoint.
    Stepped { remaining: f32 },
    /// Reached waypoint `index`; more waypoints follow.
    Reached { index: usize },
    /// The path is finished and the unit is idle.
    Completed,
}

/// Path-following state for a mobile unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathFollower {
    state: MoveState,
    path: Vec<Vec3>,
    waypoint_index: usize,
    speed: f32,
}

impl PathFollower {
    pub fn new(speed: f32) -> Self {
        Self {
            state: MoveState::Idle,
            path: Vec::new(),
            waypoint_index: 0,
            speed,
        }
    }

    pub fn path(&self) -> &[Vec3] {
        &self.path
    }

    pub fn waypoint_index(&self) -> usize {
        self.waypoint_index
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// The waypoint currently being approached, if any.
    pub fn current_target(&self) -> Option<Vec3> {
        self.path.get(self.waypoint_index).copied()
    }

    fn finish(&mut self) -> Advance {
        self.path.clear();
        self.waypoint_index = 0;
        self.state = MoveState::Idle;
        Advance::Completed
    }
}

impl Movable for PathFollower {
    fn set_path(&mut self, waypoints: Vec<Vec3>) {
        if waypoints.is_empty() {
            self.path.clear();
            self.waypoint_index = 0;
            self.state = MoveState::Idle;
        } else {
            self.path = waypoints;
            self.waypoint_index = 0;
            self.state = MoveState::Moving;
        }
    }

    fn advance(
        &mut self,
        position: &mut Vec3,
        heading: &mut f32,
        dt: f32,
        altitude: Option<f32>,
    ) -> Advance {
        if self.state == MoveState::Idle {
            return Advance::Idle;
        }

        let Some(mut target) = self.current_target() else {
            return self.finish();
        };
        if let Some(altitude) = altitude {
            target.y = altitude;
        }

        let distance = position.distance(&target);
        if distance < ARRIVAL_EPSILON {
            self.waypoint_index += 1;
            if self.waypoint_index >= self.path.len() {
                return self.finish();
            }
            return Advance::Reached {
                index: self.waypoint_index - 1,
            };
        }

        let direction = (target - *position).normalize();
        let step = (self.speed * dt).clamp(0.0, distance);
        *position += direction * step;
        if let Some(yaw) = position.yaw_towards(&target) {
            *heading = yaw;
        }

        Advance::Stepped {
            remaining: distance - step,
        }
    }

    fn state(&self) -> MoveState {
        self.state
    }
}

/// Idle hover animation for airborne units.
///
/// The phase accumulates across every idle tick for the unit's lifetime;
/// starting or finishing a path does not reset it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Hover {
    phase: f32,
    pub base_height: f32,
    pub frequency: f32,
    pub amplitude: f32,
}

impl Hover {
    pub fn new(base_height: f32, frequency: f32, amplitude: f32) -> Self {
        Self {
            phase: 0.0,
            base_height,
            frequency,
            amplitude,
        }
    }

    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Accumulate `dt` and return the bobbing height for this tick.
    pub fn tick(&mut self, dt: f32) -> f32 {
        self.phase += dt;
        self.base_height + (self.phase * self.frequency).sin() * self.amplitude
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_point_path() -> Vec<Vec3> {
        vec![Vec3::new(10.0, 0.0, 0.0), Vec3::new(10.0, 0.0, 10.0)]
    }

    #[test]
    fn test_set_path_starts_moving() {
        let mut mover = PathFollower::new(4.0);
        mover.set_path(two_point_path());
        assert_eq!(mover.state(), MoveState::Moving);
        assert_eq!(mover.waypoint_index(), 0);
        assert_eq!(mover.path().len(), 2);
    }

    #[test]
    fn test_empty_path_stops_immediately() {
        let mut mover = PathFollower::new(4.0);
        mover.set_path(two_point_path());
        mover.set_path(Vec::new());
        assert_eq!(mover.state(), MoveState::Idle);
        assert!(mover.path().is_empty());
    }

    #[test]
    fn test_step_moves_closer_without_overshoot() {
        let mut mover = PathFollower::new(4.0);
        mover.set_path(two_point_path());
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;

        let result = mover.advance(&mut pos, &mut heading, 0.5, None);
        assert!(matches!(result, Advance::Stepped { .. }));
        assert!((pos.x - 2.0).abs() < 1e-5);

        // Huge dt: clamped to the waypoint, not past it
        mover.advance(&mut pos, &mut heading, 100.0, None);
        assert!((pos.x - 10.0).abs() < 1e-4);
        assert_eq!(mover.waypoint_index(), 0);
    }

    #[test]
    fn test_heading_faces_target() {
        let mut mover = PathFollower::new(1.0);
        mover.set_path(vec![Vec3::new(5.0, 3.0, 0.0)]);
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;
        mover.advance(&mut pos, &mut heading, 0.1, None);
        assert!((heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_arrival_is_its_own_tick() {
        let mut mover = PathFollower::new(4.0);
        mover.set_path(two_point_path());
        let mut pos = Vec3::new(9.9, 0.0, 0.0);
        let mut heading = 0.0;

        let result = mover.advance(&mut pos, &mut heading, 0.016, None);
        assert_eq!(result, Advance::Reached { index: 0 });
        assert_eq!(mover.waypoint_index(), 1);
        assert_eq!(pos, Vec3::new(9.9, 0.0, 0.0));
    }

    #[test]
    fn test_last_waypoint_completes() {
        let mut mover = PathFollower::new(4.0);
        mover.set_path(vec![Vec3::new(1.0, 0.0, 0.0)]);
        let mut pos = Vec3::ZERO;
        let mut heading = 0.0;

        let mut completed = false;
        for _ in 0..100 {
            if mover.advance(&mut pos, &mut heading, 0.1, None) == Advance::Completed {
                completed = true;
                break;
            }
        }
        assert!(completed);
        assert_eq!(mover.state(), MoveState::Idle);
        assert!(mover.path().is_empty());
        assert_eq!(mover.advance(&mut pos, &mut heading, 0.1, None), Advance::Idle);
    }

    #[test]
    fn test_altitude_pins_target_height() {
        let mut mover = PathFollower::new(100.0);
        mover.set_path(vec![Vec3::new(0.0, 0.0, 5.0)]);
        let mut pos = Vec3::new(0.0, 8.0, 0.0);
        let mut heading = 0.0;
        mover.advance(&mut pos, &mut heading, 1.0, Some(8.0));
        assert!((pos.y - 8.0).abs() < 1e-5);
        assert!((pos.z - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_hover_phase_accumulates() {
        let mut hover = Hover::new(8.0, 8.0, 0.3);
        let y = hover.tick(0.1);
        assert!((hover.phase() - 0.1).abs() < 1e-6);
        assert!((y - (8.0 + (0.8f32).sin() * 0.3)).abs() < 1e-5);
        hover.tick(0.1);
        assert!((hover.phase() - 0.2).abs() < 1e-6);
        for _ in 0..1000 {
            let y = hover.tick(0.016);
            assert!(y >= 8.0 - 0.3 - 1e-5 && y <= 8.0 + 0.3 + 1e-5);
        }
    }
}
