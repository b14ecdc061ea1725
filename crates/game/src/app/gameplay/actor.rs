use std::collections::VecDeque;
use std::f32::consts::TAU;

use hexwalk_engine::{Hex, Layout, OriginShift, Vec2};
use tracing::debug;

const IDLE_BOB_AMPLITUDE_PX: f32 = 1.5;
const IDLE_BOB_CYCLES_PER_TICK: f32 = 0.0125;
const WALK_BOB_AMPLITUDE_PX: f32 = 4.0;
const WALK_BOB_CYCLES_PER_TICK: f32 = 0.08;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MotionState {
    Idle,
    Moving,
}

impl MotionState {
    pub(crate) fn label(self) -> &'static str {
        match self {
            MotionState::Idle => "IDLE",
            MotionState::Moving => "MOVING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Facing {
    Left,
    Right,
}

/// Presentation-only walk cycle. Never feeds back into motion.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct Gait {
    phase: f32,
}

impl Gait {
    fn advance(&mut self, state: MotionState) {
        let step = match state {
            MotionState::Idle => IDLE_BOB_CYCLES_PER_TICK,
            MotionState::Moving => WALK_BOB_CYCLES_PER_TICK,
        };
        self.phase = (self.phase + step).fract();
    }

    #[cfg(test)]
    pub(crate) fn phase(&self) -> f32 {
        self.phase
    }

    /// Vertical offset in pixels; negative lifts the marker.
    pub(crate) fn bob_offset_px(&self, state: MotionState) -> f32 {
        let amplitude = match state {
            MotionState::Idle => IDLE_BOB_AMPLITUDE_PX,
            MotionState::Moving => WALK_BOB_AMPLITUDE_PX,
        };
        -(self.phase * TAU).sin().abs() * amplitude
    }
}

/// The single on-grid walker. Consumes pixel waypoints front to back, `speed` pixels per tick.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Actor {
    position: Vec2,
    hex: Hex,
    state: MotionState,
    facing: Facing,
    speed: f32,
    route: VecDeque<Vec2>,
    gait: Gait,
}

impl Actor {
    pub(crate) fn spawn(hex: Hex, layout: &Layout, speed: f32) -> Self {
        Self {
            position: layout.hex_to_pixel(&hex),
            hex,
            state: MotionState::Idle,
            facing: Facing::Right,
            speed,
            route: VecDeque::new(),
            gait: Gait::default(),
        }
    }

    pub(crate) fn position(&self) -> Vec2 {
        self.position
    }

    pub(crate) fn hex(&self) -> Hex {
        self.hex
    }

    pub(crate) fn state(&self) -> MotionState {
        self.state
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.state == MotionState::Idle
    }

    pub(crate) fn facing(&self) -> Facing {
        self.facing
    }

    pub(crate) fn speed(&self) -> f32 {
        self.speed
    }

    pub(crate) fn gait(&self) -> Gait {
        self.gait
    }

    pub(crate) fn route(&self) -> impl Iterator<Item = &Vec2> {
        self.route.iter()
    }

    pub(crate) fn remaining_waypoints(&self) -> usize {
        self.route.len()
    }

    pub(crate) fn is_at(&self, hex: &Hex) -> bool {
        self.hex == *hex
    }

    /// Starts walking `waypoints`. Refused while already moving or when there is nothing to walk.
    pub(crate) fn begin_route(&mut self, waypoints: impl IntoIterator<Item = Vec2>) -> bool {
        if self.state == MotionState::Moving {
            return false;
        }
        let route: VecDeque<Vec2> = waypoints.into_iter().collect();
        if route.is_empty() {
            return false;
        }
        self.route = route;
        self.state = MotionState::Moving;
        true
    }

    /// One fixed tick of motion.
    pub(crate) fn update(&mut self, layout: &Layout) {
        if self.state == MotionState::Moving {
            self.step_toward_front(layout);
        }
        self.gait.advance(self.state);
    }

    fn step_toward_front(&mut self, layout: &Layout) {
        let Some(goal) = self.route.front().copied() else {
            self.state = MotionState::Idle;
            return;
        };

        let dx = goal.x - self.position.x;
        let dy = goal.y - self.position.y;
        if dx > 0.0 {
            self.facing = Facing::Right;
        } else if dx < 0.0 {
            self.facing = Facing::Left;
        }

        let distance = dx.hypot(dy);
        if distance < self.speed {
            self.position = goal;
            self.route.pop_front();
        } else {
            let inv_distance = distance.recip();
            self.position = Vec2::new(
                self.position.x + dx * inv_distance * self.speed,
                self.position.y + dy * inv_distance * self.speed,
            );
        }
        self.hex = layout.pixel_to_hex(self.position);

        if self.route.is_empty() {
            self.state = MotionState::Idle;
            debug!(q = self.hex.q(), r = self.hex.r(), "actor_arrived");
        }
    }

    /// Re-expresses position and queued waypoints against a moved layout origin.
    pub(crate) fn rebase(&mut self, shift: OriginShift) {
        if shift.is_identity() {
            return;
        }
        self.position = shift.rebase(self.position);
        for waypoint in &mut self.route {
            *waypoint = shift.rebase(*waypoint);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin_layout() -> Layout {
        Layout::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 50.0))
    }

    #[test]
    fn spawn_is_idle_at_hex_center() {
        let layout = origin_layout();
        let hex = Hex::axial(1, 0);
        let actor = Actor::spawn(hex, &layout, 5.0);

        assert_eq!(actor.state(), MotionState::Idle);
        assert_eq!(actor.position(), layout.hex_to_pixel(&hex));
        assert!(actor.is_at(&hex));
        assert_eq!(actor.remaining_waypoints(), 0);
    }

    #[test]
    fn short_hop_snaps_and_goes_idle_in_same_update() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        assert!(actor.begin_route([Vec2::new(3.0, 0.0)]));

        actor.update(&layout);

        assert_eq!(actor.position(), Vec2::new(3.0, 0.0));
        assert_eq!(actor.state(), MotionState::Idle);
        assert_eq!(actor.remaining_waypoints(), 0);
    }

    #[test]
    fn long_hop_advances_by_speed_and_keeps_moving() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        assert!(actor.begin_route([Vec2::new(20.0, 0.0)]));

        actor.update(&layout);

        assert_eq!(actor.position(), Vec2::new(5.0, 0.0));
        assert_eq!(actor.state(), MotionState::Moving);
        assert_eq!(actor.remaining_waypoints(), 1);
        assert_eq!(actor.facing(), Facing::Right);
    }

    #[test]
    fn facing_follows_horizontal_direction_only() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        actor.begin_route([Vec2::new(-50.0, 0.0)]);
        actor.update(&layout);
        assert_eq!(actor.facing(), Facing::Left);

        let mut vertical = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        vertical.begin_route([Vec2::new(-3.0, 0.0), Vec2::new(-3.0, 80.0)]);
        vertical.update(&layout);
        assert_eq!(vertical.position(), Vec2::new(-3.0, 0.0));
        assert_eq!(vertical.state(), MotionState::Moving);

        vertical.update(&layout);
        assert_eq!(vertical.position(), Vec2::new(-3.0, 5.0));
        assert_eq!(vertical.facing(), Facing::Left);
    }

    #[test]
    fn walking_a_path_ends_on_goal_hex() {
        let layout = origin_layout();
        let start = Hex::axial(0, 0);
        let goal = Hex::axial(2, -1);
        let mut actor = Actor::spawn(start, &layout, 7.0);
        let waypoints = [
            layout.hex_to_pixel(&Hex::axial(1, 0)),
            layout.hex_to_pixel(&goal),
        ];
        assert!(actor.begin_route(waypoints));

        let mut ticks = 0;
        while !actor.is_idle() {
            actor.update(&layout);
            ticks += 1;
            assert!(ticks < 1_000, "actor never arrived");
        }

        assert_eq!(actor.position(), layout.hex_to_pixel(&goal));
        assert!(actor.is_at(&goal));
    }

    #[test]
    fn hex_is_resynced_mid_route() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 150.0);
        let far = layout.hex_to_pixel(&Hex::axial(3, 0));
        actor.begin_route([far]);

        actor.update(&layout);

        assert_eq!(actor.hex(), layout.pixel_to_hex(actor.position()));
        assert_eq!(actor.hex(), Hex::axial(1, 0));
    }

    #[test]
    fn begin_route_is_refused_while_moving_or_empty() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);

        assert!(!actor.begin_route(std::iter::empty()));
        assert!(actor.is_idle());

        assert!(actor.begin_route([Vec2::new(100.0, 0.0)]));
        assert!(!actor.begin_route([Vec2::new(-100.0, 0.0)]));
        assert_eq!(actor.route().copied().collect::<Vec<_>>(), [Vec2::new(100.0, 0.0)]);
    }

    #[test]
    fn rebase_shifts_position_and_queue() {
        let mut layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        actor.begin_route([Vec2::new(100.0, 0.0), Vec2::new(200.0, 0.0)]);

        let shift = layout.recenter(Vec2::new(10.0, 20.0));
        actor.rebase(shift);

        assert_eq!(actor.position(), Vec2::new(10.0, 20.0));
        assert_eq!(
            actor.route().copied().collect::<Vec<_>>(),
            [Vec2::new(110.0, 20.0), Vec2::new(210.0, 20.0)]
        );
        assert!(actor.is_at(&Hex::axial(0, 0)));
    }

    #[test]
    fn gait_advances_every_tick_in_any_state() {
        let layout = origin_layout();
        let mut actor = Actor::spawn(Hex::axial(0, 0), &layout, 5.0);
        actor.update(&layout);
        assert!((actor.gait().phase() - IDLE_BOB_CYCLES_PER_TICK).abs() < 1e-6);

        actor.begin_route([Vec2::new(100.0, 0.0)]);
        actor.update(&layout);
        let expected = IDLE_BOB_CYCLES_PER_TICK + WALK_BOB_CYCLES_PER_TICK;
        assert!((actor.gait().phase() - expected).abs() < 1e-6);
        assert!(actor.gait().bob_offset_px(actor.state()) <= 0.0);
    }
}
