/*!
Wall-run state machine.

A [`WallRunner`] rides alongside the stock character controller and owns everything specific to
one character's wall runs: the phase, the side, the live wall contact, the cooldown, and the
remembered rejected surface.

Entry points
- [`WallRunner::on_capsule_hit`]: collision callback; the only way into a run.
- [`WallRunner::tick`]: once per simulation tick; does nothing unless the character is in
  [`MovementMode::WallRunning`].
- [`WallRunner::set_movement_mode`]: mode changes made by the owner (landing, jumping off).
- [`WallRunner::wall_run_start`] / [`WallRunner::wall_run_stop`]: explicit requests, ignored
  when auto wall-running is enabled.

Phases
- `Idle`: not wall-running.
- `Initiating`: eased rotation onto the wall frame; no wall-following yet.
- `Running`: per tick, probe forward (inner corner), lateral (follow the wall), then backward
  from an offset (outer corner); fall off when all three miss.
- `CornerTurning`: eased motion around a corner; wall-following is suspended until it ends.

The two timed motions live inside their phase and are advanced by `tick`; their completion is
the transition to `Running`. Only `Running` can start a corner turn, so turns never overlap.
*/

use std::time::Duration;

use log::{debug, trace, warn};

use crate::{
    character::CharacterState,
    constants::{DIST_EPS, MIN_TICK_TIME},
    cooldown::Cooldown,
    corner::{CornerDecision, decide_corner_turn},
    motion::{Pose, TimedMotion},
    orientation::{WallRunFrame, interp_rotation_to},
    scanner::{WallScan, WallScanner, WorldQuery},
    settings::WallRunSettings,
    surface::{RejectionCache, SurfaceTags, can_start_wall_run},
    types::{
        Contact, CornerType, MovementMode, SurfaceId, Vec3, WallRunEvent, WallRunExit, WallRunSide,
    },
};

/// Observable phase of a [`WallRunner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WallRunState {
    Idle,
    Initiating,
    Running,
    CornerTurning,
}

#[derive(Clone, Copy, Debug)]
enum Phase {
    Idle,
    Initiating(TimedMotion),
    Running,
    CornerTurning(TimedMotion),
}

/// Per-character wall-run state machine.
#[derive(Clone, Debug)]
pub struct WallRunner {
    settings: WallRunSettings,
    phase: Phase,
    side: WallRunSide,
    contact: Option<Contact>,
    /// Distance from the wall plane to the capsule center kept while running.
    standoff: f32,
    /// Steering captured since the last tick.
    steering: Vec3,
    wants_to_wall_run: bool,
    cooldown: Cooldown,
    rejected: RejectionCache,
    events: Vec<WallRunEvent>,
}

impl Default for WallRunner {
    fn default() -> Self {
        Self::new(WallRunSettings::default())
    }
}

impl WallRunner {
    pub fn new(settings: WallRunSettings) -> Self {
        Self {
            settings,
            phase: Phase::Idle,
            side: WallRunSide::None,
            contact: None,
            standoff: 0.0,
            steering: Vec3::zeros(),
            wants_to_wall_run: false,
            cooldown: Cooldown::default(),
            rejected: RejectionCache::default(),
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &WallRunSettings {
        &self.settings
    }

    pub fn state(&self) -> WallRunState {
        match self.phase {
            Phase::Idle => WallRunState::Idle,
            Phase::Initiating(_) => WallRunState::Initiating,
            Phase::Running => WallRunState::Running,
            Phase::CornerTurning(_) => WallRunState::CornerTurning,
        }
    }

    /// Side of the current run; `None` outside a run.
    #[inline]
    pub fn side(&self) -> WallRunSide {
        self.side
    }

    /// Most recent wall contact of the current run.
    #[inline]
    pub fn contact(&self) -> Option<Contact> {
        self.contact
    }

    /// True once the initiation motion has completed.
    #[inline]
    pub fn is_initiated(&self) -> bool {
        matches!(self.phase, Phase::Running | Phase::CornerTurning(_))
    }

    #[inline]
    pub fn is_turning_around_corner(&self) -> bool {
        matches!(self.phase, Phase::CornerTurning(_))
    }

    #[inline]
    pub fn wants_to_wall_run(&self) -> bool {
        self.wants_to_wall_run
    }

    #[inline]
    pub fn is_cooldown_active(&self, now: Duration) -> bool {
        self.cooldown.is_active(now)
    }

    #[inline]
    pub fn cooldown_remaining(&self, now: Duration) -> Duration {
        self.cooldown.remaining(now)
    }

    #[inline]
    pub fn cooldown_deadline(&self) -> Option<Duration> {
        self.cooldown.deadline()
    }

    #[inline]
    pub fn last_rejected(&self) -> Option<SurfaceId> {
        self.rejected.last()
    }

    /// Take the notifications produced since the last drain, oldest first.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, WallRunEvent> {
        self.events.drain(..)
    }

    /// Request wall-running. Ignored with auto wall-run.
    pub fn wall_run_start(&mut self) {
        if self.settings.auto_wall_run {
            return;
        }
        self.wants_to_wall_run = true;
    }

    /// Withdraw the request and end any run in progress. Ignored with auto wall-run.
    pub fn wall_run_stop(&mut self, body: &mut CharacterState, now: Duration) {
        if self.settings.auto_wall_run {
            return;
        }
        self.wants_to_wall_run = false;

        if body.is_wall_running() {
            self.exit_to_falling(body, WallRunExit::Stopped, now);
        }
    }

    /// Route a world-space movement input.
    ///
    /// While wall-running the input is captured (replacing any earlier input this tick) for the
    /// corner decision and `None` is returned. Otherwise the input is handed back for the stock
    /// controller.
    pub fn add_input_vector(&mut self, body: &CharacterState, world_vector: Vec3) -> Option<Vec3> {
        if body.is_wall_running() {
            self.steering = world_vector;
            None
        } else {
            Some(world_vector)
        }
    }

    /// Whether a jump may be attempted. While wall-running, only once initiation completed;
    /// otherwise `stock_can_jump` decides.
    pub fn can_attempt_jump(&self, body: &CharacterState, stock_can_jump: bool) -> bool {
        if body.is_wall_running() {
            self.is_initiated()
        } else {
            stock_can_jump
        }
    }

    /// Whether `body` could start a wall run at `now` (surface aside).
    pub fn can_wall_run(&self, body: &CharacterState, now: Duration) -> bool {
        can_start_wall_run(
            body.mode,
            self.settings.auto_wall_run,
            self.wants_to_wall_run,
            self.cooldown.is_active(now),
        )
    }

    /// Collision callback from the owner's capsule.
    ///
    /// Starts a run when the character is eligible and the surface is wall-runnable. Surfaces that
    /// fail the capability check are remembered so a sustained contact is classified once.
    /// Returns true if a run started.
    pub fn on_capsule_hit<T: SurfaceTags + ?Sized>(
        &mut self,
        body: &mut CharacterState,
        tags: &T,
        contact: &Contact,
        now: Duration,
    ) -> bool {
        if self.rejected.contains(contact.surface) {
            return false;
        }
        if !self.can_wall_run(body, now) {
            return false;
        }
        if !self.is_steep_enough(body, contact.normal) {
            trace!("contact normal {:?} is too shallow for a wall", contact.normal);
            return false;
        }
        if !tags.is_wall_runnable(contact.surface) {
            trace!("surface {:?} is not wall-runnable", contact.surface);
            self.rejected.remember(contact.surface);
            return false;
        }

        self.begin_wall_run(body, contact)
    }

    /// Change the owner's movement mode.
    ///
    /// Leaving [`MovementMode::WallRunning`] this way ends the run and starts the cooldown.
    /// Entering it is refused: only an accepted contact starts a run.
    pub fn set_movement_mode(&mut self, body: &mut CharacterState, mode: MovementMode, now: Duration) {
        let previous = body.mode;
        if previous == mode {
            return;
        }
        if mode == MovementMode::WallRunning {
            warn!("ignoring request to enter wall-running without a wall contact");
            return;
        }

        body.mode = mode;
        if previous == MovementMode::WallRunning {
            self.finish_run(WallRunExit::ModeChanged, now);
        }
    }

    /// Per-tick update.
    ///
    /// `now` is the simulation clock used for the cooldown; `dt_seconds` advances the timed
    /// motions and scales wall-following. Captured steering is consumed by every call.
    pub fn tick<W: WorldQuery>(
        &mut self,
        body: &mut CharacterState,
        world: &W,
        now: Duration,
        dt_seconds: f32,
    ) {
        let steering = std::mem::take(&mut self.steering);

        if !body.is_wall_running() {
            // The mode was changed without going through `set_movement_mode`.
            if !matches!(self.phase, Phase::Idle) {
                self.finish_run(WallRunExit::ModeChanged, now);
            }
            return;
        }

        match self.phase {
            Phase::Idle => {
                warn!("wall-running mode without an active run; falling");
                self.exit_to_falling(body, WallRunExit::WallLost, now);
            }
            Phase::Initiating(_) | Phase::CornerTurning(_) => {
                self.advance_motion(body, dt_seconds);
            }
            Phase::Running => {
                if dt_seconds >= MIN_TICK_TIME {
                    self.follow_wall(body, world, steering, now, dt_seconds);
                }
            }
        }
    }

    /// Walls only: the contact normal may lean toward the character's up axis by at most
    /// `max_wall_normal_up_dot`. Edges and slopes fail without being remembered as rejected.
    fn is_steep_enough(&self, body: &CharacterState, normal: Vec3) -> bool {
        normal
            .try_normalize(DIST_EPS)
            .is_some_and(|n| n.dot(&body.up()).abs() <= self.settings.max_wall_normal_up_dot)
    }

    fn begin_wall_run(&mut self, body: &mut CharacterState, contact: &Contact) -> bool {
        let side = WallRunSide::from_contact(body.right(), contact.normal);
        let Some(frame) = WallRunFrame::solve(side, contact.normal, body.up()) else {
            trace!("contact normal {:?} gives no wall-run frame", contact.normal);
            return false;
        };

        let normal = contact.normal.normalize();
        self.standoff = (body.translation - contact.point)
            .dot(&normal)
            .max(body.capsule.radius);
        self.steering = Vec3::zeros();
        self.side = side;
        self.contact = Some(*contact);
        self.rejected.forget();

        let here = Pose {
            translation: body.translation,
            rotation: body.rotation,
        };
        let aligned = Pose {
            translation: body.translation,
            rotation: frame.rotation,
        };
        self.phase = Phase::Initiating(TimedMotion::new(
            here,
            aligned,
            self.settings.initiation_duration,
        ));
        body.mode = MovementMode::WallRunning;

        debug!("wall run started on {side:?} side of {:?}", contact.surface);
        self.events.push(WallRunEvent::Started { side });
        true
    }

    fn advance_motion(&mut self, body: &mut CharacterState, dt_seconds: f32) {
        let (motion, turning) = match &mut self.phase {
            Phase::Initiating(motion) => (motion, false),
            Phase::CornerTurning(motion) => (motion, true),
            Phase::Idle | Phase::Running => return,
        };

        let sample = motion.advance(dt_seconds);
        body.translation = sample.pose.translation;
        body.rotation = sample.pose.rotation;
        if !sample.finished {
            return;
        }

        self.phase = Phase::Running;
        if turning {
            debug!("corner turn complete");
            self.events.push(WallRunEvent::CornerTurnEnd);
        } else {
            debug!("wall run initiated");
            self.events.push(WallRunEvent::Initiated);
        }
    }

    fn follow_wall<W: WorldQuery>(
        &mut self,
        body: &mut CharacterState,
        world: &W,
        steering: Vec3,
        now: Duration,
        dt_seconds: f32,
    ) {
        let scanner = WallScanner::new(self.settings.wall_search_distance(body.capsule.radius));

        match scanner.scan(world, body, self.side) {
            WallScan::InnerCorner(contact) => {
                self.handle_corner(body, CornerType::Inner, contact, steering, now)
            }
            WallScan::Wall(contact) => self.run_along_wall(body, world, contact, now, dt_seconds),
            WallScan::OuterCorner(contact) => {
                self.handle_corner(body, CornerType::Outer, contact, steering, now)
            }
            WallScan::Lost => self.exit_to_falling(body, WallRunExit::WallLost, now),
        }
    }

    fn run_along_wall<W: WorldQuery>(
        &mut self,
        body: &mut CharacterState,
        world: &W,
        contact: Contact,
        now: Duration,
        dt_seconds: f32,
    ) {
        self.contact = Some(contact);
        let Some(frame) = WallRunFrame::solve(self.side, contact.normal, body.up()) else {
            self.exit_to_falling(body, WallRunExit::DegenerateContact, now);
            return;
        };

        // Hold the stand-off distance from the wall plane.
        let normal = contact.normal.normalize();
        let gap = (body.translation - contact.point).dot(&normal);
        let correction = normal * (self.standoff - gap);
        if correction.norm_squared() > DIST_EPS * DIST_EPS {
            body.translation = world.sweep_capsule(
                body.capsule,
                body.translation,
                body.rotation,
                correction,
                dt_seconds,
            );
        }

        let rotation = interp_rotation_to(
            body.rotation,
            frame.rotation,
            dt_seconds,
            self.settings.rotation_interp_speed,
        );
        body.velocity = body.forward() * self.settings.wall_run_speed;
        body.translation = world.sweep_capsule(
            body.capsule,
            body.translation,
            rotation,
            body.velocity * dt_seconds,
            dt_seconds,
        );
        body.rotation = rotation;
    }

    fn handle_corner(
        &mut self,
        body: &mut CharacterState,
        corner: CornerType,
        contact: Contact,
        steering: Vec3,
        now: Duration,
    ) {
        self.contact = Some(contact);
        let Some(frame) = WallRunFrame::solve(self.side, contact.normal, body.up()) else {
            self.exit_to_falling(body, WallRunExit::DegenerateContact, now);
            return;
        };

        match decide_corner_turn(corner, &contact, &frame, steering, body.capsule) {
            CornerDecision::Decline => {
                self.exit_to_falling(body, WallRunExit::DeclinedCorner, now);
            }
            CornerDecision::Turn(turn) => {
                debug!("turning {corner:?} corner toward {:?}", turn.direction);
                self.events.push(WallRunEvent::CornerTurnBegin {
                    direction: turn.direction,
                    corner,
                });

                self.standoff = body.capsule.radius;
                let here = Pose {
                    translation: body.translation,
                    rotation: body.rotation,
                };
                self.phase = Phase::CornerTurning(TimedMotion::new(
                    here,
                    turn.target,
                    self.settings.corner_turn_duration,
                ));
            }
        }
    }

    fn exit_to_falling(&mut self, body: &mut CharacterState, reason: WallRunExit, now: Duration) {
        body.mode = MovementMode::Falling;
        self.finish_run(reason, now);
    }

    /// Reset per-run state after the character left wall-running.
    fn finish_run(&mut self, reason: WallRunExit, now: Duration) {
        // An abandoned corner turn still reports its end so listeners can unwind.
        if matches!(self.phase, Phase::CornerTurning(_)) {
            self.events.push(WallRunEvent::CornerTurnEnd);
        }

        self.phase = Phase::Idle;
        self.side = WallRunSide::None;
        self.contact = None;
        self.standoff = 0.0;
        self.steering = Vec3::zeros();
        self.cooldown.start(now, self.settings.cooldown);

        debug!("wall run ended: {reason:?}");
        self.events.push(WallRunEvent::Ended { reason });
    }
}
