//! The block activity state machine: Idle → Seeking → Executing → Idle.
//!
//! One implementation serves both idle mischief (free scanning for hiding
//! spots, grief targets, and things to fiddle with) and door breaching (doors
//! found on the current path). The difference lives in the
//! [`TargetingStrategy`].

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, trace, warn};

use mischief_world::BlockRegistry;

use super::activity::{ActivityKind, ActivitySet, ActivityState, Candidate, ScanSession};
use super::classifier::ActivityClassifier;
use super::destruction::{DestructionModel, DestructionProgress, DigStep};
use super::goal::{ControlFlags, Goal, GoalContext};
use super::scanner::TargetScanner;
use super::sight::{SightOutcome, SightTracer};
use super::targeting::{AcquireContext, FreeScan, PathLookahead, TargetingStrategy};
use crate::config::ActivityConfig;

/// Squared distance from the body center under which hiding, fiddling, and
/// door breaking skip the sight check.
const ADJACENT_DIST_SQ: f32 = 4.0;
/// Consecutive failed interactions before fiddling is turned off for good.
const MAX_FIDDLE_FAILURES: u32 = 3;
const EXPLOSION_RADIUS: f32 = 3.0;

/// Tunables copied out of [`ActivityConfig`].
#[derive(Debug, Clone)]
pub struct MachineSettings {
    pub give_up_ticks: u32,
    pub move_speed: f32,
    pub sight_interval: u32,
    pub fiddle_cooldown_min: u32,
    pub fiddle_cooldown_max: u32,
    pub explosive_mobs: bool,
}

impl MachineSettings {
    pub fn from_config(config: &ActivityConfig) -> Self {
        Self {
            give_up_ticks: config.idle.give_up_ticks,
            move_speed: config.idle.move_speed,
            sight_interval: config.idle.sight_interval,
            fiddle_cooldown_min: config.fiddle.cooldown_min,
            fiddle_cooldown_max: config.fiddle.cooldown_max.max(config.fiddle.cooldown_min),
            explosive_mobs: config.grief.explosive_mobs,
        }
    }
}

#[derive(Debug)]
pub struct ActivityStateMachine<S> {
    priority: u32,
    strategy: S,
    classifier: Arc<ActivityClassifier>,
    enabled: ActivitySet,
    state: ActivityState,
    session: ScanSession,
    progress: DestructionProgress,
    grief: DestructionModel,
    door: DestructionModel,
    sight: SightTracer,
    settings: MachineSettings,
    fiddle_failures: u32,
    rng: StdRng,
}

impl ActivityStateMachine<FreeScan> {
    /// Idle mischief: hiding, griefing, and fiddling found by scanning.
    pub fn idle(
        priority: u32,
        config: &ActivityConfig,
        classifier: Arc<ActivityClassifier>,
        registry: &BlockRegistry,
    ) -> Self {
        let mut enabled = ActivitySet::empty();
        enabled.set(ActivitySet::HIDING, config.hide.enabled);
        enabled.set(ActivitySet::GRIEFING, config.grief.enabled);
        enabled.set(ActivitySet::FIDDLING, config.fiddle.enabled);
        let scan = FreeScan::new(TargetScanner::from_config(&config.scan), config.scan.interval);
        Self::new(priority, scan, enabled, config, classifier, registry)
    }
}

impl ActivityStateMachine<PathLookahead> {
    /// Breaking closed doors that block the current path.
    pub fn door_breaching(
        priority: u32,
        config: &ActivityConfig,
        classifier: Arc<ActivityClassifier>,
        registry: &BlockRegistry,
    ) -> Self {
        let mut enabled = ActivitySet::empty();
        enabled.set(ActivitySet::BREAKING_DOOR, config.door_breaking.enabled);
        Self::new(
            priority,
            PathLookahead::new(),
            enabled,
            config,
            classifier,
            registry,
        )
    }
}

impl<S: TargetingStrategy> ActivityStateMachine<S> {
    pub fn new(
        priority: u32,
        strategy: S,
        enabled: ActivitySet,
        config: &ActivityConfig,
        classifier: Arc<ActivityClassifier>,
        registry: &BlockRegistry,
    ) -> Self {
        Self {
            priority,
            strategy,
            classifier,
            enabled,
            state: ActivityState::Idle,
            session: ScanSession::default(),
            progress: DestructionProgress::new(),
            grief: DestructionModel::new(
                config.grief.break_speed,
                DestructionModel::GRIEF_HIT_CADENCE,
                config.grief.leave_drops,
                registry,
            ),
            door: DestructionModel::new(
                config.door_breaking.break_speed,
                DestructionModel::DOOR_HIT_CADENCE,
                config.door_breaking.leave_drops,
                registry,
            ),
            sight: SightTracer::new(config.idle.reach),
            settings: MachineSettings::from_config(config),
            fiddle_failures: 0,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic random source, for reproducible simulations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn state(&self) -> &ActivityState {
        &self.state
    }

    pub fn enabled(&self) -> ActivitySet {
        self.enabled
    }

    pub fn progress(&self) -> &DestructionProgress {
        &self.progress
    }

    /// Activities that may be picked this tick.
    fn available(&self) -> ActivitySet {
        let mut set = self.enabled;
        if self.session.fiddle_cooldown > 0 {
            set.remove(ActivitySet::FIDDLING);
        }
        set
    }

    /// Drop the candidate, clearing any crack overlay it still shows.
    fn release(&mut self, ctx: &mut GoalContext<'_>) {
        if let Some(candidate) = self.state.candidate() {
            if self.progress.is_started() {
                ctx.effects
                    .report_break_progress(ctx.agent.id, candidate.pos, -1);
            }
        }
        self.progress.reset();
        self.session.abandon();
        self.state = ActivityState::Idle;
    }

    fn abandon(&mut self, ctx: &mut GoalContext<'_>, reason: &str) {
        if let Some(candidate) = self.state.candidate() {
            debug!(
                "Mob {} stopped {} at {}: {reason}",
                ctx.agent.id, candidate.activity, candidate.pos
            );
        }
        self.release(ctx);
    }

    fn complete(&mut self, ctx: &mut GoalContext<'_>, candidate: &Candidate) {
        debug!(
            "Mob {} finished {} at {}",
            ctx.agent.id, candidate.activity, candidate.pos
        );
        self.release(ctx);
    }

    fn tick_seeking(&mut self, ctx: &mut GoalContext<'_>, candidate: Candidate) {
        let adjacent =
            candidate.pos.center_distance_sq(&ctx.agent.body_center()) <= ADJACENT_DIST_SQ;
        if adjacent && candidate.activity != ActivityKind::Griefing {
            self.begin_executing(ctx, candidate);
            return;
        }

        if self.session.sight_cooldown > 0 {
            self.session.sight_cooldown -= 1;
        } else {
            self.session.sight_cooldown = self.settings.sight_interval;
            let mut target = candidate;
            let outcome = self
                .sight
                .check(&*ctx.level, ctx.agent, &mut target, &self.classifier);
            if let SightOutcome::Reachable(pos) = outcome {
                if pos != candidate.pos {
                    debug!(
                        "Mob {} retargeted {} from {} to {pos}",
                        ctx.agent.id, candidate.activity, candidate.pos
                    );
                }
                self.begin_executing(ctx, target);
                return;
            }
        }

        if !self.strategy.steers() {
            return;
        }
        if self.session.path_cooldown > 0 {
            self.session.path_cooldown -= 1;
        } else if !ctx.nav.is_path_active() {
            self.session.path_cooldown = self.rng.gen_range(12..=13);
            if !ctx.nav.path_to(candidate.pos, self.settings.move_speed) {
                trace!("Mob {} found no path to {}", ctx.agent.id, candidate.pos);
            }
        }
    }

    fn begin_executing(&mut self, ctx: &mut GoalContext<'_>, candidate: Candidate) {
        if self.strategy.steers() {
            ctx.nav.stop();
        }
        self.state = ActivityState::Executing(candidate);
    }

    fn tick_executing(&mut self, ctx: &mut GoalContext<'_>, candidate: Candidate) {
        match candidate.activity {
            ActivityKind::Griefing => {
                if !self.sight.in_reach(ctx.agent, candidate.pos) {
                    // Knocked out of reach: walk back, keep the damage done so far.
                    self.state = ActivityState::Seeking(candidate);
                    return;
                }
                if ctx.agent.explosive && self.settings.explosive_mobs {
                    let center = ctx.agent.position;
                    let destroyed = ctx.level.detonate(ctx.agent.id, center, EXPLOSION_RADIUS);
                    ctx.effects.agent_exploded(ctx.agent.id, center);
                    debug!(
                        "Mob {} exploded near {}, {destroyed} blocks destroyed",
                        ctx.agent.id, candidate.pos
                    );
                    self.complete(ctx, &candidate);
                    return;
                }
                if self.grief.tick(&mut self.progress, ctx, &candidate) == DigStep::Completed {
                    self.complete(ctx, &candidate);
                }
            }
            ActivityKind::BreakingDoor => {
                if self.door.tick(&mut self.progress, ctx, &candidate) == DigStep::Completed {
                    self.complete(ctx, &candidate);
                }
            }
            ActivityKind::Fiddling => self.fiddle(ctx, candidate),
            ActivityKind::Hiding => match ctx.level.hide_agent(candidate.pos, ctx.agent.id) {
                Ok(()) => {
                    ctx.effects.agent_hidden(ctx.agent.id, candidate.pos);
                    self.complete(ctx, &candidate);
                }
                Err(e) => {
                    warn!("Mob {} could not hide: {e}", ctx.agent.id);
                    self.abandon(ctx, "hiding failed");
                }
            },
        }
    }

    fn fiddle(&mut self, ctx: &mut GoalContext<'_>, candidate: Candidate) {
        match ctx.level.use_block(candidate.pos, ctx.agent.id) {
            Ok(_) => {
                ctx.effects.swing_and_hit(ctx.agent.id, candidate.pos, candidate.snapshot);
                ctx.effects.interaction_particles(ctx.agent.id, candidate.pos);
                self.fiddle_failures = 0;
                self.session.fiddle_cooldown = self
                    .rng
                    .gen_range(self.settings.fiddle_cooldown_min..=self.settings.fiddle_cooldown_max);
                self.complete(ctx, &candidate);
            }
            Err(e) => {
                self.fiddle_failures += 1;
                warn!(
                    "Mob {} failed to use block at {} ({}/{MAX_FIDDLE_FAILURES}): {e}",
                    ctx.agent.id, candidate.pos, self.fiddle_failures
                );
                if self.fiddle_failures >= MAX_FIDDLE_FAILURES {
                    error!(
                        "Mob {} keeps failing to use blocks, fiddling disabled",
                        ctx.agent.id
                    );
                    self.enabled.remove(ActivitySet::FIDDLING);
                }
                self.abandon(ctx, "interaction failed");
            }
        }
    }
}

impl<S: TargetingStrategy> Goal for ActivityStateMachine<S> {
    fn priority(&self) -> u32 {
        self.priority
    }

    fn control_flags(&self) -> ControlFlags {
        ControlFlags::MOVE | ControlFlags::LOOK
    }

    fn overrides_control_flags(&self) -> Option<ControlFlags> {
        self.strategy.overrides_control_flags()
    }

    fn can_start(&mut self, ctx: &mut GoalContext<'_>) -> bool {
        self.session.tick_cooldowns();
        let available = self.available();
        if available.is_empty() {
            return false;
        }
        let found = self.strategy.acquire(
            ctx,
            AcquireContext {
                classifier: &self.classifier,
                enabled: available,
                rng: &mut self.rng,
            },
        );
        match found {
            Some(candidate) => {
                self.state = ActivityState::Seeking(candidate);
                true
            }
            None => false,
        }
    }

    fn should_continue(&self, ctx: &GoalContext<'_>) -> bool {
        let Some(candidate) = self.state.candidate() else {
            return false;
        };
        candidate.is_valid(&*ctx.level)
            && self.session.give_up_ticks <= self.settings.give_up_ticks
            && !self.strategy.is_finished(ctx.agent, candidate)
            && self.strategy.still_applies(&*ctx.level, ctx.agent, candidate)
    }

    /// A half-broken grief target holds the goal, even while walking back to it.
    fn is_interruptible(&self) -> bool {
        let griefing = self
            .state
            .candidate()
            .is_some_and(|c| c.activity == ActivityKind::Griefing);
        !(griefing && self.progress.is_started())
    }

    fn start(&mut self, ctx: &mut GoalContext<'_>) {
        self.session.abandon();
        self.progress.reset();
        let Some(candidate) = self.state.candidate().copied() else {
            return;
        };
        debug!(
            "Mob {} going for {} at {} ({})",
            ctx.agent.id,
            candidate.activity,
            candidate.pos,
            candidate.snapshot.info().name
        );
        self.strategy.on_start(ctx.agent, &candidate);
        if self.strategy.steers() {
            self.session.path_cooldown = self.rng.gen_range(12..=13);
            ctx.nav.path_to(candidate.pos, self.settings.move_speed);
        }
    }

    fn tick(&mut self, ctx: &mut GoalContext<'_>) {
        self.session.tick_cooldowns();
        let Some(candidate) = self.state.candidate().copied() else {
            return;
        };
        if !candidate.is_valid(&*ctx.level) {
            self.abandon(ctx, "target changed");
            return;
        }
        self.session.give_up_ticks += 1;
        if self.session.give_up_ticks > self.settings.give_up_ticks {
            self.abandon(ctx, "gave up");
            return;
        }
        if self.strategy.is_finished(ctx.agent, &candidate) {
            self.complete(ctx, &candidate);
            return;
        }
        if !self.strategy.still_applies(&*ctx.level, ctx.agent, &candidate) {
            self.abandon(ctx, "no longer applies");
            return;
        }

        ctx.nav.look_at(candidate.pos.center());
        match self.state {
            ActivityState::Seeking(c) => self.tick_seeking(ctx, c),
            ActivityState::Executing(c) => self.tick_executing(ctx, c),
            ActivityState::Idle => {}
        }
    }

    fn stop(&mut self, ctx: &mut GoalContext<'_>) {
        if self.strategy.steers() && !self.state.is_idle() {
            ctx.nav.stop();
        }
        self.release(ctx);
    }
}
