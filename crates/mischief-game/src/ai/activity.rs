//! Activity kinds, candidates, and per-mob scan bookkeeping.

use std::fmt;

use bitflags::bitflags;

use mischief_world::{BlockPos, BlockState, BlockView};

/// What a mob intends to do with its target block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    /// Crawl inside a block and wait there.
    Hiding,
    /// Break the block.
    Griefing,
    /// Right-click the block.
    Fiddling,
    /// Break a door that blocks the current path.
    BreakingDoor,
}

impl ActivityKind {
    pub fn flag(self) -> ActivitySet {
        match self {
            ActivityKind::Hiding => ActivitySet::HIDING,
            ActivityKind::Griefing => ActivitySet::GRIEFING,
            ActivityKind::Fiddling => ActivitySet::FIDDLING,
            ActivityKind::BreakingDoor => ActivitySet::BREAKING_DOOR,
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActivityKind::Hiding => "hiding",
            ActivityKind::Griefing => "griefing",
            ActivityKind::Fiddling => "fiddling",
            ActivityKind::BreakingDoor => "breaking door",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of activities a goal is allowed to pick.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ActivitySet: u8 {
        const HIDING        = 1 << 0;
        const GRIEFING      = 1 << 1;
        const FIDDLING      = 1 << 2;
        const BREAKING_DOOR = 1 << 3;
    }
}

/// A block being pursued by one activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub pos: BlockPos,
    /// Block state when the candidate was picked.
    pub snapshot: BlockState,
    pub activity: ActivityKind,
}

impl Candidate {
    pub fn new(pos: BlockPos, snapshot: BlockState, activity: ActivityKind) -> Self {
        Self {
            pos,
            snapshot,
            activity,
        }
    }

    /// The block at `pos` is still the snapshotted block type.
    pub fn is_valid<V: BlockView + ?Sized>(&self, view: &V) -> bool {
        view.block_state(self.pos).same_block(&self.snapshot)
    }
}

/// Where the state machine stands with its current candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityState {
    #[default]
    Idle,
    /// Moving toward the candidate and waiting for line of sight.
    Seeking(Candidate),
    /// Within reach, acting on the candidate.
    Executing(Candidate),
}

impl ActivityState {
    pub fn candidate(&self) -> Option<&Candidate> {
        match self {
            ActivityState::Idle => None,
            ActivityState::Seeking(c) | ActivityState::Executing(c) => Some(c),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ActivityState::Idle)
    }
}

/// Per-mob counters for the current pursuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSession {
    /// Ticks until the next line-of-sight check.
    pub sight_cooldown: u32,
    /// Ticks spent on the current candidate.
    pub give_up_ticks: u32,
    /// Ticks until fiddling is allowed again.
    pub fiddle_cooldown: u32,
    /// Ticks until the path is re-issued while navigation is idle.
    pub path_cooldown: u32,
}

impl ScanSession {
    /// Forget the current candidate's counters. The fiddle cooldown is kept,
    /// it is armed by a completion and must outlive it.
    pub fn abandon(&mut self) {
        self.sight_cooldown = 0;
        self.give_up_ticks = 0;
        self.path_cooldown = 0;
    }

    pub fn tick_cooldowns(&mut self) {
        self.fiddle_cooldown = self.fiddle_cooldown.saturating_sub(1);
    }
}
