//! Decides which activity, if any, a block qualifies for.

use std::collections::HashSet;

use tracing::warn;

use mischief_world::{BlockId, BlockKind, BlockPos, BlockRegistry, BlockState, BlockView};

use super::activity::{ActivityKind, ActivitySet};
use super::goal::AgentState;
use crate::config::ActivityConfig;

/// Opaque block predicate backing allow/deny lists.
pub trait BlockMatcher: Send + Sync + std::fmt::Debug {
    fn matches(&self, state: &BlockState) -> bool;
}

/// A set of block types resolved from configured block names.
#[derive(Debug, Clone, Default)]
pub struct BlockList {
    ids: HashSet<BlockId>,
}

impl BlockList {
    /// Resolve names against the registry. Unknown names are logged and skipped.
    pub fn resolve(names: &[String], registry: &BlockRegistry) -> Self {
        let ids = names
            .iter()
            .filter_map(|name| {
                let id = registry.id(name);
                if id.is_none() {
                    warn!("Unknown block {name:?} in block list, ignoring");
                }
                id
            })
            .collect();
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl BlockMatcher for BlockList {
    fn matches(&self, state: &BlockState) -> bool {
        self.ids.contains(&state.id)
    }
}

#[derive(Debug)]
pub struct GriefRules {
    pub allow: Box<dyn BlockMatcher>,
    pub deny: Box<dyn BlockMatcher>,
    pub break_lights: bool,
    pub break_beds: bool,
    pub break_lootable: bool,
    pub requires_tools: bool,
    pub explosive_mobs: bool,
}

#[derive(Debug)]
pub struct ListRules {
    pub allow: Box<dyn BlockMatcher>,
    pub deny: Box<dyn BlockMatcher>,
}

#[derive(Debug)]
pub struct DoorRules {
    pub allow: Box<dyn BlockMatcher>,
    pub deny: Box<dyn BlockMatcher>,
    pub requires_tools: bool,
}

/// Classification rules for every activity.
#[derive(Debug)]
pub struct ActivityClassifier {
    pub hide: ListRules,
    pub grief: GriefRules,
    pub fiddle: ListRules,
    pub door: DoorRules,
}

impl ActivityClassifier {
    pub fn from_config(config: &ActivityConfig, registry: &BlockRegistry) -> Self {
        let list = |names: &[String]| -> Box<dyn BlockMatcher> {
            Box::new(BlockList::resolve(names, registry))
        };
        Self {
            hide: ListRules {
                allow: list(&config.hide.targets),
                deny: list(&config.hide.blacklist),
            },
            grief: GriefRules {
                allow: list(&config.grief.targets),
                deny: list(&config.grief.blacklist),
                break_lights: config.grief.break_lights,
                break_beds: config.grief.break_beds,
                break_lootable: config.grief.break_lootable,
                requires_tools: config.grief.requires_tools,
                explosive_mobs: config.grief.explosive_mobs,
            },
            fiddle: ListRules {
                allow: list(&config.fiddle.targets),
                deny: list(&config.fiddle.blacklist),
            },
            door: DoorRules {
                allow: list(&config.door_breaking.targets),
                deny: list(&config.door_breaking.blacklist),
                requires_tools: config.door_breaking.requires_tools,
            },
        }
    }

    /// Pick the single activity `state` at `pos` qualifies for.
    ///
    /// Precedence is hiding, then griefing, then fiddling. Door breaking is only
    /// returned when it is the sole enabled kind.
    pub fn classify<V: BlockView + ?Sized>(
        &self,
        view: &V,
        agent: &AgentState,
        state: &BlockState,
        pos: BlockPos,
        enabled: ActivitySet,
    ) -> Option<ActivityKind> {
        if !Self::is_targetable(view, state, pos) {
            return None;
        }
        [
            ActivityKind::Hiding,
            ActivityKind::Griefing,
            ActivityKind::Fiddling,
            ActivityKind::BreakingDoor,
        ]
        .into_iter()
        .filter(|kind| enabled.contains(kind.flag()))
        .find(|kind| self.matches_kind(view, agent, state, pos, *kind))
    }

    /// Whether `state` qualifies for exactly `kind`.
    pub fn qualifies<V: BlockView + ?Sized>(
        &self,
        view: &V,
        agent: &AgentState,
        state: &BlockState,
        pos: BlockPos,
        kind: ActivityKind,
    ) -> bool {
        Self::is_targetable(view, state, pos) && self.matches_kind(view, agent, state, pos, kind)
    }

    /// Air, liquids, and unbreakable blocks are never targets.
    fn is_targetable<V: BlockView + ?Sized>(view: &V, state: &BlockState, pos: BlockPos) -> bool {
        !state.is_air() && !view.is_liquid(state) && view.destroy_speed(state, pos) >= 0.0
    }

    fn matches_kind<V: BlockView + ?Sized>(
        &self,
        view: &V,
        agent: &AgentState,
        state: &BlockState,
        pos: BlockPos,
        kind: ActivityKind,
    ) -> bool {
        match kind {
            ActivityKind::Hiding => self.is_hiding_spot(state),
            ActivityKind::Griefing => self.is_grief_target(view, agent, state, pos),
            ActivityKind::Fiddling => self.is_fiddle_target(state),
            ActivityKind::BreakingDoor => self.is_breakable_door(view, agent, state),
        }
    }

    fn is_hiding_spot(&self, state: &BlockState) -> bool {
        !self.hide.deny.matches(state) && state.is_full_cube() && self.hide.allow.matches(state)
    }

    fn is_grief_target<V: BlockView + ?Sized>(
        &self,
        view: &V,
        agent: &AgentState,
        state: &BlockState,
        pos: BlockPos,
    ) -> bool {
        let rules = &self.grief;
        if rules.deny.matches(state) {
            return false;
        }
        let info = state.info();
        let wanted = (rules.break_lights && view.light_emission(state, pos) > 1)
            || (rules.break_beds && info.kind == BlockKind::Bed)
            || (rules.break_lootable
                && info.kind == BlockKind::Container
                && !view.has_pending_loot(pos))
            || rules.allow.matches(state);
        if !wanted || !view.mob_griefing() {
            return false;
        }
        if agent.explosive && rules.explosive_mobs {
            return true;
        }
        !rules.requires_tools || agent.held_item.tool_matches(info)
    }

    fn is_fiddle_target(&self, state: &BlockState) -> bool {
        if self.fiddle.deny.matches(state) {
            return false;
        }
        let info = state.info();
        info.is_door_like() || info.is_switch() || self.fiddle.allow.matches(state)
    }

    fn is_breakable_door<V: BlockView + ?Sized>(
        &self,
        view: &V,
        agent: &AgentState,
        state: &BlockState,
    ) -> bool {
        let rules = &self.door;
        if rules.deny.matches(state) || !rules.allow.matches(state) {
            return false;
        }
        if state.open || !view.mob_griefing() {
            return false;
        }
        !rules.requires_tools || agent.held_item.tool_matches(state.info())
    }
}
