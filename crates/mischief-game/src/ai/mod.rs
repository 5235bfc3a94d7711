//! Mob AI: block activities, goal arbitration, and pathing.

pub mod activity;
pub mod brain;
pub mod budget;
pub mod classifier;
pub mod destruction;
pub mod goal;
pub mod mob_goals;
pub mod pathfinding;
pub mod scanner;
pub mod sight;
pub mod state_machine;
pub mod system;
pub mod targeting;

#[cfg(test)]
mod testing;
