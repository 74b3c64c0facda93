//! Action catalog.
//!
//! A fixed table of action definitions indexed by the closed [`ActionId`]
//! enumeration. The table is built at compile time and never changes; combo
//! entries expand exactly one level into real actions.

mod catalog;
mod id;

pub use catalog::{all, get, ActionDefinition, ActionKind, ConditionGate};
pub use id::{ActionId, ACTION_COUNT};
