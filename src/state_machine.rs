//! Dialogue state machine
//!
//! Raw text is classified into a [`Command`], then the pure
//! [`transition`] function maps (state, event) to the next state plus
//! effects. The dialogue controller executes the effects.

pub mod command;
mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use command::classify;
pub use effect::{Effect, Reply, StoreOp, StoreRequest};
pub use event::{Event, StoreOutcome};
pub use state::DialogState;
pub use transition::{transition, NextState};
