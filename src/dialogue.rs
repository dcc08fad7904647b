//! Dialogue controller
//!
//! Glue between inbound chat text, the pure state machine and the two
//! stores. One message is processed to completion before the next.

mod controller;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use controller::DialogueController;
pub use traits::CashbackStore;
