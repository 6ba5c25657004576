//! Shared state and messaging between recognition workers and the viewer
//!
//! Workers only ever send messages; all state lives with the viewer on the
//! display thread.

pub mod state;
pub mod messages;

pub use state::RuntimeState;
pub use messages::{Notice, RecognitionEvent, RequestId};
