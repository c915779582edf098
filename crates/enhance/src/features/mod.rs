//! The individual page behaviors. Each module keeps a pure core (a handler,
//! a state machine or a plain function) next to its `install` wiring.

pub mod counter;
pub mod phone;
pub mod reveal;
pub mod ripple;
pub mod search_mode;
pub mod smooth_scroll;
pub mod submit_feedback;
pub mod typewriter;
