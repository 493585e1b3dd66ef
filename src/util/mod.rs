//! Shared utilities: easing curves used by profile transitions.

pub mod easing;
