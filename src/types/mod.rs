//! Core types: the brief record and stream events.

pub mod brief;
pub mod stream;

pub use brief::*;
pub use stream::*;
