//! Application layer for the Narrative Navigation context.

pub mod effects;
pub mod reader;
