//! Domain layer for the Narrative Navigation context.

pub mod choices;
pub mod dispatcher;
pub mod manifest;
pub mod parade;
pub mod resolver;
pub mod session;
pub mod sounds;
