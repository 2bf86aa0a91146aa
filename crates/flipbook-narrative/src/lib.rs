//! Flipbook — Narrative Navigation.
//!
//! Responsible for page-flip transitions, the animation lock, reader
//! choices, ending resolution, and the audio/visual side effects each
//! transition produces.

pub mod application;
pub mod domain;
