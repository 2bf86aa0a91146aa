//! Flipbook Core — shared vocabulary for the comic reader.
//!
//! This crate defines the identifiers, side-effect commands, collaborator
//! ports, and determinism abstractions that the story and narrative crates
//! depend on. It contains no rendering or audio code.

pub mod effect;
pub mod error;
pub mod id;
pub mod input;
pub mod ports;
pub mod rng;
pub mod scheduler;
