//! Shared test mocks and utilities for the Flipbook comic reader.

mod audio;
mod renderer;
mod rng;
mod scheduler;

pub use audio::{AudioCommand, FailingAudio, RecordingAudio};
pub use renderer::RecordingRenderer;
pub use rng::{MockRng, ScriptedRng};
pub use scheduler::ManualScheduler;
