//! Console collaborators and command parsing.
//!
//! The renderer and audio player write one line per effect to any
//! [`Write`], either as prose or as the effect's JSON payload.

use std::io::Write;

use flipbook_core::effect::{
    Control, Effect, EndingOutcome, PageLabel, SoundCategory, VisualState,
};
use flipbook_core::error::AudioError;
use flipbook_core::id::{Choice, ClipId, NodeId};
use flipbook_core::input::ReaderInput;
use flipbook_core::ports::{AudioPlayer, Renderer};
use tracing::warn;

use crate::config::OutputFormat;

/// A line typed at the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Something for the reader.
    Input(ReaderInput),
    /// Leave the reader.
    Quit,
}

/// Parses a console line. Key names (`ArrowRight`, `y`, ...) are accepted
/// alongside words.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if let Some(input) = ReaderInput::from_key(line) {
        return Some(Command::Input(input));
    }
    let mut words = line.split_whitespace();
    let verb = words.next()?.to_ascii_lowercase();
    let argument = words.next();
    let input = match verb.as_str() {
        "quit" | "exit" | "q" => return Some(Command::Quit),
        "next" | "forward" => ReaderInput::NextRequested,
        "prev" | "back" => ReaderInput::PrevRequested,
        "yes" => ReaderInput::ChoiceMade(Choice::Yes),
        "no" => ReaderInput::ChoiceMade(Choice::No),
        "restart" => ReaderInput::RestartRequested,
        "goto" => ReaderInput::SpreadSelected(NodeId::from(argument?)),
        "open" => ReaderInput::PerformerSelected(argument.map_or(Some(0), |k| k.parse().ok())?),
        _ => return None,
    };
    Some(Command::Input(input))
}

/// Prose for an effect, or `None` for effects with nothing to show.
#[must_use]
pub fn describe(effect: &Effect) -> Option<String> {
    let line = match effect {
        Effect::SetVisualState { node, state } => match state {
            VisualState::Active => format!("spread {node} is open"),
            VisualState::Inactive => return None,
            VisualState::Flipping => format!("spread {node} is turning..."),
        },
        Effect::SetControlEnabled { control, enabled } => {
            let name = match control {
                Control::Prev => "prev",
                Control::Next => "next",
            };
            format!("[{name}] {}", if *enabled { "on" } else { "off" })
        }
        Effect::SetControlsVisible { visible } => {
            format!("controls {}", if *visible { "shown" } else { "hidden" })
        }
        Effect::SetChoicePromptVisible { visible: true } => {
            "choose: yes (y) or no (n)".to_owned()
        }
        Effect::SetPageLabel { label } => label.to_string(),
        Effect::ShowEnding { outcome } => {
            format!("THE END: {} [{}]", outcome.caption, outcome.image_path)
        }
        Effect::SetPerformerVisible {
            performer,
            visible: true,
        } => format!("performer {performer} steps on stage (open {performer} to start)"),
        Effect::SetPerformerVisible {
            performer,
            visible: false,
        } => format!("performer {performer} leaves the stage"),
        Effect::PlayAudio { clip, category } => format!("~ {clip} ({})", category_name(*category)),
        Effect::SetChoicePromptVisible { visible: false }
        | Effect::HideEnding
        | Effect::StopAudio { .. }
        | Effect::StopCategory { .. }
        | Effect::ScheduleAfter { .. } => return None,
    };
    Some(line)
}

fn category_name(category: SoundCategory) -> &'static str {
    match category {
        SoundCategory::PageTurn => "page turn",
        SoundCategory::Ambient => "ambient",
        SoundCategory::Ending => "ending",
    }
}

fn write_effect(out: &mut impl Write, format: OutputFormat, effect: &Effect) {
    let line = match format {
        OutputFormat::Text => describe(effect),
        OutputFormat::Json => Some(effect.to_payload().to_string()),
    };
    if let Some(line) = line {
        if let Err(e) = writeln!(out, "{line}") {
            warn!(error = %e, effect = effect.effect_type(), "console write failed");
        }
    }
}

/// Renders effects as console lines.
#[derive(Debug)]
pub struct ConsoleRenderer<W: Write> {
    out: W,
    format: OutputFormat,
}

impl<W: Write> ConsoleRenderer<W> {
    /// Creates a renderer writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self { out, format }
    }

    /// Prints the comic title and the command summary.
    ///
    /// # Errors
    ///
    /// Returns the write error.
    pub fn announce(&mut self, title: &str) -> std::io::Result<()> {
        if self.format == OutputFormat::Text {
            writeln!(self.out, "{title}")?;
            writeln!(
                self.out,
                "commands: next, prev, yes, no, restart, goto <spread>, open [performer], quit"
            )?;
        }
        Ok(())
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, effect: &Effect) {
        write_effect(&mut self.out, self.format, effect);
    }
}

impl<W: Write> Renderer for ConsoleRenderer<W> {
    fn set_visual_state(&mut self, node: &NodeId, state: VisualState) {
        self.emit(&Effect::SetVisualState {
            node: node.clone(),
            state,
        });
    }

    fn set_control_enabled(&mut self, control: Control, enabled: bool) {
        self.emit(&Effect::SetControlEnabled { control, enabled });
    }

    fn set_controls_visible(&mut self, visible: bool) {
        self.emit(&Effect::SetControlsVisible { visible });
    }

    fn set_choice_prompt_visible(&mut self, visible: bool) {
        self.emit(&Effect::SetChoicePromptVisible { visible });
    }

    fn set_page_label(&mut self, label: &PageLabel) {
        self.emit(&Effect::SetPageLabel { label: *label });
    }

    fn show_ending(&mut self, outcome: &EndingOutcome) {
        self.emit(&Effect::ShowEnding {
            outcome: outcome.clone(),
        });
    }

    fn hide_ending(&mut self) {
        self.emit(&Effect::HideEnding);
    }

    fn set_performer_visible(&mut self, performer: usize, visible: bool) {
        self.emit(&Effect::SetPerformerVisible { performer, visible });
    }
}

/// Announces clips on the console instead of playing them.
#[derive(Debug)]
pub struct ConsoleAudio<W: Write> {
    out: W,
    format: OutputFormat,
    muted: bool,
}

impl<W: Write> ConsoleAudio<W> {
    /// Creates a player writing to `out`.
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            muted: false,
        }
    }

    /// Refuses every clip, as a platform without sound would.
    #[must_use]
    pub fn muted(mut self) -> Self {
        self.muted = true;
        self
    }

    /// Returns the writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AudioPlayer for ConsoleAudio<W> {
    fn play(&mut self, clip: &ClipId, category: SoundCategory) -> Result<(), AudioError> {
        if self.muted {
            return Err(AudioError::PlaybackDenied(clip.clone()));
        }
        write_effect(
            &mut self.out,
            self.format,
            &Effect::PlayAudio {
                clip: clip.clone(),
                category,
            },
        );
        Ok(())
    }

    fn stop(&mut self, clip: &ClipId) {
        write_effect(
            &mut self.out,
            self.format,
            &Effect::StopAudio { clip: clip.clone() },
        );
    }

    fn stop_category(&mut self, category: SoundCategory) {
        write_effect(&mut self.out, self.format, &Effect::StopCategory { category });
    }
}
