//! Flipbook reader: a terminal host for the comic reader.
//!
//! Reads commands from stdin, delivers timer tickets from the runtime, and
//! prints every effect the reader produces.

pub mod config;
pub mod console;
pub mod error;
pub mod timers;

use flipbook_core::scheduler::TimerTicket;
use flipbook_narrative::application::effects::Collaborators;
use flipbook_narrative::application::reader::Reader;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{info, warn};

use crate::config::ReaderConfig;
use crate::console::{Command, ConsoleRenderer, parse_command};
use crate::error::AppError;
use crate::timers::TokioScheduler;

/// Runs a reader on stdin and stdout until the reader quits or input ends.
///
/// # Errors
///
/// Returns `AppError` if the comic cannot be loaded or the console fails.
pub async fn run(config: ReaderConfig) -> Result<(), AppError> {
    let comic = config.load_comic()?;
    let (tx, mut timers) = mpsc::unbounded_channel();

    let mut renderer = ConsoleRenderer::new(std::io::stdout(), config.output);
    let mut audio = config.audio_player(std::io::stdout());
    let mut scheduler = TokioScheduler::new(tx);
    let mut rng = config.rng();
    renderer.announce(&comic.title)?;

    let mut reader = Reader::new(comic, config.intro);
    let mut c = Collaborators {
        renderer: &mut renderer,
        audio: &mut audio,
        scheduler: &mut scheduler,
        rng: &mut rng,
    };
    reader.start(&mut c);
    info!(mode = ?reader.mode(), "reader started");

    let stdin = BufReader::new(tokio::io::stdin());
    drive(&mut reader, stdin, &mut c, &mut timers).await
}

/// Feeds console lines and fired timers into the reader until `quit` or the
/// end of input.
///
/// # Errors
///
/// Returns `AppError::Io` if reading a line fails.
pub async fn drive<I>(
    reader: &mut Reader,
    input: I,
    c: &mut Collaborators<'_>,
    timers: &mut UnboundedReceiver<TimerTicket>,
) -> Result<(), AppError>
where
    I: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("input closed");
                    break;
                };
                match parse_command(&line) {
                    Some(Command::Quit) => {
                        info!("reader quit");
                        break;
                    }
                    // Rejected inputs are logged by the reader and otherwise ignored.
                    Some(Command::Input(input)) => {
                        let _ = reader.handle_input(input, c);
                    }
                    None => warn!(command = line.trim(), "unknown command"),
                }
            }
            Some(ticket) = timers.recv() => reader.handle_timer(ticket, c),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use flipbook_core::id::NodeId;
    use flipbook_core::input::ReaderInput;
    use flipbook_narrative::domain::manifest::Comic;
    use flipbook_test_support::{ManualScheduler, MockRng, RecordingAudio, RecordingRenderer};
    use tokio::io::AsyncWriteExt;

    use super::*;

    #[tokio::test]
    async fn test_drive_stops_at_quit_and_leaves_flip_pending() {
        // Arrange
        let mut renderer = RecordingRenderer::default();
        let mut audio = RecordingAudio::default();
        let mut scheduler = ManualScheduler::default();
        let mut rng = MockRng;
        let mut c = Collaborators {
            renderer: &mut renderer,
            audio: &mut audio,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };
        let mut reader = Reader::new(Comic::walrus().unwrap(), false);
        reader.start(&mut c);
        let (_tx, mut timers) = mpsc::unbounded_channel();
        let input: &[u8] = b"dance\nnext\nnext\nquit\nprev\n";

        // Act
        let result = drive(&mut reader, input, &mut c, &mut timers).await;

        // Assert
        assert!(result.is_ok());
        assert!(reader.session().is_locked());
        assert_eq!(reader.session().current(), &NodeId::from("1"));
        assert_eq!(scheduler.pending(), 1);
    }

    #[tokio::test]
    async fn test_drive_delivers_fired_timers() {
        // Arrange
        let mut renderer = RecordingRenderer::default();
        let mut audio = RecordingAudio::default();
        let mut scheduler = ManualScheduler::default();
        let mut rng = MockRng;
        let mut reader = Reader::new(Comic::walrus().unwrap(), false);
        {
            let mut c = Collaborators {
                renderer: &mut renderer,
                audio: &mut audio,
                scheduler: &mut scheduler,
                rng: &mut rng,
            };
            reader.start(&mut c);
            reader
                .handle_input(ReaderInput::NextRequested, &mut c)
                .unwrap();
        }
        let (_, ticket) = scheduler.fire_next().unwrap();
        let (tx, mut timers) = mpsc::unbounded_channel();
        tx.send(ticket).unwrap();
        drop(tx);
        let (mut writer, input) = tokio::io::duplex(64);
        let mut c = Collaborators {
            renderer: &mut renderer,
            audio: &mut audio,
            scheduler: &mut scheduler,
            rng: &mut rng,
        };

        // Act
        let driving = drive(&mut reader, BufReader::new(input), &mut c, &mut timers);
        let feeding = async {
            tokio::task::yield_now().await;
            writer.write_all(b"quit\n").await.unwrap();
        };
        let (result, ()) = tokio::join!(driving, feeding);

        // Assert
        assert!(result.is_ok());
        assert_eq!(reader.session().current(), &NodeId::from("2"));
        assert!(!reader.session().is_locked());
    }
}
