//! Input and timer handling for one reader.
//!
//! The [`Reader`] routes host events to the title-screen parade or to the
//! navigation session, then applies whatever effects they produced.

use flipbook_core::error::NavigationError;
use flipbook_core::input::ReaderInput;
use flipbook_core::scheduler::{TimerChannel, TimerTicket};
use tracing::{debug, info};

use super::effects::{Collaborators, apply_effects};
use crate::domain::manifest::Comic;
use crate::domain::parade::Parade;
use crate::domain::session::ReaderSession;

/// Which screen the reader is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderMode {
    /// The title screen with the performer parade.
    Intro,
    /// The open book.
    Book,
}

/// A reader: the parade, the book, and which one has the screen.
#[derive(Debug)]
pub struct Reader {
    session: ReaderSession,
    parade: Parade,
    mode: ReaderMode,
}

impl Reader {
    /// Creates a reader. With `intro` set and performers to show, the reader
    /// opens on the title screen; otherwise the book is open from the start.
    #[must_use]
    pub fn new(comic: Comic, intro: bool) -> Self {
        let parade = Parade::new(comic.parade);
        let mode = if intro && comic.parade.performers > 0 {
            ReaderMode::Intro
        } else {
            ReaderMode::Book
        };
        Self {
            session: ReaderSession::new(comic),
            parade,
            mode,
        }
    }

    /// The navigation session.
    #[must_use]
    pub fn session(&self) -> &ReaderSession {
        &self.session
    }

    /// Which screen is showing.
    #[must_use]
    pub fn mode(&self) -> ReaderMode {
        self.mode
    }

    /// Presents the first screen.
    pub fn start(&mut self, c: &mut Collaborators<'_>) {
        match self.mode {
            ReaderMode::Intro => {
                self.parade.start();
                apply_effects(self.parade.drain_effects(), c);
            }
            ReaderMode::Book => apply_effects(self.session.drain_effects(), c),
        }
    }

    /// Handles a reader action. On the title screen, selecting a performer
    /// or restarting opens the book on its start spread.
    ///
    /// # Errors
    ///
    /// Returns `NavigationError` when the action was rejected. Rejected
    /// actions change nothing and are only logged; hosts may ignore them.
    pub fn handle_input(
        &mut self,
        input: ReaderInput,
        c: &mut Collaborators<'_>,
    ) -> Result<(), NavigationError> {
        let input_type = input.input_type();
        let result = self.route_input(input, c);
        if let Err(e) = &result {
            debug!(input = input_type, reason = %e, "input dropped");
        }
        result
    }

    /// Delivers a fired timer. Stale tickets are ignored.
    pub fn handle_timer(&mut self, ticket: TimerTicket, c: &mut Collaborators<'_>) {
        match ticket.channel {
            TimerChannel::Parade => {
                if self.parade.on_timer(ticket) {
                    apply_effects(self.parade.drain_effects(), c);
                }
            }
            TimerChannel::Flip | TimerChannel::Settle => {
                if self.session.complete(ticket, c.rng) {
                    apply_effects(self.session.drain_effects(), c);
                }
            }
        }
    }

    fn route_input(
        &mut self,
        input: ReaderInput,
        c: &mut Collaborators<'_>,
    ) -> Result<(), NavigationError> {
        if self.mode == ReaderMode::Intro {
            match input {
                ReaderInput::PerformerSelected(performer) => info!(performer, "book opened"),
                ReaderInput::RestartRequested => info!("book opened at the start"),
                _ => return Err(NavigationError::BookClosed),
            }
            self.open_book(c);
            return Ok(());
        }

        match input {
            ReaderInput::PrevRequested => self.session.retreat()?,
            ReaderInput::NextRequested => self.session.advance()?,
            ReaderInput::ChoiceMade(choice) => self.session.choose(choice)?,
            ReaderInput::RestartRequested => self.session.restart(),
            ReaderInput::SpreadSelected(target) => self.session.flip_to(&target)?,
            ReaderInput::PerformerSelected(_) => {}
        }
        apply_effects(self.session.drain_effects(), c);
        Ok(())
    }

    fn open_book(&mut self, c: &mut Collaborators<'_>) {
        self.parade.stop();
        self.mode = ReaderMode::Book;
        let mut effects = self.parade.drain_effects();
        effects.extend(self.session.drain_effects());
        apply_effects(effects, c);
    }
}

#[cfg(test)]
mod tests {
    use flipbook_core::effect::VisualState;
    use flipbook_core::id::NodeId;
    use flipbook_test_support::{ManualScheduler, MockRng, RecordingAudio, RecordingRenderer};

    use super::*;

    struct Host {
        renderer: RecordingRenderer,
        audio: RecordingAudio,
        scheduler: ManualScheduler,
        rng: MockRng,
    }

    impl Host {
        fn new() -> Self {
            Self {
                renderer: RecordingRenderer::default(),
                audio: RecordingAudio::default(),
                scheduler: ManualScheduler::default(),
                rng: MockRng,
            }
        }

        fn collaborators(&mut self) -> Collaborators<'_> {
            Collaborators {
                renderer: &mut self.renderer,
                audio: &mut self.audio,
                scheduler: &mut self.scheduler,
                rng: &mut self.rng,
            }
        }
    }

    #[test]
    fn test_intro_rejects_navigation_until_a_performer_is_selected() {
        // Arrange
        let mut host = Host::new();
        let mut reader = Reader::new(Comic::walrus().unwrap(), true);
        reader.start(&mut host.collaborators());

        // Act
        let rejected = reader.handle_input(ReaderInput::NextRequested, &mut host.collaborators());
        let opened =
            reader.handle_input(ReaderInput::PerformerSelected(1), &mut host.collaborators());

        // Assert
        assert_eq!(rejected, Err(NavigationError::BookClosed));
        assert_eq!(opened, Ok(()));
        assert_eq!(reader.mode(), ReaderMode::Book);
        assert_eq!(
            host.renderer.visual_state(&NodeId::from("1")),
            Some(VisualState::Active)
        );
        assert_eq!(host.renderer.performer_visible(1), Some(false));
    }

    #[test]
    fn test_restart_on_the_title_screen_opens_the_book() {
        // Arrange
        let mut host = Host::new();
        let mut reader = Reader::new(Comic::walrus().unwrap(), true);
        reader.start(&mut host.collaborators());

        // Act
        let result = reader.handle_input(ReaderInput::RestartRequested, &mut host.collaborators());

        // Assert
        assert_eq!(result, Ok(()));
        assert_eq!(reader.mode(), ReaderMode::Book);
        assert_eq!(reader.session().current(), &NodeId::from("1"));
        assert_eq!(
            host.renderer.visual_state(&NodeId::from("1")),
            Some(VisualState::Active)
        );
        assert_eq!(host.renderer.controls_visible(), Some(true));
        let (_, ticket) = host.scheduler.fire_next().unwrap();
        assert_eq!(ticket.channel, TimerChannel::Parade);
        reader.handle_timer(ticket, &mut host.collaborators());
        assert!(host.scheduler.fire_next().is_none());
    }

    #[test]
    fn test_parade_tickets_go_stale_once_the_book_opens() {
        let mut host = Host::new();
        let mut reader = Reader::new(Comic::walrus().unwrap(), true);
        reader.start(&mut host.collaborators());
        reader
            .handle_input(ReaderInput::PerformerSelected(0), &mut host.collaborators())
            .unwrap();
        let recorded = host.renderer.calls().len();

        let (_, ticket) = host.scheduler.fire_next().unwrap();
        reader.handle_timer(ticket, &mut host.collaborators());

        assert_eq!(ticket.channel, TimerChannel::Parade);
        assert_eq!(host.renderer.calls().len(), recorded);
        assert!(host.scheduler.fire_next().is_none());
    }

    #[test]
    fn test_book_mode_routes_inputs_to_the_session() {
        // Arrange
        let mut host = Host::new();
        let mut reader = Reader::new(Comic::walrus().unwrap(), false);
        reader.start(&mut host.collaborators());

        // Act
        reader
            .handle_input(ReaderInput::NextRequested, &mut host.collaborators())
            .unwrap();
        let (_, ticket) = host.scheduler.fire_next().unwrap();
        reader.handle_timer(ticket, &mut host.collaborators());

        // Assert
        assert_eq!(reader.session().current(), &NodeId::from("2"));
        assert_eq!(
            host.renderer.visual_state(&NodeId::from("1")),
            Some(VisualState::Inactive)
        );
        assert_eq!(
            reader.handle_input(ReaderInput::PerformerSelected(2), &mut host.collaborators()),
            Ok(())
        );
    }
}
