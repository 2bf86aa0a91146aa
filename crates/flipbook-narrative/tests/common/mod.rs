//! Shared harness for reading scenarios.

#![allow(dead_code)]

use flipbook_core::error::NavigationError;
use flipbook_core::id::NodeId;
use flipbook_core::input::ReaderInput;
use flipbook_core::rng::DeterministicRng;
use flipbook_narrative::application::effects::Collaborators;
use flipbook_narrative::application::reader::Reader;
use flipbook_narrative::domain::manifest::Comic;
use flipbook_test_support::{ManualScheduler, MockRng, RecordingAudio, RecordingRenderer};

/// A reader wired to recording collaborators and a virtual clock.
pub struct Harness {
    pub reader: Reader,
    pub renderer: RecordingRenderer,
    pub audio: RecordingAudio,
    pub scheduler: ManualScheduler,
    pub rng: Box<dyn DeterministicRng>,
}

impl Harness {
    /// Opens the bundled comic with every sound roll succeeding.
    pub fn walrus() -> Self {
        Self::open(Comic::walrus().unwrap(), Box::new(MockRng))
    }

    /// Opens a comic on the book, skipping the title screen.
    pub fn open(comic: Comic, rng: Box<dyn DeterministicRng>) -> Self {
        let mut harness = Self {
            reader: Reader::new(comic, false),
            renderer: RecordingRenderer::default(),
            audio: RecordingAudio::default(),
            scheduler: ManualScheduler::default(),
            rng,
        };
        let mut c = collaborators(
            &mut harness.renderer,
            &mut harness.audio,
            &mut harness.scheduler,
            harness.rng.as_mut(),
        );
        harness.reader.start(&mut c);
        harness
    }

    pub fn press(&mut self, input: ReaderInput) -> Result<(), NavigationError> {
        let mut c = collaborators(
            &mut self.renderer,
            &mut self.audio,
            &mut self.scheduler,
            self.rng.as_mut(),
        );
        self.reader.handle_input(input, &mut c)
    }

    /// Fires every pending timer, including ones scheduled while firing.
    pub fn settle(&mut self) {
        while let Some((_, ticket)) = self.scheduler.fire_next() {
            let mut c = collaborators(
                &mut self.renderer,
                &mut self.audio,
                &mut self.scheduler,
                self.rng.as_mut(),
            );
            self.reader.handle_timer(ticket, &mut c);
        }
    }

    /// Presses and lets the flip finish.
    pub fn flip(&mut self, input: ReaderInput) {
        self.press(input).unwrap();
        self.settle();
    }

    pub fn current(&self) -> &NodeId {
        self.reader.session().current()
    }
}

fn collaborators<'a>(
    renderer: &'a mut RecordingRenderer,
    audio: &'a mut RecordingAudio,
    scheduler: &'a mut ManualScheduler,
    rng: &'a mut dyn DeterministicRng,
) -> Collaborators<'a> {
    Collaborators {
        renderer,
        audio,
        scheduler,
        rng,
    }
}
