//! Speech synthesis pipeline
//!
//! Fire-and-forget utterance queue: the UI enqueues bot replies, a worker
//! thread drains them into an abstract synthesis engine. The engine itself
//! is an external collaborator behind the `Synthesizer` trait; a logging
//! null engine backs builds without one.

use crate::{ParleyError, Result};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// One spoken reply with its voice parameters
#[derive(Clone, Debug, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

/// Voice parameters applied to every utterance
#[derive(Clone, Debug)]
pub struct Voice {
    pub locale: String,
    pub rate: f32,
    pub pitch: f32,
}

impl Default for Voice {
    fn default() -> Self {
        Self {
            locale: "en-US".to_string(),
            rate: 1.0,
            pitch: 1.0,
        }
    }
}

/// Abstract speech synthesis capability
pub trait Synthesizer: Send {
    /// Speak one utterance; returns once it is queued by the engine
    fn speak(&mut self, utterance: &Utterance) -> Result<()>;
}

/// Synthesizer used when no platform engine is wired in
pub struct NullSynthesizer;

impl Synthesizer for NullSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        debug!("No synthesis engine; dropping utterance ({} chars)", utterance.text.len());
        Ok(())
    }
}

/// Command sent to the synthesis pipeline
#[derive(Clone, Debug)]
pub enum SynthesisCommand {
    /// Queue an utterance
    Speak(Utterance),
    /// Shutdown the pipeline
    Shutdown,
}

/// Event emitted by the synthesis pipeline
#[derive(Clone, Debug)]
pub enum SynthesisEvent {
    /// An utterance was handed to the engine
    Spoken { chars: usize },
    /// Synthesis failed; the reply stays visible as text
    Error(String),
    /// Pipeline has shut down
    Shutdown,
}

/// Handle for enqueueing utterances from the UI
#[derive(Clone)]
pub struct SynthesisHandle {
    command_tx: Sender<SynthesisCommand>,
    event_rx: Receiver<SynthesisEvent>,
    voice: Voice,
}

impl SynthesisHandle {
    /// Queue a reply for speaking with the configured voice
    pub fn speak(&self, text: impl Into<String>) -> Result<()> {
        let text = text.into();
        if text.trim().is_empty() {
            return Ok(());
        }
        self.command_tx
            .send(SynthesisCommand::Speak(Utterance {
                text,
                locale: self.voice.locale.clone(),
                rate: self.voice.rate,
                pitch: self.voice.pitch,
            }))
            .map_err(|e| ParleyError::ChannelError(format!("Failed to queue utterance: {}", e)))
    }

    /// Try to receive a pipeline event (non-blocking)
    pub fn try_recv_event(&self) -> Option<SynthesisEvent> {
        self.event_rx.try_recv().ok()
    }

    /// Request shutdown
    pub fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(SynthesisCommand::Shutdown)
            .map_err(|e| ParleyError::ChannelError(format!("Failed to send shutdown: {}", e)))
    }
}

/// Worker side of the synthesis pipeline
pub struct SynthesisPipeline {
    command_rx: Receiver<SynthesisCommand>,
    event_tx: Sender<SynthesisEvent>,
    synthesizer: Box<dyn Synthesizer>,
}

impl SynthesisPipeline {
    /// Create the pipeline around a synthesis engine
    pub fn new(synthesizer: Box<dyn Synthesizer>, voice: Voice) -> (SynthesisHandle, Self) {
        let (command_tx, command_rx) = bounded(100);
        let (event_tx, event_rx) = bounded(100);

        let handle = SynthesisHandle {
            command_tx,
            event_rx,
            voice,
        };

        let pipeline = Self {
            command_rx,
            event_tx,
            synthesizer,
        };

        (handle, pipeline)
    }

    /// Start the worker thread draining the utterance queue
    pub fn start_worker(mut self) -> JoinHandle<()> {
        thread::spawn(move || {
            info!("Synthesis pipeline started");

            while let Ok(command) = self.command_rx.recv() {
                match command {
                    SynthesisCommand::Speak(utterance) => {
                        let chars = utterance.text.len();
                        match self.synthesizer.speak(&utterance) {
                            Ok(()) => {
                                let _ = self.event_tx.send(SynthesisEvent::Spoken { chars });
                            }
                            Err(e) => {
                                warn!("Synthesis failed: {}", e);
                                let _ = self.event_tx.send(SynthesisEvent::Error(e.to_string()));
                            }
                        }
                    }
                    SynthesisCommand::Shutdown => break,
                }
            }

            let _ = self.event_tx.send(SynthesisEvent::Shutdown);
            info!("Synthesis pipeline stopped");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;
    use std::time::Duration;

    /// Synthesizer fake that records spoken utterances
    struct RecordingSynthesizer {
        spoken: Arc<Mutex<Vec<Utterance>>>,
    }

    impl Synthesizer for RecordingSynthesizer {
        fn speak(&mut self, utterance: &Utterance) -> Result<()> {
            self.spoken.lock().push(utterance.clone());
            Ok(())
        }
    }

    #[test]
    fn test_pipeline_speaks_queued_text() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynthesizer {
            spoken: Arc::clone(&spoken),
        };
        let (handle, pipeline) = SynthesisPipeline::new(Box::new(synth), Voice::default());
        let worker = pipeline.start_worker();

        handle.speak("hello out loud").unwrap();
        handle.shutdown().unwrap();
        worker.join().unwrap();

        let spoken = spoken.lock();
        assert_eq!(spoken.len(), 1);
        assert_eq!(spoken[0].text, "hello out loud");
        assert_eq!(spoken[0].locale, "en-US");
        assert_eq!(spoken[0].rate, 1.0);
        assert_eq!(spoken[0].pitch, 1.0);
    }

    #[test]
    fn test_empty_text_is_not_queued() {
        let spoken = Arc::new(Mutex::new(Vec::new()));
        let synth = RecordingSynthesizer {
            spoken: Arc::clone(&spoken),
        };
        let (handle, pipeline) = SynthesisPipeline::new(Box::new(synth), Voice::default());
        let worker = pipeline.start_worker();

        handle.speak("   ").unwrap();
        handle.shutdown().unwrap();
        worker.join().unwrap();

        assert!(spoken.lock().is_empty());
    }

    #[test]
    fn test_shutdown_emits_event() {
        let (handle, pipeline) =
            SynthesisPipeline::new(Box::new(NullSynthesizer), Voice::default());
        let worker = pipeline.start_worker();

        handle.shutdown().unwrap();
        worker.join().unwrap();

        // Drain events until Shutdown shows up
        let deadline = std::time::Instant::now() + Duration::from_secs(1);
        loop {
            match handle.try_recv_event() {
                Some(SynthesisEvent::Shutdown) => break,
                Some(_) => continue,
                None if std::time::Instant::now() > deadline => panic!("no shutdown event"),
                None => std::thread::sleep(Duration::from_millis(5)),
            }
        }
    }
}
