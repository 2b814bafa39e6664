//! Speech capture state machine
//!
//! Glues continuous recognition events to message submission: finalized
//! fragments accumulate in the transcript buffer and are handed off after a
//! short debounce, a silence watchdog auto-stops listening after prolonged
//! quiet, and an implicitly ended platform session is restarted while the
//! machine still considers itself listening.
//!
//! All transitions take an explicit `Instant` so tests drive the clock; the
//! caller pumps `tick` from its event loop to fire the deadlines.

use super::recognizer::{RecognizerEvent, SpeechRecognizer};
use super::transcript::TranscriptBuffer;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Logical listening state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapturePhase {
    /// Not listening
    Idle,
    /// Listening for speech
    Listening,
}

/// Work handed back to the caller by a transition or tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureAction {
    /// A coalesced transcript is ready to submit as a user turn
    Submit(String),
}

/// Single-shot timer that auto-stops listening after prolonged quiet
///
/// Re-armed on every recognition result, interim or final.
#[derive(Debug, Clone)]
pub struct SilenceWatchdog {
    deadline: Option<Instant>,
    timeout: Duration,
}

impl SilenceWatchdog {
    pub fn new(timeout: Duration) -> Self {
        Self {
            deadline: None,
            timeout,
        }
    }

    /// Restart the quiet interval from `now`
    pub fn rearm(&mut self, now: Instant) {
        self.deadline = Some(now + self.timeout);
    }

    pub fn disarm(&mut self) {
        self.deadline = None;
    }

    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Whether the quiet interval has elapsed
    pub fn expired(&self, now: Instant) -> bool {
        matches!(self.deadline, Some(deadline) if now >= deadline)
    }
}

/// State machine orchestrating start/stop/restart of continuous recognition
pub struct CaptureMachine {
    phase: CapturePhase,
    interim: String,
    buffer: TranscriptBuffer,
    watchdog: SilenceWatchdog,
    submit_at: Option<Instant>,
    submit_delay: Duration,
}

impl CaptureMachine {
    pub fn new(silence_timeout: Duration, submit_delay: Duration) -> Self {
        Self {
            phase: CapturePhase::Idle,
            interim: String::new(),
            buffer: TranscriptBuffer::new(),
            watchdog: SilenceWatchdog::new(silence_timeout),
            submit_at: None,
            submit_delay,
        }
    }

    pub fn phase(&self) -> CapturePhase {
        self.phase
    }

    pub fn is_listening(&self) -> bool {
        self.phase == CapturePhase::Listening
    }

    /// The current not-yet-finalized transcript
    pub fn interim(&self) -> &str {
        &self.interim
    }

    /// The accumulated-but-unsent final transcript
    pub fn buffer(&self) -> &TranscriptBuffer {
        &self.buffer
    }

    /// Explicit user toggle between listening and idle
    pub fn toggle(&mut self, recognizer: &mut dyn SpeechRecognizer) -> crate::Result<()> {
        match self.phase {
            CapturePhase::Idle => self.start_listening(recognizer),
            CapturePhase::Listening => self.stop_listening(recognizer),
        }
    }

    /// Begin listening; no-op when already listening
    ///
    /// Clears the interim transcript and the transcript buffer. The silence
    /// watchdog stays disarmed until the first result arrives.
    pub fn start_listening(&mut self, recognizer: &mut dyn SpeechRecognizer) -> crate::Result<()> {
        if self.phase == CapturePhase::Listening {
            return Ok(());
        }
        recognizer.start()?;
        self.phase = CapturePhase::Listening;
        self.interim.clear();
        self.buffer.clear();
        self.watchdog.disarm();
        debug!("Listening started");
        Ok(())
    }

    /// Stop listening; no-op when already idle
    ///
    /// Cancels the silence watchdog. A pending submit deadline survives, so
    /// finals captured just before the stop still go out.
    pub fn stop_listening(&mut self, recognizer: &mut dyn SpeechRecognizer) -> crate::Result<()> {
        if self.phase == CapturePhase::Idle {
            return Ok(());
        }
        recognizer.stop()?;
        self.phase = CapturePhase::Idle;
        self.interim.clear();
        self.watchdog.disarm();
        debug!("Listening stopped");
        Ok(())
    }

    /// Feed one recognition event through the machine
    pub fn handle_event(
        &mut self,
        event: RecognizerEvent,
        recognizer: &mut dyn SpeechRecognizer,
        now: Instant,
    ) -> crate::Result<()> {
        match event {
            RecognizerEvent::SessionStarted => {
                // Fresh session, fresh transcript state
                self.interim.clear();
                self.buffer.clear();
            }
            RecognizerEvent::SessionEnded => {
                // Platform session limits end the session underneath us;
                // restart only while logically still listening, otherwise a
                // misclassified stop turns into a restart loop
                if self.phase == CapturePhase::Listening {
                    debug!("Recognition session ended while listening; restarting");
                    recognizer.start()?;
                }
            }
            RecognizerEvent::Result { finals, interim } => {
                if self.phase != CapturePhase::Listening {
                    debug!("Dropping recognition result received while idle");
                    return Ok(());
                }

                self.watchdog.rearm(now);
                self.interim = interim;

                let had_final = !finals.is_empty();
                for fragment in &finals {
                    self.buffer.push(fragment);
                }

                // Debounce: the window opens at the first final of a burst
                // and is not pushed back by trailing finals, which coalesce
                // into the same outgoing message
                if had_final && self.submit_at.is_none() {
                    self.submit_at = Some(now + self.submit_delay);
                }
            }
            RecognizerEvent::Error(error) => {
                if error.is_transient() {
                    debug!("Ignoring transient recognition error: {}", error);
                } else {
                    warn!("Recognition error: {}", error);
                    self.phase = CapturePhase::Idle;
                    self.interim.clear();
                    self.watchdog.disarm();
                }
            }
        }
        Ok(())
    }

    /// Fire any elapsed deadlines
    ///
    /// Call this periodically from the event loop with the current time.
    pub fn tick(
        &mut self,
        recognizer: &mut dyn SpeechRecognizer,
        now: Instant,
    ) -> crate::Result<Vec<CaptureAction>> {
        let mut actions = Vec::new();

        if self.phase == CapturePhase::Listening && self.watchdog.expired(now) {
            debug!("Silence watchdog fired; stopping listening");
            self.stop_listening(recognizer)?;
        }

        if matches!(self.submit_at, Some(at) if now >= at) {
            self.submit_at = None;
            let text = self.buffer.take();
            if !text.is_empty() {
                actions.push(CaptureAction::Submit(text));
            }
        }

        Ok(actions)
    }
}
