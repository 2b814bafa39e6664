//! Application state management
//!
//! The central state holder for the Parley UI: the conversation store, the
//! speech capture machine, the worker handles, and the flags the components
//! render from. All mutation happens on the UI thread through the methods
//! here; workers communicate over channels drained by `poll`.

use crate::backend::{BackendEvent, BackendHandle, TurnRequest};
use crate::chat::{ConversationStore, Message};
use crate::config::AppConfig;
use crate::image::{ingest_image, ImageAttachment, TextExtractor};
use crate::roles::{confirmation_message, Role, GREETING};
use crate::speech::{
    CaptureAction, CaptureMachine, RecognizerEvent, SpeechRecognizer, SynthesisEvent,
    SynthesisHandle,
};
use crossbeam_channel::Receiver;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};
use uuid::Uuid;

/// One turn waiting on the backend
///
/// Turns may overlap (a second send while the first is in flight); each
/// outcome is matched back to its own entry so every submitted turn gets
/// exactly one reply or failure.
#[derive(Debug, Clone, Copy)]
struct PendingTurn {
    request_id: Uuid,
    chat_id: Uuid,
}

/// Central application state
pub struct AppState {
    /// Configuration
    pub config: AppConfig,

    /// Conversation store with the active-chat pointer
    pub store: ConversationStore,

    /// Speech capture state machine
    pub capture: CaptureMachine,

    /// Platform recognition capability
    recognizer: Box<dyn SpeechRecognizer>,

    /// Events from the recognition engine
    recognizer_events: Receiver<RecognizerEvent>,

    /// Handle for speaking bot replies
    synthesis: SynthesisHandle,

    /// Handle for backend turn round trips
    backend: BackendHandle,

    /// Optional OCR capability for attached images
    ocr: Option<Box<dyn TextExtractor>>,

    /// Turns currently in flight, in submission order
    pending_turns: Vec<PendingTurn>,

    /// Whether any turn is awaiting its reply
    pub is_processing: bool,

    /// Current text input
    pub input_text: String,

    /// Image staged for the next turn
    pub pending_image: Option<ImageAttachment>,

    /// Role selected for this conversation, if any
    pub role: Option<Role>,

    /// Whether the sidebar is expanded
    pub sidebar_open: bool,

    /// Last user-facing error line
    pub last_error: Option<String>,
}

impl AppState {
    /// Create the application state and greet the initial chat
    pub fn new(
        config: AppConfig,
        recognizer: Box<dyn SpeechRecognizer>,
        recognizer_events: Receiver<RecognizerEvent>,
        synthesis: SynthesisHandle,
        backend: BackendHandle,
    ) -> Self {
        let store = ConversationStore::new(config.title_len);
        let capture = CaptureMachine::new(config.silence_timeout, config.submit_delay);

        let mut state = Self {
            config,
            store,
            capture,
            recognizer,
            recognizer_events,
            synthesis,
            backend,
            ocr: None,
            pending_turns: Vec::new(),
            is_processing: false,
            input_text: String::new(),
            pending_image: None,
            role: None,
            sidebar_open: true,
            last_error: None,
        };
        state.greet_active_chat();
        state
    }

    /// Install an OCR capability for attached images
    pub fn with_ocr(mut self, ocr: Box<dyn TextExtractor>) -> Self {
        self.ocr = Some(ocr);
        self
    }

    /// Append the greeting to the active chat and speak it
    fn greet_active_chat(&mut self) {
        let chat_id = self.store.active_id();
        self.store.append_message(chat_id, Message::bot(GREETING));
        if let Err(e) = self.synthesis.speak(GREETING) {
            debug!("Could not queue greeting: {}", e);
        }
    }

    /// Start a new chat and make it active
    pub fn new_chat(&mut self) {
        self.store.create_chat();
        self.role = None;
        self.greet_active_chat();
    }

    /// Switch the active chat; no-op on unknown id
    pub fn select_chat(&mut self, id: Uuid) {
        self.store.select_chat(id);
    }

    /// Delete a chat, greeting the replacement if one had to be created
    pub fn delete_chat(&mut self, id: Uuid) {
        use crate::chat::store::DeleteOutcome;
        if let DeleteOutcome::Replaced(_) = self.store.delete_chat(id) {
            self.role = None;
            self.greet_active_chat();
        }
    }

    /// Record the chosen role and confirm it out loud
    pub fn select_role(&mut self, role: Role) {
        self.role = Some(role);
        let confirmation = confirmation_message(&role);
        let chat_id = self.store.active_id();
        self.store
            .append_message(chat_id, Message::bot(confirmation.clone()));
        if let Err(e) = self.synthesis.speak(confirmation) {
            debug!("Could not queue confirmation: {}", e);
        }
    }

    /// Toggle speech capture on or off
    pub fn toggle_listening(&mut self) {
        if let Err(e) = self.capture.toggle(self.recognizer.as_mut()) {
            warn!("Could not toggle listening: {}", e);
            self.last_error = Some(e.user_message());
        }
    }

    /// Send the typed input and any staged image as one turn
    pub fn send_input(&mut self) {
        let text = std::mem::take(&mut self.input_text).trim().to_string();
        let image = self.pending_image.take();
        self.submit_turn(text, image);
    }

    /// Stage an image file for the next turn
    pub fn attach_image(&mut self, path: &Path) {
        match ingest_image(path, self.ocr.as_deref()) {
            Ok(attachment) => {
                debug!("Attached image {}", attachment.file_name);
                self.pending_image = Some(attachment);
            }
            Err(e) => {
                warn!("Could not attach image: {}", e);
                self.last_error = Some(e.user_message());
            }
        }
    }

    /// Submit one user turn to the backend
    ///
    /// Submitting with neither text nor image is a silent no-op.
    pub fn submit_turn(&mut self, text: String, image: Option<ImageAttachment>) {
        if text.is_empty() && image.is_none() {
            return;
        }

        let chat_id = self.store.active_id();
        let image_text = image
            .as_ref()
            .map(|i| i.image_text().to_string())
            .unwrap_or_default();

        let mut message = Message::user(text.clone());
        if let Some(image) = image {
            message = message.with_image(image);
        }
        self.store.append_message(chat_id, message);

        let request = TurnRequest {
            role: self.role.map(|r| r.value.to_string()).unwrap_or_default(),
            user_text: text,
            image_text,
            chat_id: chat_id.to_string(),
        };

        match self.backend.send_turn(request) {
            Ok(request_id) => {
                self.pending_turns.push(PendingTurn {
                    request_id,
                    chat_id,
                });
                self.is_processing = true;
            }
            Err(e) => {
                warn!("Could not submit turn: {}", e);
                self.last_error = Some(e.user_message());
            }
        }
    }

    /// Drain worker events and fire capture deadlines
    ///
    /// Called once per frame with the current time.
    pub fn poll(&mut self, now: Instant) {
        // Recognition events feed the capture machine
        while let Ok(event) = self.recognizer_events.try_recv() {
            if let Err(e) = self
                .capture
                .handle_event(event, self.recognizer.as_mut(), now)
            {
                warn!("Recognizer restart failed: {}", e);
                self.last_error = Some(e.user_message());
            }
        }

        // Deadlines: silence watchdog and submit debounce
        match self.capture.tick(self.recognizer.as_mut(), now) {
            Ok(actions) => {
                for action in actions {
                    match action {
                        CaptureAction::Submit(text) => self.submit_turn(text, None),
                    }
                }
            }
            Err(e) => {
                warn!("Capture tick failed: {}", e);
                self.last_error = Some(e.user_message());
            }
        }

        // Backend outcomes
        while let Some(event) = self.backend.try_recv_event() {
            match event {
                BackendEvent::Reply { request_id, reply } => {
                    let Some(index) = self
                        .pending_turns
                        .iter()
                        .position(|p| p.request_id == request_id)
                    else {
                        debug!("Dropping reply for unknown turn {}", request_id);
                        continue;
                    };
                    let pending = self.pending_turns.remove(index);
                    self.is_processing = !self.pending_turns.is_empty();

                    self.store
                        .append_message(pending.chat_id, Message::bot(reply.message.clone()));
                    if let Err(e) = self.synthesis.speak(reply.message) {
                        debug!("Could not queue reply utterance: {}", e);
                    }
                }
                BackendEvent::Failed { request_id, error } => {
                    // Logged only; the turn just stops processing
                    warn!("Turn {} failed: {}", request_id, error);
                    if let Some(index) = self
                        .pending_turns
                        .iter()
                        .position(|p| p.request_id == request_id)
                    {
                        self.pending_turns.remove(index);
                        self.is_processing = !self.pending_turns.is_empty();
                    }
                }
                BackendEvent::Shutdown => debug!("Backend worker shut down"),
            }
        }

        // Synthesis outcomes are informational
        while let Some(event) = self.synthesis.try_recv_event() {
            match event {
                SynthesisEvent::Spoken { chars } => debug!("Spoke {} chars", chars),
                SynthesisEvent::Error(e) => warn!("Synthesis error: {}", e),
                SynthesisEvent::Shutdown => debug!("Synthesis pipeline shut down"),
            }
        }
    }

    /// Whether anything animated is on screen
    pub fn needs_repaint(&self) -> bool {
        self.capture.is_listening() || self.is_processing
    }
}
