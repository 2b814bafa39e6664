//! End-to-end turn flow tests
//!
//! Drive the application state directly with a scripted recognizer and a
//! scripted backend transport, the way the UI does each frame.

use crossbeam_channel::Sender;
use parking_lot::Mutex;
use parley::backend::{BackendWorker, ChatTransport, TurnReply, TurnRequest};
use parley::chat::Direction;
use parley::config::AppConfig;
use parley::speech::{
    RecognizerEvent, SpeechRecognizer, SynthesisPipeline, Synthesizer, Utterance, Voice,
};
use parley::ui::AppState;
use parley::{ParleyError, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Recognizer whose events are injected by the test
struct ScriptedRecognizer;

impl SpeechRecognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Transport returning a scripted outcome
struct ScriptedTransport {
    outcome: std::result::Result<String, ParleyError>,
    requests: Arc<Mutex<Vec<TurnRequest>>>,
}

impl ChatTransport for ScriptedTransport {
    fn send_turn(&self, request: &TurnRequest) -> Result<TurnReply> {
        self.requests.lock().push(request.clone());
        match &self.outcome {
            Ok(message) => Ok(TurnReply {
                chat_id: serde_json::json!(request.chat_id),
                message: message.clone(),
            }),
            Err(e) => Err(e.clone()),
        }
    }
}

/// Transport echoing each request back as its reply
struct EchoTransport {
    requests: Arc<Mutex<Vec<TurnRequest>>>,
}

impl ChatTransport for EchoTransport {
    fn send_turn(&self, request: &TurnRequest) -> Result<TurnReply> {
        self.requests.lock().push(request.clone());
        Ok(TurnReply {
            chat_id: serde_json::json!(request.chat_id),
            message: format!("re: {}", request.user_text),
        })
    }
}

/// Synthesizer recording what was spoken
struct RecordingSynthesizer {
    spoken: Arc<Mutex<Vec<String>>>,
}

impl Synthesizer for RecordingSynthesizer {
    fn speak(&mut self, utterance: &Utterance) -> Result<()> {
        self.spoken.lock().push(utterance.text.clone());
        Ok(())
    }
}

struct Fixture {
    state: AppState,
    recognizer_tx: Sender<RecognizerEvent>,
    requests: Arc<Mutex<Vec<TurnRequest>>>,
    spoken: Arc<Mutex<Vec<String>>>,
}

fn fixture(outcome: std::result::Result<String, ParleyError>) -> Fixture {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let transport = ScriptedTransport {
        outcome,
        requests: Arc::clone(&requests),
    };
    build_fixture(Box::new(transport), requests)
}

fn echo_fixture() -> Fixture {
    let requests = Arc::new(Mutex::new(Vec::new()));
    let transport = EchoTransport {
        requests: Arc::clone(&requests),
    };
    build_fixture(Box::new(transport), requests)
}

fn build_fixture(
    transport: Box<dyn ChatTransport>,
    requests: Arc<Mutex<Vec<TurnRequest>>>,
) -> Fixture {
    let (backend, backend_worker) = BackendWorker::new(transport);
    backend_worker.start_worker();

    let spoken = Arc::new(Mutex::new(Vec::new()));
    let synth = RecordingSynthesizer {
        spoken: Arc::clone(&spoken),
    };
    let (synthesis, synthesis_pipeline) = SynthesisPipeline::new(Box::new(synth), Voice::default());
    synthesis_pipeline.start_worker();

    let (recognizer_tx, recognizer_rx) = crossbeam_channel::unbounded();

    let state = AppState::new(
        AppConfig::default(),
        Box::new(ScriptedRecognizer),
        recognizer_rx,
        synthesis,
        backend,
    );

    Fixture {
        state,
        recognizer_tx,
        requests,
        spoken,
    }
}

/// Poll until the in-flight turn resolves or the deadline passes
fn poll_until_settled(state: &mut AppState) {
    let deadline = Instant::now() + Duration::from_secs(2);
    while state.is_processing && Instant::now() < deadline {
        state.poll(Instant::now());
        std::thread::sleep(Duration::from_millis(5));
    }
    state.poll(Instant::now());
}

fn messages(state: &AppState) -> &[parley::chat::Message] {
    &state.store.active_chat().messages
}

fn directions(state: &AppState) -> Vec<Direction> {
    messages(state).iter().map(|m| m.direction).collect()
}

#[test]
fn test_hello_turn_appends_user_then_bot() {
    let mut fx = fixture(Ok("I'm a bot response.".to_string()));

    fx.state.input_text = "hello".to_string();
    fx.state.send_input();

    assert!(fx.state.is_processing);
    poll_until_settled(&mut fx.state);

    // Greeting, then exactly one user and one bot message, in that order
    let dirs = directions(&fx.state);
    assert_eq!(dirs, vec![Direction::Bot, Direction::User, Direction::Bot]);

    let messages = messages(&fx.state);
    assert_eq!(messages[1].content, "hello");
    assert_eq!(messages[2].content, "I'm a bot response.");
    assert!(!fx.state.is_processing);

    // The reply was spoken after the greeting
    let deadline = Instant::now() + Duration::from_secs(1);
    while fx.spoken.lock().len() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(fx.spoken.lock().last().unwrap(), "I'm a bot response.");
}

#[test]
fn test_turn_carries_role_and_chat_id() {
    let mut fx = fixture(Ok("ack".to_string()));

    fx.state.select_role(parley::roles::ROLES[0]);
    fx.state.input_text = "status report".to_string();
    fx.state.send_input();
    poll_until_settled(&mut fx.state);

    let requests = fx.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].role, "commander");
    assert_eq!(requests[0].user_text, "status report");
    assert_eq!(requests[0].chat_id, fx.state.store.active_id().to_string());
}

#[test]
fn test_failed_turn_clears_processing_without_bot_message() {
    let mut fx = fixture(Err(ParleyError::BackendTimeout));

    fx.state.input_text = "hello".to_string();
    fx.state.send_input();
    poll_until_settled(&mut fx.state);

    assert!(!fx.state.is_processing);
    // Greeting plus the user message only; no duplicate or phantom reply
    let dirs = directions(&fx.state);
    assert_eq!(dirs, vec![Direction::Bot, Direction::User]);
}

#[test]
fn test_empty_submission_is_silent_noop() {
    let mut fx = fixture(Ok("never sent".to_string()));

    fx.state.input_text = "   ".to_string();
    fx.state.send_input();

    assert!(!fx.state.is_processing);
    assert_eq!(directions(&fx.state), vec![Direction::Bot]);
    assert!(fx.requests.lock().is_empty());
}

#[test]
fn test_speech_flow_submits_after_debounce() {
    let mut fx = fixture(Ok("heard you".to_string()));
    let t0 = Instant::now();

    fx.state.toggle_listening();
    assert!(fx.state.capture.is_listening());

    fx.recognizer_tx
        .send(RecognizerEvent::Result {
            finals: vec!["hello".to_string()],
            interim: String::new(),
        })
        .unwrap();
    fx.state.poll(t0);

    fx.recognizer_tx
        .send(RecognizerEvent::Result {
            finals: vec!["there".to_string()],
            interim: String::new(),
        })
        .unwrap();
    fx.state.poll(t0 + Duration::from_millis(400));

    // Inside the debounce window nothing is sent yet
    assert!(!fx.state.is_processing);

    fx.state.poll(t0 + Duration::from_secs(1));
    assert!(fx.state.is_processing);
    poll_until_settled(&mut fx.state);

    let messages = messages(&fx.state);
    let user: Vec<_> = messages.iter().filter(|m| m.is_user()).collect();
    assert_eq!(user.len(), 1);
    assert_eq!(user[0].content, "hello there");
}

#[test]
fn test_image_turn_carries_extracted_text() {
    use parley::image::TextExtractor;

    struct FixedExtractor;

    impl TextExtractor for FixedExtractor {
        fn extract(&self, _bytes: &[u8]) -> Result<String> {
            Ok("text from image".to_string())
        }
    }

    let fx = fixture(Ok("nice picture".to_string()));
    let mut state = fx.state.with_ocr(Box::new(FixedExtractor));

    let path = std::env::temp_dir().join("parley_flow_image.png");
    std::fs::write(&path, b"png bytes").unwrap();
    state.attach_image(&path);
    std::fs::remove_file(&path).ok();

    assert!(state.pending_image.is_some());
    state.input_text = "what is this?".to_string();
    state.send_input();
    poll_until_settled(&mut state);

    let requests = fx.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].user_text, "what is this?");
    assert_eq!(requests[0].image_text, "text from image");

    let user: Vec<_> = messages(&state).iter().filter(|m| m.is_user()).collect();
    assert_eq!(user.len(), 1);
    assert!(user[0].image.is_some());
}

#[test]
fn test_overlapping_turns_each_get_their_reply() {
    let mut fx = echo_fixture();

    // Second send before the first reply has come back
    fx.state.input_text = "first".to_string();
    fx.state.send_input();
    fx.state.input_text = "second".to_string();
    fx.state.send_input();

    assert!(fx.state.is_processing);
    poll_until_settled(&mut fx.state);

    let bot: Vec<_> = messages(&fx.state)
        .iter()
        .filter(|m| !m.is_user())
        .skip(1) // greeting
        .map(|m| m.content.as_str())
        .collect();
    assert_eq!(bot, vec!["re: first", "re: second"]);
    assert!(!fx.state.is_processing);
}

#[test]
fn test_delete_active_chat_promotes_then_recreates() {
    let mut fx = fixture(Ok("ack".to_string()));

    let first = fx.state.store.active_id();
    fx.state.new_chat();
    let second = fx.state.store.active_id();
    assert_ne!(first, second);

    fx.state.delete_chat(second);
    assert_eq!(fx.state.store.active_id(), first);

    fx.state.delete_chat(first);
    let fresh = fx.state.store.active_id();
    assert_ne!(fresh, first);
    // The replacement chat was greeted
    assert_eq!(directions(&fx.state), vec![Direction::Bot]);
}
