pub mod capture;
pub mod recognizer;
pub mod synthesis;
pub mod transcript;

pub use capture::{CaptureAction, CaptureMachine, CapturePhase};
pub use recognizer::{
    NullRecognizer, RecognitionError, RecognizerConfig, RecognizerEvent, SpeechRecognizer,
};
pub use synthesis::{
    NullSynthesizer, SynthesisEvent, SynthesisHandle, SynthesisPipeline, Synthesizer, Utterance,
    Voice,
};
pub use transcript::TranscriptBuffer;
