//! Transcript buffer
//!
//! Accumulates finalized speech fragments until a pause hands them off as
//! one outgoing message. Cleared by the handoff and on every new listening
//! session, so stale speech never leaks into a later message.

/// Space-separated accumulation of finalized transcript fragments
#[derive(Debug, Clone, Default)]
pub struct TranscriptBuffer {
    text: String,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a finalized fragment
    pub fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(fragment);
    }

    /// Hand off the buffered text, leaving the buffer empty
    pub fn take(&mut self) -> String {
        std::mem::take(&mut self.text).trim().to_string()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}
