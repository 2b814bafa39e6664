use crate::image::ImageAttachment;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which side of the conversation produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    User,
    Bot,
}

/// A single conversation message
///
/// Messages are immutable once created; ordering within a chat is
/// insertion order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub direction: Direction,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub image: Option<ImageAttachment>,
}

impl Message {
    pub fn new(direction: Direction, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction,
            content: content.into(),
            timestamp: Utc::now(),
            image: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Direction::User, content)
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self::new(Direction::Bot, content)
    }

    pub fn with_image(mut self, image: ImageAttachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn is_user(&self) -> bool {
        self.direction == Direction::User
    }
}

/// Default title before the first user message arrives
pub const DEFAULT_CHAT_TITLE: &str = "New Chat";

/// A conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: Uuid,
    pub title: String,
    pub messages: Vec<Message>,
}

impl Chat {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            title: DEFAULT_CHAT_TITLE.to_string(),
            messages: Vec::new(),
        }
    }

    pub fn has_default_title(&self) -> bool {
        self.title == DEFAULT_CHAT_TITLE
    }
}

impl Default for Chat {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let m = Message::user("hello");
        assert!(m.is_user());
        assert_eq!(m.content, "hello");
        assert!(m.image.is_none());

        let b = Message::bot("hi");
        assert_eq!(b.direction, Direction::Bot);
    }

    #[test]
    fn test_new_chat_has_default_title() {
        let chat = Chat::new();
        assert!(chat.has_default_title());
        assert!(chat.messages.is_empty());
    }
}
