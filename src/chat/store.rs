//! In-memory conversation store
//!
//! Owns the list of chats and the active-chat pointer. The active id always
//! refers to an existing chat: deleting the active chat promotes the first
//! remaining chat, and deleting the last chat creates a fresh one.

use super::types::{Chat, Message};
use tracing::debug;
use uuid::Uuid;

/// Outcome of deleting a chat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The id was unknown; nothing changed
    NotFound,
    /// A non-active chat was removed
    Removed,
    /// The active chat was removed and another chat was promoted
    Promoted(Uuid),
    /// The last chat was removed and a fresh chat was created and activated
    Replaced(Uuid),
}

/// In-memory list of chats with a single active chat
#[derive(Debug, Clone)]
pub struct ConversationStore {
    chats: Vec<Chat>,
    active: Uuid,
    title_len: usize,
}

impl ConversationStore {
    /// Create a store holding one fresh, active chat
    pub fn new(title_len: usize) -> Self {
        let chat = Chat::new();
        let active = chat.id;
        Self {
            chats: vec![chat],
            active,
            title_len,
        }
    }

    /// Create a new chat and make it active
    pub fn create_chat(&mut self) -> Uuid {
        let chat = Chat::new();
        let id = chat.id;
        self.chats.push(chat);
        self.active = id;
        debug!("Created chat {}", id);
        id
    }

    /// Switch the active chat; no-op if the id is unknown
    pub fn select_chat(&mut self, id: Uuid) -> bool {
        if self.chats.iter().any(|c| c.id == id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    /// Remove a chat, keeping the active pointer valid
    pub fn delete_chat(&mut self, id: Uuid) -> DeleteOutcome {
        let Some(index) = self.chats.iter().position(|c| c.id == id) else {
            return DeleteOutcome::NotFound;
        };
        self.chats.remove(index);
        debug!("Deleted chat {}", id);

        if self.active != id {
            return DeleteOutcome::Removed;
        }

        if let Some(first) = self.chats.first() {
            self.active = first.id;
            DeleteOutcome::Promoted(self.active)
        } else {
            DeleteOutcome::Replaced(self.create_chat())
        }
    }

    /// Append a message to a chat; returns false if the id is unknown
    ///
    /// The chat title is derived from the first user message while the
    /// title is still the default.
    pub fn append_message(&mut self, chat_id: Uuid, message: Message) -> bool {
        let title_len = self.title_len;
        let Some(chat) = self.chats.iter_mut().find(|c| c.id == chat_id) else {
            return false;
        };

        if message.is_user() && chat.has_default_title() && !message.content.is_empty() {
            chat.title = derive_title(&message.content, title_len);
        }
        chat.messages.push(message);
        true
    }

    /// Id of the active chat
    pub fn active_id(&self) -> Uuid {
        self.active
    }

    /// The active chat
    ///
    /// A desynced active pointer degrades to the first chat instead of
    /// panicking; every mutation keeps at least one chat in the store.
    pub fn active_chat(&self) -> &Chat {
        match self.chats.iter().find(|c| c.id == self.active) {
            Some(chat) => chat,
            None => &self.chats[0],
        }
    }

    /// All chats, in creation order
    pub fn chats(&self) -> &[Chat] {
        &self.chats
    }

    /// Look up a chat by id
    pub fn get(&self, id: Uuid) -> Option<&Chat> {
        self.chats.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.chats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(20)
    }
}

/// Truncate the first user message into a display title
fn derive_title(content: &str, title_len: usize) -> String {
    let mut title: String = content.chars().take(title_len).collect();
    if content.chars().count() > title_len {
        title.push_str("...");
    }
    title
}
