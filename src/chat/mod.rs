pub mod store;
pub mod types;

pub use store::ConversationStore;
pub use types::{Chat, Direction, Message};
