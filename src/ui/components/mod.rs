pub mod input_bar;
pub mod message_list;
pub mod role_prompt;
pub mod sidebar;

pub use input_bar::InputBar;
pub use message_list::MessageList;
pub use role_prompt::RolePrompt;
pub use sidebar::Sidebar;
