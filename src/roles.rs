//! Role catalogue and canned assistant lines
//!
//! A new chat greets the user and asks for a role; the chosen role's wire
//! value rides on every subsequent backend request.

/// A selectable assistant role
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Role {
    /// Display label shown in the role prompt
    pub label: &'static str,
    /// Value sent to the backend
    pub value: &'static str,
}

/// Roles offered by the role-selection prompt
pub const ROLES: &[Role] = &[
    Role {
        label: "Commander",
        value: "commander",
    },
    Role {
        label: "Technology",
        value: "technical_developer",
    },
    Role {
        label: "Cluster Manager",
        value: "cluster_manager",
    },
];

/// Greeting appended as the first bot message of every new chat
pub const GREETING: &str = "Hello and welcome! Please select your role to \
receive personalized responses tailored just for you:";

/// Prefix of the confirmation spoken after a role is chosen
pub const ROLE_CONFIRMATION: &str = "You have selected the role:";

/// Suffix of the confirmation spoken after a role is chosen
pub const START_CONVERSATION: &str = ". Let's get started! How can I help you?";

/// Build the bot confirmation line for a chosen role
pub fn confirmation_message(role: &Role) -> String {
    format!("{} {}{}", ROLE_CONFIRMATION, role.label, START_CONVERSATION)
}
