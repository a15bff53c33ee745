//! Dialogue states.

use crate::domain::Station;

/// Where a user is in the conversation.
///
/// Each variant carries exactly the scratch data valid in that state, so an
/// origin cannot be read before one was chosen, and going back to the main
/// menu drops everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DialogueState {
    /// Top-level menu.
    #[default]
    SelectingAction,

    /// Waiting for the departure station.
    ChoosingOrigin,

    /// Origin chosen, waiting for the arrival station.
    ChoosingDestination { origin: Station },

    /// Schedule shown; offering to save the pair.
    ConfirmingSave {
        origin: Station,
        destination: Station,
        /// The next free text is the route name.
        awaiting_name: bool,
    },

    /// Viewing, invoking and deleting saved routes.
    ManagingRoutes,

    /// Conversation ended with /cancel; only /start resumes.
    Cancelled,
}

impl DialogueState {
    /// Stable name for logs and API responses.
    pub fn name(&self) -> &'static str {
        match self {
            DialogueState::SelectingAction => "selecting_action",
            DialogueState::ChoosingOrigin => "choosing_origin",
            DialogueState::ChoosingDestination { .. } => "choosing_destination",
            DialogueState::ConfirmingSave { .. } => "confirming_save",
            DialogueState::ManagingRoutes => "managing_routes",
            DialogueState::Cancelled => "cancelled",
        }
    }

    /// Whether the state carries nothing worth keeping between messages.
    pub fn is_resting(&self) -> bool {
        matches!(self, DialogueState::SelectingAction | DialogueState::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_main_menu() {
        assert_eq!(DialogueState::default(), DialogueState::SelectingAction);
        assert_eq!(DialogueState::default().name(), "selecting_action");
    }

    #[test]
    fn resting_states() {
        assert!(DialogueState::SelectingAction.is_resting());
        assert!(DialogueState::Cancelled.is_resting());
        assert!(!DialogueState::ChoosingOrigin.is_resting());
        assert!(!DialogueState::ManagingRoutes.is_resting());
    }
}
