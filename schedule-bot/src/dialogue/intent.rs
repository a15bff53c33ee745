//! Parsing inbound text into intents.
//!
//! Buttons carry an emoji prefix; users may also type the bare words. Leading
//! symbols are stripped and keywords compared case-insensitively.

use crate::domain::Route;

pub const GET_SCHEDULE: &str = "📅 Get schedule";
pub const MY_ROUTES: &str = "⭐ My routes";
pub const BACK: &str = "↩️ Back";
pub const MAIN_MENU: &str = "🏠 Main menu";
pub const FIND_SCHEDULE: &str = "🔍 Find schedule";
pub const SAVE: &str = "💾 Save";
pub const DONT_SAVE: &str = "🚫 Don't save";

const DELETE_PREFIX: &str = "delete ";

/// Button label for invoking a saved route.
pub fn route_label(name: &str) -> String {
    format!("🚆 {name}")
}

/// Button label for deleting a saved route.
pub fn delete_label(name: &str) -> String {
    format!("❌ Delete {name}")
}

/// Conversation-level commands, valid in every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Cancel,
}

/// Parse `/start` or `/cancel`, tolerating a `@botname` suffix.
pub fn parse_command(text: &str) -> Option<Command> {
    let word = text.trim().split_whitespace().next()?;
    let word = word.split('@').next().unwrap_or(word);
    match word {
        "/start" => Some(Command::Start),
        "/cancel" => Some(Command::Cancel),
        _ => None,
    }
}

/// Drop leading emoji and punctuation, trim, lowercase.
fn keyword(text: &str) -> String {
    strip_symbols(text).to_lowercase()
}

fn strip_symbols(text: &str) -> &str {
    text.trim()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim()
}

pub fn is_back(text: &str) -> bool {
    matches!(keyword(text).as_str(), "back" | "назад")
}

/// Top-level menu intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MainIntent {
    /// Show the schedule of the saved route at this position.
    Route(usize),
    GetSchedule,
    ManageRoutes,
    Unknown,
}

pub fn parse_main(text: &str, routes: &[Route]) -> MainIntent {
    if let Some(index) = find_route(text, routes) {
        return MainIntent::Route(index);
    }

    match keyword(text).as_str() {
        "get schedule" | "schedule" => MainIntent::GetSchedule,
        "my routes" | "routes" => MainIntent::ManageRoutes,
        _ => MainIntent::Unknown,
    }
}

/// Answers to the save offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveIntent {
    Save,
    /// Explicit "don't save", or anything unrecognized.
    Decline,
}

pub fn parse_save(text: &str) -> SaveIntent {
    match keyword(text).as_str() {
        "save" | "yes" => SaveIntent::Save,
        _ => SaveIntent::Decline,
    }
}

/// Route-management intents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManageIntent {
    MainMenu,
    FindSchedule,
    /// Delete the first route with this name.
    Delete(String),
    /// Show the schedule of the saved route at this position.
    Route(usize),
    Unknown,
}

pub fn parse_manage(text: &str, routes: &[Route]) -> ManageIntent {
    if let Some(index) = find_route(text, routes) {
        return ManageIntent::Route(index);
    }

    let stripped = strip_symbols(text);
    if stripped
        .get(..DELETE_PREFIX.len())
        .is_some_and(|p| p.eq_ignore_ascii_case(DELETE_PREFIX))
    {
        let name = stripped[DELETE_PREFIX.len()..].trim();
        if !name.is_empty() {
            return ManageIntent::Delete(name.to_string());
        }
    }

    match keyword(text).as_str() {
        "main menu" | "back" | "назад" => ManageIntent::MainMenu,
        "find schedule" | "get schedule" | "schedule" => ManageIntent::FindSchedule,
        _ => ManageIntent::Unknown,
    }
}

/// Position of the first route whose label or bare name is `text`.
fn find_route(text: &str, routes: &[Route]) -> Option<usize> {
    let text = text.trim();
    routes
        .iter()
        .position(|r| text == route_label(&r.name) || text == r.name)
}

/// Position of the first route named exactly `name`.
pub fn find_route_named(name: &str, routes: &[Route]) -> Option<usize> {
    routes.iter().position(|r| r.name == name)
}
