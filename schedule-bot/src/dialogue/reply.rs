//! Outbound messages.

use serde::Serialize;

/// What the transport should do with the reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "rows")]
pub enum Keyboard {
    /// Leave whatever keyboard is showing.
    Unchanged,
    /// Show these buttons, one inner `Vec` per row.
    Buttons(Vec<Vec<String>>),
    /// Hide the keyboard.
    Remove,
}

impl Keyboard {
    /// One button per row.
    pub fn column<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Keyboard::Buttons(labels.into_iter().map(|l| vec![l.into()]).collect())
    }

    /// All button labels, row by row.
    pub fn labels(&self) -> Vec<&str> {
        match self {
            Keyboard::Buttons(rows) => rows.iter().flatten().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Messages to send, in order, plus the keyboard to show with the last one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub messages: Vec<String>,
    pub keyboard: Keyboard,
}

impl Reply {
    pub fn new(message: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            messages: vec![message.into()],
            keyboard,
        }
    }

    /// A single message that keeps the current keyboard.
    pub fn text(message: impl Into<String>) -> Self {
        Self::new(message, Keyboard::Unchanged)
    }

    /// Put `message` before the existing messages.
    pub fn preceded_by(mut self, message: impl Into<String>) -> Self {
        self.messages.insert(0, message.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_keyboard() {
        let kb = Keyboard::column(["a", "b"]);
        assert_eq!(
            kb,
            Keyboard::Buttons(vec![vec!["a".to_string()], vec!["b".to_string()]])
        );
        assert_eq!(kb.labels(), ["a", "b"]);
    }

    #[test]
    fn preceded_by_keeps_order() {
        let reply = Reply::text("second").preceded_by("first");
        assert_eq!(reply.messages, ["first", "second"]);
    }

    #[test]
    fn keyboard_serializes_tagged() {
        let json = serde_json::to_value(Keyboard::column(["x"])).unwrap();
        assert_eq!(json["kind"], "buttons");
        assert_eq!(json["rows"][0][0], "x");

        let json = serde_json::to_value(Keyboard::Remove).unwrap();
        assert_eq!(json["kind"], "remove");
    }
}
