//! Static event-to-action mapping and its two presets.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Deserialize;

use crate::action::Action;
use crate::error::ActionError;

/// Gesture direction as reported by the reader, paired with the arrow key it
/// triggers. The arrow is the opposite direction.
const DIRECTIONS: [(&str, &str); 4] = [
    ("UP", "Down"),
    ("RIGHT", "Left"),
    ("DOWN", "Up"),
    ("LEFT", "Right"),
];

const GESTURE_KINDS: [&str; 2] = ["SWIPE", "MOUSE"];

/// Selectable action table variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Explicit keydown/keyup sequences, plus the custom mouse button.
    #[default]
    Decomposed,
    /// `super+<Arrow>` shorthand for the eight gestures only.
    Compact,
}

impl Preset {
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Decomposed => "decomposed",
            Preset::Compact => "compact",
        }
    }

    pub fn table(&self) -> ActionTable {
        match self {
            Preset::Decomposed => decomposed_table(),
            Preset::Compact => compact_table(),
        }
    }
}

impl FromStr for Preset {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "decomposed" => Ok(Preset::Decomposed),
            "compact" => Ok(Preset::Compact),
            other => Err(ActionError::UnknownPreset(other.to_string())),
        }
    }
}

/// Result of looking an event up in the table.
#[derive(Debug, PartialEq)]
pub enum Lookup<'a> {
    Action(&'a Action),
    /// Known event deliberately bound to nothing
    NoAction,
    Unmapped,
}

/// Read-only mapping from event name to an optional action.
#[derive(Debug, Clone, Default)]
pub struct ActionTable {
    entries: HashMap<String, Option<Action>>,
}

impl ActionTable {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<Action>)>,
    {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    pub fn lookup(&self, event: &str) -> Lookup<'_> {
        match self.entries.get(event) {
            Some(Some(action)) => Lookup::Action(action),
            Some(None) => Lookup::NoAction,
            None => Lookup::Unmapped,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Event names in sorted order
    pub fn events(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn gestures() -> impl Iterator<Item = (String, &'static str)> {
    GESTURE_KINDS.iter().flat_map(|kind| {
        DIRECTIONS
            .iter()
            .map(move |(dir, arrow)| (format!("{}_GESTURE_{}_INCOMPLETE", kind, dir), *arrow))
    })
}

fn decomposed_table() -> ActionTable {
    let mut entries: Vec<(String, Option<Action>)> = gestures()
        .map(|(event, arrow)| (event, Some(Action::chord("super", arrow))))
        .collect();

    entries.push((
        "MOUSE_CUSTOM_BTN_1_PRESSED".to_string(),
        Some(Action::chord("super", "s")),
    ));
    entries.push(("MOUSE_CUSTOM_BTN_1_RELEASED".to_string(), None));

    ActionTable::from_entries(entries)
}

fn compact_table() -> ActionTable {
    ActionTable::from_entries(
        gestures().map(|(event, arrow)| (event, Some(Action::tap(&format!("super+{}", arrow))))),
    )
}
