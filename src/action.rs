//! Action descriptors replayed through the input sink.
//!
//! An `Action` is an immutable, non-empty list of primitive input steps. The
//! sink renders it into protocol lines with [`Action::commands`].

use std::fmt;
use std::str::FromStr;

use crate::error::ActionError;

/// Symbolic mouse button, resolved to its X11 button number on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    WheelUp,
    WheelDown,
}

impl MouseButton {
    pub fn number(&self) -> u8 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 3,
            MouseButton::WheelUp => 4,
            MouseButton::WheelDown => 5,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MouseButton::Left => "left",
            MouseButton::Middle => "middle",
            MouseButton::Right => "right",
            MouseButton::WheelUp => "wheel-up",
            MouseButton::WheelDown => "wheel-down",
        }
    }
}

impl FromStr for MouseButton {
    type Err = ActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(MouseButton::Left),
            "middle" => Ok(MouseButton::Middle),
            "right" => Ok(MouseButton::Right),
            "wheel-up" => Ok(MouseButton::WheelUp),
            "wheel-down" => Ok(MouseButton::WheelDown),
            other => Err(ActionError::UnknownButton(other.to_string())),
        }
    }
}

/// One primitive input step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Press and release a key or modifier combo, e.g. `super+Down`
    Tap(String),
    /// Hold a key down
    Down(String),
    /// Release a held key
    Up(String),
    /// Move the pointer relative to its current position
    #[allow(dead_code)]
    MoveRelative { dx: i32, dy: i32 },
    /// Click a mouse button
    #[allow(dead_code)]
    Click(MouseButton),
}

impl Step {
    /// Keyspec token for key steps, `None` for mouse steps.
    fn key_token(&self) -> Option<String> {
        match self {
            Step::Tap(key) => Some(key.clone()),
            Step::Down(key) => Some(format!("keydown {}", key)),
            Step::Up(key) => Some(format!("keyup {}", key)),
            Step::MoveRelative { .. } | Step::Click(_) => None,
        }
    }
}

/// A single sink command produced from an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Key(String),
    MoveRelative { dx: i32, dy: i32 },
    Click(MouseButton),
}

/// Immutable sequence of input steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    steps: Vec<Step>,
}

impl Action {
    #[allow(dead_code)]
    pub fn new(steps: Vec<Step>) -> Result<Self, ActionError> {
        if steps.is_empty() {
            return Err(ActionError::EmptyAction);
        }
        Ok(Self { steps })
    }

    /// Single press-and-release of `keyspec`.
    pub fn tap(keyspec: &str) -> Self {
        Self {
            steps: vec![Step::Tap(keyspec.to_string())],
        }
    }

    /// Hold `modifier`, press and release `key`, release `modifier`.
    ///
    /// `chord("super", "Down")` yields
    /// `keydown super keydown Down keyup Down keyup super`.
    pub fn chord(modifier: &str, key: &str) -> Self {
        Self {
            steps: vec![
                Step::Down(modifier.to_string()),
                Step::Down(key.to_string()),
                Step::Up(key.to_string()),
                Step::Up(modifier.to_string()),
            ],
        }
    }

    /// Render into sink commands. Consecutive key steps share one `key`
    /// command; each mouse step is its own command.
    pub fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::new();
        let mut keys: Vec<String> = Vec::new();

        for step in &self.steps {
            if let Some(token) = step.key_token() {
                keys.push(token);
                continue;
            }
            if !keys.is_empty() {
                commands.push(Command::Key(keys.join(" ")));
                keys.clear();
            }
            match step {
                Step::MoveRelative { dx, dy } => {
                    commands.push(Command::MoveRelative { dx: *dx, dy: *dy })
                }
                Step::Click(button) => commands.push(Command::Click(*button)),
                Step::Tap(_) | Step::Down(_) | Step::Up(_) => {}
            }
        }
        if !keys.is_empty() {
            commands.push(Command::Key(keys.join(" ")));
        }

        commands
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .commands()
            .iter()
            .map(|c| match c {
                Command::Key(spec) => format!("key {}", spec),
                Command::MoveRelative { dx, dy } => format!("move {} {}", dx, dy),
                Command::Click(button) => format!("click {}", button.name()),
            })
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_names_resolve_to_numbers() {
        let names = ["left", "middle", "right", "wheel-up", "wheel-down"];
        let numbers: Vec<u8> = names
            .iter()
            .map(|n| n.parse::<MouseButton>().unwrap().number())
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_unknown_button_rejected() {
        assert_eq!(
            "back".parse::<MouseButton>(),
            Err(ActionError::UnknownButton("back".to_string()))
        );
    }

    #[test]
    fn test_chord_decomposes_in_press_order() {
        let action = Action::chord("super", "Down");
        assert_eq!(
            action.commands(),
            vec![Command::Key(
                "keydown super keydown Down keyup Down keyup super".to_string()
            )]
        );
    }

    #[test]
    fn test_empty_action_rejected() {
        assert_eq!(Action::new(vec![]), Err(ActionError::EmptyAction));
    }

    #[test]
    fn test_mouse_steps_split_key_commands() {
        let action = Action::new(vec![
            Step::Tap("ctrl+c".to_string()),
            Step::MoveRelative { dx: 10, dy: -5 },
            Step::Click(MouseButton::Left),
            Step::Down("shift".to_string()),
            Step::Up("shift".to_string()),
        ])
        .unwrap();

        assert_eq!(
            action.commands(),
            vec![
                Command::Key("ctrl+c".to_string()),
                Command::MoveRelative { dx: 10, dy: -5 },
                Command::Click(MouseButton::Left),
                Command::Key("keydown shift keyup shift".to_string()),
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Action::tap("super+Left").to_string(), "key super+Left");
    }
}
