//! Action sink writer.
//!
//! Drives an `xdotool -` style process over its stdin, one command per line.
//! Writes are fire-and-forget: nothing is read back, and a failed write is
//! logged and dropped.

use std::process::Stdio;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::process::{Child, ChildStdin, Command};

use crate::action::{Action, Command as SinkCommand, MouseButton};
use crate::config::CommandSpec;
use crate::error::{DispatchError, DispatchResult};
use crate::log;

pub struct ActionSink<W> {
    writer: W,
    /// Held for the process lifetime, never waited on
    _child: Option<Child>,
}

impl ActionSink<ChildStdin> {
    /// Spawn the sink process with a piped stdin
    pub fn spawn(spec: &CommandSpec) -> DispatchResult<Self> {
        let spawn_err = |source| DispatchError::Spawn {
            command: spec.display(),
            source,
        };

        let mut child = Command::new(&spec.command)
            .args(&spec.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::inherit())
            .spawn()
            .map_err(spawn_err)?;

        let stdin = child.stdin.take().ok_or_else(|| {
            spawn_err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "no stdin"))
        })?;

        log::log(&format!("action sink pid {:?}: {}", child.id(), spec.display()));

        Ok(Self {
            writer: stdin,
            _child: Some(child),
        })
    }
}

impl<W: AsyncWrite + Unpin> ActionSink<W> {
    #[cfg(test)]
    pub fn from_writer(writer: W) -> Self {
        Self {
            writer,
            _child: None,
        }
    }

    /// `key <keyspec>`, where keyspec is a combo like `super+Down` or a run
    /// of `keydown X` / `keyup X` tokens.
    pub async fn press_key(&mut self, keyspec: &str) {
        self.send(format!("key {}\n", keyspec)).await;
    }

    pub async fn move_mouse_relative(&mut self, dx: i32, dy: i32) {
        self.send(format!("mousemove_relative -- {} {}\n", dx, dy)).await;
    }

    pub async fn click_mouse(&mut self, button: MouseButton) {
        self.send(format!("click {}\n", button.number())).await;
    }

    /// Replay every command of `action` in order
    pub async fn perform(&mut self, action: &Action) {
        for command in action.commands() {
            match command {
                SinkCommand::Key(spec) => self.press_key(&spec).await,
                SinkCommand::MoveRelative { dx, dy } => {
                    self.move_mouse_relative(dx, dy).await
                }
                SinkCommand::Click(button) => self.click_mouse(button).await,
            }
        }
    }

    async fn send(&mut self, line: String) {
        log::log_outgoing(&line);
        if let Err(e) = self.writer.write_all(line.as_bytes()).await {
            log::log(&format!("Sink write failed: {}", e));
            return;
        }
        if let Err(e) = self.writer.flush().await {
            log::log(&format!("Sink flush failed: {}", e));
        }
    }

    #[cfg(test)]
    pub fn get_ref(&self) -> &W {
        &self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Step;
    use std::time::Duration;

    fn written(sink: &ActionSink<Vec<u8>>) -> String {
        String::from_utf8(sink.get_ref().clone()).unwrap()
    }

    #[tokio::test]
    async fn test_press_key() {
        let mut sink = ActionSink::from_writer(Vec::new());
        sink.press_key("super+Down").await;
        assert_eq!(written(&sink), "key super+Down\n");
    }

    #[tokio::test]
    async fn test_mouse_commands() {
        let mut sink = ActionSink::from_writer(Vec::new());
        sink.move_mouse_relative(-20, 15).await;
        sink.click_mouse(MouseButton::WheelDown).await;
        sink.click_mouse("middle".parse().unwrap()).await;
        assert_eq!(
            written(&sink),
            "mousemove_relative -- -20 15\nclick 5\nclick 2\n"
        );
    }

    #[tokio::test]
    async fn test_perform_preserves_step_order() {
        let action = Action::new(vec![
            Step::Down("ctrl".to_string()),
            Step::Click(MouseButton::Left),
            Step::Up("ctrl".to_string()),
        ])
        .unwrap();

        let mut sink = ActionSink::from_writer(Vec::new());
        sink.perform(&action).await;
        assert_eq!(written(&sink), "key keydown ctrl\nclick 1\nkey keyup ctrl\n");
    }

    #[tokio::test]
    async fn test_spawned_sink_receives_command_line() {
        let out = std::env::temp_dir().join(format!("gesture-dispatch-sink-{}", std::process::id()));
        let _ = std::fs::remove_file(&out);
        let script = format!("head -n1 > '{}'", out.display());
        let spec = CommandSpec::new("sh", &["-c", script.as_str()]);

        let mut sink = ActionSink::spawn(&spec).unwrap();
        sink.press_key("super+Up").await;

        let mut received = String::new();
        for _ in 0..100 {
            received = std::fs::read_to_string(&out).unwrap_or_default();
            if received.ends_with('\n') {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        let _ = std::fs::remove_file(&out);

        assert_eq!(received, "key super+Up\n");
    }
}
