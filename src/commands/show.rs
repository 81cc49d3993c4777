use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};
use crate::ui::EditorInput;

pub struct ShowCommand;

#[async_trait]
impl Command for ShowCommand {
    fn name(&self) -> &str {
        "/show"
    }

    fn description(&self) -> &str {
        "print the script typed so far"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        if info.editor.is_empty() {
            println!("  (empty)");
            return CommandResult::Handled;
        }
        for (i, line) in info.editor.text().lines().enumerate() {
            println!("  {:>3} │ {}", i + 1, line);
        }
        CommandResult::Handled
    }
}
