use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct ClearCommand;

#[async_trait]
impl Command for ClearCommand {
    fn name(&self) -> &str {
        "/clear"
    }

    fn description(&self) -> &str {
        "empty the script"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        info.editor.clear();
        println!("  ✓ script cleared");
        CommandResult::Handled
    }
}
