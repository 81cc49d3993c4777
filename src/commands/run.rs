use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo};

pub struct RunCommand;

#[async_trait]
impl Command for RunCommand {
    fn name(&self) -> &str {
        "/run"
    }

    fn aliases(&self) -> &[&str] {
        &["/r"]
    }

    fn description(&self) -> &str {
        "send the script to the interpreter"
    }

    async fn execute(&self, _info: &SessionInfo<'_>) -> CommandResult {
        CommandResult::Run
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::test_info;
    use crate::ui::editor::Editor;

    #[tokio::test]
    async fn runs_even_with_empty_editor() {
        let editor = Editor::new();
        assert!(matches!(
            RunCommand.execute(&test_info(&editor)).await,
            CommandResult::Run
        ));
    }
}
