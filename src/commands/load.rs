use async_trait::async_trait;
use std::path::Path;

use super::{Command, CommandResult, SessionInfo};
use crate::ui::editor::read_script;

pub struct LoadCommand;

#[async_trait]
impl Command for LoadCommand {
    fn name(&self) -> &str {
        "/load"
    }

    fn description(&self) -> &str {
        "replace the script with a .petl file"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        if info.args.is_empty() {
            eprintln!("  ✗ usage: /load <file.petl>");
            return CommandResult::Handled;
        }

        match read_script(Path::new(info.args)) {
            Ok(script) => {
                info.editor.set(&script);
                println!(
                    "  ✓ loaded {} ({} lines)",
                    info.args,
                    info.editor.line_count()
                );
            }
            Err(e) => eprintln!("  ✗ {e:#}"),
        }
        CommandResult::Handled
    }
}
