//! Built-in REPL commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry splits the command name from its
//! argument text, resolves aliases, and generates help. Anything that is
//! not a command is script text for the editor.

mod clear;
mod endpoint;
mod help;
mod load;
mod quit;
mod run;
mod show;

use async_trait::async_trait;
use std::sync::Arc;

use crate::ui::editor::Editor;

/// Session state available to commands during execution.
pub struct SessionInfo<'a> {
    pub editor: &'a Editor,
    pub endpoint: &'a str,
    /// Text after the command name, trimmed. Empty when there is none.
    pub args: &'a str,
}

/// A state change the REPL needs to apply after a command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    /// Switch to a new endpoint (already validated).
    Endpoint(String),
    /// Forget the saved endpoint and go back to the default.
    EndpointReset,
}

/// What the REPL should do after a command runs.
#[derive(Debug)]
pub enum CommandResult {
    /// Not a command; the line belongs to the script.
    NotACommand,
    /// Command handled, continue the REPL loop.
    Handled,
    /// Submit the editor contents.
    Run,
    /// Command produced a state change the REPL must apply.
    StateChanged(StateChange),
    /// Exit the REPL.
    Quit,
}

/// A REPL command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/run"`.
    fn name(&self) -> &str;

    /// Alternative names, e.g. `&["/r"]`.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `/help`.
    fn description(&self) -> &str;

    /// Run the command.
    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult;
}

/// Holds registered commands.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(run::RunCommand),
            Arc::new(show::ShowCommand),
            Arc::new(clear::ClearCommand),
            Arc::new(load::LoadCommand),
            Arc::new(endpoint::EndpointCommand),
            Arc::new(quit::QuitCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Dispatch a line to a matching command, or return `NotACommand`.
    ///
    /// `info.args` is ignored; the registry fills it from the line.
    pub async fn dispatch(&self, line: &str, info: &SessionInfo<'_>) -> CommandResult {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return CommandResult::NotACommand;
        }

        let (cmd, args) = match trimmed.split_once(char::is_whitespace) {
            Some((cmd, args)) => (cmd, args.trim()),
            None => (trimmed, ""),
        };

        for command in &self.commands {
            if cmd == command.name() || command.aliases().contains(&cmd) {
                // /help needs the registry to list all commands
                if command.name() == "/help" {
                    print!("{}", self.help_text());
                    return CommandResult::Handled;
                }
                let info = SessionInfo {
                    editor: info.editor,
                    endpoint: info.endpoint,
                    args,
                };
                return command.execute(&info).await;
            }
        }

        println!("unknown command: {cmd}");
        println!("type /help for available commands");
        CommandResult::Handled
    }

    /// Generate help text from all registered commands.
    pub fn help_text(&self) -> String {
        let entries: Vec<(String, &str)> = self
            .commands
            .iter()
            .map(|c| (format_label(c.name(), c.aliases()), c.description()))
            .collect();

        let max_width = entries
            .iter()
            .map(|(label, _)| label.len())
            .max()
            .unwrap_or(10);

        let mut out = String::new();
        for (label, desc) in &entries {
            out.push_str(&format!("  {label:<max_width$}  {desc}\n"));
        }
        out
    }

    #[cfg(test)]
    fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    #[cfg(test)]
    fn all_triggers(&self) -> Vec<&str> {
        let mut triggers = Vec::new();
        for cmd in &self.commands {
            triggers.push(cmd.name());
            triggers.extend_from_slice(cmd.aliases());
        }
        triggers
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn format_label(name: &str, aliases: &[&str]) -> String {
    if aliases.is_empty() {
        name.to_string()
    } else {
        format!("{} ({})", name, aliases.join(", "))
    }
}
