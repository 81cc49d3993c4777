use async_trait::async_trait;

use super::{Command, CommandResult, SessionInfo, StateChange};
use crate::interpreter::http::parse_endpoint;

pub struct EndpointCommand;

#[async_trait]
impl Command for EndpointCommand {
    fn name(&self) -> &str {
        "/endpoint"
    }

    fn description(&self) -> &str {
        "show the interpreter address, switch to and save a new one, or `reset` to the default"
    }

    async fn execute(&self, info: &SessionInfo<'_>) -> CommandResult {
        if info.args.is_empty() {
            println!("  endpoint  {}", info.endpoint);
            return CommandResult::Handled;
        }

        if info.args == "reset" {
            return CommandResult::StateChanged(StateChange::EndpointReset);
        }

        if let Err(e) = parse_endpoint(info.args) {
            eprintln!("  ✗ {e:#}");
            return CommandResult::Handled;
        }

        if info.args == info.endpoint {
            println!("  already using {}", info.endpoint);
            return CommandResult::Handled;
        }

        CommandResult::StateChanged(StateChange::Endpoint(info.args.to_string()))
    }
}
