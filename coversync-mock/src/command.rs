use std::str::FromStr;

use coversync_core::BridgeError;
use coversync_core::handles::WindowCoveringHandler;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Open(String),
    Close(String),
    Stop(String),
    Identify(String),
    GoTo(String, u32),
    Status,
    Help,
}

impl FromStr for ConsoleCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let id = rest.trim();

        let require_id = |command: fn(String) -> ConsoleCommand| {
            if id.is_empty() {
                Err(format!("{verb} needs a cover id"))
            } else {
                Ok(command(id.to_string()))
            }
        };

        match verb {
            "open" => require_id(ConsoleCommand::Open),
            "close" => require_id(ConsoleCommand::Close),
            "stop" => require_id(ConsoleCommand::Stop),
            "identify" => require_id(ConsoleCommand::Identify),
            "goto" => {
                let (id, value) = id
                    .rsplit_once(char::is_whitespace)
                    .ok_or_else(|| "usage: goto <id> <0..10000>".to_string())?;
                let value = value
                    .parse::<u32>()
                    .map_err(|e| format!("invalid position {value}: {e}"))?;

                Ok(ConsoleCommand::GoTo(id.trim().to_string(), value))
            }
            "status" => Ok(ConsoleCommand::Status),
            "help" | "?" => Ok(ConsoleCommand::Help),
            other => Err(format!("unknown command {other}")),
        }
    }
}

/// Runs a cover command. `Status` and `Help` are handled by the caller.
pub fn execute(handler: &WindowCoveringHandler, command: ConsoleCommand) -> Result<(), BridgeError> {
    match command {
        ConsoleCommand::Open(id) => {
            let outcome = handler.on_up_or_open(&id)?;
            info!("{}: {:?}", id, outcome);
        }
        ConsoleCommand::Close(id) => {
            let outcome = handler.on_down_or_close(&id)?;
            info!("{}: {:?}", id, outcome);
        }
        ConsoleCommand::Stop(id) => {
            handler.on_stop_motion(&id)?;
        }
        ConsoleCommand::Identify(id) => handler.on_identify(&id, 5)?,
        ConsoleCommand::GoTo(id, value) => handler.on_go_to_lift_percentage(&id, value)?,
        ConsoleCommand::Status | ConsoleCommand::Help => {}
    }

    Ok(())
}
