use anyhow::Error;
use regulus_agent::error::ToolError;
use regulus_agent::toolkit::registry_from_config;
use regulus_client::ClientError;
use serde_json::Value;

use crate::commands::CommandResult;

pub fn run(tool: &str, args: Option<&str>) -> CommandResult {
    let input = match parse_input(args) {
        Ok(input) => input,
        Err(message) => return CommandResult::failure("call", "invalid_arguments", message, 4),
    };

    let config = match super::load_config("call") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let registry = match registry_from_config(&config) {
        Ok(registry) => registry,
        Err(error) => return CommandResult::failure("call", "client_init", error.to_string(), 3),
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return CommandResult::failure(
                "call",
                "runtime_init",
                format!("failed to initialize async runtime: {error}"),
                3,
            );
        }
    };

    match runtime.block_on(registry.call(tool, input)) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(rendered) => CommandResult::output(rendered),
            Err(error) => CommandResult::failure("call", "serialization", error.to_string(), 5),
        },
        Err(error) => {
            let (error_class, exit_code) = classify(&error);
            CommandResult::failure("call", error_class, describe(&error), exit_code)
        }
    }
}

fn parse_input(args: Option<&str>) -> Result<Value, String> {
    let Some(raw) = args.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Value::Object(Default::default()));
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => Ok(value),
        Ok(_) => Err("--args must be a JSON object".to_string()),
        Err(error) => Err(format!("--args is not valid JSON: {error}")),
    }
}

/// Argument problems get the short operator-facing wording; everything else
/// keeps the full error chain.
fn describe(error: &Error) -> String {
    match error.downcast_ref::<ClientError>() {
        Some(ClientError::InvalidArgument(argument)) => argument.user_message(),
        _ => format!("{error:#}"),
    }
}

fn classify(error: &Error) -> (&'static str, u8) {
    if let Some(error) = error.downcast_ref::<ToolError>() {
        return match error {
            ToolError::UnknownTool(_) => ("unknown_tool", 4),
            ToolError::InvalidInput { .. } => ("invalid_arguments", 4),
            ToolError::Download { .. } | ToolError::Network { .. } => ("download", 5),
            ToolError::Conversion(_) | ToolError::ExtractorUnavailable(_) => ("conversion", 5),
            ToolError::AgencyDirectory { .. } | ToolError::Io(_) => ("tool_failed", 5),
        };
    }

    if let Some(error) = error.downcast_ref::<ClientError>() {
        return match error {
            ClientError::InvalidArgument(_) => ("invalid_arguments", 4),
            ClientError::Http { .. } | ClientError::Transport(_) => ("upstream", 5),
            ClientError::Decode(_) | ClientError::Url(_) => ("tool_failed", 5),
        };
    }

    ("tool_failed", 5)
}
