use regulus_agent::toolkit::registry_from_config;

use crate::commands::CommandResult;

pub fn run(json_output: bool) -> CommandResult {
    let config = match super::load_config("tools") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let registry = match registry_from_config(&config) {
        Ok(registry) => registry,
        Err(error) => return CommandResult::failure("tools", "client_init", error.to_string(), 3),
    };

    let descriptors = registry.descriptors();
    if json_output {
        return match serde_json::to_string_pretty(&descriptors) {
            Ok(output) => CommandResult::output(output),
            Err(error) => CommandResult::failure("tools", "serialization", error.to_string(), 4),
        };
    }

    let lines: Vec<String> = descriptors
        .iter()
        .map(|descriptor| format!("- {}: {}", descriptor.name, descriptor.description))
        .collect();
    CommandResult::output(lines.join("\n"))
}
