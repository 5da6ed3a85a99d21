use regulus_agent::agents::AgentDirectory;
use regulus_agent::clock::SystemClock;

use crate::commands::CommandResult;

pub fn run(show_instructions: bool) -> CommandResult {
    let config = match super::load_config("agents") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    let directory = match AgentDirectory::build(&config.agents.model, &SystemClock) {
        Ok(directory) => directory,
        Err(error) => return CommandResult::failure("agents", "instructions", error.to_string(), 3),
    };

    let mut lines = Vec::new();
    for profile in directory.profiles() {
        lines.push(format!(
            "- {} ({}, model {}): {}",
            profile.name,
            profile.role.key(),
            profile.model,
            profile.tools.join(", ")
        ));
        if show_instructions {
            lines.push(String::new());
            lines.push(profile.instructions.trim_end().to_string());
            lines.push(String::new());
        }
    }

    CommandResult::output(lines.join("\n"))
}
