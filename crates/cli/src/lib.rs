pub mod commands;
pub mod logging;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "regulus",
    about = "Regulations.gov agent tooling CLI",
    long_about = "Inspect configuration, check readiness, list the agent roster and tools, and call a tool with JSON arguments.",
    after_help = "Examples:\n  regulus doctor --json\n  regulus agents --instructions\n  regulus call get_documents --args '{\"agencyId\":\"EPA\",\"pageSize\":10}'"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(
        about = "Inspect effective configuration values with source attribution and redaction"
    )]
    Config,
    #[command(about = "Validate config, API key readiness, PDF extractor and agency directory")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
    #[command(about = "List agents with their models and tools")]
    Agents {
        #[arg(long, help = "Also print each agent's rendered instructions")]
        instructions: bool,
    },
    #[command(about = "List registered tools")]
    Tools {
        #[arg(long, help = "Emit descriptors with JSON argument schemas")]
        json: bool,
    },
    #[command(about = "Invoke one tool and print its JSON result")]
    Call {
        #[arg(help = "Tool name, e.g. get_documents")]
        tool: String,
        #[arg(long, help = "Tool arguments as a JSON object")]
        args: Option<String>,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Config => commands::CommandResult::output(commands::config::run()),
        Command::Doctor { json } => commands::CommandResult::output(commands::doctor::run(json)),
        Command::Agents { instructions } => commands::agents::run(instructions),
        Command::Tools { json } => commands::tools::run(json),
        Command::Call { tool, args } => commands::call::run(&tool, args.as_deref()),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
