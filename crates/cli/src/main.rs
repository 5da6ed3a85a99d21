use std::process::ExitCode;

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    regulus_cli::logging::init();
    regulus_cli::run()
}
