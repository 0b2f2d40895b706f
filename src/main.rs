//! ngp - Interactive, concurrent recursive source-code grep.

use clap::{CommandFactory, Parser};
use ngp::app::Application;
use ngp::config::CliArgs;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    // `ngp -h` must exit non-zero, unlike clap's default help handling (exit 0); intercept it
    // before parsing rather than fight the derive macro's `ArgAction::Help`.
    if std::env::args().skip(1).any(|arg| arg == "-h" || arg == "--help") {
        CliArgs::command().print_help().ok();
        std::process::exit(2);
    }

    let args = CliArgs::parse();
    let mut app = Application::new(args)?;
    app.run()?;

    Ok(())
}
