use console_exercises::command::{Cli, Exercise};
use console_exercises::terminal::EditorTerminal;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    let cli: Cli = argh::from_env();

    // Logs go to stderr; stdout belongs to the running program.
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();

    let result = EditorTerminal::new().and_then(|mut terminal| cli.command.execute(&mut terminal));
    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {:#}", err);
            std::process::exit(1);
        }
    }
}
