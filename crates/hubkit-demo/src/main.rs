//! hubkit-demo: wiring an application with hubkit.
//!
//! Reads `HUBKIT_*` settings from the environment, registers a few
//! components and commands on a [`hubkit::Hub`], then runs the CLI inside
//! an initialize/cleanup scope.
//!
//! ```text
//! hubkit-demo components
//! hubkit-demo check-bool enabled --strict
//! HUBKIT_SAMPLE_RATE=0.1 hubkit-demo config
//! RUST_LOG=debug hubkit-demo check-rate 0.5
//! ```

use hubkit::{CliError, CliOutcome, HubError};
use hubkit_parse::{EnvReader, Settings};
use tracing_subscriber::{fmt, EnvFilter};

mod app;

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().prefix(app::ENV_PREFIX);
    init_logging(&settings);

    let mut hub = app::build_hub(&settings)?;
    let outcome = hub.scoped(|hub| hub.run_cli(std::env::args_os()));

    match outcome {
        Ok(CliOutcome::Displayed(text)) => print!("{}", text),
        Ok(CliOutcome::NoCommand) => {
            if let Some(cli) = hub.cli() {
                println!("{}", cli.command().clone().render_help());
            }
        }
        Ok(CliOutcome::NoHandler(name)) => anyhow::bail!("command '{}' has no handler", name),
        Ok(CliOutcome::Handled { command }) => tracing::debug!(%command, "done"),
        Err(HubError::Cli(CliError::Parse(e))) => e.exit(),
        Err(e) => {
            tracing::error!(error = %e, "command execution failed");
            return Err(e.into());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `HUBKIT_LOG`, otherwise warnings only.
fn init_logging<R: EnvReader>(settings: &Settings<R>) {
    let fallback = settings.string("LOG").unwrap_or_else(|| "warn".to_string());
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
