// ABOUTME: Entry point for the stitch-remote CLI application.
// ABOUTME: Parses arguments, resolves the session, and hands the terminal to ssh.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, TargetArgs};
use stitch_remote::config::{self, Config};
use stitch_remote::diagnostics::Diagnostics;
use stitch_remote::error::{Error, Result};
use stitch_remote::output::Output;
use stitch_remote::ssh::{OpenSsh, ResolvedSession, resolve_session};
use tracing_subscriber::EnvFilter;

fn main() {
    let mut cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mut output = Output::new(cli.output_mode());
    let command = cli.command.take().unwrap_or_default();

    match run(&cli, command, &mut output) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            output.error(&e.to_string());
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli, command: Commands, output: &mut Output) -> Result<i32> {
    match command {
        Commands::Init { force } => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => Config::default_path().ok_or(Error::NoConfigDir)?,
            };
            config::init_config(&path, force)?;
            output.success(&format!("Wrote configuration to {}", path.display()));
            Ok(0)
        }
        Commands::Show { target } => {
            let (ssh, session) = resolve(cli, &target, output)?;
            let argv = session.command_line(ssh.program());
            output.session(&session, &argv);
            Ok(0)
        }
        Commands::Connect { target, dry_run } => {
            let (ssh, session) = resolve(cli, &target, output)?;
            connect(&ssh, session, dry_run, output)
        }
    }
}

/// Load configuration and resolve the session, failing before any network
/// activity if ssh is missing.
fn resolve(
    cli: &Cli,
    target: &TargetArgs,
    output: &Output,
) -> Result<(OpenSsh, ResolvedSession)> {
    let mut config = Config::load_layered(cli.config.as_deref())?;
    target.apply(&mut config)?;

    let ssh = OpenSsh::locate()?;
    let mut diag = Diagnostics::default();
    let search_path = std::env::var_os("PATH");
    let result = resolve_session(&config, &ssh, search_path.as_deref(), &mut diag);

    // Emit collected warnings, including when resolution failed
    for warning in diag.warnings() {
        output.warning(warning);
    }

    Ok((ssh, result?))
}

fn connect(
    ssh: &OpenSsh,
    session: ResolvedSession,
    dry_run: bool,
    output: &mut Output,
) -> Result<i32> {
    output.progress(&format!(
        "Using your private key at {} to authenticate; if this fails, make sure the matching public key (usually the .pub file next to it) has been added to {}.",
        session.key_path().display(),
        session.target().host
    ));

    let argv = session.command_line(ssh.program());
    output.command(&argv);
    if dry_run {
        return Ok(0);
    }

    let destination = session.target().destination();
    output.start_timer();
    let code = session.launch(ssh.program())?;
    if code == 0 {
        output.success(&format!("Session to {destination} closed"));
    } else {
        tracing::warn!("ssh exited with status {code}");
    }
    Ok(code)
}
