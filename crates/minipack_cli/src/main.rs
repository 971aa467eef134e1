use anyhow::Context;
use clap::Parser;
use minipack_core::BuildOptions;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// Bundle an ES module entry file and its relative imports into one script.
#[derive(Parser, Debug)]
#[command(name = "minipack", version, about)]
struct Cli {
    /// Entry module, e.g. ./example/entry.js
    entry: PathBuf,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let artifact = minipack_core::bundle(&cli.entry, &BuildOptions::default())
        .with_context(|| format!("failed to bundle {}", cli.entry.display()))?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(artifact.as_bytes())
        .and_then(|_| stdout.flush())
        .context("failed to write bundle to stdout")?;
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
