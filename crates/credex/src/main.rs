//! credex CLI
//!
//! Fetches a database credential secret from AWS Secrets Manager and prints
//! a single shell export line to stdout:
//!
//! ```text
//! export POSTGRES_USER=<username> POSTGRES_PASSWORD=<password>
//! ```
//!
//! Intended to be `eval`ed by a shell during container startup. All logs and
//! errors go to stderr; stdout carries the export line or nothing.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;
mod commands;
mod tracing;

use crate::cli::{Cli, CliError, EXIT_OK, exit_code_for, parse, render_error};
use crate::tracing::{TracingConfig, TracingFormat};
use credex_secrets::AwsResolver;

fn main() {
    // NOTE: Using eprintln! in the panic hook is intentional - tracing
    // infrastructure may be corrupted during a panic.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    // Clap exits with code 2 itself on usage errors, so a missing SECRET_ID
    // fails here before any backend call is attempted.
    let cli = parse();

    let tracing_config = TracingConfig {
        format: if cli.json {
            TracingFormat::Json
        } else {
            TracingFormat::Pretty
        },
        level: cli.level.clone().into(),
        ..Default::default()
    };
    // Ignore error if tracing is already initialized (e.g., in tests)
    let _ = crate::tracing::init_tracing(tracing_config);

    let exit_code = match run(&cli) {
        Ok(line) => {
            println!("{line}");
            EXIT_OK
        }
        Err(err) => {
            render_error(&err, cli.json);
            exit_code_for(&err)
        }
    };
    std::process::exit(exit_code);
}

/// Run the export command on a lightweight single-thread runtime.
///
/// One identifier, one blocking round trip, one line - a full multi-thread
/// runtime buys nothing here.
fn run(cli: &Cli) -> Result<String, CliError> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::other(format!("Runtime error: {e}")))?;

    rt.block_on(async {
        let resolver = AwsResolver::new().await;
        let request = cli.secret_request();
        commands::export::execute_export(&resolver, &request).await
    })
}
