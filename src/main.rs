use std::io;
use std::process::exit;

use anyhow::Result;
use clap::Command;
use restforward::errors::{ForwardError, EXIT_TRANSPORT};
use restforward::execute::execute_forward;
use tracing_subscriber::EnvFilter;

fn main() {
    let cmd = Command::new("restforward")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .after_help(
            "Reads {\"path\", \"method\", \"body\", \"headers\"} as JSON from stdin and prints \
             {\"ok\", \"status\", \"body\"} to stdout.\n\
             Needs SUPABASE_REST_URL and SUPABASE_SERVICE_ROLE_KEY. \
             SUPABASE_REST_TIMEOUT_SECS optionally bounds the request.",
        );
    cmd.get_matches();

    init_tracing();

    let code = report(execute_forward(
        |name| std::env::var(name).ok(),
        io::stdin().lock(),
        io::stdout().lock(),
    ));
    exit(code);
}

// stdout carries the result object, so diagnostics go to stderr
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn report(result: Result<i32>) -> i32 {
    match result {
        Ok(code) => code,
        Err(err) => match err.downcast_ref::<ForwardError>() {
            Some(ForwardError::Client(_) | ForwardError::Transport { .. }) | None => {
                eprintln!("Error: {:?}", err);
                EXIT_TRANSPORT
            }
            Some(usage) => {
                eprintln!("{}", usage);
                usage.exit_code()
            }
        },
    }
}
