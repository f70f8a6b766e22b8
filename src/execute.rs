use std::io::{Read, Write};

use anyhow::{Context, Result};
use tracing::debug;

use crate::credentials::{ClientOptions, Credentials};
use crate::errors::ForwardError;
use crate::http_request::RequestDescriptor;
use crate::http_request_executor::{build_client, execute_http_request, ExecutionContext};

/// Forwards one request: configuration from `env`, descriptor from `input`,
/// result object to `output`. Returns the process exit code for a completed
/// exchange; configuration, input and transport problems come back as a
/// [`ForwardError`] inside the error.
pub fn execute_forward<F, R, W>(env: F, mut input: R, output: W) -> Result<i32>
where
    F: Fn(&str) -> Option<String>,
    R: Read,
    W: Write,
{
    // configuration is checked before stdin is touched
    let credentials = Credentials::from_lookup(&env)?;
    let options = ClientOptions::from_lookup(&env)?;
    debug!(?credentials, ?options, "configuration loaded");

    let mut raw = String::new();
    input
        .read_to_string(&mut raw)
        .map_err(|e| ForwardError::input(format!("Invalid JSON payload: {}", e)))?;
    let descriptor = RequestDescriptor::parse(&raw)?;
    debug!(path = descriptor.path(), "request descriptor parsed");

    let client = build_client(&options)?;
    let context = ExecutionContext { client: &client, credentials: &credentials };
    let result = execute_http_request(&descriptor, &context)?;

    result.write_to(output).context("while writing the result to stdout")?;
    Ok(result.exit_code())
}
