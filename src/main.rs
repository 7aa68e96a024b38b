//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `reqkit` library that handles:
//! - Command-line argument parsing
//! - Logger initialization
//! - User-facing output formatting
//!
//! All request handling is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use reqkit::config::Opt;
use reqkit::initialization::init_logger_with;
use reqkit::{error_chain_messages, ResponseRecord, Session};

#[tokio::main]
async fn main() -> Result<()> {
    let opt = Opt::parse();

    init_logger_with(opt.log_level.clone().into(), opt.log_format.clone())
        .context("Failed to initialize logger")?;

    let mut session = Session::new();
    if opt.insecure {
        session.disable_certificate_verification();
    }

    let outcome = match &opt.raw {
        Some(path) => {
            let transcript = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read transcript {}", path.display()))?;
            session.send_raw(&transcript).await
        }
        None => {
            let url = opt.url.as_deref().context("A URL or --raw is required")?;
            let method = opt.request_method()?;
            let mut config = opt.request_config()?;
            session.request(method, url, &mut config).await
        }
    };

    match outcome {
        Ok(response) => {
            print_response(&response);
            Ok(())
        }
        Err(e) => {
            eprintln!("reqkit error: {}", error_chain_messages(&e).trim_end());
            process::exit(1);
        }
    }
}

fn print_response(response: &ResponseRecord) {
    if response.is_sentinel() {
        println!("status: {} ({})", response.status_code(), response.state());
        return;
    }
    println!("status: {}", response.status_code());
    println!("encoding: {}", response.text_encoding().name());
    if let Some(url) = response.url() {
        println!("url: {url}");
    }
    println!();
    println!("{}", response.text());
}
