//! Diagnostic tracing setup.
//!
//! The chat screen owns the terminal, so tracing output there goes to a file
//! (or nowhere). One-shot commands write it to stderr.

use std::error::Error;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// HTTP stack crates that are chatty below `warn`.
const NOISY_MODULES: &[&str] = &["hyper", "hyper_util", "reqwest", "h2", "rustls"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceTarget {
    Stderr,
    File(PathBuf),
    Discard,
}

fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

pub fn filter_directives(verbose: u8) -> String {
    let mut directives = String::from(level_for_verbosity(verbose));
    for module in NOISY_MODULES {
        directives.push_str(&format!(",{module}=warn"));
    }
    directives
}

/// `RUST_LOG` wins over `-v` when set.
fn build_filter(verbose: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(verbose)))
}

pub fn init_tracing(verbose: u8, target: TraceTarget) -> Result<(), Box<dyn Error>> {
    install(verbose, target).map_err(|err| -> Box<dyn Error> { err })
}

fn install(verbose: u8, target: TraceTarget) -> Result<(), Box<dyn Error + Send + Sync>> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(verbose))
        .with_target(false);

    match target {
        TraceTarget::Stderr => builder.with_writer(std::io::stderr).try_init()?,
        TraceTarget::File(path) => {
            let file = OpenOptions::new().create(true).append(true).open(&path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()?
        }
        TraceTarget::Discard => builder.with_writer(std::io::sink).try_init()?,
    }
    Ok(())
}
