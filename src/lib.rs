//! hookchat is a full-screen terminal chat client for AI assistants exposed
//! behind a webhook.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the session, the turn-taking rules, configuration and the
//!   webhook gateway that turns every call into a displayable result.
//! - [`ui`] renders the terminal interface and runs the interactive event loop
//!   that drives user input and display updates.
//! - [`api`] defines the webhook request and reply payloads.
//! - [`auth`] stores and removes the bearer token in the system keyring.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which resolves settings and dispatches into
//! [`ui::chat_loop`] for interactive sessions.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
