//! Command-line interface parsing and handling
//!
//! This module handles parsing command-line arguments and executing the appropriate commands.

pub mod say;

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use clap::{ArgAction, CommandFactory, FromArgMatches, Parser, Subcommand};
use tracing::{info, warn};

use crate::auth::AuthManager;
use crate::cli::say::run_say;
use crate::core::app::App;
use crate::core::config::settings::{
    resolve_settings, GatewaySettings, SettingsError, SettingsOverrides,
};
use crate::core::config::Config;
use crate::core::gateway::WebhookGateway;
use crate::core::keyring::KeyringTokenStore;
use crate::core::session::Session;
use crate::ui::branding::Branding;
use crate::ui::chat_loop::run_chat;
use crate::ui::theme::Theme;
use crate::utils::diagnostics::{init_tracing, TraceTarget};
use crate::utils::logging::LoggingState;

#[derive(Parser, Debug)]
#[command(name = "hookchat")]
#[command(version)]
#[command(about = "A full-screen terminal chat client for webhook-backed AI assistants")]
#[command(
    long_about = "hookchat is a full-screen terminal chat interface. Each message is POSTed to a \
webhook as {\"sessionId\", \"chatInput\"} with a bearer token, and the \"output\" field of the \
reply is shown in the transcript.\n\n\
Configuration (highest precedence first):\n\
  Webhook URL       --webhook-url, WEBHOOK_URL, 'hookchat set webhook-url'\n\
  Bearer token      BEARER_TOKEN, system keyring ('hookchat auth'), config file\n\n\
Controls:\n\
  Enter             Send the message\n\
  Alt+Enter         Insert a new line\n\
  PageUp/PageDown   Scroll through the conversation\n\
  Ctrl+L            Pause or resume the transcript log (requires --log)\n\
  Ctrl+C            Quit the application"
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Webhook endpoint, overriding WEBHOOK_URL and the config file
    #[arg(long, global = true, value_name = "URL")]
    pub webhook_url: Option<String>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append the conversation to this file
    #[arg(short = 'l', long, global = true, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Text file whose contents become the window title
    #[arg(long, global = true, value_name = "FILE")]
    pub title_file: Option<PathBuf>,

    /// Text banner shown above the conversation
    #[arg(long, global = true, value_name = "FILE")]
    pub logo_file: Option<PathBuf>,

    /// Increase diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write diagnostic output here instead of stderr (the chat screen discards it otherwise)
    #[arg(long, global = true, value_name = "FILE")]
    pub trace_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the chat interface (default)
    Chat,
    /// Send one message and print the reply
    Say {
        /// Message to send; multiple words are joined with spaces
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        prompt: Vec<String>,
    },
    /// Store the webhook bearer token in the system keyring
    Auth,
    /// Remove the stored bearer token
    Deauth,
    /// Set a configuration value
    Set {
        /// One of: webhook-url, title-file, logo-file, request-timeout, theme
        key: String,
        /// Value to set for the key
        #[arg(required = true, trailing_var_arg = true, allow_hyphen_values = true)]
        value: Vec<String>,
    },
    /// Unset a configuration value
    Unset {
        /// Configuration key to unset
        key: String,
    },
    /// Show the current configuration
    Config,
}

fn long_version() -> &'static str {
    static LONG_VERSION: OnceLock<String> = OnceLock::new();
    LONG_VERSION.get_or_init(|| {
        format!(
            "{} ({} {}, built {} for {})",
            env!("CARGO_PKG_VERSION"),
            option_env!("VERGEN_GIT_DESCRIBE").unwrap_or("unknown"),
            option_env!("VERGEN_GIT_SHA").unwrap_or("unknown"),
            option_env!("VERGEN_BUILD_DATE").unwrap_or("unknown"),
            option_env!("VERGEN_CARGO_TARGET_TRIPLE").unwrap_or("unknown"),
        )
    })
}

fn parse_args() -> Args {
    let matches = Args::command().long_version(long_version()).get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args();
    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

fn trace_target(command: &Commands, trace_file: Option<&Path>) -> TraceTarget {
    match (command, trace_file) {
        (_, Some(path)) => TraceTarget::File(path.to_path_buf()),
        (Commands::Chat, None) => TraceTarget::Discard,
        _ => TraceTarget::Stderr,
    }
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.clone().unwrap_or(Commands::Chat);
    init_tracing(args.verbose, trace_target(&command, args.trace_file.as_deref()))?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(Config::default_config_path);

    match command {
        Commands::Auth => {
            if let Err(e) = AuthManager::new().interactive_auth() {
                eprintln!("❌ Authentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Deauth => {
            if let Err(e) = AuthManager::new().interactive_deauth() {
                eprintln!("❌ Deauthentication failed: {e}");
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Set { key, value } => {
            let mut config = load_config_or_exit(&config_path);
            match config.set_value(&key, &value.join(" ")) {
                Ok(message) => {
                    config.save_to_path(&config_path)?;
                    println!("{message}");
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Unset { key } => {
            let mut config = load_config_or_exit(&config_path);
            match config.unset_value(&key) {
                Ok(message) => {
                    config.save_to_path(&config_path)?;
                    println!("{message}");
                }
                Err(e) => {
                    eprintln!("❌ {e}");
                    std::process::exit(1);
                }
            }
            Ok(())
        }
        Commands::Config => {
            let config = load_config_or_exit(&config_path);
            config.print_all(&config_path);
            Ok(())
        }
        Commands::Say { prompt } => {
            let config = load_config_or_exit(&config_path);
            let settings = gateway_settings_or_exit(&args, &config);
            run_say(prompt, WebhookGateway::new(settings)?).await
        }
        Commands::Chat => {
            let config = load_config_or_exit(&config_path);
            let settings = gateway_settings_or_exit(&args, &config);
            let gateway = Arc::new(WebhookGateway::new(settings)?);

            let title_file = args
                .title_file
                .clone()
                .unwrap_or_else(|| config.title_file_or_default());
            let logo_file = args
                .logo_file
                .clone()
                .unwrap_or_else(|| config.logo_file_or_default());
            let branding = Branding::load(&title_file, &logo_file);

            let app = App::new(
                Session::new(),
                branding,
                theme_from_config(&config),
                LoggingState::new(args.log.clone()),
            );
            run_chat(app, gateway).await
        }
    }
}

fn load_config_or_exit(config_path: &Path) -> Config {
    match Config::load_from_path(config_path) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            eprintln!();
            eprintln!("💡 Quick fixes:");
            eprintln!("  • Fix the file by hand, or move it aside to start fresh");
            std::process::exit(2);
        }
    }
}

fn gateway_settings_or_exit(args: &Args, config: &Config) -> GatewaySettings {
    let overrides = SettingsOverrides {
        webhook_url: args.webhook_url.clone(),
    };
    match resolve_settings(
        config,
        &overrides,
        |name| std::env::var(name).ok(),
        &KeyringTokenStore,
    ) {
        Ok((settings, source)) => {
            info!(%source, "using bearer token");
            settings
        }
        Err(err) => report_settings_error(&err),
    }
}

fn report_settings_error(err: &SettingsError) -> ! {
    eprintln!("{err}");
    let fixes = err.quick_fixes();
    if !fixes.is_empty() {
        eprintln!();
        eprintln!("💡 Quick fixes:");
        for fix in fixes {
            eprintln!("  • {fix}");
        }
    }
    std::process::exit(err.exit_code());
}

fn theme_from_config(config: &Config) -> Theme {
    match config.theme.as_deref() {
        None => Theme::dark_default(),
        Some(name) => Theme::from_name(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme in config; using dark");
            Theme::dark_default()
        }),
    }
}
