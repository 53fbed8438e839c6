//! TUI-less "say" command

use std::error::Error;
use std::io::{self, Write};

use tracing::debug;

use crate::core::conversation::{Conversation, TurnError};
use crate::core::gateway::Gateway;
use crate::core::session::Session;

/// Send `prompt` as the only turn of a fresh session and print the reply.
///
/// Exits with status 1 when the prompt is empty or the reply is an error.
pub async fn run_say<G: Gateway>(prompt: Vec<String>, gateway: G) -> Result<(), Box<dyn Error>> {
    let prompt = prompt.join(" ");
    let code = say_once(&prompt, &gateway, &mut io::stdout(), &mut io::stderr()).await?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Returns the process exit code. Replies go to `out`, error results to `err`.
pub async fn say_once<G, O, E>(
    prompt: &str,
    gateway: &G,
    out: &mut O,
    err: &mut E,
) -> Result<i32, Box<dyn Error>>
where
    G: Gateway + ?Sized,
    O: Write,
    E: Write,
{
    let mut conversation = Conversation::new(Session::new());
    let pending = match conversation.begin_turn(prompt) {
        Ok(pending) => pending,
        Err(TurnError::EmptyMessage) => {
            writeln!(err, "Usage: hookchat say <prompt>")?;
            return Ok(1);
        }
        Err(e) => return Err(e.into()),
    };
    debug!(session_id = %pending.session_id, "sending one-shot message");

    let result = gateway
        .send_message(&pending.session_id, &pending.message)
        .await;
    let is_error = result.is_error();
    let contract = result.contract.clone();
    conversation.finish_turn(result)?;

    if is_error {
        writeln!(err, "{contract}")?;
        return Ok(1);
    }
    writeln!(out, "{contract}")?;
    out.flush()?;
    Ok(0)
}
