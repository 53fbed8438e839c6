//! Storing and removing the webhook bearer token.

use std::error::Error;
use std::io::{self, BufRead, Write};

use tracing::info;

use crate::core::keyring::{KeyringTokenStore, TokenStore};

const TOKEN_PROMPT: &str = "Enter the webhook bearer token: ";

pub struct AuthManager<S: TokenStore = KeyringTokenStore> {
    store: S,
}

impl AuthManager<KeyringTokenStore> {
    pub fn new() -> Self {
        Self::with_store(KeyringTokenStore)
    }
}

impl Default for AuthManager<KeyringTokenStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TokenStore> AuthManager<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn has_token(&self) -> Result<bool, Box<dyn Error>> {
        Ok(self.store.load_token()?.is_some())
    }

    pub fn store_token(&self, token: &str) -> Result<(), Box<dyn Error>> {
        let token = token.trim();
        if token.is_empty() {
            return Err("Token cannot be empty".into());
        }
        self.store.store_token(token)?;
        info!("bearer token stored in keyring");
        Ok(())
    }

    /// Prompt on stdin and store the token in the keyring.
    pub fn interactive_auth(&self) -> Result<(), Box<dyn Error>> {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        self.interactive_auth_with(&mut stdin.lock(), &mut stdout)
    }

    pub fn interactive_auth_with<R, W>(
        &self,
        input: &mut R,
        out: &mut W,
    ) -> Result<(), Box<dyn Error>>
    where
        R: BufRead,
        W: Write,
    {
        if self.has_token()? {
            writeln!(out, "A token is already stored; entering a new one replaces it.")?;
        }
        write!(out, "{TOKEN_PROMPT}")?;
        out.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            writeln!(out, "Cancelled.")?;
            return Ok(());
        }

        self.store_token(&line)?;
        writeln!(out, "✓ Token stored securely in the system keyring")?;
        writeln!(out)?;
        writeln!(out, "✅ Authentication configured successfully!")?;
        Ok(())
    }

    /// Remove the stored token, reporting what happened.
    pub fn deauth_with<W: Write>(&self, out: &mut W) -> Result<(), Box<dyn Error>> {
        if self.store.delete_token()? {
            info!("bearer token removed from keyring");
            writeln!(out, "✅ Bearer token removed from the system keyring")?;
        } else {
            writeln!(out, "No bearer token was stored in the system keyring.")?;
        }
        Ok(())
    }

    pub fn interactive_deauth(&self) -> Result<(), Box<dyn Error>> {
        self.deauth_with(&mut io::stdout())
    }
}
