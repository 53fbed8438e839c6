use std::error::Error;
use std::fmt;

use keyring::Entry;

pub const KEYRING_SERVICE: &str = "hookchat";
pub const BEARER_TOKEN_ACCOUNT: &str = "bearer-token";

/// Describes failures when attempting to access the system keyring.
///
/// Recoverable errors indicate that the credential backend was
/// temporarily unavailable (for example when the keychain service is
/// locked or inaccessible). Permanent errors surface the underlying
/// cause directly so callers can report them to the user.
#[derive(Debug)]
pub enum KeyringAccessError {
    Recoverable(keyring::Error),
    Permanent(keyring::Error),
}

impl KeyringAccessError {
    fn inner(&self) -> &keyring::Error {
        match self {
            KeyringAccessError::Recoverable(err) | KeyringAccessError::Permanent(err) => err,
        }
    }

    pub fn is_recoverable(&self) -> bool {
        matches!(self, KeyringAccessError::Recoverable(_))
    }
}

impl From<keyring::Error> for KeyringAccessError {
    fn from(err: keyring::Error) -> Self {
        match err {
            keyring::Error::PlatformFailure(_) | keyring::Error::NoStorageAccess(_) => {
                KeyringAccessError::Recoverable(err)
            }
            other => KeyringAccessError::Permanent(other),
        }
    }
}

impl fmt::Display for KeyringAccessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner())
    }
}

impl Error for KeyringAccessError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner())
    }
}

/// Where the bearer token is kept between runs.
pub trait TokenStore {
    fn load_token(&self) -> Result<Option<String>, KeyringAccessError>;
    fn store_token(&self, token: &str) -> Result<(), KeyringAccessError>;
    /// Returns `false` when there was nothing to delete.
    fn delete_token(&self) -> Result<bool, KeyringAccessError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringTokenStore;

impl KeyringTokenStore {
    fn entry(&self) -> Result<Entry, KeyringAccessError> {
        Ok(Entry::new(KEYRING_SERVICE, BEARER_TOKEN_ACCOUNT)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load_token(&self) -> Result<Option<String>, KeyringAccessError> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn store_token(&self, token: &str) -> Result<(), KeyringAccessError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn delete_token(&self) -> Result<bool, KeyringAccessError> {
        match self.entry()?.delete_credential() {
            Ok(()) => Ok(true),
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }
}
