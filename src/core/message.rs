use serde::{Deserialize, Serialize};

/// Prefix carried by every error-shaped reply synthesized by the gateway client.
pub const GATEWAY_ERROR_PREFIX: &str = "Error: Failed to connect to the LLM - ";

/// Reply text used when the webhook answers without an `output` field.
pub const NO_OUTPUT: &str = "No output";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TranscriptRole {
    User,
    Assistant,
}

impl TranscriptRole {
    pub fn as_str(self) -> &'static str {
        match self {
            TranscriptRole::User => "user",
            TranscriptRole::Assistant => "assistant",
        }
    }

    pub fn is_user(self) -> bool {
        self == TranscriptRole::User
    }

    pub fn is_assistant(self) -> bool {
        self == TranscriptRole::Assistant
    }
}

impl AsRef<str> for TranscriptRole {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for TranscriptRole {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(TranscriptRole::User),
            "assistant" => Ok(TranscriptRole::Assistant),
            _ => Err(format!("invalid transcript role: {value}")),
        }
    }
}

impl TryFrom<String> for TranscriptRole {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<TranscriptRole> for String {
    fn from(value: TranscriptRole) -> Self {
        value.as_str().to_string()
    }
}

/// Outcome of one gateway call.
///
/// `contract` is either the reply text extracted from the webhook response or
/// an error string starting with [`GATEWAY_ERROR_PREFIX`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayResult {
    pub contract: String,
}

impl GatewayResult {
    pub fn reply(contract: impl Into<String>) -> Self {
        Self {
            contract: contract.into(),
        }
    }

    pub fn no_output() -> Self {
        Self::reply(NO_OUTPUT)
    }

    pub fn failure(details: impl std::fmt::Display) -> Self {
        Self {
            contract: format!("{GATEWAY_ERROR_PREFIX}{details}"),
        }
    }

    pub fn is_error(&self) -> bool {
        self.contract.starts_with(GATEWAY_ERROR_PREFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", content = "content", rename_all = "lowercase")]
pub enum Turn {
    User(String),
    Assistant(GatewayResult),
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User(content.into())
    }

    pub fn assistant(result: GatewayResult) -> Self {
        Turn::Assistant(result)
    }

    pub fn role(&self) -> TranscriptRole {
        match self {
            Turn::User(_) => TranscriptRole::User,
            Turn::Assistant(_) => TranscriptRole::Assistant,
        }
    }

    /// Text shown for this turn: the raw input for users, the contract for replies.
    pub fn text(&self) -> &str {
        match self {
            Turn::User(content) => content,
            Turn::Assistant(result) => &result.contract,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Turn::Assistant(result) if result.is_error())
    }
}
