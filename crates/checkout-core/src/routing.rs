//! Result Routing
//!
//! Maps the gateway `resultCode` to a dialog completion status and the page
//! the shopper lands on.

use serde::{Deserialize, Deserializer, Serialize};

use crate::dialog::CompletionOutcome;

/// Gateway transaction outcome
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum ResultCode {
    Authorised,
    Pending,
    Received,
    Refused,
    /// Anything else, kept verbatim
    Other(String),
}

impl ResultCode {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Authorised => "Authorised",
            Self::Pending => "Pending",
            Self::Received => "Received",
            Self::Refused => "Refused",
            Self::Other(code) => code,
        }
    }
}

impl Default for ResultCode {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for ResultCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "Authorised" => Self::Authorised,
            "Pending" => Self::Pending,
            "Received" => Self::Received,
            "Refused" => Self::Refused,
            _ => Self::Other(code),
        }
    }
}

/// Any JSON value is accepted: `null` is an empty code, numbers and other
/// non-strings are kept as their JSON text.
impl<'de> Deserialize<'de> for ResultCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::String(code) => Self::from(code),
            serde_json::Value::Null => Self::default(),
            other => Self::Other(other.to_string()),
        })
    }
}

impl From<&str> for ResultCode {
    fn from(code: &str) -> Self {
        Self::from(code.to_string())
    }
}

impl From<ResultCode> for String {
    fn from(code: ResultCode) -> Self {
        match code {
            ResultCode::Other(code) => code,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ResultCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Answer of `/api/initiatePayment`
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayResult {
    /// Missing codes decode as an unrecognized (empty) code
    #[serde(default)]
    pub result_code: ResultCode,

    /// Gateway transaction reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psp_reference: Option<String>,

    /// Why a payment was refused, when the gateway says
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refusal_reason: Option<String>,
}

/// Result pages
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultTarget {
    Success,
    Pending,
    Failed,
    Error,
}

impl ResultTarget {
    pub const fn path(self) -> &'static str {
        match self {
            Self::Success => "/result/success",
            Self::Pending => "/result/pending",
            Self::Failed => "/result/failed",
            Self::Error => "/result/error",
        }
    }
}

impl std::fmt::Display for ResultTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// How a checkout attempt ends
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Navigation {
    pub outcome: CompletionOutcome,
    pub target: ResultTarget,
}

impl Navigation {
    pub const fn new(outcome: CompletionOutcome, target: ResultTarget) -> Self {
        Self { outcome, target }
    }

    /// Payment settled outside the gateway (alternative method)
    pub const fn settled() -> Self {
        Self::new(CompletionOutcome::Success, ResultTarget::Success)
    }
}

/// Completion status and landing page for a gateway result code
pub const fn route(code: &ResultCode) -> Navigation {
    match code {
        ResultCode::Authorised => Navigation::new(CompletionOutcome::Success, ResultTarget::Success),
        ResultCode::Pending | ResultCode::Received => {
            Navigation::new(CompletionOutcome::Unknown, ResultTarget::Pending)
        }
        ResultCode::Refused => Navigation::new(CompletionOutcome::Fail, ResultTarget::Failed),
        ResultCode::Other(_) => Navigation::new(CompletionOutcome::Fail, ResultTarget::Error),
    }
}
