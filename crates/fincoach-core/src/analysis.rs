//! Structured analysis results
//!
//! Every check returns an [`Analysis`]: a status discriminator, optional
//! human-readable message and recommendation, and the machine-readable payload
//! flattened alongside them when serialized. Not-found, invalid-input and
//! insufficient-data conditions are values of this type, never errors.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome discriminator shared by all analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Success,
    Warning,
    Error,
    InsufficientData,
    NoData,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Success => "success",
            Status::Warning => "warning",
            Status::Error => "error",
            Status::InsufficientData => "insufficient_data",
            Status::NoData => "no_data",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    #[serde(flatten)]
    pub data: Option<T>,
}

impl<T> Analysis<T> {
    fn bare(status: Status) -> Self {
        Self {
            status,
            message: None,
            recommendation: None,
            data: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::bare(Status::Success)
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::bare(Status::Warning).with_message(message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::bare(Status::Error).with_message(message)
    }

    /// Missing user or goal
    pub fn not_found(what: &str) -> Self {
        Self::error(format!("{} not found", what))
    }

    pub fn insufficient_data(message: impl Into<String>) -> Self {
        Self::bare(Status::InsufficientData).with_message(message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::bare(Status::NoData).with_message(message)
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = Some(recommendation.into());
        self
    }

    pub fn with_data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    /// Payload of a successful analysis, `None` for every other status
    pub fn into_success(self) -> Option<T> {
        match self.status {
            Status::Success => self.data,
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Analysis<U> {
        Analysis {
            status: self.status,
            message: self.message,
            recommendation: self.recommendation,
            data: self.data.map(f),
        }
    }
}

/// Serialize `(key, value)` pairs as a JSON object, keeping their order
pub(crate) fn ordered_map<S, V>(pairs: &[(String, V)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
    V: Serialize,
{
    serializer.collect_map(pairs.iter().map(|(k, v)| (k, v)))
}
