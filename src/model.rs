use crate::fields::Fields;
use serde::{Deserialize, Serialize};

/// A keyed evaluation request parsed from one CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Row identifier, taken from the table's id column if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Remaining cells keyed by header name.
    pub arguments: Fields,
}

impl Request {
    /// Create a new request.
    pub const fn new(id: Option<String>, arguments: Fields) -> Self {
        Self { id, arguments }
    }
}

/// A keyed evaluation result to be written as one CSV row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// Identifier of the request this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Result values keyed by output column name.
    pub result: Fields,
}

impl Response {
    /// Create a new response.
    pub const fn new(id: Option<String>, result: Fields) -> Self {
        Self { id, result }
    }

    /// Identity response: same id, arguments passed through as the result.
    pub fn echo(request: &Request) -> Self {
        Self {
            id: request.id.clone(),
            result: request.arguments.clone(),
        }
    }
}
