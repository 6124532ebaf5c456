use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a user does in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Registers luggage and vehicles.
    Sender,
    /// Scans luggage QR codes and records custody transfers.
    Handler,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Sender => "sender",
            Role::Handler => "handler",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sender" => Ok(Role::Sender),
            "handler" => Ok(Role::Handler),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

/// A registered account. The password hash never leaves the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Ledger-assigned identifier.
    pub id: i64,

    pub fullname: String,

    /// Login name, stored lowercase. Unique.
    pub email: String,

    pub role: Role,

    /// Employer, for handlers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<String>,

    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Input for registering a new user.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signup {
    pub fullname: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub employee_id: Option<String>,
}
