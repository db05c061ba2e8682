use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::Date;
use uuid::Uuid;

/// Closed set of account roles, stored and sent as `client`, `admin` and
/// `courier`. Registration only ever produces `Client`; the others are
/// provisioned directly in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Admin,
    Courier,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Courier => "courier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role {0:?}")]
pub struct UnknownRole(String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Role::Client),
            "admin" => Ok(Role::Admin),
            "courier" => Ok(Role::Courier),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

impl TryFrom<String> for Role {
    type Error = UnknownRole;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The columns a login needs from a user row.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    #[sqlx(rename = "cedula")]
    pub national_id: Option<String>,
    #[sqlx(rename = "nombre")]
    pub first_name: String,
    #[sqlx(rename = "apellido")]
    pub last_name: String,
    pub email: String,
    #[sqlx(rename = "username")]
    pub account_name: Option<String>,
    pub password_hash: String, // argon2 PHC string
    #[sqlx(try_from = "String")]
    pub role: Role,
}

impl UserRecord {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Validated registration data ready for insertion. Carries no role: the
/// store always writes `Role::Client` for new rows.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub national_id: String,
    pub phone: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub birth_date: Date,
    pub password_hash: String,
}

impl NewUser {
    /// Names of required text fields that are blank.
    pub fn blank_fields(&self) -> Vec<&'static str> {
        [
            ("cedula", &self.national_id),
            ("telefono", &self.phone),
            ("nombre", &self.first_name),
            ("apellido", &self.last_name),
            ("email", &self.email),
            ("password_hash", &self.password_hash),
        ]
        .into_iter()
        .filter(|(_, v)| v.trim().is_empty())
        .map(|(k, _)| k)
        .collect()
    }
}
