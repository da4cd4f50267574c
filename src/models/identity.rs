use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Role assigned to an account by registration or by an administrator.
///
/// The set is closed. Any other string read from the server lands in
/// `Unrecognized`, which never maps to a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Visitor,
    Staff,
    Admin,
    Legal,
    Unrecognized(String),
}

impl Role {
    /// Parse a role string, ignoring ASCII case
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "visitor" => Role::Visitor,
            "staff" => Role::Staff,
            "admin" => Role::Admin,
            "legal" => Role::Legal,
            _ => Role::Unrecognized(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Visitor => "visitor",
            Role::Staff => "staff",
            Role::Admin => "admin",
            Role::Legal => "legal",
            Role::Unrecognized(raw) => raw,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Role::Unrecognized(_))
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        Role::parse(&value)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque server-assigned account identifier.
///
/// The server may send it as a number or a string; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for UserId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => UserId(n.to_string()),
            RawId::Text(s) => UserId(s),
        })
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The authenticated user as the application sees it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: Option<UserId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Identity as exchanged with the auth service.
///
/// The server speaks camelCase. The lowercase spellings are accepted when
/// reading so that either producer converts into the same `Identity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<UserId>,
    #[serde(alias = "firstname")]
    pub first_name: String,
    #[serde(alias = "lastname")]
    pub last_name: String,
    pub role: Role,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl From<IdentityPayload> for Identity {
    fn from(payload: IdentityPayload) -> Self {
        Self {
            id: payload.id,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            role: payload.role,
        }
    }
}

impl From<&Identity> for IdentityPayload {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            first_name: identity.first_name.clone(),
            last_name: identity.last_name.clone(),
            role: identity.role.clone(),
            email: identity.email.clone(),
            token: None,
        }
    }
}
