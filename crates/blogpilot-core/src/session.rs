use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// User role as reported by the API. Drives UI gating only; the server
/// enforces authorization on its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Role {
    Admin,
    #[default]
    User,
    Other(String),
}

impl Role {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Role::Admin,
            "USER" => Role::User,
            _ => Role::Other(s.trim().to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
            Role::Other(s) => s,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Role::parse(&raw))
    }
}

/// Authenticated session as persisted on the device.
///
/// `refresh_token` is absent for sessions restored from the legacy single
/// `authToken` field; such sessions cannot be refreshed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(default, rename = "userEmail")]
    pub email: String,
    #[serde(default, rename = "userName")]
    pub username: String,
    #[serde(default, rename = "userRole")]
    pub role: Role,
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn can_refresh(&self) -> bool {
        self.refresh_token
            .as_deref()
            .is_some_and(|t| !t.trim().is_empty())
    }

    /// Shortened token for display; never log the full value.
    pub fn token_preview(&self) -> String {
        let token = &self.access_token;
        let chars: Vec<char> = token.chars().collect();
        if chars.len() > 20 {
            let head: String = chars[..8].iter().collect();
            let tail: String = chars[chars.len() - 8..].iter().collect();
            format!("{head}...{tail}")
        } else {
            token.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::parse("ADMIN"), Role::Admin);
        assert_eq!(Role::parse("user"), Role::User);
        assert_eq!(Role::parse("EDITOR"), Role::Other("EDITOR".into()));
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_session_storage_field_names() {
        let session = Session {
            user_id: Some(7),
            email: "a@b.com".into(),
            username: "kim".into(),
            role: Role::Admin,
            access_token: "T1".into(),
            refresh_token: Some("R1".into()),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["accessToken"], "T1");
        assert_eq!(json["refreshToken"], "R1");
        assert_eq!(json["userEmail"], "a@b.com");
        assert_eq!(json["userName"], "kim");
        assert_eq!(json["userRole"], "ADMIN");
    }

    #[test]
    fn test_can_refresh() {
        let mut session = Session {
            user_id: None,
            email: String::new(),
            username: String::new(),
            role: Role::User,
            access_token: "T".into(),
            refresh_token: None,
        };
        assert!(!session.can_refresh());
        session.refresh_token = Some(" ".into());
        assert!(!session.can_refresh());
        session.refresh_token = Some("R".into());
        assert!(session.can_refresh());
    }

    #[test]
    fn test_token_preview() {
        let mut session = Session {
            user_id: None,
            email: String::new(),
            username: String::new(),
            role: Role::User,
            access_token: "short".into(),
            refresh_token: None,
        };
        assert_eq!(session.token_preview(), "short");
        session.access_token = "abcdefgh0123456789zyxwvuts".into();
        assert_eq!(session.token_preview(), "abcdefgh...zyxwvuts");
    }
}
