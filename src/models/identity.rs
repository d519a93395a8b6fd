use serde::{Deserialize, Serialize};

/// The authenticated user's externally-issued identity, as seen by this
/// client. Present only while a valid session exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: i64,
    pub email: String,
    pub full_name: Option<String>,
}

impl Identity {
    /// Name to show in the header: full name when the account has one,
    /// otherwise the email address.
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or(&self.email)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_full_name() {
        let id = Identity {
            user_id: 1,
            email: "ana@example.com".to_string(),
            full_name: Some("Ana Souza".to_string()),
        };
        assert_eq!(id.display_name(), "Ana Souza");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let id = Identity {
            user_id: 1,
            email: "ana@example.com".to_string(),
            full_name: None,
        };
        assert_eq!(id.display_name(), "ana@example.com");

        let blank = Identity {
            user_id: 1,
            email: "ana@example.com".to_string(),
            full_name: Some("   ".to_string()),
        };
        assert_eq!(blank.display_name(), "ana@example.com");
    }
}
