//! Credential lookup by URL pattern and the login bootstrap.

use linkchecker_types::PatternEntry;

use crate::errors::ConfigError;

/// One `[authentication]` entry: a URL pattern and the credentials to use
/// when it matches.
#[derive(Debug, Clone)]
pub struct AuthEntry {
    pub pattern: String,
    pub user: String,
    pub password: String,
}

/// The ordered authentication list plus the optional one-shot login POST
/// performed before crawling starts.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    entries: Vec<(PatternEntry, AuthEntry)>,
    pub login: Option<LoginBootstrap>,
}

/// The engine performs a one-shot POST with `loginuserfield`,
/// `loginpasswordfield`, and any extra fields, before crawling starts.
#[derive(Debug, Clone)]
pub struct LoginBootstrap {
    pub url: String,
    pub user: String,
    pub password: String,
    /// Field name the login form uses for the username. Defaults to
    /// `"login"`.
    pub user_field: String,
    /// Field name the login form uses for the password. Defaults to
    /// `"password"`.
    pub password_field: String,
    /// Additional `name=value` fields submitted alongside the credentials.
    pub extra_fields: Vec<(String, String)>,
}

impl AuthConfig {
    /// # Errors
    /// [`ConfigError::InvalidPattern`] if any entry's pattern fails to
    /// compile as a regex.
    pub fn build(entries: Vec<AuthEntry>, login: Option<LoginBootstrap>) -> Result<Self, ConfigError> {
        let compiled = entries
            .into_iter()
            .map(|entry| {
                PatternEntry::compile(&entry.pattern, false)
                    .map(|pattern| (pattern, entry.clone()))
                    .map_err(|source| ConfigError::InvalidPattern {
                        pattern: entry.pattern.clone(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            entries: compiled,
            login,
        })
    }

    /// `credentials_for(url)`: first pattern match in the ordered
    /// authentication list yields `(user, password)`, else `None`.
    #[must_use]
    pub fn credentials_for(&self, canonical_url: &str) -> Option<(&str, &str)> {
        self.entries
            .iter()
            .find(|(pattern, _)| pattern.matches(canonical_url))
            .map(|(_, entry)| (entry.user.as_str(), entry.password.as_str()))
    }
}

impl Default for LoginBootstrap {
    fn default() -> Self {
        Self {
            url: String::new(),
            user: String::new(),
            password: String::new(),
            user_field: "login".to_string(),
            password_field: "password".to_string(),
            extra_fields: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_pattern_wins() {
        let entries = vec![
            AuthEntry {
                pattern: "example.com".to_string(),
                user: "alice".to_string(),
                password: "s3cret".to_string(),
            },
            AuthEntry {
                pattern: ".*".to_string(),
                user: "anon".to_string(),
                password: "anon".to_string(),
            },
        ];
        let auth = AuthConfig::build(entries, None).unwrap();
        assert_eq!(
            auth.credentials_for("https://example.com/private"),
            Some(("alice", "s3cret"))
        );
        assert_eq!(
            auth.credentials_for("https://other.org/"),
            Some(("anon", "anon"))
        );
    }

    #[test]
    fn no_match_returns_none() {
        let auth = AuthConfig::build(Vec::new(), None).unwrap();
        assert_eq!(auth.credentials_for("https://example.com/"), None);
    }

    #[test]
    fn login_bootstrap_field_defaults() {
        let login = LoginBootstrap::default();
        assert_eq!(login.user_field, "login");
        assert_eq!(login.password_field, "password");
    }
}
