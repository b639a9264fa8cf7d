//! services/api/src/adapters/secrets.rs
//!
//! Environment-backed implementation of the `SecretSource` port.
//!
//! A user's portal password is looked up as `COOP_PASSWORD_<user id>` first and
//! falls back to the shared `COOP_PASSWORD`.

use async_trait::async_trait;
use shift_watch_core::domain::UserId;
use shift_watch_core::ports::{PortResult, SecretSource};
use std::collections::HashMap;
use std::fmt;

pub const DEFAULT_PASSWORD_VAR: &str = "COOP_PASSWORD";
pub const PER_USER_PREFIX: &str = "COOP_PASSWORD_";

#[derive(Clone, Default)]
pub struct EnvSecretSource {
    per_user: HashMap<UserId, String>,
    default: Option<String>,
}

impl EnvSecretSource {
    pub fn new(per_user: HashMap<UserId, String>, default: Option<String>) -> Self {
        Self { per_user, default }
    }

    /// Reads every `COOP_PASSWORD_<id>` variable plus the shared default.
    pub fn from_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    pub fn from_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut source = Self::default();
        for (key, value) in vars {
            if value.is_empty() {
                continue;
            }
            if key == DEFAULT_PASSWORD_VAR {
                source.default = Some(value);
            } else if let Some(id) = key
                .strip_prefix(PER_USER_PREFIX)
                .and_then(|id| id.parse::<UserId>().ok())
            {
                source.per_user.insert(id, value);
            }
        }
        source
    }
}

impl fmt::Debug for EnvSecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut users: Vec<_> = self.per_user.keys().collect();
        users.sort();
        f.debug_struct("EnvSecretSource")
            .field("per_user", &users)
            .field("has_default", &self.default.is_some())
            .finish()
    }
}

#[async_trait]
impl SecretSource for EnvSecretSource {
    async fn resolve_portal_password(&self, user_id: UserId) -> PortResult<Option<String>> {
        Ok(self
            .per_user
            .get(&user_id)
            .or(self.default.as_ref())
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn per_user_wins_over_default() {
        let source = EnvSecretSource::from_vars(vars(&[
            ("COOP_PASSWORD", "shared"),
            ("COOP_PASSWORD_7", "mine"),
            ("PATH", "/usr/bin"),
        ]));
        assert_eq!(source.resolve_portal_password(7).await.unwrap().as_deref(), Some("mine"));
        assert_eq!(source.resolve_portal_password(8).await.unwrap().as_deref(), Some("shared"));
    }

    #[tokio::test]
    async fn nothing_resolvable_is_none() {
        let source = EnvSecretSource::from_vars(vars(&[
            ("COOP_PASSWORD_abc", "ignored"),
            ("COOP_PASSWORD_3", ""),
        ]));
        assert_eq!(source.resolve_portal_password(3).await.unwrap(), None);
    }

    #[test]
    fn debug_output_hides_passwords() {
        let source = EnvSecretSource::from_vars(vars(&[("COOP_PASSWORD_2", "hunter2")]));
        let printed = format!("{:?}", source);
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("2"));
    }
}
