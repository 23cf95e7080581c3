//! Anonymous per-browser user identity
//!
//! The identity is whatever the `ai-chat-user-id` cookie says. There is no
//! server-side user table.

mod store;

use std::fmt;

use actix_web::cookie::{time::Duration, Cookie, SameSite};
use chat_core::Config;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use store::{CookieStore, MemoryCookieStore, RequestCookies};

pub const USER_ID_COOKIE: &str = "ai-chat-user-id";

const USER_ID_LEN: usize = 21;
const USER_ID_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id contains {0:?}, which is not allowed in a cookie value")]
    InvalidCharacter(char),
}

/// RFC 6265 `cookie-octet`: visible ASCII except `"`, `,`, `;` and backslash.
fn is_cookie_octet(c: char) -> bool {
    matches!(c, '\x21' | '\x23'..='\x2B' | '\x2D'..='\x3A' | '\x3C'..='\x5B' | '\x5D'..='\x7E')
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Fresh 21-character URL-safe id from the OS random source.
    pub fn generate() -> Self {
        let mut bytes = [0u8; USER_ID_LEN];
        OsRng.fill_bytes(&mut bytes);
        let id = bytes
            .iter()
            .map(|b| USER_ID_ALPHABET[usize::from(b & 63)] as char)
            .collect();
        Self(id)
    }

    pub fn parse(value: impl Into<String>) -> Result<Self, IdentityError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(IdentityError::EmptyId);
        }
        if let Some(c) = value.chars().find(|c| !is_cookie_octet(*c)) {
            return Err(IdentityError::InvalidCharacter(c));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityState {
    Unassigned,
    Assigned(UserId),
}

/// Where the resolver may read and write cookies. Decided once by the caller.
pub enum ExecutionContext<'a> {
    Interactive(&'a mut dyn CookieStore),
    /// No cookie storage, e.g. background work outside a request.
    Detached,
}

/// Attributes of the identity cookie.
#[derive(Debug, Clone)]
pub struct CookiePolicy {
    pub max_age: Duration,
    pub secure: bool,
}

impl Default for CookiePolicy {
    fn default() -> Self {
        Self {
            max_age: Duration::hours(24),
            secure: false,
        }
    }
}

impl CookiePolicy {
    pub fn from_config(config: &Config) -> Self {
        let seconds = config.cookie_max_age_hours.saturating_mul(3600);
        Self {
            max_age: Duration::seconds(i64::try_from(seconds).unwrap_or(i64::MAX)),
            secure: config.cookie_secure,
        }
    }

    pub fn build(&self, id: &UserId) -> Cookie<'static> {
        Cookie::build(USER_ID_COOKIE, id.as_str().to_string())
            .path("/")
            .max_age(self.max_age)
            .same_site(SameSite::Lax)
            .http_only(false)
            .secure(self.secure)
            .finish()
    }
}

#[derive(Debug, Clone, Default)]
pub struct IdentityResolver {
    policy: CookiePolicy,
}

impl IdentityResolver {
    pub fn new(policy: CookiePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &CookiePolicy {
        &self.policy
    }

    pub fn state(&self, store: &dyn CookieStore) -> IdentityState {
        match store
            .get(USER_ID_COOKIE)
            .and_then(|value| UserId::parse(value).ok())
        {
            Some(id) => IdentityState::Assigned(id),
            None => IdentityState::Unassigned,
        }
    }

    /// The stored identity, without minting one.
    pub fn current(&self, ctx: &ExecutionContext<'_>) -> Option<UserId> {
        match ctx {
            ExecutionContext::Interactive(store) => match self.state(&**store) {
                IdentityState::Assigned(id) => Some(id),
                IdentityState::Unassigned => None,
            },
            ExecutionContext::Detached => None,
        }
    }

    /// Return the stored identity, minting and storing a new one if absent.
    /// A detached context has no identity.
    pub fn get_or_create(&self, ctx: &mut ExecutionContext<'_>) -> Option<UserId> {
        let ExecutionContext::Interactive(store) = ctx else {
            tracing::debug!("No cookie storage; treating caller as anonymous");
            return None;
        };

        match self.state(&**store) {
            IdentityState::Assigned(id) => Some(id),
            IdentityState::Unassigned => {
                let id = UserId::generate();
                store.set(self.policy.build(&id));
                tracing::debug!("Assigned new user id {}", id);
                Some(id)
            }
        }
    }

    /// Overwrite the stored identity with `new_id`.
    pub fn update(
        &self,
        ctx: &mut ExecutionContext<'_>,
        new_id: &str,
    ) -> Result<UserId, IdentityError> {
        let id = UserId::parse(new_id)?;
        match ctx {
            ExecutionContext::Interactive(store) => store.set(self.policy.build(&id)),
            ExecutionContext::Detached => {
                tracing::debug!("No cookie storage; user id update not persisted");
            }
        }
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_url_safe_and_distinct() {
        let ids: HashSet<String> = (0..256).map(|_| UserId::generate().0).collect();
        assert_eq!(ids.len(), 256);
        for id in &ids {
            assert_eq!(id.len(), 21);
            assert!(id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'));
        }
    }

    #[test]
    fn parse_rejects_blank_ids() {
        assert_eq!(UserId::parse(""), Err(IdentityError::EmptyId));
        assert_eq!(UserId::parse("   "), Err(IdentityError::EmptyId));
        assert_eq!(UserId::parse("abc").unwrap().as_str(), "abc");
    }

    #[test]
    fn parse_rejects_cookie_delimiters() {
        for (raw, bad) in [
            ("team a", ' '),
            ("a;Max-Age=0", ';'),
            ("a,b", ','),
            ("\"quoted\"", '"'),
            ("back\\slash", '\\'),
            ("caf\u{e9}", '\u{e9}'),
        ] {
            assert_eq!(UserId::parse(raw), Err(IdentityError::InvalidCharacter(bad)));
        }
        assert!(UserId::parse("user.42@example:x").is_ok());
    }

    #[test]
    fn updated_id_survives_cookie_round_trip() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new();
        let id = resolver
            .update(&mut ExecutionContext::Interactive(&mut store), "imported.user-7")
            .unwrap();

        let header = resolver.policy().build(&id).to_string();
        let parsed = Cookie::parse(header).unwrap();
        let mut next = MemoryCookieStore::new().with_cookie(USER_ID_COOKIE, parsed.value());
        let again = resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut next))
            .unwrap();

        assert_eq!(again, id);
        assert!(next.writes().is_empty());
    }

    #[test]
    fn malformed_cookie_is_replaced() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new().with_cookie(USER_ID_COOKIE, "team a");
        let id = resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut store))
            .unwrap();
        assert_ne!(id.as_str(), "team a");
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn get_or_create_is_idempotent() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new();

        let first = resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut store))
            .unwrap();
        let second = resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut store))
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.writes().len(), 1);
    }

    #[test]
    fn existing_cookie_is_returned_without_write() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new().with_cookie(USER_ID_COOKIE, "known-user");

        let id = resolver
            .get_or_create(&mut ExecutionContext::Interactive(&mut store))
            .unwrap();

        assert_eq!(id.as_str(), "known-user");
        assert!(store.writes().is_empty());
    }

    #[test]
    fn empty_cookie_counts_as_unassigned() {
        let resolver = IdentityResolver::default();
        let store = MemoryCookieStore::new().with_cookie(USER_ID_COOKIE, "");
        assert_eq!(resolver.state(&store), IdentityState::Unassigned);
    }

    #[test]
    fn update_then_get_or_create_returns_updated_id() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new();
        let mut ctx = ExecutionContext::Interactive(&mut store);

        resolver.get_or_create(&mut ctx).unwrap();
        resolver.update(&mut ctx, "chosen-id").unwrap();
        let id = resolver.get_or_create(&mut ctx).unwrap();

        assert_eq!(id.as_str(), "chosen-id");
    }

    #[test]
    fn update_rejects_empty_id() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new();
        let err = resolver
            .update(&mut ExecutionContext::Interactive(&mut store), "")
            .unwrap_err();
        assert_eq!(err, IdentityError::EmptyId);
        assert!(store.writes().is_empty());
    }

    #[test]
    fn detached_context_is_anonymous() {
        let resolver = IdentityResolver::default();
        let mut ctx = ExecutionContext::Detached;

        assert_eq!(resolver.current(&ctx), None);
        assert_eq!(resolver.get_or_create(&mut ctx), None);
        assert_eq!(resolver.update(&mut ctx, "x").unwrap().as_str(), "x");
    }

    #[test]
    fn current_never_mints() {
        let resolver = IdentityResolver::default();
        let mut store = MemoryCookieStore::new();
        assert_eq!(
            resolver.current(&ExecutionContext::Interactive(&mut store)),
            None
        );
        assert!(store.writes().is_empty());
    }

    #[test]
    fn cookie_follows_policy() {
        let config = Config {
            cookie_max_age_hours: 48,
            cookie_secure: true,
            ..Config::default()
        };
        let policy = CookiePolicy::from_config(&config);
        let cookie = policy.build(&UserId::parse("abc").unwrap());

        assert_eq!(cookie.name(), USER_ID_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::hours(48)));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.http_only(), Some(false));
        assert_eq!(cookie.secure(), Some(true));
    }
}
