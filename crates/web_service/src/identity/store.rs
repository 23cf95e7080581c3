//! Cookie storage backends for the identity resolver.

use std::collections::HashMap;

use actix_web::cookie::Cookie;
use actix_web::HttpRequest;

pub trait CookieStore {
    fn get(&self, name: &str) -> Option<String>;

    fn set(&mut self, cookie: Cookie<'static>);
}

/// Cookies of one incoming request plus whatever was written while handling
/// it. Written cookies are read back by later `get` calls and handed to the
/// response through [`into_pending`](Self::into_pending).
#[derive(Debug, Default)]
pub struct RequestCookies {
    incoming: HashMap<String, String>,
    pending: Vec<Cookie<'static>>,
}

impl RequestCookies {
    pub fn from_request(req: &HttpRequest) -> Self {
        let incoming = match req.cookies() {
            Ok(cookies) => cookies
                .iter()
                .map(|c| (c.name().to_string(), c.value().to_string()))
                .collect(),
            Err(e) => {
                tracing::debug!("Unparseable Cookie header: {}", e);
                HashMap::new()
            }
        };
        Self {
            incoming,
            pending: Vec::new(),
        }
    }

    pub fn into_pending(self) -> Vec<Cookie<'static>> {
        self.pending
    }
}

impl CookieStore for RequestCookies {
    fn get(&self, name: &str) -> Option<String> {
        self.pending
            .iter()
            .rev()
            .find(|c| c.name() == name)
            .map(|c| c.value().to_string())
            .or_else(|| self.incoming.get(name).cloned())
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        self.pending.push(cookie);
    }
}

/// In-process store that records every write.
#[derive(Debug, Default)]
pub struct MemoryCookieStore {
    values: HashMap<String, String>,
    writes: Vec<Cookie<'static>>,
}

impl MemoryCookieStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cookie(mut self, name: &str, value: &str) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn writes(&self) -> &[Cookie<'static>] {
        &self.writes
    }
}

impl CookieStore for MemoryCookieStore {
    fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }

    fn set(&mut self, cookie: Cookie<'static>) {
        self.values
            .insert(cookie.name().to_string(), cookie.value().to_string());
        self.writes.push(cookie);
    }
}
