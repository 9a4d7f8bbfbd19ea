//! Visitor identity extraction
//!
//! Pulls the session cookie and the visitor's network address out of a
//! request. Proxy headers are only consulted when `server.trust_proxy_headers`
//! is set; otherwise the socket peer address is the visitor address.

use axum::{
    async_trait,
    extract::{ConnectInfo, FromRequestParts},
    http::{header, request::Parts, HeaderMap, HeaderValue},
};
use std::convert::Infallible;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use crate::api::state::AppState;

/// Who is making the request
#[derive(Debug, Clone, Default)]
pub struct VisitorContext {
    /// Session id from the cookie, if any
    pub session_id: Option<String>,
    /// Best-known client address
    pub ip: Option<IpAddr>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for VisitorContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip());

        let forwarded = if state.trust_proxy_headers {
            client_ip(&parts.headers)
        } else {
            None
        };

        Ok(Self {
            session_id: cookie_value(&parts.headers, &state.cookie_name),
            ip: forwarded.or(peer),
        })
    }
}

/// Value of cookie `name` from the request headers
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Client address from `X-Forwarded-For` (first hop) or `X-Real-IP`
pub fn client_ip(headers: &HeaderMap) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse().ok());

    forwarded.or_else(|| {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
    })
}

/// `Set-Cookie` value binding the browser to a session
pub fn session_cookie(
    name: &str,
    session_id: &str,
    max_age_secs: u64,
    secure: bool,
) -> Option<HeaderValue> {
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        name, session_id, max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; uapwatch_session=abc-123 ; other=1"),
        );

        assert_eq!(cookie_value(&headers, "uapwatch_session").as_deref(), Some("abc-123"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_empty_cookie_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("uapwatch_session="));
        assert_eq!(cookie_value(&headers, "uapwatch_session"), None);
    }

    #[test]
    fn test_forwarded_for_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("81.2.69.160, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.2"));

        assert_eq!(client_ip(&headers), Some("81.2.69.160".parse().unwrap()));
    }

    #[test]
    fn test_real_ip_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("garbage"));
        headers.insert("x-real-ip", HeaderValue::from_static("2001:db8::7"));

        assert_eq!(client_ip(&headers), Some("2001:db8::7".parse().unwrap()));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }

    #[test]
    fn test_session_cookie_format() {
        let value = session_cookie("uapwatch_session", "abc", 60, false).unwrap();
        assert_eq!(
            value.to_str().unwrap(),
            "uapwatch_session=abc; Path=/; Max-Age=60; HttpOnly; SameSite=Lax"
        );

        let value = session_cookie("uapwatch_session", "abc", 60, true).unwrap();
        assert!(value.to_str().unwrap().ends_with("; SameSite=Lax; Secure"));
    }
}
