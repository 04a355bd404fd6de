//! Session token lookup.
//!
//! Browsers send the identity provider's session token in a cookie; API
//! clients may send it as a Bearer token instead.

use axum::http::{header, HeaderMap};

/// Where a session token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Cookie,
    Bearer,
}

impl TokenSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenSource::Cookie => "cookie",
            TokenSource::Bearer => "bearer",
        }
    }
}

/// Extract a cookie value from request headers by name.
///
/// Handles multiple `Cookie` headers and ignores empty values.
pub fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|h| h.to_str().ok())
        .flat_map(|cookie_header| cookie_header.split(';'))
        .map(str::trim)
        .find_map(|cookie| {
            let (cookie_name, cookie_value) = cookie.split_once('=')?;
            (cookie_name.trim() == name && !cookie_value.is_empty()).then_some(cookie_value)
        })
}

/// Extract a Bearer token from the Authorization header.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Finds the session token, preferring the cookie over the Bearer header.
pub fn session_token<'a>(headers: &'a HeaderMap, cookie_name: &str) -> Option<(&'a str, TokenSource)> {
    extract_cookie(headers, cookie_name)
        .map(|t| (t, TokenSource::Cookie))
        .or_else(|| extract_bearer(headers).map(|t| (t, TokenSource::Bearer)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_extract_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("theme=dark; portal_session=abc.def.ghi; other=value"),
        );

        assert_eq!(extract_cookie(&headers, "portal_session"), Some("abc.def.ghi"));
        assert_eq!(extract_cookie(&headers, "theme"), Some("dark"));
        assert_eq!(extract_cookie(&headers, "missing"), None);
    }

    #[test]
    fn test_extract_cookie_across_headers_and_empty_values() {
        let mut headers = HeaderMap::new();
        headers.append(header::COOKIE, HeaderValue::from_static("portal_session="));
        headers.append(header::COOKIE, HeaderValue::from_static("a=1; portal_session=tok"));

        assert_eq!(extract_cookie(&headers, "portal_session"), Some("tok"));
    }

    #[test]
    fn test_extract_cookie_requires_exact_name() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("portal_session_old=x"));

        assert_eq!(extract_cookie(&headers, "portal_session"), None);
    }

    #[test]
    fn test_extract_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer tok123"));
        assert_eq!(extract_bearer(&headers), Some("tok123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("bearer  tok456 "));
        assert_eq!(extract_bearer(&headers), Some("tok456"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwdw=="));
        assert_eq!(extract_bearer(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(extract_bearer(&headers), None);
    }

    #[test]
    fn test_session_token_prefers_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("portal_session=from-cookie"));
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));

        assert_eq!(
            session_token(&headers, "portal_session"),
            Some(("from-cookie", TokenSource::Cookie))
        );

        headers.remove(header::COOKIE);
        assert_eq!(
            session_token(&headers, "portal_session"),
            Some(("from-header", TokenSource::Bearer))
        );
    }

    #[test]
    fn test_session_token_missing() {
        assert_eq!(session_token(&HeaderMap::new(), "portal_session"), None);
    }
}
