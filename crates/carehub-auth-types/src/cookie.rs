//! Cookie builders for the session token.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the session token.
pub const CAREHUB_SESSION: &str = "carehub_session";

/// Session JWT lifetime and cookie Max-Age in seconds (12 hours, one care shift).
pub const SESSION_TOKEN_EXP: u64 = 43200;

/// Set the session cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use carehub_auth_types::cookie::{set_session_cookie, CAREHUB_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "token_value".to_string(), "carehub.example".to_string());
/// let cookie = jar.get(CAREHUB_SESSION).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("carehub.example"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(43200)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_session_cookie(jar: CookieJar, value: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((CAREHUB_SESSION, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(SESSION_TOKEN_EXP as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}

/// Clear the session cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use carehub_auth_types::cookie::{clear_session_cookie, set_session_cookie, CAREHUB_SESSION};
///
/// let jar = CookieJar::new();
/// let jar = set_session_cookie(jar, "a".to_string(), "carehub.example".to_string());
/// let jar = clear_session_cookie(jar, "carehub.example".to_string());
/// let session = jar.get(CAREHUB_SESSION).unwrap();
/// assert_eq!(session.max_age(), Some(time::Duration::ZERO));
/// assert_eq!(session.value(), "");
/// ```
pub fn clear_session_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((CAREHUB_SESSION, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Strict)
        .build();
    jar.add(cookie)
}
