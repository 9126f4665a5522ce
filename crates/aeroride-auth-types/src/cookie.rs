//! Cookie builders for access and refresh tokens.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const ACCESS_TOKEN_COOKIE: &str = "aeroride_access_token";

pub const REFRESH_TOKEN_COOKIE: &str = "aeroride_refresh_token";

/// Access-token JWT lifetime in seconds (4 hours).
pub const ACCESS_TOKEN_EXP: u64 = 14_400;

/// Refresh-token JWT lifetime and persistent cookie Max-Age, in seconds (7 days).
pub const REFRESH_TOKEN_EXP: u64 = 604_800;

/// Refresh cookie is only sent to the rotation endpoint.
const REFRESH_COOKIE_PATH: &str = "/auth/token";

fn build(
    name: &'static str,
    value: String,
    path: &'static str,
    domain: String,
    persistent: bool,
) -> Cookie<'static> {
    let mut builder = Cookie::build((name, value))
        .path(path)
        .domain(domain)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if persistent {
        builder = builder.max_age(Duration::seconds(REFRESH_TOKEN_EXP as i64));
    }
    builder.build()
}

/// Set the access-token cookie. `persistent = false` yields a browser-session
/// cookie (no Max-Age) for sign-ins without "remember me".
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use aeroride_auth_types::cookie::{set_access_token_cookie, ACCESS_TOKEN_COOKIE};
///
/// let jar = set_access_token_cookie(CookieJar::new(), "tok".into(), "example.com".into(), true);
/// let cookie = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// ```
pub fn set_access_token_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    persistent: bool,
) -> CookieJar {
    jar.add(build(ACCESS_TOKEN_COOKIE, value, "/", domain, persistent))
}

/// Set the refresh-token cookie, scoped to `/auth/token`.
pub fn set_refresh_token_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    persistent: bool,
) -> CookieJar {
    jar.add(build(
        REFRESH_TOKEN_COOKIE,
        value,
        REFRESH_COOKIE_PATH,
        domain,
        persistent,
    ))
}

/// Expire both token cookies.
pub fn clear_cookies(jar: CookieJar, domain: String) -> CookieJar {
    let expire = |name: &'static str, path: &'static str, domain: String| {
        Cookie::build((name, ""))
            .path(path)
            .domain(domain)
            .max_age(Duration::ZERO)
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .build()
    };
    jar.add(expire(ACCESS_TOKEN_COOKIE, "/", domain.clone()))
        .add(expire(REFRESH_TOKEN_COOKIE, REFRESH_COOKIE_PATH, domain))
}
