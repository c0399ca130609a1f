use cookie::time::Duration;
use cookie::{Cookie, SameSite};

pub const COOKIE_NAME: &str = "access_token";

/// SameSite=None requires Secure, so the cookie only travels over https
/// - even against localhost, which is why local development runs --tls.
pub fn session_cookie(token: &str) -> String {
    Cookie::build((COOKIE_NAME, token))
        .http_only(true)
        .same_site(SameSite::None)
        .secure(true)
        .path("/")
        .build()
        .to_string()
}

pub fn clear_cookie() -> String {
    Cookie::build((COOKIE_NAME, ""))
        .http_only(true)
        .same_site(SameSite::None)
        .secure(true)
        .path("/")
        .max_age(Duration::ZERO)
        .build()
        .to_string()
}
