use tower_cookies::{ CookieManagerLayer, Cookies, Cookie };
use time::Duration;
use cookie::SameSite;

pub const TOKEN_COOKIE_NAME: &'static str = "token";

/// Expose cookie middleware layer
pub fn cookie_layer() -> CookieManagerLayer {
    CookieManagerLayer::new()
}

pub struct TokenCookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Option<Duration>,
}

impl Default for TokenCookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: SameSite::Strict,
            path: "/".to_string(),
            max_age: None,
        }
    }
}

// Cross-site frontends need SameSite=None; that attribute requires Secure,
// so both flip together on the environment.
pub fn token_cookie_options(is_production: bool, max_age_seconds: i64) -> TokenCookieOptions {
    TokenCookieOptions {
        secure: is_production,
        same_site: if is_production { SameSite::None } else { SameSite::Strict },
        max_age: Some(Duration::seconds(max_age_seconds)),
        ..Default::default()
    }
}

pub fn build_token_cookie(token: String, options: TokenCookieOptions) -> Cookie<'static> {
    let mut cookie = Cookie::new(TOKEN_COOKIE_NAME, token);
    cookie.set_http_only(options.http_only);
    cookie.set_secure(options.secure);
    cookie.set_same_site(options.same_site);
    cookie.set_path(options.path);

    if let Some(max_age) = options.max_age {
        cookie.set_max_age(max_age);
    }

    cookie
}

pub fn set_token_cookie(
    cookies: &Cookies,
    token: String,
    is_production: bool,
    max_age_seconds: i64
) {
    cookies.add(build_token_cookie(token, token_cookie_options(is_production, max_age_seconds)));
}

/// Instructs the client to discard the credential: same name and attributes,
/// already expired.
pub fn remove_token_cookie(cookies: &Cookies, is_production: bool) {
    cookies.add(build_token_cookie("".to_string(), token_cookie_options(is_production, 0)));
}
