//! Navigation policy for bridge surfaces.

use wax_bridge::codec::is_callback_url;

/// Prefixes a surface may navigate to. Everything else is blocked.
pub const ALLOWED_NAV_PREFIXES: &[&str] = &[
    "http://127.0.0.1:",
    "http://localhost:",
    "http://[::1]:",
    "https://",
    "about:blank",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationDecision {
    Allow,
    /// A `coconutwax://result` callback: hand it to the bridge, don't load it.
    Intercept,
    Block,
}

pub fn decide(url: &str) -> NavigationDecision {
    if is_callback_url(url) {
        NavigationDecision::Intercept
    } else if ALLOWED_NAV_PREFIXES.iter().any(|p| url.starts_with(p)) {
        NavigationDecision::Allow
    } else {
        NavigationDecision::Block
    }
}

/// A finished load on a URL the surface would never navigate to is an
/// engine error page (`chrome-error://`, `about:neterror`, ...).
pub fn is_error_page(url: &str) -> bool {
    decide(url) == NavigationDecision::Block
}
