//! Action routes carried in the URL fragment of the bootstrap page.
//!
//! `#transferNFT?toAccount=bob&assetIds=1,2&memoContent=gg`

use std::collections::BTreeMap;

pub const AUTHENTICATE: &str = "authenticate";
pub const REFRESH_BALANCE: &str = "refreshBalance";
pub const TRANSFER_TOKEN: &str = "transferToken";
pub const TRANSFER_NFT: &str = "transferNFT";

/// Action name plus flat string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    name: String,
    params: BTreeMap<String, String>,
}

impl Route {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Lists travel comma-joined.
    pub fn list_param<S: AsRef<str>>(self, key: impl Into<String>, values: &[S]) -> Self {
        let joined = values
            .iter()
            .map(|v| v.as_ref())
            .collect::<Vec<_>>()
            .join(",");
        self.param(key, joined)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Split a comma-joined parameter, dropping empty items.
    pub fn list(&self, key: &str) -> Vec<String> {
        self.get(key).map(split_list).unwrap_or_default()
    }

    /// `#name?k=v&...` with URL-escaped keys and values.
    pub fn to_fragment(&self) -> String {
        let mut fragment = format!("#{}", self.name);
        let mut sep = '?';
        for (key, value) in &self.params {
            fragment.push(sep);
            fragment.push_str(&urlencoding::encode(key));
            fragment.push('=');
            fragment.push_str(&urlencoding::encode(value));
            sep = '&';
        }
        fragment
    }

    /// Parse a fragment, with or without the leading `#`. Returns `None`
    /// when there is no action name.
    pub fn parse(fragment: &str) -> Option<Route> {
        let fragment = fragment.strip_prefix('#').unwrap_or(fragment);
        let name = fragment.split('?').next().unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(Route {
            name: name.to_string(),
            params: parse_query(fragment),
        })
    }
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Query parameters after the first `?` of `url`.
///
/// Pairs split on their first `=` and are URL-unescaped. Pairs without
/// `=`, or that fail to unescape, are skipped. Later duplicates win.
pub fn parse_query(url: &str) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    let Some((_, query)) = url.split_once('?') else {
        return params;
    };
    for pair in query.split('&') {
        let Some((key, value)) = pair.split_once('=') else {
            continue;
        };
        match (urlencoding::decode(key), urlencoding::decode(value)) {
            (Ok(key), Ok(value)) => {
                params.insert(key.into_owned(), value.into_owned());
            }
            _ => continue,
        }
    }
    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_without_params() {
        assert_eq!(Route::new(AUTHENTICATE).to_fragment(), "#authenticate");
    }

    #[test]
    fn fragment_escapes_values() {
        let route = Route::new(TRANSFER_TOKEN)
            .param("toAccount", "bob.wam")
            .param("memoContent", "gg & thanks=yes");
        assert_eq!(
            route.to_fragment(),
            "#transferToken?memoContent=gg%20%26%20thanks%3Dyes&toAccount=bob.wam"
        );
    }

    #[test]
    fn list_param_is_comma_joined() {
        let route = Route::new(AUTHENTICATE).list_param("tokenContracts", &["eosio.token", "alien.worlds"]);
        assert_eq!(route.get("tokenContracts"), Some("eosio.token,alien.worlds"));
        assert_eq!(route.list("tokenContracts"), vec!["eosio.token", "alien.worlds"]);
    }

    #[test]
    fn parse_inverts_to_fragment() {
        let route = Route::new(TRANSFER_NFT)
            .param("toAccount", "bob")
            .list_param("assetIds", &["1099", "2000"])
            .param("memoContent", "héllo wörld");
        let parsed = Route::parse(&route.to_fragment()).unwrap();
        assert_eq!(parsed, route);
    }

    #[test]
    fn parse_without_hash_or_query() {
        let route = Route::parse("refreshBalance").unwrap();
        assert_eq!(route.name(), REFRESH_BALANCE);
        assert!(route.params().is_empty());
    }

    #[test]
    fn parse_empty_is_none() {
        assert!(Route::parse("").is_none());
        assert!(Route::parse("#").is_none());
        assert!(Route::parse("#?a=b").is_none());
    }

    #[test]
    fn query_splits_on_first_equals() {
        let q = parse_query("x://result?action=auth&payload=abc==");
        assert_eq!(q["action"], "auth");
        assert_eq!(q["payload"], "abc==");
    }

    #[test]
    fn query_skips_pairs_without_equals() {
        let q = parse_query("?flag&a=1&=empty");
        assert_eq!(q.len(), 2);
        assert_eq!(q["a"], "1");
        assert_eq!(q[""], "empty");
        assert!(!q.contains_key("flag"));
    }

    #[test]
    fn query_later_duplicates_win() {
        let q = parse_query("?a=1&a=2");
        assert_eq!(q["a"], "2");
    }

    #[test]
    fn query_without_question_mark_is_empty() {
        assert!(parse_query("coconutwax://result").is_empty());
    }

    #[test]
    fn list_drops_blank_items() {
        let route = Route::new("x").param("ids", " 1, ,2,");
        assert_eq!(route.list("ids"), vec!["1", "2"]);
        assert!(route.list("missing").is_empty());
    }
}
