//! Upstream target construction.
//!
//! Inbound `/items/{category}/{rest}` becomes `<endpoint>/<category>/<rest>`.
//! The remainder is taken from the raw request path so percent-encoding
//! survives the hop unchanged.

/// Prefix every dispatched route shares.
pub const ITEMS_PREFIX: &str = "/items/";

/// Return the part of `path` after `/items/{category}`, without the leading
/// slash. Empty when the request addressed the category itself.
pub fn raw_sub_path(path: &str) -> &str {
    let Some(after_prefix) = path.strip_prefix(ITEMS_PREFIX) else {
        return "";
    };
    match after_prefix.split_once('/') {
        Some((_category, rest)) => rest,
        None => "",
    }
}

/// Build the upstream URL for one dispatch.
pub fn upstream_url(endpoint: &str, category: &str, sub_path: &str, query: Option<&str>) -> String {
    let mut url = format!("{endpoint}/{category}");
    if !sub_path.is_empty() {
        url.push('/');
        url.push_str(sub_path);
    }
    if let Some(query) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(query);
    }
    url
}
