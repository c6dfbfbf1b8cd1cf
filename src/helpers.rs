use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::types::Parameters;

lazy_static! {
    static ref HTML_COMMENTS: Regex = Regex::new(r"(?s)<!--.*?-->(\r\n)*").unwrap();
}

/// Strips HTML comments so commented-out link and meta tags are never
/// matched by the discovery scans.
pub(crate) fn remove_html_comments(content: &str) -> String {
    if content.is_empty() {
        return content.to_string();
    }
    HTML_COMMENTS.replace_all(content, "").into_owned()
}

/// Appends `params` to `base` as a GET query string, keeping any query the
/// base URL already carries.
pub(crate) fn make_get_url(base: &Url, params: &Parameters) -> Option<Url> {
    let mut target = base.to_string();
    if params.is_empty() {
        return Some(base.clone());
    }
    if target.contains('?') {
        target.push('&');
    } else {
        target.push('?');
    }
    target.push_str(&params.to_query());
    Url::parse(&target).ok()
}
