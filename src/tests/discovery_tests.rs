use crate::discovery::{
    normalize, resolve_endpoint, DiscoveryService, HtmlDiscovery, XrdsDiscovery, YadisDiscovery,
};
use crate::extensions::Extension;
use crate::tests::mock_fetcher::MockFetcher;
use crate::types::ProtocolVersion;

fn default_strategies() -> Vec<Box<dyn DiscoveryService>> {
    vec![
        Box::new(XrdsDiscovery::new()),
        Box::new(YadisDiscovery::new()),
        Box::new(HtmlDiscovery::new()),
    ]
}

#[test]
fn normalization_table() {
    let strategies = default_strategies();

    // identifier, normalized id, discovery url, friendly id
    let table = [
        (
            "extremeswank.com",
            "http://extremeswank.com/",
            "http://extremeswank.com/",
            "extremeswank.com",
        ),
        (
            "extremeswank.com/test",
            "http://extremeswank.com/test",
            "http://extremeswank.com/test",
            "extremeswank.com/test",
        ),
        (
            "extremeswank.com/test/",
            "http://extremeswank.com/test/",
            "http://extremeswank.com/test/",
            "extremeswank.com/test",
        ),
        (
            "http://extremeswank.com",
            "http://extremeswank.com/",
            "http://extremeswank.com/",
            "extremeswank.com",
        ),
        (
            "http://extremeswank.com/",
            "http://extremeswank.com/",
            "http://extremeswank.com/",
            "extremeswank.com",
        ),
        (
            "https://extremeswank.com",
            "https://extremeswank.com/",
            "https://extremeswank.com/",
            "extremeswank.com",
        ),
        (
            "https://extremeswank.com/",
            "https://extremeswank.com/",
            "https://extremeswank.com/",
            "extremeswank.com",
        ),
        ("=es", "=es", "https://xri.net/=es", "=es"),
        (
            "@xrid*extremeswank",
            "@xrid*extremeswank",
            "https://xri.net/@xrid*extremeswank",
            "@xrid*extremeswank",
        ),
        ("xri://=es", "=es", "https://xri.net/=es", "=es"),
        (
            "xri://@xrid*extremeswank",
            "@xrid*extremeswank",
            "https://xri.net/@xrid*extremeswank",
            "@xrid*extremeswank",
        ),
        (
            "getopenid.com/extremeswank",
            "http://getopenid.com/extremeswank",
            "http://getopenid.com/extremeswank",
            "getopenid.com/extremeswank",
        ),
        (
            "profile.typekey.com/extremeswank",
            "http://profile.typekey.com/extremeswank",
            "http://profile.typekey.com/extremeswank",
            "profile.typekey.com/extremeswank",
        ),
    ];

    for (identifier, normalized_id, discovery_url, friendly_id) in table {
        let entry = normalize(identifier, &strategies)
            .unwrap_or_else(|| panic!("no strategy normalized {:?}", identifier));
        assert_eq!(entry.normalized_id, normalized_id, "for {:?}", identifier);
        assert_eq!(
            entry.discovery_url.as_str(),
            discovery_url,
            "for {:?}",
            identifier
        );
        assert_eq!(entry.friendly_id, friendly_id, "for {:?}", identifier);
    }
}

#[test]
fn normalize_rejects_unusable_identifier() {
    let strategies = default_strategies();
    assert!(normalize("http://", &strategies).is_none());
}

#[test]
fn non_ascii_identifiers_normalize_without_panicking() {
    let strategies = default_strategies();

    // Falls through every XRI prefix check to the default URL grammar.
    let entry = normalize("ñoño.example.com", &strategies).unwrap();
    assert_eq!(entry.friendly_id, "ñoño.example.com");
    assert!(entry.discovery_url.as_str().starts_with("http://"));

    // A global context symbol followed by multibyte characters is XRI.
    let entry = normalize("=café", &strategies).unwrap();
    assert_eq!(entry.normalized_id, "=café");
    assert!(entry.discovery_url.as_str().starts_with("https://xri.net/"));
}

#[test]
fn resolves_html_endpoint() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_document(
        "http://extremeswank.com/",
        r#"<html><head><link rel="openid.server" href="https://op.example.com/v1" /></head></html>"#,
    );

    let result = resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher,
    )
    .unwrap();

    assert_eq!(
        result.server_url.as_ref().map(|u| u.as_str()),
        Some("https://op.example.com/v1")
    );
    assert_eq!(result.claimed_id.as_deref(), Some("http://extremeswank.com/"));
    // Without delegation the local id falls back to the fetched URL.
    assert_eq!(result.local_id.as_deref(), Some("http://extremeswank.com/"));
    assert_eq!(result.auth_version, ProtocolVersion::V1Dot1);
}

#[test]
fn claimed_id_follows_redirects() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_redirected_document(
        "http://extremeswank.com/",
        "https://extremeswank.com/home/",
        r#"<link rel="openid.server" href="https://op.example.com/v1">"#,
    );

    let result = resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher,
    )
    .unwrap();

    assert_eq!(
        result.claimed_id.as_deref(),
        Some("https://extremeswank.com/home/")
    );
    assert_eq!(
        result.local_id.as_deref(),
        Some("https://extremeswank.com/home/")
    );
}

#[test]
fn xrds_strategy_wins_over_html() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let body = concat!(
        r#"<?xml version="1.0" encoding="UTF-8"?>"#,
        r#"<xrds:XRDS xmlns:xrds="xri://$xrds" xmlns="xri://$xrd*($v*2.0)">"#,
        r#"<XRD><Service>"#,
        r#"<Type>http://specs.openid.net/auth/2.0/signon</Type>"#,
        r#"<URI>https://op.example.com/auth</URI>"#,
        r#"</Service></XRD></xrds:XRDS>"#,
    );
    let fetcher = MockFetcher::new().with_document("https://xri.net/=es", body);

    let result = resolve_endpoint("=es", &mut strategies, &mut extensions, &fetcher).unwrap();
    assert_eq!(
        result.server_url.as_ref().map(|u| u.as_str()),
        Some("https://op.example.com/auth")
    );
    assert_eq!(result.auth_version, ProtocolVersion::V2Dot0);
}

#[test]
fn fetch_failure_yields_none() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_status("http://extremeswank.com/", 500);

    assert!(resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher
    )
    .is_none());
}

#[test]
fn empty_body_yields_none() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_document("http://extremeswank.com/", "");

    assert!(resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher
    )
    .is_none());
}

#[test]
fn undiscoverable_document_yields_none() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher =
        MockFetcher::new().with_document("http://extremeswank.com/", "<html><body>hi</body></html>");

    assert!(resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher
    )
    .is_none());
}

#[test]
fn rediscovery_is_idempotent() {
    let mut strategies = default_strategies();
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_document(
        "http://extremeswank.com/",
        r#"<link rel="openid.server" href="https://op.example.com/v1">"#,
    );

    let first = resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher,
    )
    .unwrap();
    let second = resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher,
    )
    .unwrap();
    assert_eq!(first, second);
}

#[test]
fn duplicate_strategies_coexist() {
    let mut strategies: Vec<Box<dyn DiscoveryService>> = vec![
        Box::new(HtmlDiscovery::new()),
        Box::new(HtmlDiscovery::new()),
    ];
    let mut extensions: Vec<Box<dyn Extension>> = Vec::new();
    let fetcher = MockFetcher::new().with_document(
        "http://extremeswank.com/",
        r#"<link rel="openid.server" href="https://op.example.com/v1">"#,
    );

    let result = resolve_endpoint(
        "extremeswank.com",
        &mut strategies,
        &mut extensions,
        &fetcher,
    )
    .unwrap();
    assert!(result.server_url.is_some());
}
