use crate::client::OpenIdUser;
use crate::discovery::DiscoveryResult;
use crate::extensions::{namespace_aliases, Extension, IdentityAuthentication, OAuthHybrid};
use crate::types::{Parameters, ProtocolVersion, OAUTH_1_0};
use url::Url;

fn v2_result() -> DiscoveryResult {
    DiscoveryResult {
        server_url: Some(Url::parse("https://op.example.com/auth").unwrap()),
        local_id: Some("https://user.example.com/".to_string()),
        claimed_id: Some("https://claimed.example.com/".to_string()),
        auth_version: ProtocolVersion::V2Dot0,
        ..Default::default()
    }
}

#[test]
fn namespace_aliases_maps_uri_to_alias() {
    let mut response = Parameters::new();
    response.set("openid.ns.oauth", OAUTH_1_0);
    response.set("openid.NS.ax", "http://openid.net/srv/ax/1.0");
    response.set("openid.mode", "id_res");

    let aliases = namespace_aliases(&response);
    assert_eq!(aliases.get(OAUTH_1_0).map(String::as_str), Some("oauth"));
    assert_eq!(
        aliases.get("http://openid.net/srv/ax/1.0").map(String::as_str),
        Some("ax")
    );
    assert_eq!(aliases.len(), 2);
}

#[test]
fn namespace_aliases_tolerates_non_ascii_keys() {
    let mut response = Parameters::new();
    // A multibyte character straddling the prefix boundary must not
    // derail alias resolution for the well-formed declarations.
    response.set("openid.nsñ", "http://example.com/ns");
    response.set("openid.ns.señal", "http://example.com/señal");

    let aliases = namespace_aliases(&response);
    assert_eq!(
        aliases.get("http://example.com/señal").map(String::as_str),
        Some("señal")
    );
    assert_eq!(aliases.len(), 1);
}

#[test]
fn identity_contributes_claimed_id_for_v2() {
    let params = IdentityAuthentication::new().build_authorization_data(&v2_result());

    assert_eq!(
        params.get("openid.identity"),
        Some("https://user.example.com/")
    );
    assert_eq!(
        params.get("openid.claimed_id"),
        Some("https://claimed.example.com/")
    );
    assert_eq!(params.get("esoid.ReturnUrl"), None);
}

#[test]
fn identity_rides_return_url_for_v1() {
    let mut discovered = v2_result();
    discovered.auth_version = ProtocolVersion::V1Dot1;
    let params = IdentityAuthentication::new().build_authorization_data(&discovered);

    assert_eq!(params.get("openid.claimed_id"), None);
    assert_eq!(
        params.get("esoid.ReturnUrl"),
        Some("esoid.claimed_id=https%3A%2F%2Fclaimed.example.com%2F")
    );
}

#[test]
fn identity_populates_user_with_friendly_form() {
    let mut user = OpenIdUser::new(Some(v2_result()));
    let mut response = Parameters::new();
    response.set("openid.identity", "https://user.example.com/");

    IdentityAuthentication::new().populate_user(&mut user, &response);

    assert_eq!(
        user.base_identity.as_deref(),
        Some("https://user.example.com/")
    );
    // Delegation in use: the claimed identifier is displayed.
    assert_eq!(user.identity.as_deref(), Some("claimed.example.com"));
}

#[test]
fn identity_displays_validated_id_without_delegation() {
    let mut discovered = v2_result();
    discovered.local_id = discovered.claimed_id.clone();
    let mut user = OpenIdUser::new(Some(discovered));
    let mut response = Parameters::new();
    response.set("openid.identity", "https://provider-checked.example.com/");

    IdentityAuthentication::new().populate_user(&mut user, &response);

    assert_eq!(user.identity.as_deref(), Some("provider-checked.example.com"));
}

#[test]
fn oauth_contributes_namespace_consumer_and_scope() {
    let extension = OAuthHybrid::new("consumer.example.com").scope("http://example.com/feeds");
    let params = extension.build_authorization_data(&v2_result());

    assert_eq!(params.get("openid.ns.oauth"), Some(OAUTH_1_0));
    assert_eq!(
        params.get("openid.oauth.consumer"),
        Some("consumer.example.com")
    );
    assert_eq!(
        params.get("openid.oauth.scope"),
        Some("http://example.com/feeds")
    );
}

#[test]
fn oauth_reads_request_token_under_provider_alias() {
    let extension = OAuthHybrid::new("consumer.example.com");
    let mut response = Parameters::new();
    response.set("openid.ns.oa", OAUTH_1_0);
    response.set("openid.oa.request_token", "token123");
    response.set("openid.oa.scope", "http://example.com/feeds");

    let token = extension.request_token(&response).unwrap();
    assert_eq!(token.token, "token123");
    assert_eq!(token.scope.as_deref(), Some("http://example.com/feeds"));
}

#[test]
fn oauth_without_declared_namespace_yields_no_token() {
    let extension = OAuthHybrid::new("consumer.example.com");
    let mut response = Parameters::new();
    // Token present but the namespace declaration is missing.
    response.set("openid.oauth.request_token", "token123");

    assert!(extension.request_token(&response).is_none());
}

#[test]
fn oauth_namespace_without_token_yields_none() {
    let extension = OAuthHybrid::new("consumer.example.com");
    let mut response = Parameters::new();
    response.set("openid.ns.oauth", OAUTH_1_0);

    assert!(extension.request_token(&response).is_none());
}

#[test]
fn default_validation_accepts() {
    let response = Parameters::new();
    assert!(IdentityAuthentication::new().validate(&response));
    assert!(OAuthHybrid::new("consumer.example.com").validate(&response));
}
