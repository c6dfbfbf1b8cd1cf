use crate::types::Parameters;

#[test]
fn set_replaces_value_keeping_first_position() {
    let mut params = Parameters::new();
    params.set("openid.mode", "checkid_setup");
    params.set("openid.identity", "http://user.example.com/");
    params.set("openid.mode", "checkid_immediate");

    let entries: Vec<_> = params.iter().collect();
    assert_eq!(
        entries,
        vec![
            ("openid.mode", "checkid_immediate"),
            ("openid.identity", "http://user.example.com/"),
        ]
    );
}

#[test]
fn set_collapses_duplicates_into_one_entry() {
    let mut params = Parameters::new();
    params.append("key", "one");
    params.append("other", "x");
    params.append("key", "two");
    params.set("key", "three");

    assert_eq!(params.len(), 2);
    assert_eq!(params.get("key"), Some("three"));
}

#[test]
fn append_keeps_duplicate_keys_in_order() {
    let mut params = Parameters::new();
    params.append("key", "one");
    params.append("key", "two");

    assert_eq!(params.len(), 2);
    assert_eq!(params.get("key"), Some("one"));
}

#[test]
fn from_query_decodes_url_encoding() {
    let params = Parameters::from_query("openid.mode=id_res&openid.identity=http%3A%2F%2Fuser.example.com%2F");
    assert_eq!(params.get("openid.mode"), Some("id_res"));
    assert_eq!(
        params.get("openid.identity"),
        Some("http://user.example.com/")
    );
}

#[test]
fn to_query_encodes_in_insertion_order() {
    let mut params = Parameters::new();
    params.set("b", "2");
    params.set("a", "value with spaces");
    assert_eq!(params.to_query(), "b=2&a=value%20with%20spaces");
}

#[test]
fn get_missing_key_is_none() {
    let params = Parameters::new();
    assert_eq!(params.get("absent"), None);
    assert!(!params.contains_key("absent"));
    assert!(params.is_empty());
}
