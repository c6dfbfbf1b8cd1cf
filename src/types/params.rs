//! Ordered string-keyed parameter multimap.

use std::borrow::Cow;

use url::form_urlencoded;

/// Flat, ordered, string-keyed parameter collection.
///
/// Holds the key/value pairs exchanged with an Identity Provider: the
/// arguments merged from every extension's `build_authorization_data`
/// output on the way out, and the raw response arguments on the way back.
/// Insertion order is preserved because request-parameter build order is
/// significant.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Parameters {
    entries: Vec<(String, String)>,
}

impl Parameters {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a collection from an `application/x-www-form-urlencoded`
    /// query string, typically the query of a received response URL.
    pub fn from_query(query: &str) -> Self {
        let mut params = Parameters::new();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            params.append(key, value);
        }
        params
    }

    /// Sets `key` to `value`, replacing any previous entries for `key`
    /// while keeping the position of the first one.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        let mut slot = None;
        let mut index = 0;
        self.entries.retain(|(k, _)| {
            let keep = *k != key;
            if !keep && slot.is_none() {
                slot = Some(index);
            }
            if keep {
                index += 1;
            }
            keep
        });

        match slot {
            Some(i) => self.entries.insert(i, (key, value)),
            None => self.entries.push((key, value)),
        }
    }

    /// Appends an entry without touching previous entries for the same key.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Returns the first value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether any entry is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the collection holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Encodes the collection as a query string in insertion order.
    pub fn to_query(&self) -> String {
        let mut query = String::new();
        for (key, value) in self.iter() {
            if !query.is_empty() {
                query.push('&');
            }
            query.push_str(&encode(key));
            query.push('=');
            query.push_str(&encode(value));
        }
        query
    }
}

fn encode(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut params = Parameters::new();
        for (key, value) in iter {
            params.append(key, value);
        }
        params
    }
}
