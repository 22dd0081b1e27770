// File: src/request_context.rs
// Purpose: Request context with query params, body params and the current page

use serde_json::{Map, Value as JsonValue};

/// Which part of the application produced the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationType {
    Frontend,
    Backend,
}

/// Nested request parameters.
///
/// Flat keys using bracket notation (`tx_femanager_new[user][email]`) are
/// expanded into nested objects; `key[]` appends to a list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    params: Map<String, JsonValue>,
}

impl RequestParams {
    pub fn new(params: Map<String, JsonValue>) -> Self {
        Self { params }
    }

    /// Build from decoded `key=value` pairs
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut params = Map::new();
        for (key, value) in pairs {
            let path = split_bracket_key(key.as_ref());
            insert_path(&mut params, &path, JsonValue::String(value.into()));
        }
        Self { params }
    }

    /// Build from a raw, URL-encoded query string or form body
    pub fn from_query_string(query: &str) -> Self {
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key), decode_component(value))
            });
        Self::from_pairs(pairs)
    }

    /// Top level merge; keys from `other` win
    pub fn merged(&self, other: &RequestParams) -> RequestParams {
        let mut params = self.params.clone();
        for (key, value) in &other.params {
            params.insert(key.clone(), value.clone());
        }
        Self { params }
    }

    /// Get a parameter value
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.params.get(key)
    }

    /// Walk into nested objects, e.g. `["tx_femanager_new", "__referrer", "@action"]`
    pub fn get_path(&self, path: &[&str]) -> Option<&JsonValue> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.params.get(*first)?, |node, key| node.as_object()?.get(*key))
    }

    /// Parameters whose key starts with `prefix`
    pub fn with_prefix(&self, prefix: &str) -> RequestParams {
        let params = self
            .params
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        Self { params }
    }

    /// Check if a parameter exists
    pub fn has(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    /// Get all parameter names, in lexical order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, JsonValue> {
        &self.params
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// `a[b][c]` -> `["a", "b", "c"]`, `a[]` -> `["a", ""]`
fn split_bracket_key(key: &str) -> Vec<&str> {
    let Some(open) = key.find('[') else {
        return vec![key];
    };
    if open == 0 || !key.ends_with(']') {
        return vec![key];
    }

    let mut path = vec![&key[..open]];
    path.extend(key[open + 1..key.len() - 1].split("]["));
    path
}

fn insert_path(target: &mut Map<String, JsonValue>, path: &[&str], value: JsonValue) {
    let Some((head, rest)) = path.split_first() else {
        return;
    };

    if rest.is_empty() {
        target.insert(head.to_string(), value);
        return;
    }

    // `key[]` collects repeated values into a list
    if rest == [""] {
        let slot = target
            .entry(head.to_string())
            .or_insert_with(|| JsonValue::Array(Vec::new()));
        match slot {
            JsonValue::Array(items) => items.push(value),
            other => *other = JsonValue::Array(vec![value]),
        }
        return;
    }

    let slot = target
        .entry(head.to_string())
        .or_insert_with(|| JsonValue::Object(Map::new()));
    if !slot.is_object() {
        *slot = JsonValue::Object(Map::new());
    }
    if let JsonValue::Object(child) = slot {
        insert_path(child, rest, value);
    }
}

/// Everything the resolver needs to know about the current request
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Frontend or backend request
    pub application: ApplicationType,

    /// Page the request was rendered for
    pub page_id: u64,

    /// Query parameters from URL (?key=value)
    pub query: RequestParams,

    /// Parsed body from POST requests
    pub body: RequestParams,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(
        application: ApplicationType,
        page_id: u64,
        query: RequestParams,
        body: RequestParams,
    ) -> Self {
        Self {
            application,
            page_id,
            query,
            body,
        }
    }

    pub fn frontend(page_id: u64, query: RequestParams, body: RequestParams) -> Self {
        Self::new(ApplicationType::Frontend, page_id, query, body)
    }

    pub fn is_frontend(&self) -> bool {
        self.application == ApplicationType::Frontend
    }

    /// Query and body merged, body winning.
    ///
    /// Only frontend requests carry plugin parameters; anything else yields
    /// an empty set.
    pub fn all_params(&self) -> RequestParams {
        if self.is_frontend() {
            self.query.merged(&self.body)
        } else {
            RequestParams::default()
        }
    }
}
