//! Permissive schema URL parsing.
//!
//! Parsing never fails: whatever the input looks like, the caller gets a
//! descriptor with documented defaults and can let resolution decide that
//! nothing handles it.

use crate::descriptor::{
    ControlEvents, NavigationKind, Params, SchemaDescriptor, SchemaModule, ACTION_KEY,
    ANIMATED_KEY, DELAY_KEY, FORCE_KEY, NAVIGATION_KEY, SCHEMA_CLASS_KEY, SELECTED_INDEX_KEY,
};
use tracing::debug;

impl SchemaDescriptor {
    /// Parse a schema URL into a descriptor.
    ///
    /// Accepts both the query form (`app://module/identifier?key=value&…`)
    /// and the path-segment form (`app://module/identifier/key/value/…`);
    /// equivalent URLs in either form produce equal descriptors.
    pub fn parse(url: &str) -> SchemaDescriptor {
        let (scheme, rest) = match url.split_once("://") {
            Some((scheme, rest)) => (scheme.to_string(), rest),
            None => (String::new(), url),
        };

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let module = segments
            .first()
            .map(|s| SchemaModule::from_segment(s))
            .unwrap_or_else(|| SchemaModule::Unknown(String::new()));

        // The tabbar shortcut has no identifier segment; its key/value
        // pairs start right after the module.
        let pairs_start = match module {
            SchemaModule::TabBar => 1,
            _ => 2,
        };
        let identifier = if pairs_start == 2 {
            segments
                .get(1)
                .map(|s| decode(s))
                .unwrap_or_default()
        } else {
            String::new()
        };

        let mut raw = Params::new();
        collect_path_pairs(&segments[segments.len().min(pairs_start)..], &mut raw);
        collect_query_pairs(query, &mut raw);

        let navigation = match module {
            // Selecting a tab is the only thing the shortcut can mean.
            SchemaModule::TabBar => NavigationKind::SelectedIndex,
            _ => raw
                .remove(NAVIGATION_KEY)
                .and_then(|v| v.parse::<i64>().ok())
                .map(NavigationKind::from_wire)
                .unwrap_or_default(),
        };
        if module == SchemaModule::TabBar {
            raw.remove(NAVIGATION_KEY);
        }

        let control_events = raw
            .remove(ACTION_KEY)
            .and_then(|v| v.parse::<u32>().ok())
            .map(ControlEvents::from_wire)
            .unwrap_or_default();

        let animated = raw
            .remove(ANIMATED_KEY)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(true);

        let force = raw
            .remove(FORCE_KEY)
            .and_then(|v| parse_bool(&v))
            .unwrap_or(false);

        let selected_index = raw
            .remove(SELECTED_INDEX_KEY)
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let delay = raw
            .remove(DELAY_KEY)
            .and_then(|v| v.parse::<f64>().ok())
            .filter(|d| d.is_finite() && *d >= 0.0)
            .unwrap_or(0.0);

        let schema_class_identifier = raw.remove(SCHEMA_CLASS_KEY).filter(|v| !v.is_empty());

        let descriptor = SchemaDescriptor {
            scheme,
            module,
            identifier,
            schema_class_identifier,
            navigation,
            control_events,
            animated,
            selected_index,
            force,
            delay,
            params: raw,
            original_url: url.to_string(),
        };
        debug!(url, module = descriptor.module.as_str(), identifier = %descriptor.identifier, "parsed schema url");
        descriptor
    }
}

/// Percent-decode a segment, falling back to the raw text on invalid
/// encodings. Parsing must not fail on garbled input.
fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

/// Recognized keys are matched case-insensitively and lifted out of the
/// params; everything else keeps the key exactly as written.
fn normalize_key(key: String) -> String {
    let lowered = key.to_ascii_lowercase();
    match lowered.as_str() {
        NAVIGATION_KEY | ANIMATED_KEY | SELECTED_INDEX_KEY | ACTION_KEY | SCHEMA_CLASS_KEY
        | FORCE_KEY | DELAY_KEY => lowered,
        _ => key,
    }
}

/// Interpret path segments after the identifier as alternating key/value
/// pairs. A trailing key with no value is dropped.
fn collect_path_pairs(segments: &[&str], raw: &mut Params) {
    let mut iter = segments.chunks_exact(2);
    for pair in &mut iter {
        raw.insert(normalize_key(decode(pair[0])), decode(pair[1]));
    }
    if let [orphan] = iter.remainder() {
        debug!(key = *orphan, "dropping schema path key without a value");
    }
}

/// Parse a query string into key/value pairs; later keys win. Pairs
/// without `=` are dropped.
fn collect_query_pairs(query: Option<&str>, raw: &mut Params) {
    let Some(query) = query else { return };
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        match pair.split_once('=') {
            Some((key, value)) => {
                raw.insert(normalize_key(decode(key)), decode(value));
            }
            None => debug!(pair, "dropping schema query pair without a value"),
        }
    }
}

/// Lenient boolean parse shared by `animated` and `force`; each field
/// applies its own default when the value is unrecognized.
fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
