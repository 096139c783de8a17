//! DesiredMapping type.
//!
//! The set of entries a scope should converge to, parsed from either
//! newline-separated `KEY=VALUE` pairs or a JSON object.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use zeroize::Zeroizing;

use crate::core::types::EntryName;
use crate::error::ParseError;

/// Desired entries keyed by upper-cased name.
///
/// Values are wiped from memory when the mapping is dropped. Iteration is
/// sorted by name, which keeps transcripts reproducible.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DesiredMapping {
    entries: BTreeMap<EntryName, Zeroizing<String>>,
}

impl DesiredMapping {
    /// Parse raw input.
    ///
    /// Input whose trimmed form starts with `{` and ends with `}` is read as
    /// a JSON object with string values, used verbatim so multi-line
    /// material survives. Anything else is read as `KEY=VALUE` lines: both
    /// sides trimmed, the first `=` splits, blank lines skipped. Empty or
    /// whitespace-only input yields an empty mapping.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` for a line without `=`, an empty key or value,
    /// invalid JSON, a non-string JSON value, or two keys that collide
    /// after upper-casing.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }

        if trimmed.starts_with('{') && trimmed.ends_with('}') {
            return Self::parse_json(trimmed);
        }

        let mut mapping = Self::default();
        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ParseError::MissingSeparator(line.to_string()))?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(ParseError::EmptyKeyOrValue(line.to_string()));
            }

            mapping.insert(key, value.to_string())?;
        }

        Ok(mapping)
    }

    fn parse_json(raw: &str) -> Result<Self, ParseError> {
        let JsonEntries(raw_entries) =
            serde_json::from_str(raw).map_err(|e| ParseError::Json(e.to_string()))?;

        let mut mapping = Self::default();
        for (key, value) in raw_entries {
            let key = key.trim();
            if key.is_empty() {
                return Err(ParseError::EmptyJsonKey);
            }
            if value.is_empty() {
                return Err(ParseError::EmptyJsonValue(key.to_string()));
            }
            mapping.insert(key, value)?;
        }

        Ok(mapping)
    }

    fn insert(&mut self, key: &str, value: String) -> Result<(), ParseError> {
        let name = key.to_uppercase();
        if self.entries.contains_key(&name) {
            return Err(ParseError::Duplicate(name));
        }
        self.entries.insert(name, Zeroizing::new(value));
        Ok(())
    }

    /// Build from already-normalized pairs.
    ///
    /// Later pairs overwrite earlier ones with the same upper-cased name.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_uppercase(), Zeroizing::new(v.into())))
            .collect();
        Self { entries }
    }

    /// Entries sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Entry names sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Value for a name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|v| v.as_str())
    }

    /// Whether a name is desired.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as `KEY=VALUE` lines.
    pub fn to_env_string(&self) -> String {
        let mut output = String::new();
        for (key, value) in self.iter() {
            output.push_str(&format!("{}={}\n", key, value));
        }
        output
    }
}

// Values stay out of Debug output.
impl fmt::Debug for DesiredMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.entries.keys()).finish()
    }
}

/// JSON object entries in document order, repeated keys included.
struct JsonEntries(Vec<(String, String)>);

impl<'de> Deserialize<'de> for JsonEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = JsonEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of string values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<JsonEntries, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, String>()? {
                    entries.push(entry);
                }
                Ok(JsonEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
