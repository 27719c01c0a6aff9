//! The widget's entity cache as a flat arena with key → index lookup.
//!
//! A payload's `cache` maps keys such as `"Product:UP0001-..."` or
//! `"GameCTA:..."` to entity objects. Fields that point at other entities
//! hold `{"__ref": "<key>"}` instead of the entity itself. The graph is
//! built once per located payload and owned by the projector that located
//! it; nothing is shared between widgets.

use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::ScraperError;
use crate::payload::RawPayload;

/// Field name the storefront uses for entity references.
pub const REF_FIELD: &str = "__ref";
/// Key of the page-wide query root entry.
pub const ROOT_QUERY_KEY: &str = "ROOT_QUERY";

/// Handle to an entry in a [`PayloadGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(usize);

#[derive(Debug)]
pub struct PayloadGraph {
    args: Map<String, Value>,
    keys: Vec<String>,
    objects: Vec<Map<String, Value>>,
    index: HashMap<String, EntryId>,
}

impl PayloadGraph {
    /// Moves the payload's cache into the arena. Non-object cache values
    /// carry no fields to project and are skipped.
    #[must_use]
    pub fn new(payload: RawPayload) -> Self {
        let mut keys = Vec::with_capacity(payload.cache.len());
        let mut objects = Vec::with_capacity(payload.cache.len());
        let mut index = HashMap::with_capacity(payload.cache.len());

        for (key, value) in payload.cache {
            let Value::Object(object) = value else {
                tracing::debug!(key = %key, "skipping non-object cache entry");
                continue;
            };
            index.insert(key.clone(), EntryId(keys.len()));
            keys.push(key);
            objects.push(object);
        }

        Self {
            args: payload.args,
            keys,
            objects,
            index,
        }
    }

    /// The arguments the page was opened with.
    #[must_use]
    pub fn args(&self) -> &Map<String, Value> {
        &self.args
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<EntryId> {
        self.index.get(key).copied()
    }

    /// The entry behind a handle previously returned by [`PayloadGraph::lookup`].
    ///
    /// # Panics
    ///
    /// Panics if `id` came from a different graph with more entries.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Entry<'_> {
        Entry {
            graph: self,
            key: &self.keys[id.0],
            object: &self.objects[id.0],
        }
    }

    /// Resolves a cache key.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingReference`] if the key is not in the cache.
    pub fn resolve(&self, key: &str) -> Result<Entry<'_>, ScraperError> {
        self.lookup(key)
            .map(|id| self.get(id))
            .ok_or_else(|| ScraperError::MissingReference {
                key: key.to_string(),
            })
    }

    /// Resolves a `{"__ref": key}` object.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingReference`] if `reference` is not a
    /// reference object or its key is not in the cache.
    pub fn resolve_ref(&self, reference: &Value) -> Result<Entry<'_>, ScraperError> {
        let key = ref_key(reference).ok_or_else(|| ScraperError::MissingReference {
            key: reference.to_string(),
        })?;
        self.resolve(key)
    }

    /// Resolves a list of reference objects, preserving order.
    ///
    /// # Errors
    ///
    /// Fails on the first reference that does not resolve.
    pub fn resolve_list(&self, references: &[Value]) -> Result<Vec<Entry<'_>>, ScraperError> {
        references.iter().map(|r| self.resolve_ref(r)).collect()
    }

    /// The page-wide query root entry.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::MissingReference`] if the payload has none.
    pub fn root(&self) -> Result<Entry<'_>, ScraperError> {
        self.resolve(ROOT_QUERY_KEY)
    }
}

/// The key a `{"__ref": key}` value points at.
#[must_use]
pub fn ref_key(value: &Value) -> Option<&str> {
    value.get(REF_FIELD).and_then(Value::as_str)
}

/// One object in a payload: either a cache entry or an object nested inside
/// one. Field accessors report errors against `key`.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    graph: &'a PayloadGraph,
    key: &'a str,
    object: &'a Map<String, Value>,
}

impl<'a> Entry<'a> {
    #[must_use]
    pub fn key(&self) -> &'a str {
        self.key
    }

    #[must_use]
    pub fn object(&self) -> &'a Map<String, Value> {
        self.object
    }

    fn missing(&self, field: &str, expected: &'static str) -> ScraperError {
        ScraperError::MissingField {
            entry: self.key.to_string(),
            field: field.to_string(),
            expected,
        }
    }

    /// The raw field value, `None` when absent or `null`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.object.get(field).filter(|v| !v.is_null())
    }

    /// A mandatory string field.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when absent, `null` or not a string.
    pub fn str(&self, field: &str) -> Result<&'a str, ScraperError> {
        self.get(field)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(field, "string"))
    }

    /// An optional string field; absent and `null` both read as `None`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when present but not a string.
    pub fn opt_str(&self, field: &str) -> Result<Option<&'a str>, ScraperError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_str()
                .map(Some)
                .ok_or_else(|| self.missing(field, "string or null")),
        }
    }

    /// A mandatory boolean field.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when absent, `null` or not a bool.
    pub fn bool(&self, field: &str) -> Result<bool, ScraperError> {
        self.get(field)
            .and_then(Value::as_bool)
            .ok_or_else(|| self.missing(field, "bool"))
    }

    /// A mandatory array field.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when absent, `null` or not an array.
    pub fn array(&self, field: &str) -> Result<&'a [Value], ScraperError> {
        self.get(field)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .ok_or_else(|| self.missing(field, "array"))
    }

    /// An optional array field.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when present but not an array.
    pub fn opt_array(&self, field: &str) -> Result<Option<&'a [Value]>, ScraperError> {
        match self.get(field) {
            None => Ok(None),
            Some(v) => v
                .as_array()
                .map(|a| Some(a.as_slice()))
                .ok_or_else(|| self.missing(field, "array or null")),
        }
    }

    /// A mandatory list of strings, e.g. `platforms`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when absent or not an array of strings.
    pub fn str_list(&self, field: &str) -> Result<Vec<String>, ScraperError> {
        self.opt_str_list(field)?
            .ok_or_else(|| self.missing(field, "array of strings"))
    }

    /// An optional list of strings.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when present but not an array of strings.
    pub fn opt_str_list(&self, field: &str) -> Result<Option<Vec<String>>, ScraperError> {
        let Some(items) = self.opt_array(field)? else {
            return Ok(None);
        };
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.missing(field, "array of strings"))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    /// A mandatory inline (non-reference) object, e.g. `starRating`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when absent, `null` or not an object.
    pub fn object_field(&self, field: &str) -> Result<Entry<'a>, ScraperError> {
        self.opt_object_field(field)?
            .ok_or_else(|| self.missing(field, "object"))
    }

    /// An optional inline object.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when present but not an object.
    pub fn opt_object_field(&self, field: &str) -> Result<Option<Entry<'a>>, ScraperError> {
        match self.get(field) {
            None => Ok(None),
            Some(Value::Object(object)) => Ok(Some(Entry {
                graph: self.graph,
                key: self.key,
                object,
            })),
            Some(_) => Err(self.missing(field, "object or null")),
        }
    }

    /// The key a reference field points at, without resolving it; `None`
    /// when the field is absent or `null`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when the field is not a reference.
    pub fn ref_field(&self, field: &str) -> Result<Option<&'a str>, ScraperError> {
        match self.get(field) {
            None => Ok(None),
            Some(value) => ref_key(value)
                .map(Some)
                .ok_or_else(|| self.missing(field, "reference")),
        }
    }

    /// Follows a reference field to its entry; `None` when the field is
    /// absent or `null`.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when the field is not a reference,
    /// [`ScraperError::MissingReference`] when its key does not resolve.
    pub fn follow(&self, field: &str) -> Result<Option<Entry<'a>>, ScraperError> {
        match self.ref_field(field)? {
            None => Ok(None),
            Some(key) => self.graph.resolve(key).map(Some),
        }
    }

    /// Resolves a mandatory array of references, preserving order.
    ///
    /// # Errors
    ///
    /// [`ScraperError::MissingField`] when the field is not an array,
    /// [`ScraperError::MissingReference`] when any element does not resolve.
    pub fn follow_list(&self, field: &str) -> Result<Vec<Entry<'a>>, ScraperError> {
        self.graph.resolve_list(self.array(field)?)
    }
}
