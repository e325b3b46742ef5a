use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::{Number, ParseError, PatchOptions, PatchResult};

/// A node document value, classified once at the boundary.
///
/// The patch builder matches exhaustively on these three variants, so
/// anything that is neither a scalar nor a collection ends up in
/// [`Value::Unrecognized`] and is reported through the patch status.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number, string or date property.
    Scalar(Scalar),
    /// An array or object, keyed by string.
    Collection(Collection),
    /// Anything else (`null`, booleans).
    Unrecognized(Unrecognized),
}

/// Property values compared by equality.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    /// Numeric property.
    Number(Number),
    /// String property.
    String(String),
    /// Timestamp property.
    Date(DateTime<Utc>),
}

/// Values the builder cannot express as patch operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Unrecognized {
    /// JSON `null`.
    Null,
    /// JSON boolean.
    Bool(bool),
}

/// Whether a collection was read from an array or an object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKind {
    /// Array; keys are the stringified indices.
    Sequence,
    /// Object.
    Mapping,
}

/// Ordered mapping from string keys to nested values.
///
/// Iteration follows insertion order, which drives the order of emitted
/// patch operations.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection {
    kind: CollectionKind,
    entries: IndexMap<String, Value>,
}

impl Collection {
    /// Creates an empty object-like collection.
    #[must_use]
    pub fn mapping() -> Self {
        Self { kind: CollectionKind::Mapping, entries: IndexMap::new() }
    }

    /// Creates an array-like collection keyed by `"0"`, `"1"`, ...
    ///
    /// ```
    /// # use nodepatch_core::{Collection, Value};
    /// let ports = Collection::sequence(vec![Value::from("aa:bb"), Value::from("cc:dd")]);
    /// assert_eq!(ports.get("1"), Some(&Value::from("cc:dd")));
    /// ```
    #[must_use]
    pub fn sequence(items: Vec<Value>) -> Self {
        let entries = items.into_iter().enumerate().map(|(i, v)| (i.to_string(), v)).collect();
        Self { kind: CollectionKind::Sequence, entries }
    }

    /// Returns whether the collection is array-like or object-like.
    #[must_use]
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Looks up a child by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Looks up a child by key for mutation.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Indicates whether the key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts or overwrites a child, keeping the original position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Returns the number of children.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Indicates whether the collection has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, child)` pairs in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.entries.iter()
    }

    fn to_json_value(&self) -> JsonValue {
        match self.kind {
            CollectionKind::Sequence => {
                JsonValue::Array(self.entries.values().map(Value::to_json_value).collect())
            }
            CollectionKind::Mapping => {
                let mut object = serde_json::Map::with_capacity(self.entries.len());
                for (key, value) in &self.entries {
                    object.insert(key.clone(), value.to_json_value());
                }
                JsonValue::Object(object)
            }
        }
    }
}

impl Default for Collection {
    fn default() -> Self {
        Self::mapping()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, Value)> for Collection {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self { kind: CollectionKind::Mapping, entries: iter.into_iter().collect() }
    }
}

impl Value {
    /// Parses a JSON string and classifies it.
    ///
    /// ```
    /// # use nodepatch_core::Value;
    /// let node = Value::from_json_str("{\"name\":\"node-1\"}")?;
    /// assert!(node.is_collection());
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    pub fn from_json_str(input: &str) -> Result<Self, ParseError> {
        Self::from_json_str_with(input, &PatchOptions::default())
    }

    /// Parses a JSON string and classifies it using the provided options.
    pub fn from_json_str_with(input: &str, options: &PatchOptions) -> Result<Self, ParseError> {
        let value: JsonValue = serde_json::from_str(input)?;
        Ok(Self::from_json_value_with(value, options))
    }

    /// Parses a YAML string and classifies it.
    ///
    /// ```
    /// # use nodepatch_core::Value;
    /// let node = Value::from_yaml_str("---\ndriver: ipmi\n")?;
    /// assert!(node.is_collection());
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    pub fn from_yaml_str(input: &str) -> Result<Self, ParseError> {
        Self::from_yaml_str_with(input, &PatchOptions::default())
    }

    /// Parses a YAML string and classifies it using the provided options.
    pub fn from_yaml_str_with(input: &str, options: &PatchOptions) -> Result<Self, ParseError> {
        let value: YamlValue = serde_yaml::from_str(input)?;
        Self::from_yaml_value(value, options)
    }

    /// Classifies a serde JSON value with default options.
    #[must_use]
    pub fn from_json_value(value: JsonValue) -> Self {
        Self::from_json_value_with(value, &PatchOptions::default())
    }

    /// Classifies a serde JSON value.
    ///
    /// `null` and booleans are neither properties nor collections and become
    /// [`Value::Unrecognized`].
    ///
    /// ```
    /// # use nodepatch_core::{PatchOptions, Scalar, Value};
    /// let opts = PatchOptions::default().with_date_detection(true);
    /// let value = Value::from_json_value_with(serde_json::json!("2016-10-01T12:00:00Z"), &opts);
    /// assert!(matches!(value, Value::Scalar(Scalar::Date(_))));
    /// ```
    #[must_use]
    pub fn from_json_value_with(value: JsonValue, options: &PatchOptions) -> Self {
        match value {
            JsonValue::Null => Self::Unrecognized(Unrecognized::Null),
            JsonValue::Bool(v) => Self::Unrecognized(Unrecognized::Bool(v)),
            JsonValue::Number(num) => Self::Scalar(Scalar::Number(Number::from_json_number(&num))),
            JsonValue::String(s) => Self::Scalar(classify_string(s, options)),
            JsonValue::Array(values) => Self::Collection(Collection::sequence(
                values.into_iter().map(|v| Self::from_json_value_with(v, options)).collect(),
            )),
            JsonValue::Object(map) => Self::Collection(
                map.into_iter().map(|(k, v)| (k, Self::from_json_value_with(v, options))).collect(),
            ),
        }
    }

    fn from_yaml_value(value: YamlValue, options: &PatchOptions) -> Result<Self, ParseError> {
        match value {
            YamlValue::Null => Ok(Self::Unrecognized(Unrecognized::Null)),
            YamlValue::Bool(v) => Ok(Self::Unrecognized(Unrecognized::Bool(v))),
            YamlValue::Number(num) => {
                // serde_yaml exposes every number, integer or not, as an f64.
                let f = num.as_f64().unwrap_or(f64::NAN);
                Ok(Self::Scalar(Scalar::Number(Number::new(f)?)))
            }
            YamlValue::String(s) => Ok(Self::Scalar(classify_string(s, options))),
            YamlValue::Sequence(seq) => {
                let mut items = Vec::with_capacity(seq.len());
                for value in seq {
                    items.push(Self::from_yaml_value(value, options)?);
                }
                Ok(Self::Collection(Collection::sequence(items)))
            }
            YamlValue::Mapping(map) => {
                let mut collection = Collection::mapping();
                for (key, value) in map {
                    let key = match key {
                        YamlValue::String(s) => s,
                        other => {
                            return Err(ParseError::NonStringYamlKey {
                                found: format!("{other:?}"),
                            });
                        }
                    };
                    collection.insert(key, Self::from_yaml_value(value, options)?);
                }
                Ok(Self::Collection(collection))
            }
            YamlValue::Tagged(tagged) => {
                Err(ParseError::UnsupportedYamlTag { tag: tagged.tag.to_string() })
            }
        }
    }

    /// Converts the value back into serde JSON.
    ///
    /// Dates are written as RFC 3339 UTC timestamps carrying every fractional
    /// digit they were parsed with.
    #[must_use]
    pub fn to_json_value(&self) -> JsonValue {
        match self {
            Self::Scalar(Scalar::Number(n)) => JsonValue::Number(n.to_json_number()),
            Self::Scalar(Scalar::String(s)) => JsonValue::String(s.clone()),
            Self::Scalar(Scalar::Date(d)) => {
                JsonValue::String(d.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Collection(c) => c.to_json_value(),
            Self::Unrecognized(Unrecognized::Null) => JsonValue::Null,
            Self::Unrecognized(Unrecognized::Bool(b)) => JsonValue::Bool(*b),
        }
    }

    /// True for numbers, strings and dates.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// True for arrays and objects.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        matches!(self, Self::Collection(_))
    }

    /// Looks up a child when this value is a collection.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Self::Collection(c) => c.get(key),
            _ => None,
        }
    }

    /// Returns the string content of a string scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Computes the operations that turn `self` into `target`.
    ///
    /// ```
    /// # use nodepatch_core::{PatchOptions, Status, Value};
    /// let base = Value::from_json_str("{\"name\":\"node-1\"}")?;
    /// let edited = Value::from_json_str("{\"name\":\"node-2\"}")?;
    /// let result = base.patch_to(&edited, &PatchOptions::default());
    /// assert_eq!(result.status, Status::Ok);
    /// assert_eq!(result.operations[0].path, "/name");
    /// # Ok::<(), nodepatch_core::ParseError>(())
    /// ```
    #[must_use]
    pub fn patch_to(&self, target: &Self, options: &PatchOptions) -> PatchResult {
        crate::builder::build_patch(self, target, options)
    }
}

fn classify_string(s: String, options: &PatchOptions) -> Scalar {
    if options.detect_dates() {
        if let Ok(date) = DateTime::parse_from_rfc3339(&s) {
            return Scalar::Date(date.with_timezone(&Utc));
        }
    }
    Scalar::String(s)
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Self::from_json_value(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Scalar(Scalar::String(value.to_owned()))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Scalar(Scalar::String(value))
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Scalar(Scalar::Number(value))
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Scalar(Scalar::Date(value))
    }
}

impl From<Collection> for Value {
    fn from(value: Collection) -> Self {
        Self::Collection(value)
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.to_json_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        JsonValue::deserialize(deserializer).map(Self::from_json_value)
    }
}
