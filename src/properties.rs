use serde::Serialize;
use std::collections::HashMap;

/// A typed custom property value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    /// `bool`.
    Bool(bool),
    /// `int`.
    I64(i64),
    /// `float`.
    F32(f32),
    /// Declared `string`, or no type.
    String(String),
}

/// Declared `type` of a `property` element. Anything else reads as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PropertyKind {
    String,
    Int,
    Float,
    Bool,
}

impl PropertyKind {
    pub(crate) fn from_attr(kind: Option<&str>) -> Self {
        match kind {
            Some("int") => PropertyKind::Int,
            Some("float") => PropertyKind::Float,
            Some("bool") => PropertyKind::Bool,
            _ => PropertyKind::String,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            PropertyKind::String => "string",
            PropertyKind::Int => "int",
            PropertyKind::Float => "float",
            PropertyKind::Bool => "bool",
        }
    }

    /// Coerces the raw attribute text. `None` when it does not parse.
    pub(crate) fn coerce(self, raw: &str) -> Option<PropertyValue> {
        match self {
            PropertyKind::String => Some(PropertyValue::String(raw.to_owned())),
            PropertyKind::Int => raw.trim().parse().ok().map(PropertyValue::I64),
            PropertyKind::Float => raw.trim().parse().ok().map(PropertyValue::F32),
            PropertyKind::Bool => match raw.trim() {
                "true" | "1" => Some(PropertyValue::Bool(true)),
                "false" | "0" => Some(PropertyValue::Bool(false)),
                _ => None,
            },
        }
    }
}

/// String-keyed custom properties of a tile definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Properties(HashMap<String, PropertyValue>);

impl Properties {
    /// Empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces, returning the old value.
    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.0.insert(name.into(), value)
    }

    /// Untyped lookup.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Name and value pairs, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `Some` only for a `bool` value.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// `Some` only for an `int` value.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer property narrowed to `i32`; `None` if it does not fit.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// `Some` only for a `float` value.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            PropertyValue::F32(v) => Some(*v),
            _ => None,
        }
    }

    /// `Some` only for a `string` value.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerces_declared_types() {
        assert_eq!(
            PropertyKind::from_attr(Some("int")).coerce("42"),
            Some(PropertyValue::I64(42))
        );
        assert_eq!(
            PropertyKind::from_attr(Some("float")).coerce("1.5"),
            Some(PropertyValue::F32(1.5))
        );
        assert_eq!(
            PropertyKind::from_attr(Some("bool")).coerce("true"),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            PropertyKind::from_attr(None).coerce("forest"),
            Some(PropertyValue::String("forest".into()))
        );
        // unknown declared types fall back to strings
        assert_eq!(
            PropertyKind::from_attr(Some("color")).coerce("#ff00ff"),
            Some(PropertyValue::String("#ff00ff".into()))
        );
    }

    #[test]
    fn rejects_unparsable_values() {
        assert_eq!(PropertyKind::Int.coerce("ten"), None);
        assert_eq!(PropertyKind::Float.coerce(""), None);
        assert_eq!(PropertyKind::Bool.coerce("yes"), None);
    }

    #[test]
    fn narrows_large_ints() {
        let mut props = Properties::new();
        props.insert("big_id", PropertyValue::I64(5_000_000_000));
        props.insert("damage", PropertyValue::I64(10));
        assert_eq!(props.get_i64("big_id"), Some(5_000_000_000));
        assert_eq!(props.get_i32("big_id"), None);
        assert_eq!(props.get_i32("damage"), Some(10));
        assert_eq!(props.get_string("damage"), None);
    }

    #[test]
    fn serializes_as_plain_json_values() {
        let mut props = Properties::new();
        props.insert("solid", PropertyValue::Bool(true));
        let json = serde_json::to_value(&props).expect("serialize");
        assert_eq!(json, serde_json::json!({ "solid": true }));
    }
}
