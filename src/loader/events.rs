// src/loader/events.rs
use crate::error::MapError;
use quick_xml::events::{BytesEnd, BytesStart};
use std::str::{self, FromStr};

/// Attributes of one start element, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Empty attribute list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pair. Earlier pairs win on lookup.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Value for `key` parsed as `F`; `None` when absent or malformed.
    pub fn parse<F: FromStr>(&self, key: &str) -> Option<F> {
        self.get(key)?.trim().parse().ok()
    }

    /// Pairs in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// No pairs.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One event of a TMX document, as a tokenizer hands it over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TmxEvent {
    /// Element start.
    Start { name: String, attributes: Attributes },
    /// Element end.
    End { name: String },
    /// Character data between tags.
    Text(String),
}

impl TmxEvent {
    /// Start event from borrowed pairs.
    pub fn start(name: &str, attributes: &[(&str, &str)]) -> Self {
        TmxEvent::Start {
            name: name.to_owned(),
            attributes: attributes.iter().copied().collect(),
        }
    }

    /// End event.
    pub fn end(name: &str) -> Self {
        TmxEvent::End {
            name: name.to_owned(),
        }
    }

    /// Start followed by end, like a self-closing element.
    pub fn empty(name: &str, attributes: &[(&str, &str)]) -> [Self; 2] {
        [Self::start(name, attributes), Self::end(name)]
    }
}

pub(crate) fn start_name(e: &BytesStart<'_>) -> Result<String, MapError> {
    Ok(str::from_utf8(e.name().as_ref())?.to_string())
}

pub(crate) fn end_name(e: &BytesEnd<'_>) -> Result<String, MapError> {
    Ok(str::from_utf8(e.name().as_ref())?.to_string())
}

pub(crate) fn attributes_of(e: &BytesStart<'_>) -> Result<Attributes, MapError> {
    let mut out = Attributes::new();
    for a in e.attributes() {
        let a = a?;
        let key = str::from_utf8(a.key.as_ref())?.to_string();
        let val = a.unescape_value()?.to_string();
        out.push(key, val);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_first_match() {
        let attrs: Attributes = [("gid", "3"), ("x", "1.5"), ("gid", "9")].into_iter().collect();
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("gid"), Some("3"));
        assert_eq!(attrs.parse::<f32>("x"), Some(1.5));
        let keys: Vec<&str> = attrs.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["gid", "x", "gid"]);
    }

    #[test]
    fn malformed_numbers_parse_to_none() {
        let attrs: Attributes = [("firstgid", "one")].into_iter().collect();
        assert_eq!(attrs.parse::<u32>("firstgid"), None);
        assert_eq!(attrs.parse::<u32>("missing"), None);
    }

    #[test]
    fn reads_quick_xml_attributes() {
        let e = BytesStart::from_content(r#"image source="a &amp; b.png" width="16""#, 5);
        assert_eq!(start_name(&e).expect("name"), "image");
        let attrs = attributes_of(&e).expect("attributes");
        assert_eq!(attrs.get("source"), Some("a & b.png"));
        assert_eq!(attrs.parse::<u32>("width"), Some(16));
    }
}
