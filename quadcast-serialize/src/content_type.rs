//! Content types and file-extension resolution.
//!
//! A [`ContentType`] is a lower-case MIME token of the form
//! `type/subtype[+suffix]`. The extension table is a process-wide constant with
//! no mutation API.

use crate::errors::ConfigurationError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// A MIME content type identifying a serialization format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentType(Arc<str>);

impl ContentType {
    pub const TURTLE: &'static str = "text/turtle";
    pub const N_TRIPLES: &'static str = "application/n-triples";
    pub const N_QUADS: &'static str = "application/n-quads";
    pub const N3: &'static str = "text/n3";
    pub const TRIG: &'static str = "application/trig";
    pub const JSON_LD: &'static str = "application/ld+json";

    /// Parse a content type from caller input.
    ///
    /// Surrounding whitespace and HTTP media-type parameters (`; charset=...`)
    /// are dropped and the result is lower-cased. The remaining token must have
    /// exactly one `/` with non-empty type and subtype made of token characters.
    pub fn parse(value: &str) -> Result<Self, ConfigurationError> {
        let invalid = || ConfigurationError::InvalidContentType {
            value: value.to_string(),
        };

        let essence = value.split(';').next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        if !is_token(kind) || !is_token(subtype) {
            return Err(invalid());
        }

        Ok(Self(Arc::from(essence.to_ascii_lowercase())))
    }

    /// Wrap one of the well-known constants. The value must already be in
    /// canonical form.
    pub fn from_static(value: &'static str) -> Self {
        debug_assert_eq!(value, value.to_ascii_lowercase());
        Self(Arc::from(value))
    }

    pub fn turtle() -> Self {
        Self::from_static(Self::TURTLE)
    }

    pub fn n_triples() -> Self {
        Self::from_static(Self::N_TRIPLES)
    }

    pub fn n_quads() -> Self {
        Self::from_static(Self::N_QUADS)
    }

    pub fn n3() -> Self {
        Self::from_static(Self::N3)
    }

    pub fn trig() -> Self {
        Self::from_static(Self::TRIG)
    }

    pub fn json_ld() -> Self {
        Self::from_static(Self::JSON_LD)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// RFC 7230 token characters.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || matches!(
                    c,
                    '!' | '#' | '$' | '%' | '&' | '\'' | '*' | '+' | '-' | '.' | '^' | '_' | '`'
                        | '|' | '~'
                )
        })
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ContentType {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ContentType {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for ContentType {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Lower-case file extension (no leading dot) to content type.
///
/// Order matters for [`extension_for`]: the first extension listed for a
/// content type is its canonical one.
pub static EXTENSION_MAP: &[(&str, &str)] = &[
    ("ttl", ContentType::TURTLE),
    ("turtle", ContentType::TURTLE),
    ("nt", ContentType::N_TRIPLES),
    ("ntriples", ContentType::N_TRIPLES),
    ("nq", ContentType::N_QUADS),
    ("nquads", ContentType::N_QUADS),
    ("n3", ContentType::N3),
    ("trig", ContentType::TRIG),
    ("jsonld", ContentType::JSON_LD),
    ("json", ContentType::JSON_LD),
];

/// Resolve a content type from the extension of `path`.
///
/// The extension is the substring after the last `.`. Lookup is
/// case-sensitive: `data.TTL` is not recognized. Returns `None` when the path
/// has no `.` or the extension is not in [`EXTENSION_MAP`].
pub fn resolve_from_extension(path: &str) -> Option<ContentType> {
    let (_, extension) = path.rsplit_once('.')?;
    EXTENSION_MAP
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, content_type)| ContentType::from_static(content_type))
}

/// Canonical file extension for a content type, if it has one.
pub fn extension_for(content_type: &ContentType) -> Option<&'static str> {
    EXTENSION_MAP
        .iter()
        .find(|(_, ct)| *ct == content_type.as_str())
        .map(|(ext, _)| *ext)
}
