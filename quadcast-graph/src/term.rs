//! RDF terms: IRI, blank node and literal.
//!
//! Terms always hold **expanded** IRIs. Compaction into prefixed or
//! base-relative form happens at output time, never in the data model.

use crate::error::TermError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Datatype IRI of plain string literals. Omitted when rendering.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// Datatype IRI for `xsd:integer`.
pub const XSD_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
/// Datatype IRI for `xsd:boolean`.
pub const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
/// Datatype IRI of language-tagged strings.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// Blank node identifier, stored without the `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// The label without the `_:` prefix.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An RDF term in subject, predicate, object or graph position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "termType", rename_all = "camelCase")]
pub enum Term {
    /// Full expanded IRI (e.g. `http://schema.org/Person`)
    Iri { value: Arc<str> },
    /// Blank node with a stable label
    BlankNode { id: BlankId },
    /// Literal with lexical form, optional datatype and optional language tag.
    ///
    /// `datatype` is `None` for plain strings. When `language` is set the
    /// datatype is implied to be `rdf:langString`.
    Literal {
        value: Arc<str>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        datatype: Option<Arc<str>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        language: Option<Arc<str>>,
    },
}

impl Term {
    /// Create an IRI term without validation.
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Term::Iri {
            value: Arc::from(iri.as_ref()),
        }
    }

    /// Create an IRI term, rejecting values that cannot be written between
    /// angle brackets.
    pub fn checked_iri(iri: impl AsRef<str>) -> Result<Self, TermError> {
        let iri = iri.as_ref();
        if iri.is_empty() {
            return Err(TermError::EmptyIri);
        }
        if let Some(found) = iri.chars().find(|c| is_forbidden_iri_char(*c)) {
            return Err(TermError::ForbiddenCharacter {
                iri: iri.to_string(),
                found,
            });
        }
        Ok(Self::iri(iri))
    }

    pub fn blank(label: impl AsRef<str>) -> Self {
        Term::BlankNode {
            id: BlankId::new(label),
        }
    }

    /// Create a plain string literal (xsd:string).
    pub fn string(value: impl AsRef<str>) -> Self {
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: None,
            language: None,
        }
    }

    /// Create a language-tagged string literal.
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: None,
            language: Some(Arc::from(lang.as_ref())),
        }
    }

    /// Create a literal with an explicit datatype IRI.
    pub fn typed(value: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        let datatype = datatype.as_ref();
        Term::Literal {
            value: Arc::from(value.as_ref()),
            datatype: (datatype != XSD_STRING).then(|| Arc::from(datatype)),
            language: None,
        }
    }

    pub fn integer(value: i64) -> Self {
        Self::typed(value.to_string(), XSD_INTEGER)
    }

    pub fn boolean(value: bool) -> Self {
        Self::typed(value.to_string(), XSD_BOOLEAN)
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Term::Iri { .. })
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Term::BlankNode { .. })
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Literal { .. })
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Term::Iri { value } => Some(value),
            _ => None,
        }
    }

    /// Render in N-Triples syntax: `<iri>`, `_:label`, or a quoted literal.
    pub fn to_ntriples(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri { value } => write!(f, "<{}>", value),
            Term::BlankNode { id } => write!(f, "{}", id),
            Term::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                if let Some(lang) = language {
                    write!(f, "@{}", lang)
                } else if let Some(dt) = datatype {
                    write!(f, "^^<{}>", dt)
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn is_forbidden_iri_char(c: char) -> bool {
    matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '^' | '`' | '\\') || c.is_whitespace()
}

/// Escape a literal's lexical form for use between double quotes.
pub fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}
