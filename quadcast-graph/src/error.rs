//! Error types for the quadcast-graph crate.

use thiserror::Error;

/// Errors raised by [`Term::checked_iri`](crate::Term::checked_iri).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TermError {
    #[error("IRI cannot be empty")]
    EmptyIri,

    #[error("IRI '{iri}' contains forbidden character {found:?}")]
    ForbiddenCharacter { iri: String, found: char },
}
