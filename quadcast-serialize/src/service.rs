//! Collaborator traits for content-type ranking and quad encoding.
//!
//! The pipeline never encodes quads itself. It hands them to an
//! [`EncodingService`] and learns which content types exist from a
//! [`ContentTypeRanker`]. Both are injected as trait objects so hosts can plug
//! in their own encoders and tests can use fakes.

use crate::compact::PrefixTable;
use crate::content_type::ContentType;
use async_trait::async_trait;
use futures::stream::BoxStream;
use indexmap::IndexMap;
use quadcast_graph::QuadStream;
use thiserror::Error;

/// Errors raised by the ranking and encoding collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// No encoder handles the requested content type.
    #[error("No encoder available for content type '{0}'")]
    UnsupportedContentType(String),

    /// The encoder refused the request.
    #[error("Encoder rejected request: {0}")]
    Rejected(String),

    /// The encoder's data stream failed after it was returned.
    #[error("Encoder stream failed: {0}")]
    StreamFailed(String),

    /// The ranking or encoding backend could not be reached.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for collaborator operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Serialized output chunks produced by an encoder.
pub type ChunkStream = BoxStream<'static, ServiceResult<String>>;

/// Content type to priority in `(0, 1]`, in ranking order.
pub type PriorityMap = IndexMap<ContentType, f64>;

/// Request context handed to the ranking service.
///
/// Negotiation here is not driven by a client request, so the context is
/// always empty.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegotiationContext;

/// Context key under which the chosen content type is stored.
pub const KEY_CONTENT_TYPE: &str = "quadcast:contentType";

/// Context key under which the caller's prefix table is stored.
///
/// Encoders with native prefix support read it to emit declarations.
pub const KEY_PREFIXES: &str = "quadcast:prefixes";

/// A value stored in an [`EncodeContext`].
#[derive(Debug, Clone, PartialEq)]
pub enum ContextValue {
    ContentType(ContentType),
    Prefixes(PrefixTable),
}

/// Keyed context passed along with an encode request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodeContext {
    entries: IndexMap<String, ContextValue>,
}

impl EncodeContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the context the pipeline hands to the encoder.
    pub fn for_request(content_type: &ContentType, prefixes: Option<&PrefixTable>) -> Self {
        let mut context = Self::new().with(
            KEY_CONTENT_TYPE,
            ContextValue::ContentType(content_type.clone()),
        );
        if let Some(prefixes) = prefixes {
            context.insert(KEY_PREFIXES, ContextValue::Prefixes(prefixes.clone()));
        }
        context
    }

    /// Insert or replace a value (builder pattern).
    pub fn with(mut self, key: impl Into<String>, value: ContextValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ContextValue) -> Option<ContextValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&ContextValue> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn content_type(&self) -> Option<&ContentType> {
        match self.get(KEY_CONTENT_TYPE) {
            Some(ContextValue::ContentType(ct)) => Some(ct),
            _ => None,
        }
    }

    pub fn prefixes(&self) -> Option<&PrefixTable> {
        match self.get(KEY_PREFIXES) {
            Some(ContextValue::Prefixes(prefixes)) => Some(prefixes),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Everything an encoder needs to produce output.
pub struct EncodeRequest {
    pub content_type: ContentType,
    pub quads: QuadStream,
    pub context: EncodeContext,
}

impl std::fmt::Debug for EncodeRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncodeRequest")
            .field("content_type", &self.content_type)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Ranks the content types that can currently be produced.
#[async_trait]
pub trait ContentTypeRanker: Send + Sync {
    /// Return every available content type with its priority.
    ///
    /// # Errors
    /// Whatever the backing service reports; callers propagate it unchanged.
    async fn rank(&self, context: &NegotiationContext) -> ServiceResult<PriorityMap>;
}

/// Turns a quad stream into serialized chunks of a given content type.
#[async_trait]
pub trait EncodingService: Send + Sync {
    /// Start encoding.
    ///
    /// Resolves once the encoder has accepted the request. Chunks are produced
    /// lazily as the returned stream is polled. An encoder must not split an
    /// angle-bracketed IRI across two chunks.
    ///
    /// # Errors
    /// - `ServiceError::UnsupportedContentType` if no encoder handles the type
    /// - `ServiceError::Rejected` if the request is refused
    async fn encode(&self, request: EncodeRequest) -> ServiceResult<ChunkStream>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn prefixes() -> PrefixTable {
        let mut table = PrefixTable::new();
        table.insert("ex".to_string(), "http://ex.org/".to_string());
        table
    }

    #[test]
    fn test_context_for_request_with_prefixes() {
        let context = EncodeContext::for_request(&ContentType::turtle(), Some(&prefixes()));
        assert_eq!(context.len(), 2);
        assert_eq!(context.content_type(), Some(&ContentType::turtle()));
        assert_eq!(context.prefixes(), Some(&prefixes()));
        assert!(context.contains(KEY_PREFIXES));
    }

    #[test]
    fn test_context_for_request_without_prefixes() {
        let context = EncodeContext::for_request(&ContentType::n_quads(), None);
        assert_eq!(context.len(), 1);
        assert_eq!(context.prefixes(), None);
    }

    #[test]
    fn test_context_typed_accessor_ignores_wrong_type() {
        let value = ContextValue::ContentType(ContentType::turtle());
        let context = EncodeContext::new().with(KEY_PREFIXES, value.clone());
        assert_eq!(context.prefixes(), None);
        assert_eq!(context.get(KEY_PREFIXES), Some(&value));
    }

    #[test]
    fn test_context_insert_replaces() {
        let mut context = EncodeContext::new();
        let first = ContextValue::ContentType(ContentType::turtle());
        let second = ContextValue::ContentType(ContentType::trig());
        assert!(context.insert(KEY_CONTENT_TYPE, first.clone()).is_none());
        let old = context.insert(KEY_CONTENT_TYPE, second);
        assert_eq!(old, Some(first));
        assert_eq!(context.content_type(), Some(&ContentType::trig()));
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_error_display() {
        let err = ServiceError::UnsupportedContentType("text/html".to_string());
        assert!(err.to_string().contains("text/html"));

        let err = ServiceError::StreamFailed("socket closed".to_string());
        assert!(err.to_string().contains("socket closed"));
    }
}
