//! Built-in quad encoders and the registry that ranks and dispatches them.
//!
//! - **N-Quads / N-Triples**: one line per quad
//! - **Turtle / TriG / N3**: statements grouped by subject and predicate,
//!   with `@prefix` declarations taken from the encode context
//! - **JSON-LD**: a flat array of node objects
//!
//! [`EncoderRegistry`] implements both [`ContentTypeRanker`] and
//! [`EncodingService`], so a pipeline can be built from it alone:
//!
//! ```rust,no_run
//! use quadcast_serialize::{EncoderRegistry, SerializingPipeline};
//! use std::sync::Arc;
//!
//! let pipeline = SerializingPipeline::from_service(Arc::new(EncoderRegistry::with_defaults()));
//! ```

pub mod jsonld;
pub mod nquads;
pub mod turtle;

pub use jsonld::JsonLdEncoder;
pub use nquads::NQuadsEncoder;
pub use turtle::TurtleEncoder;

use crate::content_type::ContentType;
use crate::service::{
    ChunkStream, ContentTypeRanker, EncodeContext, EncodeRequest, EncodingService,
    NegotiationContext, PriorityMap, ServiceError, ServiceResult,
};
use async_trait::async_trait;
use indexmap::IndexMap;
use quadcast_graph::QuadStream;
use std::sync::Arc;

/// Encodes quads into one concrete syntax.
pub trait QuadEncoder: Send + Sync {
    /// Produce chunks lazily from `quads`.
    ///
    /// A chunk must never end in the middle of an `<...>` IRI.
    fn encode(&self, quads: QuadStream, context: &EncodeContext) -> ChunkStream;
}

struct Registration {
    priority: f64,
    encoder: Arc<dyn QuadEncoder>,
}

/// Content-type keyed set of encoders with static priorities.
///
/// Ranking ignores the negotiation context and returns registrations in the
/// order they were first added.
#[derive(Default)]
pub struct EncoderRegistry {
    encoders: IndexMap<ContentType, Registration>,
}

impl EncoderRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every built-in encoder.
    ///
    /// | content type            | priority |
    /// |-------------------------|----------|
    /// | `application/n-quads`   | 1.0      |
    /// | `text/turtle`           | 0.9      |
    /// | `application/trig`      | 0.9      |
    /// | `application/n-triples` | 0.8      |
    /// | `application/ld+json`   | 0.7      |
    /// | `text/n3`               | 0.5      |
    pub fn with_defaults() -> Self {
        let defaults: [(ContentType, f64, Arc<dyn QuadEncoder>); 6] = [
            (ContentType::n_quads(), 1.0, Arc::new(NQuadsEncoder::quads())),
            (ContentType::turtle(), 0.9, Arc::new(TurtleEncoder::turtle())),
            (ContentType::trig(), 0.9, Arc::new(TurtleEncoder::trig())),
            (ContentType::n_triples(), 0.8, Arc::new(NQuadsEncoder::triples())),
            (ContentType::json_ld(), 0.7, Arc::new(JsonLdEncoder::new())),
            (ContentType::n3(), 0.5, Arc::new(TurtleEncoder::turtle())),
        ];

        let mut registry = Self::new();
        for (content_type, priority, encoder) in defaults {
            registry.encoders.insert(content_type, Registration { priority, encoder });
        }
        registry
    }

    /// Register `encoder` for `content_type`.
    ///
    /// Replaces an existing registration for the same content type, keeping
    /// its position in the ranking.
    ///
    /// # Errors
    /// `ServiceError::Rejected` if `priority` is not in `(0, 1]`.
    pub fn register(
        &mut self,
        content_type: ContentType,
        priority: f64,
        encoder: Arc<dyn QuadEncoder>,
    ) -> ServiceResult<&mut Self> {
        if !(priority > 0.0 && priority <= 1.0) {
            return Err(ServiceError::Rejected(format!(
                "Priority {} for '{}' must be in (0, 1]",
                priority, content_type
            )));
        }

        tracing::debug!(content_type = %content_type, priority, "Registering encoder");
        self.encoders
            .insert(content_type, Registration { priority, encoder });
        Ok(self)
    }

    pub fn contains(&self, content_type: &ContentType) -> bool {
        self.encoders.contains_key(content_type)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Priorities of all registered content types, in registration order.
    pub fn priorities(&self) -> PriorityMap {
        self.encoders
            .iter()
            .map(|(content_type, reg)| (content_type.clone(), reg.priority))
            .collect()
    }
}

impl std::fmt::Debug for EncoderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.encoders.iter().map(|(ct, reg)| (ct.as_str(), reg.priority)))
            .finish()
    }
}

#[async_trait]
impl ContentTypeRanker for EncoderRegistry {
    async fn rank(&self, _context: &NegotiationContext) -> ServiceResult<PriorityMap> {
        Ok(self.priorities())
    }
}

#[async_trait]
impl EncodingService for EncoderRegistry {
    async fn encode(&self, request: EncodeRequest) -> ServiceResult<ChunkStream> {
        let registration = self.encoders.get(&request.content_type).ok_or_else(|| {
            ServiceError::UnsupportedContentType(request.content_type.to_string())
        })?;

        tracing::debug!(content_type = %request.content_type, "Encoding with registered encoder");
        Ok(registration.encoder.encode(request.quads, &request.context))
    }
}
