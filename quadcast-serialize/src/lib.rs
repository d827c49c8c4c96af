//! Quadcast serialization library.
//!
//! Turns a stream of quads into a stream of serialized text in a chosen RDF
//! syntax, with optional IRI compaction against a prefix table and base IRI.
//!
//! # Modules
//!
//! - [`content_type`]: Content types and the file extension table
//! - [`negotiation`]: Content-type resolution and ranked listings
//! - [`service`]: Collaborator traits for ranking and encoding
//! - [`compact`]: Streaming IRI compaction
//! - [`pipeline`]: The serializing pipeline and its output stream
//! - [`encoders`]: Built-in encoders and their registry
//! - [`config`]: `quadcast.yaml` loading and validation
//! - [`errors`]: Error types with user-facing suggestions
//!
//! # Example
//!
//! ```rust,no_run
//! use quadcast_graph::{Quad, Term, quad_stream};
//! use quadcast_serialize::{EncoderRegistry, SerializeOptions, SerializingPipeline};
//! use std::sync::Arc;
//!
//! # async fn run() -> Result<(), quadcast_serialize::SerializeError> {
//! let pipeline = SerializingPipeline::from_service(Arc::new(EncoderRegistry::with_defaults()));
//!
//! let quads = quad_stream(vec![Quad::triple(
//!     Term::iri("http://ex.org/s"),
//!     Term::iri("http://ex.org/p"),
//!     Term::iri("http://ex.org/o"),
//! )]);
//!
//! let output = pipeline
//!     .serialize(quads, SerializeOptions::path("out.ttl").with_prefix("ex", "http://ex.org/"))?
//!     .collect_string()
//!     .await?;
//!
//! assert!(output.ends_with("ex:s ex:p ex:o .\n"));
//! # Ok(())
//! # }
//! ```

pub mod compact;
pub mod config;
pub mod content_type;
pub mod encoders;
pub mod errors;
pub mod negotiation;
pub mod pipeline;
pub mod service;

// Re-export commonly used types for convenience
pub use compact::{IriCompactor, PrefixTable};
pub use config::{ConfigError, SerializerConfig};
pub use content_type::{ContentType, EXTENSION_MAP, extension_for, resolve_from_extension};
pub use encoders::{EncoderRegistry, JsonLdEncoder, NQuadsEncoder, QuadEncoder, TurtleEncoder};
pub use errors::{ConfigurationError, SerializeError};
pub use negotiation::ContentTypeResolver;
pub use pipeline::{SerializeOptions, SerializedStream, SerializingPipeline};
pub use service::{
    ChunkStream, ContentTypeRanker, ContextValue, EncodeContext, EncodeRequest, EncodingService,
    KEY_CONTENT_TYPE, KEY_PREFIXES, NegotiationContext, PriorityMap, ServiceError, ServiceResult,
};
