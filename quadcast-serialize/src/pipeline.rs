//! The serializing pipeline.
//!
//! [`SerializingPipeline::serialize`] picks a target content type, hands the
//! quads to the injected [`EncodingService`] on a background task, and returns
//! a [`SerializedStream`] straight away. Chunks arrive on that stream in the
//! order the encoder produced them, compacted when prefixes or a base are set.
//! Encoder failures show up as the last item of the same stream.
//!
//! ```text
//! serialize()  ──▶ select content type ──▶ spawn task ──▶ return stream
//!                       │ (sync error)          │
//!                       ▼                       ▼
//!               ConfigurationError     encode ─▶ compact ─▶ bounded channel
//! ```

use crate::compact::{IriCompactor, PrefixTable};
use crate::config::SerializerConfig;
use crate::content_type::{ContentType, resolve_from_extension};
use crate::errors::{ConfigurationError, SerializeError};
use crate::negotiation::ContentTypeResolver;
use crate::service::{
    ContentTypeRanker, EncodeContext, EncodeRequest, EncodingService, PriorityMap, ServiceResult,
};
use futures::stream::{Stream, StreamExt};
use quadcast_graph::QuadStream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// Options for a single serialize call.
///
/// One of `content_type` or `path` selects the output format. When both are
/// given, `content_type` wins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerializeOptions {
    /// Explicit target content type, e.g. `text/turtle`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,

    /// File path whose extension selects the content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Prefixes for IRI compaction, passed to the encoder as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<PrefixTable>,

    /// Base IRI stripped from matching IRIs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
}

impl SerializeOptions {
    /// Options targeting an explicit content type.
    pub fn content_type(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            ..Self::default()
        }
    }

    /// Options targeting the content type implied by a path's extension.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Set the whole prefix table (builder pattern).
    pub fn with_prefixes(mut self, prefixes: PrefixTable) -> Self {
        self.prefixes = Some(prefixes);
        self
    }

    /// Append one prefix (builder pattern).
    pub fn with_prefix(mut self, label: impl Into<String>, namespace: impl Into<String>) -> Self {
        self.prefixes
            .get_or_insert_with(PrefixTable::new)
            .insert(label.into(), namespace.into());
        self
    }

    /// Set the base IRI (builder pattern).
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Pick the target content type.
    ///
    /// # Errors
    /// - `InvalidContentType` if `content_type` is malformed
    /// - `UnrecognizedPath` if `path` has no known extension
    /// - `MissingOption` if neither field is usable
    pub fn select_content_type(&self) -> Result<ContentType, ConfigurationError> {
        let explicit = self
            .content_type
            .as_deref()
            .filter(|ct| !ct.trim().is_empty());

        match (explicit, self.path.as_deref()) {
            (Some(content_type), _) => ContentType::parse(content_type),
            (None, Some(path)) => {
                resolve_from_extension(path).ok_or_else(|| ConfigurationError::UnrecognizedPath {
                    path: path.to_string(),
                })
            }
            (None, None) => Err(ConfigurationError::MissingOption),
        }
    }
}

/// Resolves content types and runs serializations against injected
/// collaborators. Holds no per-call state.
#[derive(Clone)]
pub struct SerializingPipeline {
    resolver: ContentTypeResolver,
    encoder: Arc<dyn EncodingService>,
    config: SerializerConfig,
}

impl SerializingPipeline {
    pub fn new(ranker: Arc<dyn ContentTypeRanker>, encoder: Arc<dyn EncodingService>) -> Self {
        Self {
            resolver: ContentTypeResolver::new(ranker),
            encoder,
            config: SerializerConfig::default(),
        }
    }

    /// Use one collaborator for both ranking and encoding, such as an
    /// [`EncoderRegistry`](crate::encoders::EncoderRegistry).
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ContentTypeRanker + EncodingService + 'static,
    {
        Self::new(service.clone(), service)
    }

    /// Replace the configuration (builder pattern).
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn resolver(&self) -> &ContentTypeResolver {
        &self.resolver
    }

    /// All content types the ranking service knows about, in its order.
    pub async fn get_content_types(&self) -> ServiceResult<Vec<ContentType>> {
        self.resolver.list_content_types().await
    }

    /// Content types with priorities, exactly as the ranking service
    /// returned them.
    pub async fn get_content_types_prioritized(&self) -> ServiceResult<PriorityMap> {
        self.resolver.list_content_types_prioritized().await
    }

    /// Serialize `quads` according to `options`.
    ///
    /// Returns before any encoding happens. Configuration problems are
    /// reported here; everything after that point, including the encoder
    /// rejecting the request, arrives as an `Err` item on the returned stream.
    ///
    /// # Errors
    /// - any [`ConfigurationError`] from content-type selection
    /// - `ConfigurationError::NoRuntime` outside a tokio runtime
    pub fn serialize(
        &self,
        quads: QuadStream,
        options: SerializeOptions,
    ) -> Result<SerializedStream, SerializeError> {
        let content_type = options.select_content_type()?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ConfigurationError::NoRuntime)?;

        let prefixes = options.prefixes.or_else(|| {
            (!self.config.default_prefixes.is_empty())
                .then(|| self.config.default_prefixes.clone())
        });
        let base = options.base.or_else(|| self.config.default_base.clone());

        let compactor = IriCompactor::new(prefixes.as_ref(), base.as_deref());
        let request = EncodeRequest {
            content_type: content_type.clone(),
            quads,
            context: EncodeContext::for_request(&content_type, prefixes.as_ref()),
        };

        tracing::debug!(
            content_type = %content_type,
            prefixes = prefixes.as_ref().map_or(0, |p| p.len()),
            base = base.as_deref().unwrap_or(""),
            "Starting serialization"
        );

        let (tx, rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let task = runtime.spawn(forward(Arc::clone(&self.encoder), request, compactor, tx));

        Ok(SerializedStream {
            content_type,
            rx,
            task: task.abort_handle(),
        })
    }
}

impl std::fmt::Debug for SerializingPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializingPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

type Chunk = Result<String, SerializeError>;

/// Run the encoder and forward its chunks to the consumer.
///
/// Stops at the first error or when the consumer goes away.
async fn forward(
    encoder: Arc<dyn EncodingService>,
    request: EncodeRequest,
    compactor: IriCompactor,
    tx: mpsc::Sender<Chunk>,
) {
    let content_type = request.content_type.clone();

    let encoded = tokio::select! {
        result = encoder.encode(request) => result,
        _ = tx.closed() => {
            tracing::debug!(content_type = %content_type, "Output dropped before encoder responded");
            return;
        }
    };

    let chunks = match encoded {
        Ok(chunks) => chunks,
        Err(e) => {
            tracing::warn!(content_type = %content_type, error = %e, "Encoder rejected request");
            let _ = tx.send(Err(SerializeError::Encoding(e))).await;
            return;
        }
    };

    let mut chunks = compactor.transform(chunks);
    let mut forwarded = 0usize;

    while let Some(item) = chunks.next().await {
        match item {
            Ok(chunk) => {
                tracing::trace!(len = chunk.len(), "Forwarding chunk");
                if tx.send(Ok(chunk)).await.is_err() {
                    tracing::warn!(
                        content_type = %content_type,
                        forwarded,
                        "Output dropped mid-stream, stopping encoder"
                    );
                    return;
                }
                forwarded += 1;
            }
            Err(e) => {
                tracing::warn!(content_type = %content_type, error = %e, "Encoder stream failed");
                let _ = tx.send(Err(SerializeError::Encoding(e))).await;
                return;
            }
        }
    }

    tracing::debug!(content_type = %content_type, forwarded, "Serialization finished");
}

/// Output of a serialize call: a stream of serialized chunks.
///
/// Yields `Ok(chunk)` in encoder order. An encoder failure is yielded once as
/// `Err(SerializeError::Encoding(..))` and the stream ends after it; output
/// received before an error is incomplete. Dropping the stream stops the
/// background encoding.
pub struct SerializedStream {
    content_type: ContentType,
    rx: mpsc::Receiver<Chunk>,
    task: AbortHandle,
}

impl SerializedStream {
    /// The content type being produced.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Concatenate all chunks, or return the first error.
    pub async fn collect_string(mut self) -> Result<String, SerializeError> {
        let mut output = String::new();
        while let Some(chunk) = self.next().await {
            output.push_str(&chunk?);
        }
        Ok(output)
    }
}

impl Stream for SerializedStream {
    type Item = Chunk;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for SerializedStream {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl std::fmt::Debug for SerializedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerializedStream")
            .field("content_type", &self.content_type)
            .finish_non_exhaustive()
    }
}
