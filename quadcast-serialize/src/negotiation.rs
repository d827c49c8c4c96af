//! Content-type resolution and negotiation queries.

use crate::content_type::{self, ContentType};
use crate::service::{ContentTypeRanker, NegotiationContext, PriorityMap, ServiceResult};
use std::sync::Arc;

/// Resolves target content types from paths and exposes the available
/// content types as ranked by an injected [`ContentTypeRanker`].
#[derive(Clone)]
pub struct ContentTypeResolver {
    ranker: Arc<dyn ContentTypeRanker>,
}

impl ContentTypeResolver {
    pub fn new(ranker: Arc<dyn ContentTypeRanker>) -> Self {
        Self { ranker }
    }

    /// See [`content_type::resolve_from_extension`].
    pub fn resolve_from_extension(&self, path: &str) -> Option<ContentType> {
        content_type::resolve_from_extension(path)
    }

    /// All available content types, in the ranker's order.
    pub async fn list_content_types(&self) -> ServiceResult<Vec<ContentType>> {
        Ok(self
            .list_content_types_prioritized()
            .await?
            .into_keys()
            .collect())
    }

    /// The ranker's result for an empty negotiation context, unmodified.
    pub async fn list_content_types_prioritized(&self) -> ServiceResult<PriorityMap> {
        self.ranker.rank(&NegotiationContext::default()).await
    }
}

impl std::fmt::Debug for ContentTypeResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentTypeResolver").finish_non_exhaustive()
    }
}
