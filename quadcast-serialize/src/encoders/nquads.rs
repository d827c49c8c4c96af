//! Line-based encoders: N-Quads and N-Triples.

use super::QuadEncoder;
use crate::service::{ChunkStream, EncodeContext};
use futures::StreamExt;
use quadcast_graph::QuadStream;

/// One statement per line, one chunk per quad.
#[derive(Debug, Clone, Copy)]
pub struct NQuadsEncoder {
    with_graph: bool,
}

impl NQuadsEncoder {
    /// N-Quads: graph names are written.
    pub fn quads() -> Self {
        Self { with_graph: true }
    }

    /// N-Triples: graph names are dropped.
    pub fn triples() -> Self {
        Self { with_graph: false }
    }
}

impl QuadEncoder for NQuadsEncoder {
    fn encode(&self, quads: QuadStream, _context: &EncodeContext) -> ChunkStream {
        let with_graph = self.with_graph;
        quads
            .map(move |quad| {
                Ok(if with_graph {
                    quad.to_nquads_line()
                } else {
                    quad.to_ntriples_line()
                })
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use quadcast_graph::{GraphName, Quad, Term, empty_quad_stream, quad_stream};

    fn quads() -> QuadStream {
        quad_stream(vec![
            Quad::triple(
                Term::iri("http://ex.org/s"),
                Term::iri("http://ex.org/p"),
                Term::lang_string("hi", "en"),
            ),
            Quad::new(
                Term::blank("b0"),
                Term::iri("http://ex.org/p"),
                Term::iri("http://ex.org/o"),
                GraphName::named(Term::iri("http://ex.org/g")),
            ),
        ])
    }

    async fn encode(encoder: NQuadsEncoder, quads: QuadStream) -> Vec<String> {
        encoder
            .encode(quads, &EncodeContext::new())
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_nquads_keeps_graph() {
        let chunks = encode(NQuadsEncoder::quads(), quads()).await;
        assert_eq!(
            chunks,
            vec![
                "<http://ex.org/s> <http://ex.org/p> \"hi\"@en .\n".to_string(),
                "_:b0 <http://ex.org/p> <http://ex.org/o> <http://ex.org/g> .\n".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_ntriples_drops_graph() {
        let chunks = encode(NQuadsEncoder::triples(), quads()).await;
        assert_eq!(
            chunks[1],
            "_:b0 <http://ex.org/p> <http://ex.org/o> .\n"
        );
    }

    #[tokio::test]
    async fn test_empty_input() {
        let chunks = encode(NQuadsEncoder::quads(), empty_quad_stream()).await;
        assert!(chunks.is_empty());
    }
}
