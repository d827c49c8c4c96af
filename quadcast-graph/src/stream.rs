//! Incrementally produced quad streams.

use crate::quad::Quad;
use futures::stream::{self, BoxStream, StreamExt};

/// An ordered, potentially unbounded sequence of quads.
pub type QuadStream = BoxStream<'static, Quad>;

/// Adapt any iterator of quads into a [`QuadStream`].
///
/// The iterator is pulled lazily, one quad per poll.
pub fn quad_stream<I>(quads: I) -> QuadStream
where
    I: IntoIterator<Item = Quad>,
    I::IntoIter: Send + 'static,
{
    stream::iter(quads).boxed()
}

/// A stream that yields no quads.
pub fn empty_quad_stream() -> QuadStream {
    stream::empty().boxed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::Term;

    #[tokio::test]
    async fn test_quad_stream_preserves_order() {
        let quads: Vec<Quad> = (0..5)
            .map(|i| {
                Quad::triple(
                    Term::iri(format!("http://ex.org/s{}", i)),
                    Term::iri("http://ex.org/p"),
                    Term::integer(i),
                )
            })
            .collect();

        let collected: Vec<Quad> = quad_stream(quads.clone()).collect().await;
        assert_eq!(collected, quads);
    }

    #[tokio::test]
    async fn test_empty_quad_stream() {
        let collected: Vec<Quad> = empty_quad_stream().collect().await;
        assert!(collected.is_empty());
    }
}
