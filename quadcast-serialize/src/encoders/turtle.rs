//! Turtle and TriG encoders.
//!
//! Consecutive quads sharing a subject are written as one statement, with
//! repeated predicates folded into object lists:
//!
//! ```text
//! <http://ex.org/s> <http://ex.org/p> <http://ex.org/o1>, <http://ex.org/o2> ;
//!     a <http://ex.org/Thing> .
//! ```
//!
//! Grouping only looks at neighbouring quads, so output starts before the
//! input ends. IRIs are always written in full; compaction happens later in
//! the pipeline. Prefix declarations from the encode context are written first.

use super::QuadEncoder;
use crate::compact::PrefixTable;
use crate::service::{ChunkStream, EncodeContext};
use futures::stream::{self, StreamExt};
use quadcast_graph::{GraphName, QuadStream, Term};
use std::fmt::Write;

const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Grouped statement encoder for Turtle, N3 and TriG.
#[derive(Debug, Clone, Copy)]
pub struct TurtleEncoder {
    graphs: bool,
}

impl TurtleEncoder {
    /// Turtle (and N3): graph names are dropped.
    pub fn turtle() -> Self {
        Self { graphs: false }
    }

    /// TriG: named-graph quads go into `<g> { ... }` blocks.
    pub fn trig() -> Self {
        Self { graphs: true }
    }
}

impl QuadEncoder for TurtleEncoder {
    fn encode(&self, quads: QuadStream, context: &EncodeContext) -> ChunkStream {
        let header = prefix_declarations(context.prefixes());
        let body = stream::unfold(Grouper::new(quads, self.graphs), |mut grouper| async move {
            grouper.next_chunk().await.map(|chunk| (Ok(chunk), grouper))
        });

        stream::iter(header.into_iter().map(Ok)).chain(body).boxed()
    }
}

/// One `@prefix` chunk per usable entry, then a blank line.
fn prefix_declarations(prefixes: Option<&PrefixTable>) -> Vec<String> {
    let mut lines: Vec<String> = prefixes
        .into_iter()
        .flatten()
        .filter(|(_, namespace)| !namespace.is_empty())
        .map(|(label, namespace)| format!("@prefix {}: <{}> .\n", label, namespace))
        .collect();

    if !lines.is_empty() {
        lines.push("\n".to_string());
    }
    lines
}

/// Statements about one subject in one graph.
struct Group {
    graph: GraphName,
    subject: Term,
    predicates: Vec<(Term, Vec<Term>)>,
}

impl Group {
    fn new(graph: GraphName, subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            graph,
            subject,
            predicates: vec![(predicate, vec![object])],
        }
    }

    fn push(&mut self, predicate: Term, object: Term) {
        match self.predicates.last_mut() {
            Some((last, objects)) if *last == predicate => objects.push(object),
            _ => self.predicates.push((predicate, vec![object])),
        }
    }
}

struct Grouper {
    quads: QuadStream,
    graphs: bool,
    current: Option<Group>,
    open_graph: Option<Term>,
    finished: bool,
}

impl Grouper {
    fn new(quads: QuadStream, graphs: bool) -> Self {
        Self {
            quads,
            graphs,
            current: None,
            open_graph: None,
            finished: false,
        }
    }

    /// Pull quads until a statement is complete.
    async fn next_chunk(&mut self) -> Option<String> {
        if self.finished {
            return None;
        }

        while let Some(quad) = self.quads.next().await {
            let graph = if self.graphs {
                quad.graph
            } else {
                GraphName::Default
            };

            let continues = self
                .current
                .as_ref()
                .is_some_and(|group| group.graph == graph && group.subject == quad.subject);

            if continues {
                if let Some(group) = self.current.as_mut() {
                    group.push(quad.predicate, quad.object);
                }
                continue;
            }

            let next = Group::new(graph, quad.subject, quad.predicate, quad.object);
            if let Some(done) = self.current.replace(next) {
                return Some(self.render(done));
            }
        }

        self.finished = true;
        let mut out = match self.current.take() {
            Some(group) => self.render(group),
            None => String::new(),
        };
        if self.open_graph.take().is_some() {
            out.push_str("}\n");
        }
        (!out.is_empty()).then_some(out)
    }

    fn render(&mut self, group: Group) -> String {
        let mut out = String::new();

        let target = group.graph.as_term().cloned();
        if self.open_graph != target {
            if self.open_graph.take().is_some() {
                out.push_str("}\n");
            }
            if let Some(graph) = &target {
                let _ = writeln!(out, "{} {{", graph);
            }
            self.open_graph = target;
        }

        let indent = if self.open_graph.is_some() { "    " } else { "" };
        let _ = write!(out, "{}{}", indent, group.subject);

        for (i, (predicate, objects)) in group.predicates.iter().enumerate() {
            if i == 0 {
                out.push(' ');
            } else {
                let _ = write!(out, " ;\n{}    ", indent);
            }

            match predicate.as_iri() {
                Some(RDF_TYPE) => out.push('a'),
                _ => {
                    let _ = write!(out, "{}", predicate);
                }
            }
            out.push(' ');

            for (j, object) in objects.iter().enumerate() {
                if j > 0 {
                    out.push_str(", ");
                }
                let _ = write!(out, "{}", object);
            }
        }

        out.push_str(" .\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::TryStreamExt;
    use pretty_assertions::assert_eq;
    use quadcast_graph::{Quad, empty_quad_stream, quad_stream};

    fn ex(local: &str) -> Term {
        Term::iri(format!("http://ex.org/{}", local))
    }

    fn in_graph(s: &str, p: &str, o: &str, g: Option<&str>) -> Quad {
        Quad::new(
            ex(s),
            ex(p),
            ex(o),
            g.map_or(GraphName::Default, |g| GraphName::named(ex(g))),
        )
    }

    async fn encode(encoder: TurtleEncoder, quads: Vec<Quad>, context: EncodeContext) -> Vec<String> {
        encoder
            .encode(quad_stream(quads), &context)
            .try_collect()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_groups_subject_and_predicate() {
        let quads = vec![
            Quad::triple(ex("s"), ex("p"), ex("o1")),
            Quad::triple(ex("s"), ex("p"), ex("o2")),
            Quad::triple(ex("s"), Term::iri(RDF_TYPE), ex("Thing")),
            Quad::triple(ex("t"), ex("p"), Term::string("x")),
        ];
        let chunks = encode(TurtleEncoder::turtle(), quads, EncodeContext::new()).await;

        assert_eq!(
            chunks,
            vec![
                "<http://ex.org/s> <http://ex.org/p> <http://ex.org/o1>, <http://ex.org/o2> ;\n    a <http://ex.org/Thing> .\n".to_string(),
                "<http://ex.org/t> <http://ex.org/p> \"x\" .\n".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_prefix_header() {
        let mut prefixes = PrefixTable::new();
        prefixes.insert("ex".to_string(), "http://ex.org/".to_string());
        prefixes.insert(String::new(), "http://default.org/".to_string());
        let context = EncodeContext::for_request(&crate::ContentType::turtle(), Some(&prefixes));

        let chunks = encode(
            TurtleEncoder::turtle(),
            vec![Quad::triple(ex("s"), ex("p"), ex("o"))],
            context,
        )
        .await;

        assert_eq!(
            chunks.concat(),
            "@prefix ex: <http://ex.org/> .\n\
             @prefix : <http://default.org/> .\n\
             \n\
             <http://ex.org/s> <http://ex.org/p> <http://ex.org/o> .\n"
        );
    }

    #[tokio::test]
    async fn test_turtle_drops_graph_names() {
        let quads = vec![
            in_graph("s", "p", "o1", None),
            in_graph("s", "p", "o2", Some("g")),
        ];
        let chunks = encode(TurtleEncoder::turtle(), quads, EncodeContext::new()).await;
        assert_eq!(
            chunks.concat(),
            "<http://ex.org/s> <http://ex.org/p> <http://ex.org/o1>, <http://ex.org/o2> .\n"
        );
    }

    #[tokio::test]
    async fn test_trig_graph_blocks() {
        let quads = vec![
            in_graph("s", "p", "o1", None),
            in_graph("s", "p", "o2", Some("g")),
            in_graph("s2", "p", "o3", Some("g")),
            in_graph("s3", "p", "o", None),
            in_graph("s4", "p", "o", Some("h")),
        ];
        let chunks = encode(TurtleEncoder::trig(), quads, EncodeContext::new()).await;

        assert_eq!(
            chunks.concat(),
            "<http://ex.org/s> <http://ex.org/p> <http://ex.org/o1> .\n\
             <http://ex.org/g> {\n\
             \x20   <http://ex.org/s> <http://ex.org/p> <http://ex.org/o2> .\n\
             \x20   <http://ex.org/s2> <http://ex.org/p> <http://ex.org/o3> .\n\
             }\n\
             <http://ex.org/s3> <http://ex.org/p> <http://ex.org/o> .\n\
             <http://ex.org/h> {\n\
             \x20   <http://ex.org/s4> <http://ex.org/p> <http://ex.org/o> .\n\
             }\n"
        );
    }

    #[tokio::test]
    async fn test_chunks_are_whole_statements() {
        let quads = vec![
            in_graph("a", "p", "o", None),
            in_graph("b", "p", "o", None),
            in_graph("c", "p", "o", None),
        ];
        let chunks = encode(TurtleEncoder::turtle(), quads, EncodeContext::new()).await;
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.ends_with(" .\n")));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let chunks: Vec<String> = TurtleEncoder::trig()
            .encode(empty_quad_stream(), &EncodeContext::new())
            .try_collect()
            .await
            .unwrap();
        assert!(chunks.is_empty());
    }
}
