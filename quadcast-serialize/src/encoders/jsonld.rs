//! JSON-LD encoder.
//!
//! Writes one node object per quad in expanded form:
//!
//! ```json
//! [
//! {"@id":"http://ex.org/s","http://ex.org/p":[{"@value":"hi","@language":"en"}]}
//! ]
//! ```
//!
//! Quads in a named graph are wrapped as `{"@id": graph, "@graph": [node]}`.
//! When prefixes are present the array becomes the `@graph` of a document
//! carrying them as `@context`.

use super::QuadEncoder;
use crate::compact::PrefixTable;
use crate::service::{ChunkStream, EncodeContext, ServiceError, ServiceResult};
use futures::stream::{self, StreamExt};
use quadcast_graph::{GraphName, Quad, QuadStream, Term};
use serde_json::{Map, Value, json};

/// Streaming JSON-LD encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLdEncoder;

impl JsonLdEncoder {
    pub fn new() -> Self {
        Self
    }
}

impl QuadEncoder for JsonLdEncoder {
    fn encode(&self, quads: QuadStream, context: &EncodeContext) -> ChunkStream {
        let (open, close) = match context.prefixes().map(context_object) {
            Some(Ok(ctx)) if !ctx.is_empty() => (
                format!("{{\"@context\":{},\"@graph\":[", Value::Object(ctx)),
                "\n]}\n",
            ),
            Some(Err(e)) => return stream::iter(vec![Err(e)]).boxed(),
            _ => ("[".to_string(), "\n]\n"),
        };

        let body = quads.enumerate().map(|(i, quad)| {
            let separator = if i == 0 { "\n" } else { ",\n" };
            node_object(&quad).map(|node| format!("{}{}", separator, node))
        });

        stream::once(async move { Ok(open) })
            .chain(body)
            .chain(stream::once(async move { Ok(close.to_string()) }))
            .boxed()
    }
}

/// `@context` entries for the prefix table. The empty label maps to `@vocab`.
fn context_object(prefixes: &PrefixTable) -> ServiceResult<Map<String, Value>> {
    let mut ctx = Map::new();
    for (label, namespace) in prefixes {
        if namespace.is_empty() {
            continue;
        }
        let key = if label.is_empty() { "@vocab" } else { label.as_str() };
        if ctx.insert(key.to_string(), json!(namespace)).is_some() {
            return Err(ServiceError::Rejected(format!(
                "Duplicate JSON-LD context term '{}'",
                key
            )));
        }
    }
    Ok(ctx)
}

fn node_object(quad: &Quad) -> ServiceResult<String> {
    let mut node = Map::new();
    node.insert("@id".to_string(), json!(node_id(&quad.subject)));
    node.insert(
        node_id(&quad.predicate),
        Value::Array(vec![object_value(&quad.object)]),
    );

    let value = match &quad.graph {
        GraphName::Default => Value::Object(node),
        GraphName::Named(graph) => json!({
            "@id": node_id(graph),
            "@graph": [Value::Object(node)],
        }),
    };

    serde_json::to_string(&value).map_err(|e| ServiceError::StreamFailed(e.to_string()))
}

fn node_id(term: &Term) -> String {
    match term {
        Term::Iri { value } => value.to_string(),
        Term::BlankNode { id } => id.to_string(),
        Term::Literal { value, .. } => value.to_string(),
    }
}

fn object_value(term: &Term) -> Value {
    match term {
        Term::Literal {
            value,
            datatype,
            language,
        } => {
            let mut literal = Map::new();
            literal.insert("@value".to_string(), json!(value.as_ref()));
            if let Some(language) = language {
                literal.insert("@language".to_string(), json!(language.as_ref()));
            } else if let Some(datatype) = datatype {
                literal.insert("@type".to_string(), json!(datatype.as_ref()));
            }
            Value::Object(literal)
        }
        other => json!({ "@id": node_id(other) }),
    }
}
