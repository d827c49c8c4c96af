//! Quads and graph names.

use crate::term::Term;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The graph a quad belongs to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GraphName {
    /// The default graph
    #[default]
    Default,
    /// A named graph, identified by an IRI or blank node
    Named(Term),
}

impl GraphName {
    pub fn named(term: Term) -> Self {
        GraphName::Named(term)
    }

    pub fn is_default(&self) -> bool {
        matches!(self, GraphName::Default)
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            GraphName::Default => None,
            GraphName::Named(term) => Some(term),
        }
    }
}

/// A single graph statement: subject, predicate, object and graph name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    #[serde(default, skip_serializing_if = "GraphName::is_default")]
    pub graph: GraphName,
}

impl Quad {
    pub fn new(subject: Term, predicate: Term, object: Term, graph: GraphName) -> Self {
        Self {
            subject,
            predicate,
            object,
            graph,
        }
    }

    /// Create a quad in the default graph.
    pub fn triple(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new(subject, predicate, object, GraphName::Default)
    }

    /// N-Triples statement line (graph name dropped), newline terminated.
    pub fn to_ntriples_line(&self) -> String {
        format!("{} {} {} .\n", self.subject, self.predicate, self.object)
    }

    /// N-Quads statement line, newline terminated.
    pub fn to_nquads_line(&self) -> String {
        match &self.graph {
            GraphName::Default => self.to_ntriples_line(),
            GraphName::Named(g) => format!(
                "{} {} {} {} .\n",
                self.subject, self.predicate, self.object, g
            ),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_nquads_line().trim_end())
    }
}
