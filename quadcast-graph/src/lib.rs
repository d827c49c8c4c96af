//! # quadcast-graph
//!
//! Quad and term data structures for Quadcast.
//!
//! This crate provides the graph statement model consumed by the
//! serialization pipeline:
//!
//! - **Terms**: IRI, blank node, literal (always holding expanded IRIs)
//! - **Quads**: subject, predicate, object and graph name
//! - **Quad streams**: boxed async streams of quads produced incrementally
//!
//! ## Example
//!
//! ```rust
//! use quadcast_graph::{Quad, Term, quad_stream};
//!
//! let quad = Quad::triple(
//!     Term::iri("http://ex.org/s"),
//!     Term::iri("http://ex.org/p"),
//!     Term::string("hello"),
//! );
//!
//! assert_eq!(
//!     quad.to_ntriples_line(),
//!     "<http://ex.org/s> <http://ex.org/p> \"hello\" .\n"
//! );
//!
//! let _stream = quad_stream(vec![quad]);
//! ```

pub mod error;
pub mod quad;
pub mod stream;
pub mod term;

pub use error::TermError;
pub use quad::{GraphName, Quad};
pub use stream::{QuadStream, empty_quad_stream, quad_stream};
pub use term::{BlankId, Term, escape_literal};
