//! SPARQL text and result handling for the annotation triplestore.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`template`] | `{{name}}` placeholder templates and escaping |
//! | [`queries`] | Entity lookup and annotation inserts |
//! | [`results`] | `application/sparql-results+json` model |

pub mod queries;
pub mod results;
pub mod template;

pub use results::{Binding, RdfTerm, SparqlResults, TermKind};
pub use template::{escape_literal, SparqlTemplate};
