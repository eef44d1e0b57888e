mod error;
mod typed_value;
mod xsd;

pub use error::*;
pub use typed_value::*;
pub use xsd::*;

/// The XSD vocabulary used to type literals.
pub mod vocab {
    pub use oxrdf::vocab::{rdf, xsd};
}

// Re-export some oxrdf types.
pub use oxrdf::{
    BlankNode, BlankNodeRef, Literal, LiteralRef, NamedNode, NamedNodeRef, Term, TermRef,
    Variable, VariableRef,
};

// Re-export the expression tree produced by the SPARQL parser.
pub use spargebra::algebra::{Expression, Function, OrderExpression};
