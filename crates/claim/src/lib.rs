//! Claim documents: the JSON form of a statement, the data of its subjects, and the binder that
//! turns both into a [`Proposition`](zkpc_core::Proposition) ready for compilation.

pub mod bind;
pub mod document;
pub mod error;
pub mod json;
mod loader;

pub use bind::bind;
pub use document::{ClaimDocument, ClaimNode, GadgetDecl, Operand, Role, SetDecl, Span, SubjectDecl};
pub use error::{ClaimError, Result};
pub use json::JsonData;
pub use loader::Claim;
