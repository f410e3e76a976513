//! Data model of zero-knowledge statements: values, variables, gadgets and the propositions built
//! from them.

pub mod error;
pub mod gadget;
pub mod proposition;
pub mod schema;
pub mod source;
pub mod value;
pub mod variable;

pub use error::{CompileError, Result};
pub use gadget::{Gadget, GadgetKind};
pub use proposition::Proposition;
pub use schema::{Schema, ValueAccessor};
pub use source::SourcePosition;
pub use value::{Literal, Reference, Selector, Value, ValueType};
pub use variable::{FIELD_BITS, InstanceVariable, Variable, VariableKind, WitnessVariable};
