//! Reasoning about zero-knowledge statements before they are proven.
//!
//! A bound [`Proposition`](zkpc_core::Proposition) goes through:
//!
//! - analysis: the inference engine derives what follows from each evaluation path, and the
//!   statement is rejected if every path contradicts itself;
//! - optimisation: gadgets are replaced by cheaper equivalents given the facts around them;
//! - code generation: the result is rendered for the proving backend.

pub mod analysis;
pub mod codegen;
pub mod combinatorics;
pub mod compiler;
pub mod inference;
pub mod optimizer;
pub mod options;
pub mod rules;

pub use compiler::{CompilationStats, CompiledStatement, Compiler};
pub use options::CompilerOptions;
pub use rules::RuleRegistry;
