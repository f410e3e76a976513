//! Strict ordering of two secret numbers.
//!
//! # Constraints
//!
//! Decomposes `bigger - smaller - 1` into `FIELD_BITS` bits, one booleanity constraint per bit.

use super::field::FieldSpec;
use crate::{error::Result, value::ValueType, variable::Variable};

pub const COST: u64 = 254;
pub const TEMPLATE: &str = "LESS_THAN {smaller} {bigger}";

const SMALLER: FieldSpec = FieldSpec::new("smaller", ValueType::NUMERIC).witness_only();
const BIGGER: FieldSpec = FieldSpec::new("bigger", ValueType::NUMERIC).witness_only();

/// `smaller < bigger`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LessThan {
	smaller: Variable,
	bigger: Variable,
}

impl LessThan {
	pub fn new(smaller: Variable, bigger: Variable) -> Result<Self> {
		SMALLER.check(&smaller)?;
		BIGGER.check(&bigger)?;
		Ok(Self { smaller, bigger })
	}

	pub fn smaller(&self) -> &Variable {
		&self.smaller
	}

	pub fn bigger(&self) -> &Variable {
		&self.bigger
	}

	/// Whether this orders `a` and `b`, in either direction.
	pub fn relates(&self, a: &Variable, b: &Variable) -> bool {
		(self.smaller == *a && self.bigger == *b) || (self.smaller == *b && self.bigger == *a)
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		vec![("smaller".into(), &self.smaller), ("bigger".into(), &self.bigger)]
	}
}
