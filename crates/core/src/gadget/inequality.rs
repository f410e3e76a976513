//! Inequality of two values.
//!
//! # Constraints
//!
//! Proves `left - right` is invertible: one multiplication by the prover supplied inverse and one
//! check that the product is one.

use std::hash::{Hash, Hasher};

use super::field::{FieldSpec, check_comparable, ordered};
use crate::{error::Result, value::ValueType, variable::Variable};

pub const COST: u64 = 2;
pub const TEMPLATE: &str = "INEQUALITY {left} {right}";

const LEFT: FieldSpec = FieldSpec::new("left", ValueType::SCALAR);
const RIGHT: FieldSpec = FieldSpec::new("right", ValueType::SCALAR);

#[derive(Clone, Debug)]
pub struct Inequality {
	left: Variable,
	right: Variable,
}

impl Inequality {
	pub fn new(left: Variable, right: Variable) -> Result<Self> {
		LEFT.check(&left)?;
		RIGHT.check(&right)?;
		check_comparable("right", &left, &right)?;
		Ok(Self { left, right })
	}

	pub fn left(&self) -> &Variable {
		&self.left
	}

	pub fn right(&self) -> &Variable {
		&self.right
	}

	pub fn operands(&self) -> [&Variable; 2] {
		[&self.left, &self.right]
	}

	pub fn other(&self, variable: &Variable) -> Option<&Variable> {
		if self.left == *variable {
			Some(&self.right)
		} else if self.right == *variable {
			Some(&self.left)
		} else {
			None
		}
	}

	pub fn relates(&self, a: &Variable, b: &Variable) -> bool {
		(self.left == *a && self.right == *b) || (self.left == *b && self.right == *a)
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		vec![("left".into(), &self.left), ("right".into(), &self.right)]
	}
}

impl PartialEq for Inequality {
	fn eq(&self, other: &Self) -> bool {
		self.relates(&other.left, &other.right)
	}
}

impl Eq for Inequality {}

impl Hash for Inequality {
	fn hash<H: Hasher>(&self, state: &mut H) {
		ordered(&self.left, &self.right).hash(state);
	}
}
