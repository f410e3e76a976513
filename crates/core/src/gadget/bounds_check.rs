//! Range check of a secret number against public bounds.
//!
//! Either bound may be absent, but not both. Bounds are inclusive.
//!
//! # Constraints
//!
//! Two `FIELD_BITS` bit decompositions, one for `value - min` and one for `max - value`. A missing
//! bound still pays for its decomposition.

use std::cmp::Ordering;

use num_bigint::BigInt;

use super::field::FieldSpec;
use crate::{
	error::{CompileError, Result},
	value::ValueType,
	variable::Variable,
};

pub const COST: u64 = 508;
pub const TEMPLATE: &str = "BOUNDS_CHECK {value} {min} {max}";

const VALUE: FieldSpec = FieldSpec::new("value", ValueType::NUMERIC).witness_only();
const MIN: FieldSpec = FieldSpec::new("min", ValueType::NUMERIC).instance_only().nullable();
const MAX: FieldSpec = FieldSpec::new("max", ValueType::NUMERIC).instance_only().nullable();

/// `min <= value <= max`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoundsCheck {
	value: Variable,
	min: Variable,
	max: Variable,
}

impl BoundsCheck {
	pub fn new(value: Variable, min: Variable, max: Variable) -> Result<Self> {
		VALUE.check(&value)?;
		MIN.check(&min)?;
		MAX.check(&max)?;

		let positions = || [&min, &max].into_iter().filter_map(Variable::position).collect();
		match (min.as_integer(), max.as_integer()) {
			(None, None) => {
				return Err(CompileError::MalformedBounds {
					message: format!("`{value}` is checked against no bound at all"),
					positions: value.position().into_iter().collect(),
				});
			}
			(Some(lo), Some(hi)) if lo > hi => {
				return Err(CompileError::MalformedBounds {
					message: format!("lower bound {lo} is above upper bound {hi}"),
					positions: positions(),
				});
			}
			_ => {}
		}
		Ok(Self { value, min, max })
	}

	pub fn value(&self) -> &Variable {
		&self.value
	}

	pub fn min(&self) -> &Variable {
		&self.min
	}

	pub fn max(&self) -> &Variable {
		&self.max
	}

	pub fn lower(&self) -> Option<&BigInt> {
		self.min.as_integer()
	}

	pub fn upper(&self) -> Option<&BigInt> {
		self.max.as_integer()
	}

	pub fn contains(&self, n: &BigInt) -> bool {
		self.lower().is_none_or(|lo| lo <= n) && self.upper().is_none_or(|hi| n <= hi)
	}

	/// Whether every number accepted by `self` is accepted by `other`.
	pub fn within(&self, other: &BoundsCheck) -> bool {
		let lower_ok = match (self.lower(), other.lower()) {
			(_, None) => true,
			(None, Some(_)) => false,
			(Some(a), Some(b)) => a >= b,
		};
		let upper_ok = match (self.upper(), other.upper()) {
			(_, None) => true,
			(None, Some(_)) => false,
			(Some(a), Some(b)) => a <= b,
		};
		lower_ok && upper_ok
	}

	/// Whether no number is accepted by both checks.
	pub fn is_disjoint(&self, other: &BoundsCheck) -> bool {
		let below = |hi: Option<&BigInt>, lo: Option<&BigInt>| {
			matches!((hi, lo), (Some(hi), Some(lo)) if hi < lo)
		};
		below(self.upper(), other.lower()) || below(other.upper(), self.lower())
	}

	/// The check on `self`'s value accepting exactly what both checks accept.
	///
	/// Returns `None` when the ranges are disjoint.
	pub fn intersection(&self, other: &BoundsCheck) -> Option<BoundsCheck> {
		let min = tighter(&self.min, &other.min, Ordering::Greater);
		let max = tighter(&self.max, &other.max, Ordering::Less);
		BoundsCheck::new(self.value.clone(), min.clone(), max.clone()).ok()
	}

	/// The single number accepted, when both bounds coincide.
	pub fn pinned(&self) -> Option<&Variable> {
		match (self.lower(), self.upper()) {
			(Some(lo), Some(hi)) if lo == hi => Some(&self.min),
			_ => None,
		}
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		vec![
			("value".into(), &self.value),
			("min".into(), &self.min),
			("max".into(), &self.max),
		]
	}
}

/// Picks the bound that is `preferred` to the other, treating a missing bound as the loosest.
fn tighter<'a>(a: &'a Variable, b: &'a Variable, preferred: Ordering) -> &'a Variable {
	match (a.as_integer(), b.as_integer()) {
		(None, _) => b,
		(_, None) => a,
		(Some(x), Some(y)) => {
			if y.cmp(x) == preferred {
				b
			} else {
				a
			}
		}
	}
}
