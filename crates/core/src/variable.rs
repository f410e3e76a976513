//! Variables bound into gadgets.
//!
//! A witness is secret. It is only ever referred to through its [`Reference`], and its identity
//! (equality, hashing, ordering) is the identity of that reference. Comparing two witnesses can
//! therefore never leak anything about the values behind them. Instances are public and are
//! compared by value.

use std::{
	cmp::Ordering,
	fmt,
	hash::{Hash, Hasher},
};

use num_bigint::{BigInt, Sign};

use crate::{
	error::{CompileError, Result},
	source::SourcePosition,
	value::{Literal, Reference, ValueType},
};

/// Bit width of the proof system's scalar field. Instance integers must be below `2^FIELD_BITS`.
pub const FIELD_BITS: u64 = 254;

#[derive(Clone, Debug)]
pub struct WitnessVariable {
	reference: Reference,
	position: SourcePosition,
}

impl WitnessVariable {
	pub fn new(reference: Reference, position: SourcePosition) -> Self {
		Self {
			reference,
			position,
		}
	}

	pub fn reference(&self) -> &Reference {
		&self.reference
	}

	pub fn position(&self) -> SourcePosition {
		self.position
	}

	pub fn value_type(&self) -> ValueType {
		self.reference.value_type()
	}
}

impl PartialEq for WitnessVariable {
	fn eq(&self, other: &Self) -> bool {
		self.reference == other.reference
	}
}

impl Eq for WitnessVariable {}

impl Hash for WitnessVariable {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.reference.hash(state);
	}
}

impl PartialOrd for WitnessVariable {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for WitnessVariable {
	fn cmp(&self, other: &Self) -> Ordering {
		self.reference.cmp(&other.reference)
	}
}

#[derive(Clone, Debug)]
pub struct InstanceVariable {
	literal: Literal,
	position: SourcePosition,
}

impl InstanceVariable {
	/// Creates an instance variable, rejecting integers that do not fit the scalar field.
	pub fn new(literal: Literal, position: SourcePosition) -> Result<Self> {
		check_field_range(&literal, position)?;
		Ok(Self { literal, position })
	}

	pub fn literal(&self) -> &Literal {
		&self.literal
	}

	pub fn position(&self) -> SourcePosition {
		self.position
	}

	pub fn value_type(&self) -> ValueType {
		self.literal.value_type()
	}
}

fn check_field_range(literal: &Literal, position: SourcePosition) -> Result<()> {
	match literal {
		Literal::Integer(value) | Literal::Hex(value) => {
			if value.sign() == Sign::Minus || value.bits() > FIELD_BITS {
				return Err(CompileError::NumericOutOfRange {
					literal: literal.to_string(),
					bits: FIELD_BITS,
					position,
				});
			}
			Ok(())
		}
		Literal::List(items) => items.iter().try_for_each(|item| check_field_range(item, position)),
		Literal::String(_) => Ok(()),
	}
}

impl PartialEq for InstanceVariable {
	fn eq(&self, other: &Self) -> bool {
		self.literal == other.literal
	}
}

impl Eq for InstanceVariable {}

impl Hash for InstanceVariable {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.literal.hash(state);
	}
}

impl PartialOrd for InstanceVariable {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for InstanceVariable {
	fn cmp(&self, other: &Self) -> Ordering {
		self.literal.cmp(&other.literal)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariableKind {
	Witness,
	Instance,
	Null,
}

impl fmt::Display for VariableKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			VariableKind::Witness => "witness",
			VariableKind::Instance => "instance",
			VariableKind::Null => "null",
		})
	}
}

/// An operand of a gadget.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variable {
	Witness(WitnessVariable),
	Instance(InstanceVariable),
	/// The absent value. Only accepted by nullable gadget fields.
	Null,
}

impl Variable {
	pub fn witness(reference: Reference, position: SourcePosition) -> Self {
		Variable::Witness(WitnessVariable::new(reference, position))
	}

	pub fn instance(literal: Literal, position: SourcePosition) -> Result<Self> {
		InstanceVariable::new(literal, position).map(Variable::Instance)
	}

	pub fn kind(&self) -> VariableKind {
		match self {
			Variable::Witness(_) => VariableKind::Witness,
			Variable::Instance(_) => VariableKind::Instance,
			Variable::Null => VariableKind::Null,
		}
	}

	pub fn is_witness(&self) -> bool {
		matches!(self, Variable::Witness(_))
	}

	pub fn is_instance(&self) -> bool {
		matches!(self, Variable::Instance(_))
	}

	pub fn is_null(&self) -> bool {
		matches!(self, Variable::Null)
	}

	pub fn as_witness(&self) -> Option<&WitnessVariable> {
		match self {
			Variable::Witness(witness) => Some(witness),
			_ => None,
		}
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Variable::Instance(instance) => Some(instance.literal()),
			_ => None,
		}
	}

	/// The public numeric value of this variable, if it has one.
	pub fn as_integer(&self) -> Option<&BigInt> {
		self.as_literal().and_then(Literal::as_integer)
	}

	pub fn value_type(&self) -> Option<ValueType> {
		match self {
			Variable::Witness(witness) => Some(witness.value_type()),
			Variable::Instance(instance) => Some(instance.value_type()),
			Variable::Null => None,
		}
	}

	pub fn position(&self) -> Option<SourcePosition> {
		match self {
			Variable::Witness(witness) => Some(witness.position()),
			Variable::Instance(instance) => Some(instance.position()),
			Variable::Null => None,
		}
	}
}

impl From<WitnessVariable> for Variable {
	fn from(witness: WitnessVariable) -> Self {
		Variable::Witness(witness)
	}
}

impl From<InstanceVariable> for Variable {
	fn from(instance: InstanceVariable) -> Self {
		Variable::Instance(instance)
	}
}

impl fmt::Display for Variable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Variable::Witness(witness) => write!(f, "{}", witness.reference()),
			Variable::Instance(instance) => write!(f, "{}", instance.literal()),
			Variable::Null => f.write_str("null"),
		}
	}
}
