//! The closed set of constraints a statement compiles down to.
//!
//! Each gadget lives in its own module with its cost, its field declarations and its constructor.
//! Constructors check every field, so a [`Gadget`] value is always well typed.

use std::{borrow::Cow, fmt};

use crate::{source::SourcePosition, value::Reference, variable::Variable};

mod field;

pub mod bounds_check;
pub mod equality;
pub mod inequality;
pub mod less_than;
pub mod merkle_tree;
pub mod mimc_hash;
pub mod set_membership;

pub use bounds_check::BoundsCheck;
pub use equality::Equality;
pub use field::FieldSpec;
pub use inequality::Inequality;
pub use less_than::LessThan;
pub use merkle_tree::{MerkleNode, MerkleTree};
pub use mimc_hash::MiMCHash;
pub use set_membership::SetMembership;

/// Tag of a [`Gadget`] variant, used to declare rule patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GadgetKind {
	Equality,
	Inequality,
	LessThan,
	BoundsCheck,
	MiMCHash,
	MerkleTree,
	SetMembership,
}

impl GadgetKind {
	pub const ALL: [GadgetKind; 7] = [
		GadgetKind::Equality,
		GadgetKind::Inequality,
		GadgetKind::LessThan,
		GadgetKind::BoundsCheck,
		GadgetKind::MiMCHash,
		GadgetKind::MerkleTree,
		GadgetKind::SetMembership,
	];

	pub fn name(self) -> &'static str {
		match self {
			GadgetKind::Equality => "equality",
			GadgetKind::Inequality => "inequality",
			GadgetKind::LessThan => "less_than",
			GadgetKind::BoundsCheck => "bounds_check",
			GadgetKind::MiMCHash => "mimc_hash",
			GadgetKind::MerkleTree => "merkle_tree",
			GadgetKind::SetMembership => "set_membership",
		}
	}

	/// Number of constraints the backend emits for one gadget of this kind.
	pub fn cost(self) -> u64 {
		match self {
			GadgetKind::Equality => equality::COST,
			GadgetKind::Inequality => inequality::COST,
			GadgetKind::LessThan => less_than::COST,
			GadgetKind::BoundsCheck => bounds_check::COST,
			GadgetKind::MiMCHash => mimc_hash::COST,
			GadgetKind::MerkleTree => merkle_tree::COST,
			GadgetKind::SetMembership => set_membership::COST,
		}
	}
}

impl fmt::Display for GadgetKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Gadget {
	Equality(Equality),
	Inequality(Inequality),
	LessThan(LessThan),
	BoundsCheck(BoundsCheck),
	MiMCHash(MiMCHash),
	MerkleTree(MerkleTree),
	SetMembership(SetMembership),
}

impl Gadget {
	pub fn kind(&self) -> GadgetKind {
		match self {
			Gadget::Equality(_) => GadgetKind::Equality,
			Gadget::Inequality(_) => GadgetKind::Inequality,
			Gadget::LessThan(_) => GadgetKind::LessThan,
			Gadget::BoundsCheck(_) => GadgetKind::BoundsCheck,
			Gadget::MiMCHash(_) => GadgetKind::MiMCHash,
			Gadget::MerkleTree(_) => GadgetKind::MerkleTree,
			Gadget::SetMembership(_) => GadgetKind::SetMembership,
		}
	}

	pub fn cost(&self) -> u64 {
		self.kind().cost()
	}

	/// Format template of the gadget instruction, with a `{name}` placeholder per binding.
	pub fn template(&self) -> Cow<'static, str> {
		match self {
			Gadget::Equality(_) => Cow::Borrowed(equality::TEMPLATE),
			Gadget::Inequality(_) => Cow::Borrowed(inequality::TEMPLATE),
			Gadget::LessThan(_) => Cow::Borrowed(less_than::TEMPLATE),
			Gadget::BoundsCheck(_) => Cow::Borrowed(bounds_check::TEMPLATE),
			Gadget::MiMCHash(_) => Cow::Borrowed(mimc_hash::TEMPLATE),
			Gadget::MerkleTree(g) => Cow::Owned(g.template()),
			Gadget::SetMembership(g) => Cow::Owned(g.template()),
		}
	}

	/// Placeholder names of [`Self::template`] and the variables they stand for, in field order.
	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		match self {
			Gadget::Equality(g) => g.bindings(),
			Gadget::Inequality(g) => g.bindings(),
			Gadget::LessThan(g) => g.bindings(),
			Gadget::BoundsCheck(g) => g.bindings(),
			Gadget::MiMCHash(g) => g.bindings(),
			Gadget::MerkleTree(g) => g.bindings(),
			Gadget::SetMembership(g) => g.bindings(),
		}
	}

	pub fn variables(&self) -> impl Iterator<Item = &Variable> {
		self.bindings().into_iter().map(|(_, variable)| variable)
	}

	/// Distinct witness references mentioned by this gadget.
	pub fn witnesses(&self) -> Vec<&Reference> {
		let mut witnesses: Vec<&Reference> = Vec::new();
		for variable in self.variables() {
			if let Some(witness) = variable.as_witness() {
				if !witnesses.contains(&witness.reference()) {
					witnesses.push(witness.reference());
				}
			}
		}
		witnesses
	}

	pub fn mentions(&self, variable: &Variable) -> bool {
		self.variables().any(|v| v == variable)
	}

	pub fn positions(&self) -> Vec<SourcePosition> {
		self.variables().filter_map(Variable::position).collect()
	}

	pub fn as_equality(&self) -> Option<&Equality> {
		match self {
			Gadget::Equality(g) => Some(g),
			_ => None,
		}
	}

	pub fn as_inequality(&self) -> Option<&Inequality> {
		match self {
			Gadget::Inequality(g) => Some(g),
			_ => None,
		}
	}

	pub fn as_less_than(&self) -> Option<&LessThan> {
		match self {
			Gadget::LessThan(g) => Some(g),
			_ => None,
		}
	}

	pub fn as_bounds_check(&self) -> Option<&BoundsCheck> {
		match self {
			Gadget::BoundsCheck(g) => Some(g),
			_ => None,
		}
	}

	pub fn as_set_membership(&self) -> Option<&SetMembership> {
		match self {
			Gadget::SetMembership(g) => Some(g),
			_ => None,
		}
	}
}

macro_rules! impl_from_gadget {
	($($variant:ident),*) => {
		$(
			impl From<$variant> for Gadget {
				fn from(gadget: $variant) -> Self {
					Gadget::$variant(gadget)
				}
			}
		)*
	};
}

impl_from_gadget!(
	Equality,
	Inequality,
	LessThan,
	BoundsCheck,
	MiMCHash,
	MerkleTree,
	SetMembership
);

impl fmt::Display for Gadget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let args = self.variables().map(ToString::to_string).collect::<Vec<_>>().join(", ");
		write!(f, "{}({args})", self.kind())
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use num_bigint::BigInt;
	use rstest::rstest;

	use super::*;
	use crate::{
		error::CompileError,
		value::{Literal, Selector, ValueType},
	};

	fn witness(ty: ValueType, path: &str) -> Variable {
		let reference = Reference::new(ty, "me", Selector::parse(path).unwrap());
		Variable::witness(reference, SourcePosition::new(1, 1, path.len() as u32))
	}

	fn int(n: i64) -> Variable {
		Variable::instance(Literal::integer(n), SourcePosition::default()).unwrap()
	}

	fn age() -> Variable {
		witness(ValueType::Integer, "age")
	}

	#[test]
	fn symmetric_gadgets_ignore_operand_order() {
		let a = Gadget::from(Equality::new(age(), int(17)).unwrap());
		let b = Gadget::from(Equality::new(int(17), age()).unwrap());
		assert_eq!(a, b);

		let a = Gadget::from(Inequality::new(age(), int(17)).unwrap());
		let b = Gadget::from(Inequality::new(int(17), age()).unwrap());
		assert_eq!(a, b);

		let a = Gadget::from(SetMembership::new(age(), vec![int(1), int(2), int(1)]).unwrap());
		let b = Gadget::from(SetMembership::new(age(), vec![int(2), int(1)]).unwrap());
		assert_eq!(a, b);
		assert_eq!(HashSet::from([a, b]).len(), 1);
	}

	#[test]
	fn less_than_is_ordered() {
		let height = witness(ValueType::Integer, "height");
		let a = LessThan::new(age(), height.clone()).unwrap();
		let b = LessThan::new(height, age()).unwrap();
		assert_ne!(a, b);
	}

	#[rstest]
	#[case::instance_in_witness_field(LessThan::new(int(1), age()).map(Gadget::from), "smaller")]
	#[case::string_in_numeric_field(
		LessThan::new(age(), witness(ValueType::String, "name")).map(Gadget::from),
		"bigger"
	)]
	#[case::witness_bound(
		BoundsCheck::new(age(), age(), Variable::Null).map(Gadget::from),
		"min"
	)]
	#[case::null_operand(Equality::new(age(), Variable::Null).map(Gadget::from), "right")]
	#[case::mixed_comparison(
		Equality::new(age(), witness(ValueType::String, "name")).map(Gadget::from),
		"right"
	)]
	fn rejects_ill_typed_fields(
		#[case] gadget: Result<Gadget, CompileError>,
		#[case] expected_field: &str,
	) {
		match gadget {
			Err(CompileError::TypeMismatch { field, .. }) => assert_eq!(field, expected_field),
			other => panic!("expected a type mismatch, got {other:?}"),
		}
	}

	#[test]
	fn malformed_bounds_are_rejected() {
		assert!(matches!(
			BoundsCheck::new(age(), int(41), int(29)),
			Err(CompileError::MalformedBounds { .. })
		));
		assert!(matches!(
			BoundsCheck::new(age(), Variable::Null, Variable::Null),
			Err(CompileError::MalformedBounds { .. })
		));
		assert!(BoundsCheck::new(age(), int(29), Variable::Null).is_ok());
	}

	#[test]
	fn bounds_arithmetic() {
		let wide = BoundsCheck::new(age(), int(18), int(65)).unwrap();
		let narrow = BoundsCheck::new(age(), int(29), int(41)).unwrap();
		let open = BoundsCheck::new(age(), int(30), Variable::Null).unwrap();
		let low = BoundsCheck::new(age(), Variable::Null, int(10)).unwrap();

		assert!(narrow.within(&wide));
		assert!(!wide.within(&narrow));
		assert!(!open.within(&wide));
		assert!(wide.contains(&BigInt::from(18)));
		assert!(!wide.contains(&BigInt::from(66)));

		let both = wide.intersection(&open).unwrap();
		assert_eq!(both.lower(), Some(&BigInt::from(30)));
		assert_eq!(both.upper(), Some(&BigInt::from(65)));

		assert!(low.is_disjoint(&narrow));
		assert!(low.intersection(&narrow).is_none());

		let pinned = BoundsCheck::new(age(), int(30), int(30)).unwrap();
		assert_eq!(pinned.pinned(), Some(&int(30)));
		assert_eq!(wide.pinned(), None);
	}

	#[test]
	fn templates_and_bindings_line_up() {
		let gadget = Gadget::from(BoundsCheck::new(age(), int(18), Variable::Null).unwrap());
		assert_eq!(gadget.template(), "BOUNDS_CHECK {value} {min} {max}");
		let names: Vec<_> = gadget.bindings().into_iter().map(|(name, _)| name).collect();
		assert_eq!(names, ["value", "min", "max"]);
		assert_eq!(gadget.witnesses().len(), 1);
		assert_eq!(gadget.cost(), 508);

		let set = Gadget::from(SetMembership::new(age(), vec![int(1), int(2)]).unwrap());
		assert_eq!(set.template(), "SET_MEMBERSHIP {member} {element0} {element1}");
	}

	#[test]
	fn display() {
		let gadget = Gadget::from(Equality::new(age(), int(17)).unwrap());
		assert_eq!(gadget.to_string(), "equality(me.age, 17)");
	}
}
