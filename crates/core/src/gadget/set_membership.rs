//! Membership of a value in a set.
//!
//! The set is deduplicated on construction and compared as a set, so two memberships listing the
//! same elements in a different order are the same gadget.
//!
//! # Constraints
//!
//! A product of differences `(member - s_0)(member - s_1)... = 0`, accounted as a fixed cost.

use std::hash::{Hash, Hasher};

use super::field::{FieldSpec, check_comparable};
use crate::{
	error::{CompileError, Result},
	value::ValueType,
	variable::Variable,
};

pub const COST: u64 = 4;

const MEMBER: FieldSpec = FieldSpec::new("member", ValueType::SCALAR);
const SET: FieldSpec = FieldSpec::new("set", ValueType::SCALAR);

#[derive(Clone, Debug)]
pub struct SetMembership {
	member: Variable,
	set: Vec<Variable>,
}

impl SetMembership {
	pub fn new(member: Variable, set: Vec<Variable>) -> Result<Self> {
		MEMBER.check(&member)?;
		if set.is_empty() {
			return Err(CompileError::EmptyOperand { field: SET.name });
		}
		let mut unique: Vec<Variable> = Vec::with_capacity(set.len());
		for element in set {
			SET.check(&element)?;
			check_comparable(SET.name, &member, &element)?;
			if !unique.contains(&element) {
				unique.push(element);
			}
		}
		Ok(Self {
			member,
			set: unique,
		})
	}

	pub fn member(&self) -> &Variable {
		&self.member
	}

	/// Distinct elements in first-listed order.
	pub fn set(&self) -> &[Variable] {
		&self.set
	}

	pub fn contains(&self, variable: &Variable) -> bool {
		self.set.contains(variable)
	}

	/// Whether every element is public, so membership of a known value can be decided now.
	pub fn is_public(&self) -> bool {
		self.set.iter().all(Variable::is_instance)
	}

	pub fn template(&self) -> String {
		let mut template = String::from("SET_MEMBERSHIP {member}");
		for i in 0..self.set.len() {
			template.push_str(&format!(" {{element{i}}}"));
		}
		template
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		let elements = self.set.iter().enumerate();
		std::iter::once(("member".to_string(), &self.member))
			.chain(elements.map(|(i, element)| (format!("element{i}"), element)))
			.collect()
	}

	fn sorted_set(&self) -> Vec<&Variable> {
		let mut sorted: Vec<_> = self.set.iter().collect();
		sorted.sort();
		sorted
	}
}

impl PartialEq for SetMembership {
	fn eq(&self, other: &Self) -> bool {
		self.member == other.member
			&& self.set.len() == other.set.len()
			&& self.set.iter().all(|element| other.contains(element))
	}
}

impl Eq for SetMembership {}

impl Hash for SetMembership {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.member.hash(state);
		self.sorted_set().hash(state);
	}
}
