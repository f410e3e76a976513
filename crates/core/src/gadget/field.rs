use crate::{
	error::{CompileError, Result},
	value::ValueType,
	variable::{Variable, VariableKind},
};

/// Declares what a gadget field accepts.
///
/// Checked once, when the gadget is constructed.
#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
	pub name: &'static str,
	pub witness: bool,
	pub instance: bool,
	pub nullable: bool,
	pub types: &'static [ValueType],
}

impl FieldSpec {
	pub const fn new(name: &'static str, types: &'static [ValueType]) -> Self {
		Self {
			name,
			witness: true,
			instance: true,
			nullable: false,
			types,
		}
	}

	pub const fn witness_only(mut self) -> Self {
		self.instance = false;
		self
	}

	pub const fn instance_only(mut self) -> Self {
		self.witness = false;
		self
	}

	pub const fn nullable(mut self) -> Self {
		self.nullable = true;
		self
	}

	pub fn check(&self, variable: &Variable) -> Result<()> {
		let kind_allowed = match variable.kind() {
			VariableKind::Witness => self.witness,
			VariableKind::Instance => self.instance,
			VariableKind::Null => self.nullable,
		};
		if !kind_allowed {
			return Err(self.mismatch(self.expected_kinds(), variable.kind().to_string(), variable));
		}
		if let Some(ty) = variable.value_type() {
			if !self.types.contains(&ty) {
				return Err(self.mismatch(self.expected_types(), ty.to_string(), variable));
			}
		}
		Ok(())
	}

	fn mismatch(&self, expected: String, found: String, variable: &Variable) -> CompileError {
		CompileError::TypeMismatch {
			field: self.name,
			expected,
			found,
			position: variable.position(),
		}
	}

	fn expected_kinds(&self) -> String {
		let mut kinds = Vec::new();
		if self.witness {
			kinds.push("witness");
		}
		if self.instance {
			kinds.push("instance");
		}
		if self.nullable {
			kinds.push("null");
		}
		kinds.join(" or ")
	}

	fn expected_types(&self) -> String {
		self.types.iter().map(|ty| ty.name()).collect::<Vec<_>>().join(" or ")
	}
}

/// Both operands of a comparison must be numbers or both must be non-numbers.
pub(crate) fn check_comparable(
	field: &'static str,
	left: &Variable,
	right: &Variable,
) -> Result<()> {
	match (left.value_type(), right.value_type()) {
		(Some(a), Some(b)) if a.is_numeric() != b.is_numeric() => Err(CompileError::TypeMismatch {
			field,
			expected: a.to_string(),
			found: b.to_string(),
			position: right.position(),
		}),
		_ => Ok(()),
	}
}

/// Orders a pair of operands so that symmetric gadgets hash independently of operand order.
pub(crate) fn ordered<'a>(a: &'a Variable, b: &'a Variable) -> (&'a Variable, &'a Variable) {
	if a <= b { (a, b) } else { (b, a) }
}
