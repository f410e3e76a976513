//! Literal values and references into externally supplied data.

use std::{
	cmp::Ordering,
	fmt,
	hash::{Hash, Hasher},
};

use num_bigint::BigInt;
use num_traits::Num;

use crate::error::{CompileError, Result};

/// The type of a value as declared by a schema or carried by a literal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ValueType {
	Integer,
	String,
	/// An integer written in hexadecimal notation.
	Hex,
	List,
}

impl ValueType {
	/// Scalar types usable by every gadget that accepts "any value".
	pub const SCALAR: &'static [ValueType] = &[ValueType::Integer, ValueType::String, ValueType::Hex];
	/// Types that order numerically.
	pub const NUMERIC: &'static [ValueType] = &[ValueType::Integer, ValueType::Hex];

	pub fn is_numeric(self) -> bool {
		matches!(self, ValueType::Integer | ValueType::Hex)
	}

	pub fn name(self) -> &'static str {
		match self {
			ValueType::Integer => "integer",
			ValueType::String => "string",
			ValueType::Hex => "hex",
			ValueType::List => "list",
		}
	}
}

impl fmt::Display for ValueType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// A concrete value.
///
/// `Integer` and `Hex` differ only in notation: they compare, hash and order numerically so that
/// `17` and `0x11` are the same literal.
#[derive(Clone, Debug)]
pub enum Literal {
	Integer(BigInt),
	String(String),
	Hex(BigInt),
	List(Vec<Literal>),
}

impl Literal {
	pub fn integer(value: impl Into<BigInt>) -> Self {
		Literal::Integer(value.into())
	}

	pub fn string(value: impl Into<String>) -> Self {
		Literal::String(value.into())
	}

	/// Parses a `0x`-prefixed hexadecimal string.
	pub fn parse_hex(text: &str) -> Option<Self> {
		let digits = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
		BigInt::from_str_radix(digits, 16).ok().map(Literal::Hex)
	}

	pub fn value_type(&self) -> ValueType {
		match self {
			Literal::Integer(_) => ValueType::Integer,
			Literal::String(_) => ValueType::String,
			Literal::Hex(_) => ValueType::Hex,
			Literal::List(_) => ValueType::List,
		}
	}

	/// The numeric value of an integer or hex literal.
	pub fn as_integer(&self) -> Option<&BigInt> {
		match self {
			Literal::Integer(value) | Literal::Hex(value) => Some(value),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Literal]> {
		match self {
			Literal::List(items) => Some(items),
			_ => None,
		}
	}

	fn rank(&self) -> u8 {
		match self {
			Literal::Integer(_) | Literal::Hex(_) => 0,
			Literal::String(_) => 1,
			Literal::List(_) => 2,
		}
	}
}

impl PartialEq for Literal {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for Literal {}

impl PartialOrd for Literal {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl Ord for Literal {
	fn cmp(&self, other: &Self) -> Ordering {
		match (self, other) {
			(Literal::String(a), Literal::String(b)) => a.cmp(b),
			(Literal::List(a), Literal::List(b)) => a.cmp(b),
			_ => match (self.as_integer(), other.as_integer()) {
				(Some(a), Some(b)) => a.cmp(b),
				_ => self.rank().cmp(&other.rank()),
			},
		}
	}
}

impl Hash for Literal {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.rank().hash(state);
		match self {
			Literal::Integer(value) | Literal::Hex(value) => value.hash(state),
			Literal::String(value) => value.hash(state),
			Literal::List(items) => items.hash(state),
		}
	}
}

impl fmt::Display for Literal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Literal::Integer(value) => write!(f, "{value}"),
			Literal::String(value) => write!(f, "{value:?}"),
			Literal::Hex(value) => write!(f, "{value:#x}"),
			Literal::List(items) => {
				f.write_str("[")?;
				for (i, item) in items.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				f.write_str("]")
			}
		}
	}
}

/// A non-empty path of field names into a structured document.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Selector(Vec<String>);

impl Selector {
	pub fn new<I, S>(fields: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
		if fields.is_empty() || fields.iter().any(String::is_empty) {
			return Err(CompileError::EmptySelector);
		}
		Ok(Self(fields))
	}

	/// Parses a dot separated path such as `passport.birth.year`.
	pub fn parse(path: &str) -> Result<Self> {
		Self::new(path.split('.'))
	}

	pub fn fields(&self) -> &[String] {
		&self.0
	}
}

impl fmt::Display for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0.join("."))
	}
}

/// A typed pointer into the data of a statement subject.
///
/// References never carry the value they point at.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reference {
	ty: ValueType,
	subject: String,
	selector: Selector,
}

impl Reference {
	pub fn new(ty: ValueType, subject: impl Into<String>, selector: Selector) -> Self {
		Self {
			ty,
			subject: subject.into(),
			selector,
		}
	}

	pub fn value_type(&self) -> ValueType {
		self.ty
	}

	/// The alias of the subject the selector is resolved against.
	pub fn subject(&self) -> &str {
		&self.subject
	}

	pub fn selector(&self) -> &Selector {
		&self.selector
	}
}

impl fmt::Display for Reference {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}.{}", self.subject, self.selector)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Value {
	Literal(Literal),
	Reference(Reference),
}

impl Value {
	pub fn value_type(&self) -> ValueType {
		match self {
			Value::Literal(literal) => literal.value_type(),
			Value::Reference(reference) => reference.value_type(),
		}
	}

	pub fn as_literal(&self) -> Option<&Literal> {
		match self {
			Value::Literal(literal) => Some(literal),
			Value::Reference(_) => None,
		}
	}
}

impl From<Literal> for Value {
	fn from(literal: Literal) -> Self {
		Value::Literal(literal)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hex_and_integer_literals_are_the_same_number() {
		let hex = Literal::parse_hex("0x11").unwrap();
		assert_eq!(hex, Literal::integer(17));
		assert_eq!(hex.value_type(), ValueType::Hex);
		assert!(Literal::integer(3) < Literal::string("3"));
	}

	#[test]
	fn selector_must_not_be_empty() {
		assert_eq!(Selector::new(Vec::<String>::new()), Err(CompileError::EmptySelector));
		assert_eq!(Selector::parse("a..b"), Err(CompileError::EmptySelector));
		let selector = Selector::parse("passport.age").unwrap();
		assert_eq!(selector.fields(), ["passport", "age"]);
		assert_eq!(selector.to_string(), "passport.age");
	}

	#[test]
	fn literal_display() {
		assert_eq!(Literal::parse_hex("0xff").unwrap().to_string(), "0xff");
		assert_eq!(
			Literal::List(vec![Literal::integer(1), Literal::string("a")]).to_string(),
			r#"[1, "a"]"#
		);
	}
}
