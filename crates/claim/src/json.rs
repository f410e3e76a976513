//! Subject data held as JSON.

use std::{fs, path::Path};

use serde_json::Value as Json;
use zkpc_core::{Literal, Schema, Selector, Value, ValueAccessor, ValueType};

use crate::error::{ClaimError, Result};

/// The data of one subject, answering both value lookups and type queries.
///
/// Selectors walk object fields; a field name made of digits indexes into an array.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonData {
	source_id: String,
	root: Json,
}

impl JsonData {
	pub fn new(source_id: impl Into<String>, root: Json) -> Self {
		Self {
			source_id: source_id.into(),
			root,
		}
	}

	pub fn parse(source_id: impl Into<String>, text: &str) -> Result<Self> {
		let source_id = source_id.into();
		match serde_json::from_str(text) {
			Ok(root) => Ok(Self::new(source_id, root)),
			Err(error) => Err(ClaimError::Json { source_id, error }),
		}
	}

	pub fn load(path: &Path) -> Result<Self> {
		let text = fs::read_to_string(path).map_err(|error| ClaimError::Io {
			path: path.to_owned(),
			error,
		})?;
		Self::parse(path.display().to_string(), &text)
	}

	/// The raw JSON node a selector points at.
	pub fn lookup(&self, selector: &Selector) -> Option<&Json> {
		selector.fields().iter().try_fold(&self.root, |node, field| match node {
			Json::Object(fields) => fields.get(field),
			Json::Array(items) => field.parse::<usize>().ok().and_then(|i| items.get(i)),
			_ => None,
		})
	}
}

impl ValueAccessor for JsonData {
	fn get(&self, selector: &Selector) -> Option<Value> {
		self.lookup(selector).and_then(literal_from_json).map(Value::Literal)
	}

	fn source_id(&self) -> String {
		self.source_id.clone()
	}
}

impl Schema for JsonData {
	fn type_of(&self, selector: &Selector) -> Option<ValueType> {
		self.lookup(selector)
			.and_then(literal_from_json)
			.map(|literal| literal.value_type())
	}
}

/// Reads a JSON value as a literal.
///
/// Strings starting with `0x` are hex numbers and booleans are `0`/`1`. Objects, `null`, fractional
/// numbers and lists containing any of those have no literal form.
pub fn literal_from_json(value: &Json) -> Option<Literal> {
	match value {
		Json::Number(number) => number
			.as_u64()
			.map(Literal::integer)
			.or_else(|| number.as_i64().map(Literal::integer)),
		Json::String(text) if text.starts_with("0x") || text.starts_with("0X") => {
			Literal::parse_hex(text)
		}
		Json::String(text) => Some(Literal::string(text.as_str())),
		Json::Bool(flag) => Some(Literal::integer(u8::from(*flag))),
		Json::Array(items) => items
			.iter()
			.map(literal_from_json)
			.collect::<Option<Vec<_>>>()
			.map(Literal::List),
		Json::Null | Json::Object(_) => None,
	}
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use serde_json::json;

	use super::*;

	fn passport() -> JsonData {
		JsonData::new(
			"passport.json",
			json!({
				"name": "Ada",
				"age": 36,
				"birth": { "year": 1989, "place": "London" },
				"hash": "0x1f",
				"visas": ["US", "JP"],
				"verified": true,
				"notes": null,
				"height": 1.7
			}),
		)
	}

	#[rstest]
	#[case("name", Some(ValueType::String))]
	#[case("age", Some(ValueType::Integer))]
	#[case("birth.year", Some(ValueType::Integer))]
	#[case("hash", Some(ValueType::Hex))]
	#[case("visas", Some(ValueType::List))]
	#[case("visas.1", Some(ValueType::String))]
	#[case("verified", Some(ValueType::Integer))]
	#[case("birth", None)]
	#[case("notes", None)]
	#[case("height", None)]
	#[case("visas.2", None)]
	#[case("birth.year.month", None)]
	#[case("missing", None)]
	fn types_follow_the_data(#[case] path: &str, #[case] expected: Option<ValueType>) {
		let selector = Selector::parse(path).unwrap();
		assert_eq!(passport().type_of(&selector), expected);
	}

	#[test]
	fn values_are_literals() {
		let data = passport();
		let get = |path: &str| data.get(&Selector::parse(path).unwrap());
		assert_eq!(get("age"), Some(Value::Literal(Literal::integer(36))));
		assert_eq!(get("hash"), Some(Value::Literal(Literal::integer(31))));
		assert_eq!(
			get("visas"),
			Some(Value::Literal(Literal::List(vec![
				Literal::string("US"),
				Literal::string("JP")
			])))
		);
		assert_eq!(data.source_id(), "passport.json");
	}

	#[test]
	fn negative_numbers_are_read() {
		assert_eq!(literal_from_json(&json!(-4)), Some(Literal::integer(-4)));
		assert_eq!(literal_from_json(&json!([1, {}])), None);
	}

	#[test]
	fn parse_reports_the_source() {
		let error = JsonData::parse("data.json", "[1,").unwrap_err();
		assert!(matches!(error, ClaimError::Json { ref source_id, .. } if source_id == "data.json"));
	}
}
