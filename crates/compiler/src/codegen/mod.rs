//! Renders a compiled proposition into the three text files the proving backend reads.
//!
//! * the gadget file lists one instruction per gadget, in tree order, with disjunctions bracketed
//!   by `BEGIN_OR`/`END_OR` and each of their branches by `BEGIN_BRANCH`/`END_BRANCH`;
//! * the instance file assigns every public value its label, `I0 = 0x…`;
//! * the witness file does the same for secret values, `W0 = 0x…`.

use zkpc_core::{Gadget, Proposition, Reference, Value, ValueType};

mod encode;
mod labels;

pub use encode::encode_literal;
pub use labels::{Labels, NULL_LABEL};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodegenError {
	#[error("no value for witness `{reference}`")]
	MissingWitness { reference: String },
	#[error("{label} holds a {value_type} value, which has no encoding")]
	Unencodable { label: String, value_type: ValueType },
}

/// Contents of the three output files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenOutput {
	pub gadgets: String,
	pub instances: String,
	pub witnesses: String,
}

/// Renders `proposition`, looking secret values up through `resolve`.
pub fn generate<F>(proposition: &Proposition, mut resolve: F) -> Result<CodegenOutput, CodegenError>
where
	F: FnMut(&Reference) -> Option<Value>,
{
	let _span = tracing::info_span!("Codegen").entered();

	let mut labels = Labels::new();
	let mut output = CodegenOutput::default();
	render(proposition, &mut labels, &mut output.gadgets);

	for (label, literal) in labels.instances() {
		let encoded = encode_literal(literal).ok_or_else(|| CodegenError::Unencodable {
			label: label.clone(),
			value_type: literal.value_type(),
		})?;
		output.instances.push_str(&format!("{label} = {encoded}\n"));
	}

	for (label, reference) in labels.witnesses() {
		let missing = || CodegenError::MissingWitness {
			reference: reference.to_string(),
		};
		let value = resolve(reference).ok_or_else(missing)?;
		let literal = value.as_literal().ok_or_else(missing)?;
		let encoded = encode_literal(literal).ok_or_else(|| CodegenError::Unencodable {
			label: label.clone(),
			value_type: literal.value_type(),
		})?;
		output.witnesses.push_str(&format!("{label} = {encoded}\n"));
	}
	Ok(output)
}

fn render(proposition: &Proposition, labels: &mut Labels, out: &mut String) {
	match proposition {
		Proposition::Gadget(gadget) => {
			out.push_str(&instruction(gadget, labels));
			out.push('\n');
		}
		Proposition::And(parts) => parts.iter().for_each(|part| render(part, labels, out)),
		// Every branch is rendered, `true` ones included, since dropping one would change what a
		// disjunction accepts.
		Proposition::Or(parts) => {
			out.push_str("BEGIN_OR\n");
			for part in parts {
				out.push_str("BEGIN_BRANCH\n");
				render(part, labels, out);
				out.push_str("END_BRANCH\n");
			}
			out.push_str("END_OR\n");
		}
		Proposition::True => {}
	}
}

/// Fills the gadget's template with the labels of its variables.
pub fn instruction(gadget: &Gadget, labels: &mut Labels) -> String {
	let mut text = gadget.template().into_owned();
	for (name, variable) in gadget.bindings() {
		text = text.replace(&format!("{{{name}}}"), &labels.label(variable));
	}
	text
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use zkpc_core::{
		Literal, Selector, SourcePosition, Variable,
		gadget::{BoundsCheck, Equality, LessThan},
	};

	use super::*;

	fn reference(path: &str) -> Reference {
		Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap())
	}

	fn w(path: &str) -> Variable {
		Variable::witness(reference(path), SourcePosition::default())
	}

	fn int(n: i64) -> Variable {
		Variable::instance(Literal::integer(n), SourcePosition::default()).unwrap()
	}

	fn prop(gadget: impl Into<Gadget>) -> Proposition {
		Proposition::Gadget(gadget.into())
	}

	#[test]
	fn renders_labels_in_first_seen_order() {
		let statement = Proposition::and([
			prop(BoundsCheck::new(w("age"), int(18), Variable::Null).unwrap()),
			Proposition::or([
				prop(LessThan::new(w("age"), w("limit")).unwrap()),
				prop(Equality::new(w("limit"), int(18)).unwrap()),
			]),
		]);
		let values = HashMap::from([
			(reference("age"), Value::Literal(Literal::integer(30))),
			(reference("limit"), Value::Literal(Literal::integer(256))),
		]);
		let output = generate(&statement, |r| values.get(r).cloned()).unwrap();
		assert_eq!(
			output.gadgets,
			"BOUNDS_CHECK W0 I0 NULL\n\
			 BEGIN_OR\n\
			 BEGIN_BRANCH\n\
			 LESS_THAN W0 W1\n\
			 END_BRANCH\n\
			 BEGIN_BRANCH\n\
			 EQUALITY W1 I0\n\
			 END_BRANCH\n\
			 END_OR\n"
		);
		assert_eq!(output.instances, "I0 = 0x12\n");
		assert_eq!(output.witnesses, "W0 = 0x1e\nW1 = 0x0001\n");
	}

	#[test]
	fn missing_witness_value() {
		let statement = prop(Equality::new(w("age"), int(18)).unwrap());
		assert_eq!(
			generate(&statement, |_| None),
			Err(CodegenError::MissingWitness {
				reference: "me.age".into()
			})
		);
	}
}
