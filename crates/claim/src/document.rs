//! The serialized form of a claim.
//!
//! A claim document names its subjects, says for each whether its data is secret (`witness`) or
//! public (`instance`) and where the data lives, and states the claim as a tree of `and`/`or`
//! nodes over gadgets:
//!
//! ```json
//! { "subjects": { "me": { "role": "witness", "source": "passport.json" } },
//!   "claim": { "and": [ { "gadget": "bounds_check",
//!                         "value": { "ref": "me", "path": ["age"], "at": [1, 5, 6] },
//!                         "min": { "lit": 18 }, "max": { "lit": 65 } } ] } }
//! ```

use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};
use zkpc_core::SourcePosition;

use crate::error::{ClaimError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimDocument {
	pub subjects: BTreeMap<String, SubjectDecl>,
	pub claim: ClaimNode,
}

impl ClaimDocument {
	pub fn from_json(source_id: &str, text: &str) -> Result<Self> {
		serde_json::from_str(text).map_err(|error| ClaimError::Json {
			source_id: source_id.to_owned(),
			error,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectDecl {
	pub role: Role,
	/// Path of the subject's JSON data, relative to the data directory.
	pub source: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	Witness,
	Instance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimNode {
	And { and: Vec<ClaimNode> },
	Or { or: Vec<ClaimNode> },
	/// `true`. There is no `false`: a claim that can never hold has nothing to prove.
	Constant(bool),
	Gadget(GadgetDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gadget", rename_all = "snake_case")]
pub enum GadgetDecl {
	Equality {
		left: Operand,
		right: Operand,
	},
	Inequality {
		left: Operand,
		right: Operand,
	},
	LessThan {
		smaller: Operand,
		bigger: Operand,
	},
	BoundsCheck {
		value: Operand,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		min: Option<Operand>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		max: Option<Operand>,
	},
	#[serde(rename = "mimc_hash")]
	MiMCHash {
		preimage: Operand,
		image: Operand,
	},
	MerkleTree {
		root: Operand,
		leaves: Vec<Operand>,
	},
	SetMembership {
		member: Operand,
		set: SetDecl,
	},
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
	Reference {
		#[serde(rename = "ref")]
		subject: String,
		path: Vec<String>,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		at: Option<Span>,
	},
	Literal {
		lit: serde_json::Value,
		#[serde(default, skip_serializing_if = "Option::is_none")]
		at: Option<Span>,
	},
	Null,
}

impl Operand {
	pub fn position(&self) -> Option<SourcePosition> {
		match self {
			Operand::Reference { at, .. } | Operand::Literal { at, .. } => at.map(Into::into),
			Operand::Null => None,
		}
	}
}

/// The set of a membership test: either spelled out, or a single operand holding a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SetDecl {
	Elements(Vec<Operand>),
	List(Operand),
}

/// `[line, column, length]` of the operand in the claim's original source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span(pub u32, pub u32, pub u32);

impl From<Span> for SourcePosition {
	fn from(Span(line, column, length): Span) -> Self {
		SourcePosition::new(line, column, length)
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;

	#[test]
	fn parses_nested_claims() {
		let text = r#"{
			"subjects": {
				"me": { "role": "witness", "source": "passport.json" },
				"gov": { "role": "instance", "source": "registry.json" }
			},
			"claim": { "or": [
				{ "gadget": "bounds_check", "value": { "ref": "me", "path": ["age"], "at": [1, 5, 6] },
				  "min": { "lit": 18 } },
				{ "and": [
					{ "gadget": "set_membership", "member": { "ref": "me", "path": ["country"] },
					  "set": { "ref": "gov", "path": ["countries"] } },
					true
				] }
			] }
		}"#;
		let document = ClaimDocument::from_json("claim.json", text).unwrap();

		assert_eq!(document.subjects["me"].role, Role::Witness);
		assert_eq!(document.subjects["gov"].source, PathBuf::from("registry.json"));

		let ClaimNode::Or { or } = &document.claim else {
			panic!("expected a disjunction, got {:?}", document.claim);
		};
		assert_eq!(
			or[0],
			ClaimNode::Gadget(GadgetDecl::BoundsCheck {
				value: Operand::Reference {
					subject: "me".into(),
					path: vec!["age".into()],
					at: Some(Span(1, 5, 6)),
				},
				min: Some(Operand::Literal {
					lit: json!(18),
					at: None,
				}),
				max: None,
			})
		);
		let ClaimNode::And { and } = &or[1] else {
			panic!("expected a conjunction, got {:?}", or[1]);
		};
		assert!(matches!(
			&and[0],
			ClaimNode::Gadget(GadgetDecl::SetMembership { set: SetDecl::List(_), .. })
		));
		assert_eq!(and[1], ClaimNode::Constant(true));
	}

	#[test]
	fn spelled_out_sets_and_null_operands() {
		let node: ClaimNode = serde_json::from_value(json!({
			"gadget": "set_membership",
			"member": { "lit": "NL" },
			"set": [{ "lit": "NL" }, { "lit": "BE" }, null]
		}))
		.unwrap();
		let ClaimNode::Gadget(GadgetDecl::SetMembership {
			set: SetDecl::Elements(elements),
			..
		}) = node
		else {
			panic!("expected an explicit set, got {node:?}");
		};
		assert_eq!(elements.len(), 3);
		assert_eq!(elements[2], Operand::Null);
	}

	#[test]
	fn reports_the_source_of_malformed_documents() {
		let error = ClaimDocument::from_json("broken.json", "{ \"subjects\": ").unwrap_err();
		assert!(matches!(error, ClaimError::Json { ref source_id, .. } if source_id == "broken.json"));
	}
}
