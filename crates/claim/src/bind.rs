//! Turns a claim document into a proposition over bound variables.
//!
//! References into witness subjects stay references: only their type is looked up. References
//! into instance subjects are replaced by the public value they point at.

use std::collections::{BTreeMap, HashMap, hash_map::Entry};

use zkpc_core::{
	CompileError, Gadget, Literal, Proposition, Reference, Schema, Selector, SourcePosition,
	Value, ValueAccessor, Variable,
	gadget::{BoundsCheck, Equality, Inequality, LessThan, MerkleTree, MiMCHash, SetMembership},
};

use crate::{
	document::{ClaimDocument, ClaimNode, GadgetDecl, Operand, Role, SetDecl, SubjectDecl},
	error::{ClaimError, Result},
	json::{JsonData, literal_from_json},
};

/// Binds `document` against the data of its subjects, keyed by subject alias.
pub fn bind(document: &ClaimDocument, data: &BTreeMap<String, JsonData>) -> Result<Proposition> {
	let _span = tracing::debug_span!("Bind").entered();
	Binder::new(&document.subjects, data).node(&document.claim)
}

/// Where a piece of subject data has been used, and in which role.
struct Exposure {
	role: Role,
	positions: Vec<SourcePosition>,
}

struct Binder<'a> {
	subjects: &'a BTreeMap<String, SubjectDecl>,
	data: &'a BTreeMap<String, JsonData>,
	// Keyed by data source rather than alias, so that two aliases over one file are caught too.
	exposures: HashMap<(String, Selector), Exposure>,
}

impl<'a> Binder<'a> {
	fn new(subjects: &'a BTreeMap<String, SubjectDecl>, data: &'a BTreeMap<String, JsonData>) -> Self {
		Self {
			subjects,
			data,
			exposures: HashMap::new(),
		}
	}

	fn node(&mut self, node: &ClaimNode) -> Result<Proposition> {
		match node {
			ClaimNode::And { and } => Ok(Proposition::And(self.nodes(and)?)),
			// An empty disjunction can never hold, like `false`.
			ClaimNode::Or { or } if or.is_empty() => {
				Err(CompileError::EmptyOperand { field: "or" }.into())
			}
			ClaimNode::Or { or } => Ok(Proposition::Or(self.nodes(or)?)),
			ClaimNode::Constant(true) => Ok(Proposition::True),
			ClaimNode::Constant(false) => Err(ClaimError::UnsupportedLiteral {
				literal: "false".into(),
				position: None,
			}),
			ClaimNode::Gadget(decl) => self.gadget(decl).map(Proposition::Gadget),
		}
	}

	fn nodes(&mut self, nodes: &[ClaimNode]) -> Result<Vec<Proposition>> {
		nodes.iter().map(|node| self.node(node)).collect()
	}

	fn gadget(&mut self, decl: &GadgetDecl) -> Result<Gadget> {
		let gadget: Gadget = match decl {
			GadgetDecl::Equality { left, right } => {
				Equality::new(self.operand(left)?, self.operand(right)?)?.into()
			}
			GadgetDecl::Inequality { left, right } => {
				Inequality::new(self.operand(left)?, self.operand(right)?)?.into()
			}
			GadgetDecl::LessThan { smaller, bigger } => {
				LessThan::new(self.operand(smaller)?, self.operand(bigger)?)?.into()
			}
			GadgetDecl::BoundsCheck { value, min, max } => {
				let value = self.operand(value)?;
				let min = self.optional(min.as_ref())?;
				let max = self.optional(max.as_ref())?;
				BoundsCheck::new(value, min, max)?.into()
			}
			GadgetDecl::MiMCHash { preimage, image } => {
				MiMCHash::new(self.operand(preimage)?, self.operand(image)?)?.into()
			}
			GadgetDecl::MerkleTree { root, leaves } => {
				let root = self.operand(root)?;
				let leaves = leaves
					.iter()
					.map(|leaf| self.operand(leaf))
					.collect::<Result<_>>()?;
				MerkleTree::new(root, leaves)?.into()
			}
			GadgetDecl::SetMembership { member, set } => {
				let member = self.operand(member)?;
				let set = match set {
					SetDecl::Elements(elements) => elements
						.iter()
						.map(|element| self.operand(element))
						.collect::<Result<_>>()?,
					SetDecl::List(list) => self.expand(list)?,
				};
				SetMembership::new(member, set)?.into()
			}
		};
		Ok(gadget)
	}

	fn optional(&mut self, operand: Option<&Operand>) -> Result<Variable> {
		operand.map_or(Ok(Variable::Null), |operand| self.operand(operand))
	}

	fn operand(&mut self, operand: &Operand) -> Result<Variable> {
		let position = operand.position().unwrap_or_default();
		match operand {
			Operand::Reference { subject, path, .. } => {
				let selector = Selector::new(path)?;
				self.reference(subject, selector, position)
			}
			Operand::Literal { lit, .. } => {
				let literal = literal_from_json(lit).ok_or_else(|| ClaimError::UnsupportedLiteral {
					literal: lit.to_string(),
					position: operand.position(),
				})?;
				Ok(Variable::instance(literal, position)?)
			}
			Operand::Null => Ok(Variable::Null),
		}
	}

	fn reference(
		&mut self,
		subject: &str,
		selector: Selector,
		position: SourcePosition,
	) -> Result<Variable> {
		let (role, data) = self.subject(subject, position)?;
		let unresolved = || ClaimError::Unresolved {
			subject: subject.to_owned(),
			selector: selector.to_string(),
			position: Some(position).filter(SourcePosition::is_known),
		};
		let variable = match role {
			Role::Witness => {
				let ty = data.type_of(&selector).ok_or_else(unresolved)?;
				Variable::witness(Reference::new(ty, subject, selector.clone()), position)
			}
			Role::Instance => {
				let literal = resolve(data, &selector).ok_or_else(unresolved)?;
				Variable::instance(literal, position)?
			}
		};
		self.expose(data.source_id(), selector, role, position)?;
		Ok(variable)
	}

	/// Expands an operand holding a list into one variable per element.
	///
	/// A list inside witness data becomes one witness per element, each selected by its index.
	fn expand(&mut self, operand: &Operand) -> Result<Vec<Variable>> {
		let position = operand.position().unwrap_or_default();
		let unsupported = |literal: String| ClaimError::UnsupportedLiteral {
			literal,
			position: operand.position(),
		};
		match operand {
			Operand::Reference { subject, path, .. } => {
				let selector = Selector::new(path)?;
				let (_, data) = self.subject(subject, position)?;
				let length = match resolve(data, &selector) {
					Some(Literal::List(items)) => items.len(),
					Some(_) => return Ok(vec![self.reference(subject, selector, position)?]),
					None => {
						return Err(ClaimError::Unresolved {
							subject: subject.clone(),
							selector: selector.to_string(),
							position: operand.position(),
						});
					}
				};
				(0..length)
					.map(|i| {
						let element = Selector::new(path.iter().cloned().chain([i.to_string()]))?;
						self.reference(subject, element, position)
					})
					.collect()
			}
			Operand::Literal { lit, .. } => match literal_from_json(lit) {
				Some(Literal::List(items)) => items
					.into_iter()
					.map(|item| Variable::instance(item, position).map_err(ClaimError::from))
					.collect(),
				Some(literal) => Ok(vec![Variable::instance(literal, position)?]),
				None => Err(unsupported(lit.to_string())),
			},
			Operand::Null => Err(unsupported("null".into())),
		}
	}

	fn subject(&self, alias: &str, position: SourcePosition) -> Result<(Role, &'a JsonData)> {
		let unknown = || ClaimError::UnknownSubject {
			subject: alias.to_owned(),
			position: Some(position).filter(SourcePosition::is_known),
		};
		let decl = self.subjects.get(alias).ok_or_else(unknown)?;
		let data = self.data.get(alias).ok_or_else(unknown)?;
		Ok((decl.role, data))
	}

	/// Records a use of `selector` and fails if the same data is used both secretly and publicly.
	fn expose(
		&mut self,
		source_id: String,
		selector: Selector,
		role: Role,
		position: SourcePosition,
	) -> Result<()> {
		match self.exposures.entry((source_id, selector)) {
			Entry::Vacant(entry) => {
				entry.insert(Exposure {
					role,
					positions: vec![position],
				});
				Ok(())
			}
			Entry::Occupied(mut entry) if entry.get().role == role => {
				entry.get_mut().positions.push(position);
				Ok(())
			}
			Entry::Occupied(entry) => {
				let ((_, selector), exposure) = entry.remove_entry();
				let positions = exposure
					.positions
					.into_iter()
					.chain([position])
					.filter(SourcePosition::is_known)
					.collect();
				Err(CompileError::WitnessExposed {
					selector: selector.to_string(),
					positions,
				}
				.into())
			}
		}
	}
}

fn resolve(data: &JsonData, selector: &Selector) -> Option<Literal> {
	match data.get(selector)? {
		Value::Literal(literal) => Some(literal),
		Value::Reference(_) => None,
	}
}
