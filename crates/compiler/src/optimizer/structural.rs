//! Rewrites that only depend on the shape of the tree.
//!
//! * tautology removal: `true` vanishes from conjunctions and absorbs disjunctions;
//! * lift-up: single-part nodes are replaced by their part, and nested nodes of the same kind are
//!   flattened;
//! * common-factor lift: gadgets required by every branch of a disjunction are required once,
//!   next to it.

use cranelift_entity::PrimaryMap;
use zkpc_core::Gadget;

use super::tree::{Node, Slot, Tree};

impl Tree {
	/// Applies the structural rewrites until none applies.
	pub(super) fn normalize(&mut self) {
		loop {
			let mut changed = false;
			let root = std::mem::replace(&mut self.root, Node::True);
			self.root = simplify(root, &self.gadgets, &mut changed);
			if !changed {
				break;
			}
		}
	}
}

fn simplify(node: Node, gadgets: &PrimaryMap<Slot, Gadget>, changed: &mut bool) -> Node {
	match node {
		Node::Leaf(_) | Node::True => node,
		Node::And(parts) => {
			let mut flat = Vec::with_capacity(parts.len());
			for part in parts {
				match simplify(part, gadgets, changed) {
					Node::True => *changed = true,
					Node::And(inner) => {
						*changed = true;
						flat.extend(inner);
					}
					other => flat.push(other),
				}
			}
			if flat.is_empty() {
				*changed = true;
				return Node::True;
			}
			match <[Node; 1]>::try_from(flat) {
				Ok([only]) => {
					*changed = true;
					only
				}
				Err(flat) => Node::And(flat),
			}
		}
		Node::Or(parts) => {
			let mut flat = Vec::with_capacity(parts.len());
			for part in parts {
				match simplify(part, gadgets, changed) {
					Node::True => {
						*changed = true;
						return Node::True;
					}
					Node::Or(inner) => {
						*changed = true;
						flat.extend(inner);
					}
					other => flat.push(other),
				}
			}
			let flat = match <[Node; 1]>::try_from(flat) {
				Ok([only]) => {
					*changed = true;
					return only;
				}
				Err(flat) => flat,
			};
			match lift_common_factors(flat, gadgets) {
				Ok(lifted) => {
					*changed = true;
					lifted
				}
				Err(branches) => Node::Or(branches),
			}
		}
	}
}

/// Gadgets a branch requires directly.
fn direct_leaves(branch: &Node) -> Vec<Slot> {
	match branch {
		Node::Leaf(slot) => vec![*slot],
		Node::And(parts) => parts
			.iter()
			.filter_map(|part| match part {
				Node::Leaf(slot) => Some(*slot),
				_ => None,
			})
			.collect(),
		Node::Or(_) | Node::True => Vec::new(),
	}
}

/// `(x && a) || (x && b)` becomes `x && (a || b)`.
///
/// Hands the branches back untouched when they have no gadget in common.
fn lift_common_factors(
	branches: Vec<Node>,
	gadgets: &PrimaryMap<Slot, Gadget>,
) -> Result<Node, Vec<Node>> {
	if branches.len() < 2 {
		return Err(branches);
	}
	let other_leaves: Vec<Vec<Slot>> = branches[1..].iter().map(direct_leaves).collect();

	let mut common: Vec<Slot> = Vec::new();
	for slot in direct_leaves(&branches[0]) {
		let gadget = &gadgets[slot];
		let everywhere = other_leaves
			.iter()
			.all(|leaves| leaves.iter().any(|&other| gadgets[other] == *gadget));
		if everywhere && !common.iter().any(|&c| gadgets[c] == *gadget) {
			common.push(slot);
		}
	}
	if common.is_empty() {
		return Err(branches);
	}

	let residual = branches
		.into_iter()
		.map(|branch| remove_factors(branch, &common, gadgets))
		.collect();
	Ok(Node::And(common.into_iter().map(Node::Leaf).chain([Node::Or(residual)]).collect()))
}

/// Removes one occurrence of each factor from a branch. An exhausted branch becomes `true`.
fn remove_factors(branch: Node, factors: &[Slot], gadgets: &PrimaryMap<Slot, Gadget>) -> Node {
	let is_factor = |slot: Slot, factor: Slot| gadgets[slot] == gadgets[factor];
	match branch {
		Node::Leaf(slot) if factors.iter().any(|&factor| is_factor(slot, factor)) => Node::True,
		Node::And(mut parts) => {
			for &factor in factors {
				let found = parts
					.iter()
					.position(|part| matches!(part, Node::Leaf(slot) if is_factor(*slot, factor)));
				if let Some(i) = found {
					parts.remove(i);
				}
			}
			Node::And(parts)
		}
		other => other,
	}
}

#[cfg(test)]
mod tests {
	use zkpc_core::{
		Proposition, Reference, Selector, SourcePosition, ValueType, Variable,
		gadget::{Equality, Inequality, LessThan},
	};

	use super::*;

	fn w(path: &str) -> Variable {
		let reference = Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap());
		Variable::witness(reference, SourcePosition::default())
	}

	fn eq(a: &str, b: &str) -> Proposition {
		Proposition::Gadget(Equality::new(w(a), w(b)).unwrap().into())
	}

	fn ne(a: &str, b: &str) -> Proposition {
		Proposition::Gadget(Inequality::new(w(a), w(b)).unwrap().into())
	}

	fn lt(a: &str, b: &str) -> Proposition {
		Proposition::Gadget(LessThan::new(w(a), w(b)).unwrap().into())
	}

	fn normalize(proposition: Proposition) -> Proposition {
		let mut tree = Tree::new(proposition);
		tree.normalize();
		tree.into_proposition()
	}

	#[test]
	fn tautologies_vanish() {
		let trues = Proposition::and([Proposition::True, Proposition::True]);
		assert!(normalize(trues).is_true());
		assert!(normalize(Proposition::and([])).is_true());
		assert_eq!(normalize(Proposition::and([eq("a", "b")])), eq("a", "b"));
		assert!(normalize(Proposition::or([eq("a", "b"), Proposition::True])).is_true());
	}

	#[test]
	fn nested_nodes_are_flattened() {
		let nested = Proposition::and([
			eq("a", "b"),
			Proposition::and([eq("b", "c"), Proposition::and([eq("c", "d")])]),
		]);
		let Proposition::And(parts) = normalize(nested) else { panic!("expected a conjunction") };
		assert_eq!(parts, vec![eq("a", "b"), eq("b", "c"), eq("c", "d")]);
	}

	#[test]
	fn common_factor_is_lifted_out_of_a_disjunction() {
		let prop = Proposition::or([
			Proposition::and([eq("a", "b"), ne("a", "c")]),
			Proposition::and([lt("a", "c"), eq("b", "a")]),
		]);
		let expected = Proposition::and([eq("a", "b"), Proposition::or([ne("a", "c"), lt("a", "c")])]);
		assert_eq!(normalize(prop), expected);
	}

	#[test]
	fn exhausted_branch_absorbs_the_disjunction() {
		let prop = Proposition::or([eq("a", "b"), Proposition::and([eq("a", "b"), ne("a", "c")])]);
		assert_eq!(normalize(prop), eq("a", "b"));
	}

	#[test]
	fn nothing_in_common() {
		let prop = Proposition::or([eq("a", "b"), ne("a", "c")]);
		assert_eq!(normalize(prop.clone()), prop);
	}
}
