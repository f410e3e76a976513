use cranelift_entity::{PrimaryMap, entity_impl};
use zkpc_core::{Gadget, Proposition};

/// A gadget position in the tree being optimised.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(super) struct Slot(u32);
entity_impl!(Slot);

#[derive(Clone, Debug, PartialEq, Eq)]
pub(super) enum Node {
	Leaf(Slot),
	And(Vec<Node>),
	Or(Vec<Node>),
	True,
}

/// A proposition whose gadgets are addressed by slot, so they can be replaced in place.
///
/// Slots of gadgets that were dropped from the tree stay allocated but are no longer reachable
/// from `root`.
pub(super) struct Tree {
	pub(super) root: Node,
	pub(super) gadgets: PrimaryMap<Slot, Gadget>,
}

impl Tree {
	pub(super) fn new(proposition: Proposition) -> Self {
		let mut gadgets = PrimaryMap::new();
		let root = build(proposition, &mut gadgets);
		Self { root, gadgets }
	}

	pub(super) fn into_proposition(self) -> Proposition {
		fn convert(node: &Node, gadgets: &PrimaryMap<Slot, Gadget>) -> Proposition {
			match node {
				Node::Leaf(slot) => Proposition::Gadget(gadgets[*slot].clone()),
				Node::And(parts) => Proposition::and(parts.iter().map(|p| convert(p, gadgets))),
				Node::Or(parts) => Proposition::or(parts.iter().map(|p| convert(p, gadgets))),
				Node::True => Proposition::True,
			}
		}
		convert(&self.root, &self.gadgets)
	}

	pub(super) fn gadget(&self, slot: Slot) -> &Gadget {
		&self.gadgets[slot]
	}

	/// Slots reachable from the root, in tree order.
	pub(super) fn leaves(&self) -> Vec<Slot> {
		fn collect(node: &Node, out: &mut Vec<Slot>) {
			match node {
				Node::Leaf(slot) => out.push(*slot),
				Node::And(parts) | Node::Or(parts) => parts.iter().for_each(|p| collect(p, out)),
				Node::True => {}
			}
		}
		let mut out = Vec::new();
		collect(&self.root, &mut out);
		out
	}

	pub(super) fn contains(&self, slot: Slot) -> bool {
		self.leaves().contains(&slot)
	}

	/// The gadgets required wherever `slot` is required.
	///
	/// These are the siblings under every enclosing conjunction, without descending into
	/// disjunctions.
	pub(super) fn context(&self, slot: Slot) -> Vec<Slot> {
		let mut out = Vec::new();
		context_in(&self.root, slot, &mut out);
		out
	}

	/// Splices `replacement` in place of the gadget at `slot`.
	pub(super) fn replace(&mut self, slot: Slot, replacement: Proposition) {
		let mut replacement = Some(build(replacement, &mut self.gadgets));
		replace_in(&mut self.root, slot, &mut replacement);
		debug_assert!(replacement.is_none(), "slot {slot:?} is not in the tree");
	}
}

fn build(proposition: Proposition, gadgets: &mut PrimaryMap<Slot, Gadget>) -> Node {
	match proposition {
		Proposition::Gadget(gadget) => Node::Leaf(gadgets.push(gadget)),
		Proposition::And(parts) => Node::And(parts.into_iter().map(|p| build(p, gadgets)).collect()),
		Proposition::Or(parts) => Node::Or(parts.into_iter().map(|p| build(p, gadgets)).collect()),
		Proposition::True => Node::True,
	}
}

/// Collects the context of `slot` if it is below `node`, and reports whether it is.
fn context_in(node: &Node, slot: Slot, out: &mut Vec<Slot>) -> bool {
	match node {
		Node::Leaf(leaf) => *leaf == slot,
		Node::True => false,
		Node::Or(parts) => parts.iter().any(|part| context_in(part, slot, out)),
		Node::And(parts) => {
			let Some(i) = parts.iter().position(|part| context_in(part, slot, out)) else {
				return false;
			};
			for (j, sibling) in parts.iter().enumerate() {
				if i != j {
					mandatory(sibling, out);
				}
			}
			true
		}
	}
}

fn mandatory(node: &Node, out: &mut Vec<Slot>) {
	match node {
		Node::Leaf(slot) => out.push(*slot),
		Node::And(parts) => parts.iter().for_each(|part| mandatory(part, out)),
		Node::Or(_) | Node::True => {}
	}
}

fn replace_in(node: &mut Node, slot: Slot, replacement: &mut Option<Node>) {
	if matches!(node, Node::Leaf(leaf) if *leaf == slot) {
		if let Some(new) = replacement.take() {
			*node = new;
		}
		return;
	}
	match node {
		Node::And(parts) | Node::Or(parts) => {
			for part in parts {
				if replacement.is_none() {
					return;
				}
				replace_in(part, slot, replacement);
			}
		}
		Node::Leaf(_) | Node::True => {}
	}
}

#[cfg(test)]
mod tests {
	use zkpc_core::{Reference, Selector, SourcePosition, ValueType, Variable, gadget::Equality};

	use super::*;

	fn eq(a: &str, b: &str) -> Proposition {
		let w = |path: &str| {
			let reference = Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap());
			Variable::witness(reference, SourcePosition::default())
		};
		Proposition::Gadget(Equality::new(w(a), w(b)).unwrap().into())
	}

	#[test]
	fn context_stops_at_disjunctions() {
		// a=b && (b=c || (c=d && d=e)) && e=f
		let tree = Tree::new(Proposition::and([
			eq("a", "b"),
			Proposition::or([eq("b", "c"), Proposition::and([eq("c", "d"), eq("d", "e")])]),
			eq("e", "f"),
		]));
		let slots = tree.leaves();
		assert_eq!(slots.len(), 5);

		let [ab, bc, cd, de, ef] = slots[..] else { unreachable!() };
		assert_eq!(tree.context(ab), vec![ef]);
		assert_eq!(tree.context(bc), vec![ab, ef]);
		assert_eq!(tree.context(cd), vec![de, ab, ef]);
		assert_eq!(tree.context(ef), vec![ab]);
	}

	#[test]
	fn replace_splices_a_proposition() {
		let mut tree = Tree::new(Proposition::and([eq("a", "b"), eq("b", "c")]));
		let first = tree.leaves()[0];
		tree.replace(first, Proposition::or([eq("x", "y"), Proposition::True]));
		assert!(!tree.contains(first));
		assert_eq!(
			tree.into_proposition(),
			Proposition::and([Proposition::or([eq("x", "y")]), eq("b", "c")])
		);
	}
}
