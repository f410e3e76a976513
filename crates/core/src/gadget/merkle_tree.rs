//! Membership of leaves under a Merkle root.
//!
//! The leaves are padded with [`Variable::Null`] up to the next power of two and paired up into a
//! complete binary tree.
//!
//! # Constraints
//!
//! Four MiMC compressions along the authentication path, accounted as a fixed cost.

use super::field::FieldSpec;
use crate::{
	error::{CompileError, Result},
	value::ValueType,
	variable::Variable,
};

pub const COST: u64 = 1456;

const ROOT: FieldSpec = FieldSpec::new("root", ValueType::NUMERIC);
const LEAF: FieldSpec = FieldSpec::new("leaves", ValueType::SCALAR);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MerkleNode {
	Leaf(Variable),
	Node(Box<MerkleNode>, Box<MerkleNode>),
}

impl MerkleNode {
	/// Builds a complete tree over `leaves`, whose length must be a power of two.
	fn complete(mut level: Vec<MerkleNode>) -> MerkleNode {
		debug_assert!(level.len().is_power_of_two());
		while level.len() > 1 {
			let mut pairs = level.into_iter();
			let mut next = Vec::with_capacity(pairs.len() / 2);
			while let (Some(left), Some(right)) = (pairs.next(), pairs.next()) {
				next.push(MerkleNode::Node(Box::new(left), Box::new(right)));
			}
			level = next;
		}
		let Some(root) = level.pop() else {
			unreachable!("a power of two is never zero")
		};
		root
	}

	pub fn depth(&self) -> usize {
		match self {
			MerkleNode::Leaf(_) => 0,
			MerkleNode::Node(left, _) => 1 + left.depth(),
		}
	}

	fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Variable>) {
		match self {
			MerkleNode::Leaf(variable) => out.push(variable),
			MerkleNode::Node(left, right) => {
				left.collect_leaves(out);
				right.collect_leaves(out);
			}
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MerkleTree {
	root: Variable,
	tree: MerkleNode,
}

impl MerkleTree {
	pub fn new(root: Variable, leaves: Vec<Variable>) -> Result<Self> {
		ROOT.check(&root)?;
		if leaves.is_empty() {
			return Err(CompileError::EmptyOperand { field: LEAF.name });
		}
		for leaf in &leaves {
			LEAF.check(leaf)?;
		}

		let width = leaves.len().next_power_of_two();
		let mut level: Vec<_> = leaves.into_iter().map(MerkleNode::Leaf).collect();
		level.resize(width, MerkleNode::Leaf(Variable::Null));
		Ok(Self {
			root,
			tree: MerkleNode::complete(level),
		})
	}

	pub fn root(&self) -> &Variable {
		&self.root
	}

	pub fn tree(&self) -> &MerkleNode {
		&self.tree
	}

	/// The padded leaves, left to right.
	pub fn leaves(&self) -> Vec<&Variable> {
		let mut leaves = Vec::new();
		self.tree.collect_leaves(&mut leaves);
		leaves
	}

	pub fn template(&self) -> String {
		let mut template = String::from("MERKLE_TREE {root}");
		for i in 0..self.leaves().len() {
			template.push_str(&format!(" {{leaf{i}}}"));
		}
		template
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		let leaves = self.leaves().into_iter().enumerate();
		std::iter::once(("root".to_string(), &self.root))
			.chain(leaves.map(|(i, leaf)| (format!("leaf{i}"), leaf)))
			.collect()
	}
}
