//! Forward chaining over gadgets.
//!
//! Every fact the engine knows is an [`Inference`]: a conclusion together with the original
//! gadgets it rests on. Original gadgets are seeds that rest on themselves. Inferences are kept in
//! an arena and refer to each other by [`InferenceId`].

use std::collections::BTreeSet;

use cranelift_entity::{PrimaryMap, entity_impl};
use zkpc_core::Gadget;

mod engine;

pub use engine::InferenceEngine;

#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct InferenceId(u32);
entity_impl!(InferenceId);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Inference {
	/// Seeds this conclusion rests on. A seed's only premise is itself.
	pub premises: BTreeSet<InferenceId>,
	pub conclusion: Gadget,
	/// The inferences the deriving rule was applied to, in pattern order. Empty for seeds.
	pub derived_from: Vec<InferenceId>,
}

impl Inference {
	pub fn is_seed(&self) -> bool {
		self.derived_from.is_empty()
	}

	/// Whether `other` concludes the same from no more premises.
	pub fn can_be_implied_from(&self, other: &Inference) -> bool {
		self.conclusion == other.conclusion && self.premises.is_superset(&other.premises)
	}
}

/// Drops every inference that another one in `inferences` already implies.
///
/// Of several inferences with the same conclusion and premises, the first is kept.
pub fn simplify(inferences: &[Inference]) -> Vec<Inference> {
	let mut kept: Vec<Inference> = Vec::new();
	for (i, candidate) in inferences.iter().enumerate() {
		let dominated = inferences.iter().enumerate().any(|(j, other)| {
			i != j
				&& candidate.can_be_implied_from(other)
				&& (other.premises.len() < candidate.premises.len() || j < i)
		});
		if !dominated {
			kept.push(candidate.clone());
		}
	}
	kept
}

/// Everything derived from a set of gadgets.
#[derive(Debug, Default)]
pub struct InferenceGraph {
	inferences: PrimaryMap<InferenceId, Inference>,
}

impl InferenceGraph {
	pub(crate) fn push(&mut self, inference: Inference) -> InferenceId {
		self.inferences.push(inference)
	}

	pub(crate) fn next_id(&self) -> InferenceId {
		self.inferences.next_key()
	}

	pub fn get(&self, id: InferenceId) -> &Inference {
		&self.inferences[id]
	}

	/// The original gadgets `id` rests on.
	pub fn premises_of(&self, id: InferenceId) -> Vec<&Gadget> {
		self.inferences[id].premises.iter().map(|&p| &self.inferences[p].conclusion).collect()
	}

	/// Distinct conclusions, original gadgets first.
	pub fn conclusions(&self) -> Vec<&Gadget> {
		let mut seen = std::collections::HashSet::new();
		self.inferences
			.values()
			.map(|inference| &inference.conclusion)
			.filter(|conclusion| seen.insert(*conclusion))
			.collect()
	}

	pub fn seeds(&self) -> impl Iterator<Item = (InferenceId, &Inference)> {
		self.iter().filter(|(_, inference)| inference.is_seed())
	}

	pub fn iter(&self) -> impl Iterator<Item = (InferenceId, &Inference)> {
		self.inferences.iter()
	}

	pub fn len(&self) -> usize {
		self.inferences.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inferences.is_empty()
	}
}
