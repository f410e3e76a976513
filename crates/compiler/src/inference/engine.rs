use std::collections::{BTreeSet, HashMap, HashSet};

use itertools::Itertools;
use zkpc_core::{CompileError, Gadget, GadgetKind, Reference, Result};

use super::{Inference, InferenceGraph, InferenceId};
use crate::{combinatorics::gadget_combinations, rules::RuleRegistry};

/// Derives everything the implication rules can from a set of gadgets, then checks the result
/// against the contradiction rules.
pub struct InferenceEngine<'a> {
	registry: &'a RuleRegistry,
	max_inferences: usize,
}

/// Lookup tables over the inferences admitted so far.
#[derive(Default)]
struct Index {
	by_witness: HashMap<Reference, Vec<InferenceId>>,
	by_conclusion: HashMap<Gadget, Vec<InferenceId>>,
}

impl Index {
	fn insert(&mut self, id: InferenceId, conclusion: &Gadget) {
		for witness in conclusion.witnesses() {
			self.by_witness.entry(witness.clone()).or_default().push(id);
		}
		self.by_conclusion.entry(conclusion.clone()).or_default().push(id);
	}

	fn with_conclusion(&self, conclusion: &Gadget) -> &[InferenceId] {
		self.by_conclusion.get(conclusion).map_or(&[][..], Vec::as_slice)
	}

	/// Distinct conclusions sharing a witness with `conclusion`, other than `conclusion` itself.
	///
	/// Facts linked only through a common instance value (`a = 17`, `b = 17`) are never
	/// paired, so `a = b` is not derived from them.
	fn related<'g>(&self, graph: &'g InferenceGraph, conclusion: &Gadget) -> Vec<&'g Gadget> {
		let mut seen = HashSet::new();
		let mut related = Vec::new();
		for witness in conclusion.witnesses() {
			for &id in self.by_witness.get(witness).map_or(&[][..], Vec::as_slice) {
				let other = &graph.get(id).conclusion;
				if other != conclusion && seen.insert(other) {
					related.push(other);
				}
			}
		}
		related
	}
}

impl<'a> InferenceEngine<'a> {
	pub fn new(registry: &'a RuleRegistry, max_inferences: usize) -> Self {
		Self {
			registry,
			max_inferences,
		}
	}

	/// Derives inferences and rejects the gadgets if they contradict each other.
	pub fn analyze(&self, gadgets: &[&Gadget]) -> Result<InferenceGraph> {
		let graph = self.derive(gadgets)?;
		self.check_contradictions(&graph)?;
		Ok(graph)
	}

	/// Runs the implication rules to a fixpoint.
	///
	/// Only gadgets sharing a witness are combined. A derived inference is admitted unless an
	/// inference with the same conclusion and no more premises is already known.
	pub fn derive(&self, gadgets: &[&Gadget]) -> Result<InferenceGraph> {
		let mut graph = InferenceGraph::default();
		let mut index = Index::default();
		let mut frontier = Vec::new();

		for &gadget in gadgets {
			if !index.with_conclusion(gadget).is_empty() {
				continue;
			}
			let id = graph.next_id();
			graph.push(Inference {
				premises: BTreeSet::from([id]),
				conclusion: gadget.clone(),
				derived_from: Vec::new(),
			});
			index.insert(id, gadget);
			frontier.push(id);
		}

		let mut round = 0;
		while !frontier.is_empty() {
			round += 1;
			let _span = tracing::debug_span!("Inference round", round).entered();

			let candidates = self.round(&graph, &index, &frontier);
			frontier.clear();
			for candidate in candidates {
				let dominated = index
					.with_conclusion(&candidate.conclusion)
					.iter()
					.any(|&id| candidate.can_be_implied_from(graph.get(id)));
				if dominated {
					continue;
				}
				if graph.len() >= self.max_inferences {
					return Err(CompileError::InferenceLimit {
						limit: self.max_inferences,
					});
				}
				tracing::debug!(conclusion = %candidate.conclusion, "derived");
				let id = graph.push(candidate);
				index.insert(id, &graph.get(id).conclusion);
				frontier.push(id);
			}
		}
		Ok(graph)
	}

	/// Applies every implication rule to each inference of `frontier`, with the other pattern
	/// slots filled from related conclusions.
	fn round(
		&self,
		graph: &InferenceGraph,
		index: &Index,
		frontier: &[InferenceId],
	) -> Vec<Inference> {
		let mut candidates = Vec::new();
		for &pivot in frontier {
			let conclusion = &graph.get(pivot).conclusion;
			let kind = conclusion.kind();
			let pool = index.related(graph, conclusion);
			for rule in self.registry.implications() {
				for (slot, _) in rule.pattern.iter().enumerate().filter(|&(_, &k)| k == kind) {
					let rest: Vec<GadgetKind> = rule
						.pattern
						.iter()
						.enumerate()
						.filter(|&(i, _)| i != slot)
						.map(|(_, &kind)| kind)
						.collect();
					let completions =
						if rest.is_empty() { vec![Vec::new()] } else { gadget_combinations(&rest, &pool) };

					for mut args in completions {
						args.insert(slot, conclusion);
						let Some(derived) = (rule.apply)(&args) else {
							continue;
						};
						tracing::trace!(rule = rule.name, %derived, "rule applied");
						candidates.extend(provenance(graph, index, pivot, slot, &args, &derived));
					}
				}
			}
		}
		candidates
	}

	/// Fails with the first contradiction found among the conclusions of `graph`.
	pub fn check_contradictions(&self, graph: &InferenceGraph) -> Result<()> {
		let conclusions = graph.conclusions();
		for rule in self.registry.contradictions() {
			for args in gadget_combinations(rule.pattern, &conclusions) {
				if let Err(err) = (rule.check)(&args) {
					tracing::debug!(rule = rule.name, %err, "contradiction");
					return Err(err);
				}
			}
		}
		Ok(())
	}
}

/// One inference of `derived` per way of picking an inference behind each argument.
fn provenance(
	graph: &InferenceGraph,
	index: &Index,
	pivot: InferenceId,
	slot: usize,
	args: &[&Gadget],
	derived: &Gadget,
) -> Vec<Inference> {
	args.iter()
		.enumerate()
		.map(|(i, arg)| {
			if i == slot { vec![pivot] } else { index.with_conclusion(arg).to_vec() }
		})
		.multi_cartesian_product()
		.map(|derived_from| Inference {
			premises: derived_from
				.iter()
				.flat_map(|&id| graph.get(id).premises.iter().copied())
				.collect(),
			conclusion: derived.clone(),
			derived_from,
		})
		.collect()
}

#[cfg(test)]
mod tests {
	use zkpc_core::{
		Literal, Selector, SourcePosition, ValueType, Variable,
		gadget::{BoundsCheck, Equality, LessThan},
	};

	use super::*;

	fn w(path: &str) -> Variable {
		let reference = Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap());
		Variable::witness(reference, SourcePosition::new(1, 1, 1))
	}

	fn int(n: i64) -> Variable {
		Variable::instance(Literal::integer(n), SourcePosition::new(1, 1, 2)).unwrap()
	}

	fn eq(a: Variable, b: Variable) -> Gadget {
		Equality::new(a, b).unwrap().into()
	}

	fn lt(a: Variable, b: Variable) -> Gadget {
		LessThan::new(a, b).unwrap().into()
	}

	fn derive(gadgets: &[Gadget]) -> Result<InferenceGraph> {
		let registry = RuleRegistry::standard();
		let refs: Vec<&Gadget> = gadgets.iter().collect();
		InferenceEngine::new(&registry, 10_000).derive(&refs)
	}

	#[test]
	fn seeds_are_deduplicated() {
		let graph = derive(&[eq(w("a"), w("b")), eq(w("b"), w("a"))]).unwrap();
		assert_eq!(graph.len(), 1);
		let (id, seed) = graph.seeds().next().unwrap();
		assert_eq!(seed.premises, BTreeSet::from([id]));
	}

	#[test]
	fn equality_chains_close_transitively() {
		let gadgets = [eq(w("a"), w("b")), eq(w("b"), w("c")), eq(w("c"), w("d"))];
		let graph = derive(&gadgets).unwrap();
		let conclusions = graph.conclusions();
		assert!(conclusions.contains(&&eq(w("a"), w("d"))));
		assert!(conclusions.contains(&&eq(w("d"), w("b"))));
		// Every pair of the four witnesses is related.
		assert_eq!(conclusions.len(), 6);

		let (id, _) = graph.iter().find(|(_, i)| i.conclusion == eq(w("a"), w("d"))).unwrap();
		let mut premises: Vec<_> = graph.premises_of(id).into_iter().cloned().collect();
		premises.sort_by_key(ToString::to_string);
		assert_eq!(premises, gadgets);
	}

	#[test]
	fn derived_premises_are_the_union_of_their_sources() {
		let gadgets = [
			eq(w("a"), w("b")),
			eq(w("b"), w("c")),
			lt(w("c"), w("d")),
			lt(w("d"), w("e")),
			eq(w("e"), int(3)),
		];
		let graph = derive(&gadgets).unwrap();
		for (id, inference) in graph.iter() {
			if inference.is_seed() {
				assert_eq!(inference.premises, BTreeSet::from([id]));
				continue;
			}
			let union: BTreeSet<_> = inference
				.derived_from
				.iter()
				.flat_map(|&source| graph.get(source).premises.iter().copied())
				.collect();
			assert_eq!(inference.premises, union);
			assert!(inference.derived_from.iter().all(|&source| source < id));
		}
	}

	#[test]
	fn unrelated_gadgets_are_not_combined() {
		let graph = derive(&[eq(w("a"), int(1)), eq(w("b"), int(1))]).unwrap();
		assert_eq!(graph.len(), 2);
		assert!(!graph.conclusions().contains(&&eq(w("a"), w("b"))));
	}

	#[test]
	fn pinned_chain_contradicts_bounds() {
		let gadgets = [
			eq(w("w"), int(17)),
			eq(w("w"), w("w2")),
			eq(w("w2"), w("w3")),
			eq(w("w3"), w("w4")),
			BoundsCheck::new(w("w4"), int(29), int(41)).unwrap().into(),
		];
		let registry = RuleRegistry::standard();
		let refs: Vec<&Gadget> = gadgets.iter().collect();
		let err = InferenceEngine::new(&registry, 10_000).analyze(&refs).unwrap_err();
		assert!(matches!(err, CompileError::Contradiction { .. }), "{err}");
	}

	#[test]
	fn disabled_rules_do_not_fire() {
		let registry = RuleRegistry::standard().without(&["equality_transitivity"]);
		let gadgets = [eq(w("a"), w("b")), eq(w("b"), w("c"))];
		let refs: Vec<&Gadget> = gadgets.iter().collect();
		let graph = InferenceEngine::new(&registry, 10_000).derive(&refs).unwrap();
		assert_eq!(graph.len(), 2);
	}

	#[test]
	fn inference_limit() {
		let registry = RuleRegistry::standard();
		let gadgets = [eq(w("a"), w("b")), eq(w("b"), w("c")), eq(w("c"), w("d"))];
		let refs: Vec<&Gadget> = gadgets.iter().collect();
		assert_eq!(
			InferenceEngine::new(&registry, 4).derive(&refs).unwrap_err(),
			CompileError::InferenceLimit { limit: 4 }
		);
	}
}
