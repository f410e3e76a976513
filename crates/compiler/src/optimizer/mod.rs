//! Rewrites a proposition into an equivalent one that is no more expensive.
//!
//! The optimiser makes a single greedy pass over the gadgets of the tree. Each gadget is matched
//! against the substitution rules for its kind, with the facts that are required wherever it is
//! required as evidence. The first replacement found is spliced in and the tree is normalised
//! before moving on to the next gadget. Replacements are not revisited.

use std::fmt;

use zkpc_core::{Gadget, Proposition, Result};

use crate::{
	combinatorics::gadget_combinations,
	inference::InferenceEngine,
	rules::{RuleRegistry, SubstitutionRule},
};

mod structural;
mod tree;

use tree::Tree;

/// What the optimiser did to a proposition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OptimizerStats {
	pub gadgets_before: usize,
	pub gadgets_after: usize,
	pub cost_before: u64,
	pub cost_after: u64,
	/// Names of the substitution rules applied, in order.
	pub applied: Vec<&'static str>,
}

impl fmt::Display for OptimizerStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{} -> {} gadgets, estimated cost {} -> {}",
			self.gadgets_before, self.gadgets_after, self.cost_before, self.cost_after
		)?;
		if !self.applied.is_empty() {
			write!(f, " ({})", self.applied.join(", "))?;
		}
		Ok(())
	}
}

pub struct Optimizer<'a> {
	registry: &'a RuleRegistry,
	engine: InferenceEngine<'a>,
}

impl<'a> Optimizer<'a> {
	pub fn new(registry: &'a RuleRegistry, max_inferences: usize) -> Self {
		Self {
			registry,
			engine: InferenceEngine::new(registry, max_inferences),
		}
	}

	pub fn optimize(&self, proposition: Proposition) -> Result<(Proposition, OptimizerStats)> {
		let _span = tracing::info_span!("Optimize").entered();

		let mut stats = OptimizerStats {
			gadgets_before: proposition.gadgets().len(),
			cost_before: proposition.cost_estimate(),
			..Default::default()
		};

		let mut tree = Tree::new(proposition);
		tree.normalize();
		for slot in tree.leaves() {
			if !tree.contains(slot) {
				continue;
			}
			let context: Vec<&Gadget> = tree.context(slot).into_iter().map(|s| tree.gadget(s)).collect();
			let facts = self.engine.derive(&context)?;
			let target = tree.gadget(slot);
			let Some((rule, replacement)) = self.substitute(target, &facts.conclusions()) else {
				continue;
			};
			tracing::debug!(rule = rule.name, %target, %replacement, "substituted");
			stats.applied.push(rule.name);
			tree.replace(slot, replacement);
			tree.normalize();
		}

		let optimized = tree.into_proposition();
		stats.gadgets_after = optimized.gadgets().len();
		stats.cost_after = optimized.cost_estimate();
		tracing::info!(%stats, "optimized");
		Ok((optimized, stats))
	}

	/// The first replacement of `target` offered by a substitution rule that is no more expensive
	/// and actually differs from it.
	fn substitute(
		&self,
		target: &Gadget,
		facts: &[&Gadget],
	) -> Option<(&'static SubstitutionRule, Proposition)> {
		for rule in self.registry.substitutions_for(target.kind()) {
			let completions = if rule.context.is_empty() {
				vec![Vec::new()]
			} else {
				gadget_combinations(rule.context, facts)
			};
			for args in completions {
				let Some(replacement) = (rule.apply)(target, &args) else {
					continue;
				};
				let differs = !matches!(&replacement, Proposition::Gadget(g) if g == target);
				if differs && replacement.cost_estimate() <= target.cost() {
					return Some((rule, replacement));
				}
			}
		}
		None
	}
}
