//! Rejects propositions that can never be proven.
//!
//! A proposition is proven by proving any one of its evaluation paths, so it is only rejected when
//! every path contradicts itself. Paths that contradict themselves next to satisfiable ones are
//! reported and left for the prover to avoid.

use zkpc_core::{CompileError, Proposition, Result};

use crate::inference::InferenceEngine;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisReport {
	pub paths: usize,
	pub contradictory_paths: usize,
	/// Facts known across all satisfiable paths, derived ones included.
	pub inferences: usize,
}

pub fn check(proposition: &Proposition, engine: &InferenceEngine<'_>) -> Result<AnalysisReport> {
	let _span = tracing::info_span!("Analyze").entered();

	let paths = proposition.evaluation_paths();
	if paths.is_empty() && !proposition.is_tautology() {
		return Err(CompileError::Contradiction {
			message: "no evaluation path can prove the statement".into(),
			positions: proposition.gadgets().iter().flat_map(|g| g.positions()).collect(),
		});
	}
	let mut report = AnalysisReport {
		paths: paths.len(),
		..Default::default()
	};
	let mut contradictions = Vec::new();
	for (i, path) in paths.iter().enumerate() {
		let _span = tracing::debug_span!("Evaluation path", path = i).entered();
		match engine.analyze(path) {
			Ok(graph) => report.inferences += graph.len(),
			Err(err @ CompileError::Contradiction { .. }) => {
				report.contradictory_paths += 1;
				contradictions.push((i, err));
			}
			Err(err) => return Err(err),
		}
	}

	if report.paths > 0 && report.contradictory_paths == report.paths {
		return Err(contradictions.swap_remove(0).1);
	}
	for (i, err) in &contradictions {
		tracing::warn!(path = i, "evaluation path can never be proven: {err}");
	}
	Ok(report)
}

#[cfg(test)]
mod tests {
	use zkpc_core::{
		Gadget, Literal, Reference, Selector, SourcePosition, ValueType, Variable,
		gadget::{Equality, Inequality},
	};

	use super::*;
	use crate::rules::RuleRegistry;

	fn w(path: &str) -> Variable {
		let reference = Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap());
		Variable::witness(reference, SourcePosition::default())
	}

	fn int(n: i64) -> Variable {
		Variable::instance(Literal::integer(n), SourcePosition::default()).unwrap()
	}

	fn eq(a: Variable, b: Variable) -> Proposition {
		Proposition::Gadget(Gadget::from(Equality::new(a, b).unwrap()))
	}

	fn ne(a: Variable, b: Variable) -> Proposition {
		Proposition::Gadget(Gadget::from(Inequality::new(a, b).unwrap()))
	}

	fn analyze(proposition: &Proposition) -> Result<AnalysisReport> {
		let registry = RuleRegistry::standard();
		check(proposition, &InferenceEngine::new(&registry, 10_000))
	}

	#[test]
	fn one_satisfiable_path_is_enough() {
		let prop = Proposition::and([
			eq(w("a"), w("b")),
			Proposition::or([ne(w("b"), w("a")), eq(w("a"), int(3))]),
		]);
		let report = analyze(&prop).unwrap();
		assert_eq!(report.paths, 2);
		assert_eq!(report.contradictory_paths, 1);
	}

	#[test]
	fn every_path_contradictory() {
		let prop = Proposition::and([
			eq(w("a"), w("b")),
			Proposition::or([ne(w("b"), w("a")), ne(w("a"), w("b"))]),
		]);
		assert!(matches!(analyze(&prop), Err(CompileError::Contradiction { .. })));
	}

	#[test]
	fn instance_equality() {
		assert!(analyze(&eq(int(17), int(17))).is_ok());
		assert!(matches!(analyze(&eq(int(17), int(41))), Err(CompileError::Contradiction { .. })));
	}

	#[test]
	fn nothing_to_prove() {
		assert_eq!(analyze(&Proposition::True).unwrap().paths, 0);
		assert_eq!(analyze(&Proposition::and([])).unwrap().paths, 0);
	}

	#[test]
	fn true_branch_rescues_a_contradictory_disjunction() {
		let prop = Proposition::or([eq(int(17), int(41)), Proposition::True]);
		let report = analyze(&prop).unwrap();
		assert_eq!(report.paths, 2);
		assert_eq!(report.contradictory_paths, 1);
	}

	#[test]
	fn empty_disjunction_can_never_be_proven() {
		assert!(matches!(analyze(&Proposition::or([])), Err(CompileError::Contradiction { .. })));
		let prop = Proposition::and([eq(w("a"), w("b")), Proposition::or([])]);
		assert!(matches!(analyze(&prop), Err(CompileError::Contradiction { .. })));
	}
}
