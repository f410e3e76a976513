use proptest::prelude::*;
use zkpc_core::{
	Gadget, Literal, Proposition, Reference, Selector, SourcePosition, ValueType, Variable,
	gadget::{BoundsCheck, Equality, Inequality},
};

fn witness(i: usize) -> Variable {
	let selector = Selector::new([format!("w{i}")]).unwrap();
	Variable::witness(Reference::new(ValueType::Integer, "me", selector), SourcePosition::default())
}

fn number(n: u64) -> Variable {
	Variable::instance(Literal::integer(n), SourcePosition::default()).unwrap()
}

fn gadget(i: usize) -> Gadget {
	match i % 3 {
		0 => Equality::new(witness(i), witness(i + 1)).unwrap().into(),
		1 => Inequality::new(witness(i), number(i as u64)).unwrap().into(),
		_ => BoundsCheck::new(witness(i), number(1), number(10 + i as u64)).unwrap().into(),
	}
}

fn proposition() -> impl Strategy<Value = Proposition> {
	let leaf = prop_oneof![
		1 => Just(Proposition::True),
		4 => (0..8usize).prop_map(|i| Proposition::Gadget(gadget(i))),
	];
	leaf.prop_recursive(4, 24, 4, |inner| {
		prop_oneof![
			prop::collection::vec(inner.clone(), 0..4).prop_map(Proposition::And),
			prop::collection::vec(inner, 0..4).prop_map(Proposition::Or),
		]
	})
}

fn reversed(proposition: &Proposition) -> Proposition {
	match proposition {
		Proposition::And(parts) => Proposition::And(parts.iter().rev().map(reversed).collect()),
		Proposition::Or(parts) => Proposition::Or(parts.iter().rev().map(reversed).collect()),
		other => other.clone(),
	}
}

proptest! {
	#[test]
	fn paths_are_duplicate_free_subsets_of_the_tree(p in proposition()) {
		let gadgets = p.gadgets();
		for path in p.evaluation_paths() {
			for (i, gadget) in path.iter().enumerate() {
				prop_assert!(gadgets.contains(gadget));
				prop_assert!(!path[..i].contains(gadget));
			}
		}
	}

	#[test]
	fn disjunction_paths_are_the_union_of_branch_paths(parts in prop::collection::vec(proposition(), 0..4)) {
		let branch_paths: Vec<_> = parts.iter().flat_map(Proposition::evaluation_paths).collect();
		// A tautological branch adds the empty path unless a branch already has it.
		let empty_path = parts.iter().any(Proposition::is_tautology)
			&& !branch_paths.iter().any(Vec::is_empty);
		let expected = branch_paths.len() + usize::from(empty_path);
		let disjunction = Proposition::Or(parts.clone());
		prop_assert_eq!(disjunction.evaluation_paths().len(), expected);
	}

	#[test]
	fn tautologies_have_the_empty_path_or_no_paths(p in proposition()) {
		if p.is_tautology() {
			let paths = p.evaluation_paths();
			prop_assert!(paths.is_empty() || paths.iter().any(Vec::is_empty));
		}
	}

	#[test]
	fn conjunction_cost_is_the_saturating_sum_of_its_parts(parts in prop::collection::vec(proposition(), 0..4)) {
		let expected = parts.iter().map(Proposition::cost_estimate).fold(0, u64::saturating_add);
		prop_assert_eq!(Proposition::And(parts).cost_estimate(), expected);
	}

	#[test]
	fn equality_ignores_part_order(p in proposition()) {
		prop_assert_eq!(reversed(&p), p);
	}
}
