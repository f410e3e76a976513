//! Implication rules: facts that follow from other facts.
//!
//! Derived gadgets are always built out of variables already present in the arguments, which keeps
//! the set of derivable facts finite.

use zkpc_core::{
	Gadget, GadgetKind,
	gadget::{BoundsCheck, Equality, Inequality, LessThan, SetMembership},
};

use super::ImplicationRule;

pub static RULES: &[ImplicationRule] = &[
	ImplicationRule {
		name: "equality_transitivity",
		pattern: &[GadgetKind::Equality, GadgetKind::Equality],
		apply: equality_transitivity,
	},
	ImplicationRule {
		name: "inequality_through_equality",
		pattern: &[GadgetKind::Equality, GadgetKind::Inequality],
		apply: inequality_through_equality,
	},
	ImplicationRule {
		name: "less_than_through_equality",
		pattern: &[GadgetKind::Equality, GadgetKind::LessThan],
		apply: less_than_through_equality,
	},
	ImplicationRule {
		name: "less_than_transitivity",
		pattern: &[GadgetKind::LessThan, GadgetKind::LessThan],
		apply: less_than_transitivity,
	},
	ImplicationRule {
		name: "bounds_through_equality",
		pattern: &[GadgetKind::Equality, GadgetKind::BoundsCheck],
		apply: bounds_through_equality,
	},
	ImplicationRule {
		name: "bounds_intersection",
		pattern: &[GadgetKind::BoundsCheck, GadgetKind::BoundsCheck],
		apply: bounds_intersection,
	},
	ImplicationRule {
		name: "membership_through_equality",
		pattern: &[GadgetKind::Equality, GadgetKind::SetMembership],
		apply: membership_through_equality,
	},
];

/// `a = b`, `b = c` ⇒ `a = c`
fn equality_transitivity(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [Equality first, Equality second]);
	let derived = first.operands().into_iter().find_map(|shared| {
		let a = first.other(shared)?;
		let c = second.other(shared)?;
		if a == c {
			return None;
		}
		Equality::new(a.clone(), c.clone()).ok()
	})?;
	Some(derived.into())
}

/// `a = b`, `a ≠ c` ⇒ `b ≠ c`
fn inequality_through_equality(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [Equality eq, Inequality ne]);
	ne.operands()
		.into_iter()
		.find_map(|replaced| {
			let substitute = eq.other(replaced)?;
			let other = ne.other(replaced)?;
			Inequality::new(substitute.clone(), other.clone()).ok()
		})
		.map(Gadget::from)
}

/// `a = b`, `a < c` ⇒ `b < c`, and likewise on the bigger side
fn less_than_through_equality(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [Equality eq, LessThan lt]);
	if let Some(smaller) = eq.other(lt.smaller()).filter(|v| v.is_witness()) {
		return LessThan::new(smaller.clone(), lt.bigger().clone()).ok().map(Gadget::from);
	}
	let bigger = eq.other(lt.bigger()).filter(|v| v.is_witness())?;
	LessThan::new(lt.smaller().clone(), bigger.clone()).ok().map(Gadget::from)
}

/// `a < b`, `b < c` ⇒ `a < c`
fn less_than_transitivity(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [LessThan first, LessThan second]);
	if first.bigger() != second.smaller() {
		return None;
	}
	LessThan::new(first.smaller().clone(), second.bigger().clone()).ok().map(Gadget::from)
}

/// `a = b`, `a ∈ [lo, hi]` ⇒ `b ∈ [lo, hi]`
fn bounds_through_equality(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [Equality eq, BoundsCheck bounds]);
	let value = eq.other(bounds.value()).filter(|v| v.is_witness())?;
	BoundsCheck::new(value.clone(), bounds.min().clone(), bounds.max().clone())
		.ok()
		.map(Gadget::from)
}

/// `a ∈ [lo, hi]`, `a ∈ [lo', hi']` ⇒ `a ∈ [max(lo, lo'), min(hi, hi')]`
///
/// Only derived when strictly tighter than both checks. Disjoint ranges derive nothing.
fn bounds_intersection(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [BoundsCheck first, BoundsCheck second]);
	if first.value() != second.value() {
		return None;
	}
	let both = first.intersection(second)?;
	(both != *first && both != *second).then(|| both.into())
}

/// `a = b`, `a ∈ S` ⇒ `b ∈ S`
fn membership_through_equality(args: &[&Gadget]) -> Option<Gadget> {
	unpack!(args => [Equality eq, SetMembership membership]);
	let member = eq.other(membership.member()).filter(|v| v.is_witness())?;
	SetMembership::new(member.clone(), membership.set().to_vec()).ok().map(Gadget::from)
}

#[cfg(test)]
mod tests {
	use rstest::rstest;
	use zkpc_core::{Literal, Reference, Selector, SourcePosition, ValueType, Variable};

	use super::*;

	fn w(path: &str) -> Variable {
		let reference = Reference::new(ValueType::Integer, "me", Selector::parse(path).unwrap());
		Variable::witness(reference, SourcePosition::default())
	}

	fn int(n: i64) -> Variable {
		Variable::instance(Literal::integer(n), SourcePosition::default()).unwrap()
	}

	fn eq(a: Variable, b: Variable) -> Gadget {
		Equality::new(a, b).unwrap().into()
	}

	fn ne(a: Variable, b: Variable) -> Gadget {
		Inequality::new(a, b).unwrap().into()
	}

	fn lt(a: Variable, b: Variable) -> Gadget {
		LessThan::new(a, b).unwrap().into()
	}

	fn bounds(value: Variable, min: Variable, max: Variable) -> Gadget {
		BoundsCheck::new(value, min, max).unwrap().into()
	}

	fn set(member: Variable, elements: &[i64]) -> Gadget {
		SetMembership::new(member, elements.iter().map(|&n| int(n)).collect()).unwrap().into()
	}

	fn rule(name: &str) -> &'static ImplicationRule {
		RULES.iter().find(|rule| rule.name == name).unwrap()
	}

	#[rstest]
	#[case::transitivity("equality_transitivity", [eq(w("a"), w("b")), eq(w("c"), w("b"))], Some(eq(w("a"), w("c"))))]
	#[case::transitivity_to_instance("equality_transitivity", [eq(w("a"), int(17)), eq(w("a"), w("b"))], Some(eq(int(17), w("b"))))]
	#[case::transitivity_unrelated("equality_transitivity", [eq(w("a"), w("b")), eq(w("c"), w("d"))], None)]
	#[case::inequality("inequality_through_equality", [eq(w("a"), w("b")), ne(w("a"), w("c"))], Some(ne(w("b"), w("c"))))]
	#[case::less_than_smaller("less_than_through_equality", [eq(w("a"), w("b")), lt(w("a"), w("c"))], Some(lt(w("b"), w("c"))))]
	#[case::less_than_bigger("less_than_through_equality", [eq(w("c"), w("b")), lt(w("a"), w("c"))], Some(lt(w("a"), w("b"))))]
	#[case::less_than_not_onto_instances("less_than_through_equality", [eq(w("a"), int(3)), lt(w("a"), w("c"))], None)]
	#[case::less_than_chain("less_than_transitivity", [lt(w("a"), w("b")), lt(w("b"), w("c"))], Some(lt(w("a"), w("c"))))]
	#[case::less_than_no_chain("less_than_transitivity", [lt(w("b"), w("c")), lt(w("a"), w("b"))], None)]
	#[case::bounds("bounds_through_equality", [eq(w("b"), w("a")), bounds(w("a"), int(1), int(9))], Some(bounds(w("b"), int(1), int(9))))]
	#[case::bounds_intersect("bounds_intersection", [bounds(w("a"), int(1), int(9)), bounds(w("a"), int(5), Variable::Null)], Some(bounds(w("a"), int(5), int(9))))]
	#[case::bounds_nested("bounds_intersection", [bounds(w("a"), int(1), int(9)), bounds(w("a"), int(2), int(3))], None)]
	#[case::bounds_disjoint("bounds_intersection", [bounds(w("a"), int(1), int(2)), bounds(w("a"), int(5), int(9))], None)]
	#[case::bounds_other_value("bounds_intersection", [bounds(w("a"), int(1), int(9)), bounds(w("b"), int(5), int(7))], None)]
	#[case::membership("membership_through_equality", [eq(w("a"), w("b")), set(w("a"), &[1, 2])], Some(set(w("b"), &[2, 1])))]
	fn implication(
		#[case] name: &str,
		#[case] args: [Gadget; 2],
		#[case] expected: Option<Gadget>,
	) {
		let args: Vec<&Gadget> = args.iter().collect();
		assert_eq!((rule(name).apply)(&args), expected);
	}

	#[test]
	#[should_panic(expected = "rule invoked with")]
	fn mismatched_arguments_panic() {
		let a = lt(w("a"), w("b"));
		let b = eq(w("a"), w("b"));
		(rule("equality_transitivity").apply)(&[&a, &b]);
	}
}
