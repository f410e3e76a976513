//! Substitution rules: cheaper equivalents of a gadget given the facts around it.

use zkpc_core::{Gadget, GadgetKind, Proposition, gadget::Equality};

use super::SubstitutionRule;

pub static RULES: &[SubstitutionRule] = &[
	SubstitutionRule {
		name: "equality_tautology",
		target: GadgetKind::Equality,
		context: &[],
		apply: equality_tautology,
	},
	SubstitutionRule {
		name: "distinct_instances",
		target: GadgetKind::Inequality,
		context: &[],
		apply: distinct_instances,
	},
	SubstitutionRule {
		name: "entailed_equality",
		target: GadgetKind::Equality,
		context: &[GadgetKind::Equality],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_inequality",
		target: GadgetKind::Inequality,
		context: &[GadgetKind::Inequality],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_less_than",
		target: GadgetKind::LessThan,
		context: &[GadgetKind::LessThan],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_bounds_check",
		target: GadgetKind::BoundsCheck,
		context: &[GadgetKind::BoundsCheck],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_mimc_hash",
		target: GadgetKind::MiMCHash,
		context: &[GadgetKind::MiMCHash],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_merkle_tree",
		target: GadgetKind::MerkleTree,
		context: &[GadgetKind::MerkleTree],
		apply: entailed,
	},
	SubstitutionRule {
		name: "entailed_set_membership",
		target: GadgetKind::SetMembership,
		context: &[GadgetKind::SetMembership],
		apply: entailed,
	},
	SubstitutionRule {
		name: "bounds_subsumed",
		target: GadgetKind::BoundsCheck,
		context: &[GadgetKind::BoundsCheck],
		apply: bounds_subsumed,
	},
	SubstitutionRule {
		name: "bounds_tightened",
		target: GadgetKind::BoundsCheck,
		context: &[GadgetKind::BoundsCheck],
		apply: bounds_tightened,
	},
	SubstitutionRule {
		name: "bounds_pinned_by_equality",
		target: GadgetKind::BoundsCheck,
		context: &[GadgetKind::Equality],
		apply: bounds_pinned_by_equality,
	},
	SubstitutionRule {
		name: "degenerate_bounds",
		target: GadgetKind::BoundsCheck,
		context: &[],
		apply: degenerate_bounds,
	},
	SubstitutionRule {
		name: "trivial_set_membership",
		target: GadgetKind::SetMembership,
		context: &[],
		apply: trivial_set_membership,
	},
	SubstitutionRule {
		name: "singleton_set_membership",
		target: GadgetKind::SetMembership,
		context: &[],
		apply: singleton_set_membership,
	},
	SubstitutionRule {
		name: "membership_pinned_by_equality",
		target: GadgetKind::SetMembership,
		context: &[GadgetKind::Equality],
		apply: membership_pinned_by_equality,
	},
	SubstitutionRule {
		name: "inequality_implied_by_less_than",
		target: GadgetKind::Inequality,
		context: &[GadgetKind::LessThan],
		apply: inequality_implied_by_less_than,
	},
];

/// `x = x` ⇒ true
fn equality_tautology(target: &Gadget, _: &[&Gadget]) -> Option<Proposition> {
	let Gadget::Equality(eq) = target else { unreachable!() };
	eq.is_trivial().then_some(Proposition::True)
}

/// `17 ≠ 41` ⇒ true
fn distinct_instances(target: &Gadget, _: &[&Gadget]) -> Option<Proposition> {
	let Gadget::Inequality(ne) = target else { unreachable!() };
	match (ne.left().as_literal(), ne.right().as_literal()) {
		(Some(a), Some(b)) if a != b => Some(Proposition::True),
		_ => None,
	}
}

/// A fact that already holds does not need proving again.
fn entailed(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let [fact] = context else { unreachable!() };
	(*fact == target).then_some(Proposition::True)
}

/// `a ∈ [lo, hi]` where a tighter range already holds ⇒ true
fn bounds_subsumed(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let Gadget::BoundsCheck(bounds) = target else { unreachable!() };
	unpack!(context => [BoundsCheck fact]);
	(fact.value() == bounds.value() && fact.within(bounds)).then_some(Proposition::True)
}

/// `a ∈ [lo, hi]` where `a ∈ [lo', hi']` holds ⇒ `a ∈ [lo, hi] ∩ [lo', hi']`
///
/// Makes the other range redundant, so one of the two checks can go.
fn bounds_tightened(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let Gadget::BoundsCheck(bounds) = target else { unreachable!() };
	unpack!(context => [BoundsCheck fact]);
	if fact.value() != bounds.value() {
		return None;
	}
	let both = bounds.intersection(fact)?;
	(both != *bounds).then(|| Gadget::from(both).into())
}

/// `a ∈ [lo, hi]` where `a = n` for some `lo ≤ n ≤ hi` ⇒ true
fn bounds_pinned_by_equality(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let Gadget::BoundsCheck(bounds) = target else { unreachable!() };
	unpack!(context => [Equality eq]);
	let pinned = eq.other(bounds.value())?.as_integer()?;
	bounds.contains(pinned).then_some(Proposition::True)
}

/// `a ∈ [n, n]` ⇒ `a = n`
fn degenerate_bounds(target: &Gadget, _: &[&Gadget]) -> Option<Proposition> {
	let Gadget::BoundsCheck(bounds) = target else { unreachable!() };
	let n = bounds.pinned()?;
	let eq = Equality::new(bounds.value().clone(), n.clone()).ok()?;
	Some(Gadget::from(eq).into())
}

/// `x ∈ {…, x, …}` ⇒ true
fn trivial_set_membership(target: &Gadget, _: &[&Gadget]) -> Option<Proposition> {
	let Gadget::SetMembership(membership) = target else { unreachable!() };
	membership.contains(membership.member()).then_some(Proposition::True)
}

/// `a ∈ {b}` ⇒ `a = b`
fn singleton_set_membership(target: &Gadget, _: &[&Gadget]) -> Option<Proposition> {
	let Gadget::SetMembership(membership) = target else { unreachable!() };
	let [element] = membership.set() else {
		return None;
	};
	let eq = Equality::new(membership.member().clone(), element.clone()).ok()?;
	Some(Gadget::from(eq).into())
}

/// `a ∈ S` where `a = b` for some `b ∈ S` ⇒ true
fn membership_pinned_by_equality(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let Gadget::SetMembership(membership) = target else { unreachable!() };
	unpack!(context => [Equality eq]);
	let pinned = eq.other(membership.member())?;
	membership.contains(pinned).then_some(Proposition::True)
}

/// `a ≠ b` where `a < b` or `b < a` holds ⇒ true
fn inequality_implied_by_less_than(target: &Gadget, context: &[&Gadget]) -> Option<Proposition> {
	let Gadget::Inequality(ne) = target else { unreachable!() };
	unpack!(context => [LessThan lt]);
	lt.relates(ne.left(), ne.right()).then_some(Proposition::True)
}
