//! Contradiction rules: combinations of facts that can never hold together.

use zkpc_core::{CompileError, Gadget, GadgetKind, Result};

use super::ContradictionRule;

pub static RULES: &[ContradictionRule] = &[
	ContradictionRule {
		name: "instance_equality_mismatch",
		pattern: &[GadgetKind::Equality],
		check: instance_equality_mismatch,
	},
	ContradictionRule {
		name: "self_inequality",
		pattern: &[GadgetKind::Inequality],
		check: self_inequality,
	},
	ContradictionRule {
		name: "equal_and_unequal",
		pattern: &[GadgetKind::Equality, GadgetKind::Inequality],
		check: equal_and_unequal,
	},
	ContradictionRule {
		name: "less_than_self",
		pattern: &[GadgetKind::LessThan],
		check: less_than_self,
	},
	ContradictionRule {
		name: "disjoint_bounds",
		pattern: &[GadgetKind::BoundsCheck, GadgetKind::BoundsCheck],
		check: disjoint_bounds,
	},
	ContradictionRule {
		name: "pinned_value_out_of_bounds",
		pattern: &[GadgetKind::Equality, GadgetKind::BoundsCheck],
		check: pinned_value_out_of_bounds,
	},
	ContradictionRule {
		name: "pinned_value_outside_set",
		pattern: &[GadgetKind::Equality, GadgetKind::SetMembership],
		check: pinned_value_outside_set,
	},
	ContradictionRule {
		name: "instance_outside_set",
		pattern: &[GadgetKind::SetMembership],
		check: instance_outside_set,
	},
	ContradictionRule {
		name: "contradictory_less_than",
		pattern: &[GadgetKind::LessThan, GadgetKind::LessThan],
		check: contradictory_less_than,
	},
];

fn contradiction(message: String, gadgets: &[&Gadget]) -> CompileError {
	let mut positions = Vec::new();
	for position in gadgets.iter().flat_map(|gadget| gadget.positions()) {
		if position.is_known() && !positions.contains(&position) {
			positions.push(position);
		}
	}
	CompileError::Contradiction { message, positions }
}

fn instance_equality_mismatch(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [Equality eq]);
	match (eq.left().as_literal(), eq.right().as_literal()) {
		(Some(a), Some(b)) if a != b => {
			Err(contradiction(format!("{a} can never be equal to {b}"), args))
		}
		_ => Ok(()),
	}
}

fn self_inequality(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [Inequality ne]);
	if ne.left() == ne.right() {
		return Err(contradiction(format!("{} is required to differ from itself", ne.left()), args));
	}
	Ok(())
}

fn equal_and_unequal(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [Equality eq, Inequality ne]);
	if eq.relates(ne.left(), ne.right()) {
		return Err(contradiction(
			format!("{} and {} are required to be both equal and different", ne.left(), ne.right()),
			args,
		));
	}
	Ok(())
}

fn less_than_self(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [LessThan lt]);
	if lt.smaller() == lt.bigger() {
		return Err(contradiction(format!("{} can never be less than itself", lt.smaller()), args));
	}
	Ok(())
}

fn disjoint_bounds(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [BoundsCheck first, BoundsCheck second]);
	if first.value() == second.value() && first.is_disjoint(second) {
		return Err(contradiction(
			format!("{} is required to lie in two ranges that do not overlap", first.value()),
			args,
		));
	}
	Ok(())
}

fn pinned_value_out_of_bounds(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [Equality eq, BoundsCheck bounds]);
	let Some(pinned) = eq.other(bounds.value()).and_then(|v| v.as_integer()) else {
		return Ok(());
	};
	if !bounds.contains(pinned) {
		return Err(contradiction(
			format!("{} equals {pinned}, which is out of bounds", bounds.value()),
			args,
		));
	}
	Ok(())
}

fn pinned_value_outside_set(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [Equality eq, SetMembership membership]);
	let Some(pinned) = eq.other(membership.member()).filter(|v| v.is_instance()) else {
		return Ok(());
	};
	if membership.is_public() && !membership.contains(pinned) {
		return Err(contradiction(
			format!("{} equals {pinned}, which is not in the set", membership.member()),
			args,
		));
	}
	Ok(())
}

fn instance_outside_set(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [SetMembership membership]);
	let member = membership.member();
	if member.is_instance() && membership.is_public() && !membership.contains(member) {
		return Err(contradiction(format!("{member} is not in the set"), args));
	}
	Ok(())
}

fn contradictory_less_than(args: &[&Gadget]) -> Result<()> {
	unpack!(args => [LessThan first, LessThan second]);
	if first.smaller() == second.bigger() && first.bigger() == second.smaller() {
		return Err(contradiction(
			format!("{} and {} are each required to be less than the other", first.smaller(), first.bigger()),
			args,
		));
	}
	Ok(())
}
