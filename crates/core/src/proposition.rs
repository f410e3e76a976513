//! Logical formulas over gadgets.

use std::fmt;

use crate::gadget::Gadget;

/// A statement as a formula over gadgets.
///
/// `And` and `Or` keep their parts in insertion order, which is the order code is generated in.
/// [`Proposition::True`] members are kept in storage but skipped by [`Proposition::parts`].
#[derive(Clone, Debug)]
pub enum Proposition {
	Gadget(Gadget),
	And(Vec<Proposition>),
	Or(Vec<Proposition>),
	True,
}

impl Proposition {
	pub fn and(parts: impl IntoIterator<Item = Proposition>) -> Self {
		Proposition::And(parts.into_iter().collect())
	}

	pub fn or(parts: impl IntoIterator<Item = Proposition>) -> Self {
		Proposition::Or(parts.into_iter().collect())
	}

	pub fn is_true(&self) -> bool {
		matches!(self, Proposition::True)
	}

	/// The effective parts of a conjunction or disjunction. Empty for leaves.
	pub fn parts(&self) -> impl Iterator<Item = &Proposition> {
		let parts: &[Proposition] = match self {
			Proposition::And(parts) | Proposition::Or(parts) => parts,
			Proposition::Gadget(_) | Proposition::True => &[],
		};
		parts.iter().filter(|part| !part.is_true())
	}

	/// Every gadget in the tree, in tree order.
	pub fn gadgets(&self) -> Vec<&Gadget> {
		let mut gadgets = Vec::new();
		self.collect_gadgets(&mut gadgets);
		gadgets
	}

	fn collect_gadgets<'a>(&'a self, out: &mut Vec<&'a Gadget>) {
		match self {
			Proposition::Gadget(gadget) => out.push(gadget),
			_ => self.parts().for_each(|part| part.collect_gadgets(out)),
		}
	}

	/// Whether the proposition holds without proving any gadget: `true`, a conjunction of
	/// tautologies (the empty one included), or a disjunction with a tautological branch.
	pub fn is_tautology(&self) -> bool {
		match self {
			Proposition::True => true,
			Proposition::Gadget(_) => false,
			Proposition::And(parts) => parts.iter().all(Proposition::is_tautology),
			Proposition::Or(parts) => parts.iter().any(Proposition::is_tautology),
		}
	}

	/// Every minimal set of gadgets whose joint truth proves this proposition.
	///
	/// A disjunction with a tautological branch also has the empty path. A conjunction combines
	/// one path of each part that has any. Tautological parts without paths are neutral, any other
	/// part without paths (an empty disjunction) leaves the conjunction with no paths, as does a
	/// conjunction of only neutral parts.
	pub fn evaluation_paths(&self) -> Vec<Vec<&Gadget>> {
		match self {
			Proposition::Gadget(gadget) => vec![vec![gadget]],
			Proposition::True => Vec::new(),
			Proposition::Or(_) => {
				let mut paths: Vec<_> =
					self.parts().flat_map(Proposition::evaluation_paths).collect();
				if self.is_tautology() && !paths.iter().any(Vec::is_empty) {
					paths.push(Vec::new());
				}
				paths
			}
			Proposition::And(_) => {
				let mut combined: Option<Vec<Vec<&Gadget>>> = None;
				for part in self.parts() {
					let paths = part.evaluation_paths();
					if paths.is_empty() {
						if part.is_tautology() {
							continue;
						}
						return Vec::new();
					}
					combined = Some(match combined {
						None => paths,
						Some(prefixes) => prefixes
							.iter()
							.flat_map(|prefix| paths.iter().map(move |path| union(prefix, path)))
							.collect(),
					});
				}
				combined.unwrap_or_default()
			}
		}
	}

	/// Rough number of constraints the proposition compiles to.
	///
	/// Disjunctions multiply the estimates of their branches.
	pub fn cost_estimate(&self) -> u64 {
		match self {
			Proposition::Gadget(gadget) => gadget.cost(),
			Proposition::True => 0,
			Proposition::And(_) => {
				self.parts().map(Proposition::cost_estimate).fold(0, u64::saturating_add)
			}
			Proposition::Or(_) => {
				let mut parts = self.parts().peekable();
				if parts.peek().is_none() {
					return 0;
				}
				parts.map(Proposition::cost_estimate).fold(1, u64::saturating_mul)
			}
		}
	}
}

fn union<'a>(a: &[&'a Gadget], b: &[&'a Gadget]) -> Vec<&'a Gadget> {
	let mut out = a.to_vec();
	for gadget in b {
		if !out.contains(gadget) {
			out.push(gadget);
		}
	}
	out
}

/// Whether both iterators yield the same items with the same multiplicities.
fn same_multiset<'a>(
	a: impl Iterator<Item = &'a Proposition>,
	b: impl Iterator<Item = &'a Proposition>,
) -> bool {
	let a: Vec<_> = a.collect();
	let mut unmatched: Vec<_> = b.collect();
	if a.len() != unmatched.len() {
		return false;
	}
	a.into_iter().all(|item| match unmatched.iter().position(|other| *other == item) {
		Some(i) => {
			unmatched.swap_remove(i);
			true
		}
		None => false,
	})
}

impl PartialEq for Proposition {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Proposition::Gadget(a), Proposition::Gadget(b)) => a == b,
			(Proposition::True, Proposition::True) => true,
			(Proposition::And(_), Proposition::And(_)) | (Proposition::Or(_), Proposition::Or(_)) => {
				same_multiset(self.parts(), other.parts())
			}
			_ => false,
		}
	}
}

impl Eq for Proposition {}

impl From<Gadget> for Proposition {
	fn from(gadget: Gadget) -> Self {
		Proposition::Gadget(gadget)
	}
}

impl fmt::Display for Proposition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let (separator, empty) = match self {
			Proposition::Gadget(gadget) => return write!(f, "{gadget}"),
			Proposition::True => return f.write_str("true"),
			Proposition::And(_) => (" && ", "true"),
			Proposition::Or(_) => (" || ", "false"),
		};
		let mut parts = self.parts().peekable();
		if parts.peek().is_none() {
			return f.write_str(empty);
		}
		f.write_str("(")?;
		for (i, part) in parts.enumerate() {
			if i > 0 {
				f.write_str(separator)?;
			}
			write!(f, "{part}")?;
		}
		f.write_str(")")
	}
}
