//! The closed set of rules the compiler reasons with.
//!
//! A rule is a plain function together with the pattern of gadget kinds it is applied to. Rules
//! live in static tables, one per kind of rule, and are collected into a [`RuleRegistry`].
//!
//! A rule is only ever invoked with arguments matching its declared pattern. Receiving anything
//! else is a defect of the dispatcher and panics.

use std::{collections::HashSet, fmt};

use zkpc_core::{Gadget, GadgetKind, Proposition, Result};

/// Destructures rule arguments according to the rule's pattern.
///
/// ```ignore
/// unpack!(args => [Equality eq, BoundsCheck bounds]);
/// ```
macro_rules! unpack {
	($args:ident => [$($variant:ident $name:ident),+ $(,)?]) => {
		let [$($name),+] = $args else {
			unreachable!("rule invoked with {} arguments", $args.len())
		};
		$(
			let zkpc_core::Gadget::$variant($name) = $name else {
				unreachable!("rule invoked with a {} gadget", $name.kind())
			};
		)+
	};
}

pub mod contradiction;
pub mod implication;
pub mod substitution;

/// Derives a new gadget from the conclusions matched against `pattern`.
pub struct ImplicationRule {
	pub name: &'static str,
	pub pattern: &'static [GadgetKind],
	pub apply: fn(&[&Gadget]) -> Option<Gadget>,
}

/// Fails with a [`zkpc_core::CompileError::Contradiction`] when the matched gadgets cannot hold
/// together.
pub struct ContradictionRule {
	pub name: &'static str,
	pub pattern: &'static [GadgetKind],
	pub check: fn(&[&Gadget]) -> Result<()>,
}

/// Replaces a gadget of kind `target` by an equivalent proposition that is not more expensive.
///
/// The gadgets matched against `context` are facts that hold wherever the target is required.
/// They only serve as evidence and are never replaced themselves.
pub struct SubstitutionRule {
	pub name: &'static str,
	pub target: GadgetKind,
	pub context: &'static [GadgetKind],
	pub apply: fn(&Gadget, &[&Gadget]) -> Option<Proposition>,
}

impl fmt::Debug for ImplicationRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:?}", self.name, self.pattern)
	}
}

impl fmt::Debug for ContradictionRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:?}", self.name, self.pattern)
	}
}

impl fmt::Debug for SubstitutionRule {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} {:?} {:?}", self.name, self.target, self.context)
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RuleKind {
	Implication,
	Contradiction,
	Substitution,
}

/// An immutable set of rules.
///
/// Cheap to clone and safe to share between concurrent compilations.
#[derive(Clone, Debug)]
pub struct RuleRegistry {
	implications: Vec<&'static ImplicationRule>,
	contradictions: Vec<&'static ContradictionRule>,
	substitutions: Vec<&'static SubstitutionRule>,
}

impl RuleRegistry {
	/// Every rule the compiler knows about.
	pub fn standard() -> Self {
		Self::from_tables(implication::RULES, contradiction::RULES, substitution::RULES)
	}

	/// Builds a registry out of rule tables.
	///
	/// # Panics
	///
	/// If two rules share a name, or an implication or contradiction rule has an empty pattern.
	pub fn from_tables(
		implications: &'static [ImplicationRule],
		contradictions: &'static [ContradictionRule],
		substitutions: &'static [SubstitutionRule],
	) -> Self {
		let registry = Self {
			implications: implications.iter().collect(),
			contradictions: contradictions.iter().collect(),
			substitutions: substitutions.iter().collect(),
		};
		registry.validate();
		registry
	}

	fn validate(&self) {
		for rule in &self.implications {
			assert!(!rule.pattern.is_empty(), "implication `{}` has an empty pattern", rule.name);
		}
		for rule in &self.contradictions {
			assert!(!rule.pattern.is_empty(), "contradiction `{}` has an empty pattern", rule.name);
		}
		let mut seen = HashSet::new();
		for (name, _) in self.names() {
			assert!(seen.insert(name), "rule `{name}` is registered twice");
		}
	}

	/// A registry without the rules named in `disabled`.
	///
	/// Names that match no rule are logged and ignored.
	pub fn without<S: AsRef<str>>(&self, disabled: &[S]) -> Self {
		for name in disabled {
			let name = name.as_ref();
			if !self.contains(name) {
				tracing::warn!(rule = name, "cannot disable unknown rule");
			}
		}
		let keep = |name: &str| !disabled.iter().any(|d| d.as_ref() == name);
		Self {
			implications: self.implications.iter().copied().filter(|r| keep(r.name)).collect(),
			contradictions: self.contradictions.iter().copied().filter(|r| keep(r.name)).collect(),
			substitutions: self.substitutions.iter().copied().filter(|r| keep(r.name)).collect(),
		}
	}

	pub fn contains(&self, name: &str) -> bool {
		self.names().any(|(n, _)| n == name)
	}

	/// Names of all registered rules with their kinds.
	pub fn names(&self) -> impl Iterator<Item = (&'static str, RuleKind)> + '_ {
		let implications = self.implications.iter().map(|r| (r.name, RuleKind::Implication));
		let contradictions = self.contradictions.iter().map(|r| (r.name, RuleKind::Contradiction));
		let substitutions = self.substitutions.iter().map(|r| (r.name, RuleKind::Substitution));
		implications.chain(contradictions).chain(substitutions)
	}

	pub fn implications(&self) -> &[&'static ImplicationRule] {
		&self.implications
	}

	pub fn contradictions(&self) -> &[&'static ContradictionRule] {
		&self.contradictions
	}

	pub fn substitutions_for(
		&self,
		kind: GadgetKind,
	) -> impl Iterator<Item = &'static SubstitutionRule> + '_ {
		self.substitutions.iter().copied().filter(move |rule| rule.target == kind)
	}

	pub fn len(&self) -> usize {
		self.implications.len() + self.contradictions.len() + self.substitutions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

impl Default for RuleRegistry {
	fn default() -> Self {
		Self::standard()
	}
}
