/// Default cap on the number of facts the inference engine may know about one proposition.
pub const DEFAULT_MAX_INFERENCES: usize = 10_000;

/// Compilation options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
	/// Rewrite the proposition into a cheaper equivalent (default: true)
	pub optimize: bool,
	/// Reject propositions whose every evaluation path is contradictory (default: true)
	pub check_contradictions: bool,
	/// Fail instead of deriving more facts than this for a single set of gadgets
	pub max_inferences: usize,
	/// Names of rules to leave out of the registry
	pub disabled_rules: Vec<String>,
}

impl Default for CompilerOptions {
	fn default() -> Self {
		Self {
			optimize: true,
			check_contradictions: true,
			max_inferences: DEFAULT_MAX_INFERENCES,
			disabled_rules: Vec::new(),
		}
	}
}

impl CompilerOptions {
	/// Options that leave the proposition exactly as given.
	pub fn unchecked() -> Self {
		Self {
			optimize: false,
			check_contradictions: false,
			..Self::default()
		}
	}
}
