//! The compilation pipeline: contradiction analysis, then optimisation.

use std::fmt;

use zkpc_core::{Proposition, Result};

use crate::{
	analysis::{self, AnalysisReport},
	inference::InferenceEngine,
	optimizer::{Optimizer, OptimizerStats},
	options::CompilerOptions,
	rules::RuleRegistry,
};

/// Compiles bound propositions. Holds no per-statement state and may be reused.
#[derive(Debug, Clone)]
pub struct Compiler {
	registry: RuleRegistry,
	options: CompilerOptions,
}

impl Compiler {
	pub fn new() -> Self {
		Self::with_options(CompilerOptions::default())
	}

	pub fn with_options(options: CompilerOptions) -> Self {
		let registry = RuleRegistry::standard().without(&options.disabled_rules);
		Self { registry, options }
	}

	pub fn registry(&self) -> &RuleRegistry {
		&self.registry
	}

	pub fn options(&self) -> &CompilerOptions {
		&self.options
	}

	pub fn compile(&self, proposition: Proposition) -> Result<CompiledStatement> {
		let _span = tracing::info_span!("Compile").entered();

		let analysis = if self.options.check_contradictions {
			let engine = InferenceEngine::new(&self.registry, self.options.max_inferences);
			Some(analysis::check(&proposition, &engine)?)
		} else {
			None
		};

		let (proposition, optimizer) = if self.options.optimize {
			let optimizer = Optimizer::new(&self.registry, self.options.max_inferences);
			let (proposition, stats) = optimizer.optimize(proposition)?;
			(proposition, Some(stats))
		} else {
			(proposition, None)
		};

		Ok(CompiledStatement {
			proposition,
			stats: CompilationStats {
				analysis,
				optimizer,
			},
		})
	}
}

impl Default for Compiler {
	fn default() -> Self {
		Self::new()
	}
}

#[derive(Debug, Clone)]
pub struct CompiledStatement {
	pub proposition: Proposition,
	pub stats: CompilationStats,
}

/// What each enabled stage reported. A stage that was switched off reports nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompilationStats {
	pub analysis: Option<AnalysisReport>,
	pub optimizer: Option<OptimizerStats>,
}

impl fmt::Display for CompilationStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.analysis {
			Some(report) => writeln!(
				f,
				"analysis: {} evaluation paths, {} contradictory, {} facts",
				report.paths, report.contradictory_paths, report.inferences
			)?,
			None => writeln!(f, "analysis: skipped")?,
		}
		match &self.optimizer {
			Some(stats) => write!(f, "optimizer: {stats}"),
			None => write!(f, "optimizer: skipped"),
		}
	}
}
