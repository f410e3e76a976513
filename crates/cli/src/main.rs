use std::{
	fs,
	path::{Path, PathBuf},
	process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use zkpc_claim::{Claim, ClaimError};
use zkpc_compiler::{
	CompilationStats, Compiler, CompilerOptions, RuleRegistry, codegen, options::DEFAULT_MAX_INFERENCES,
};
use zkpc_core::{CompileError, SourcePosition};

#[derive(Parser)]
#[command(name = "zkpc")]
#[command(about = "Compiles zero-knowledge claims into gadget instructions", long_about = None)]
struct Cli {
	/// Log what the compiler derives and rewrites
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Commands,
}

#[derive(Subcommand)]
enum Commands {
	/// Compile a claim and write gadgets.txt, instance.txt and witness.txt
	Compile(CompileArgs),
	/// List the rules known to the compiler
	Rules,
}

#[derive(Args)]
struct CompileArgs {
	/// The JSON claim document
	claim: PathBuf,

	/// Directory the subjects' data files are resolved against
	#[arg(long, default_value = ".")]
	data_dir: PathBuf,

	/// Directory the output files are written to
	#[arg(long, default_value = "out")]
	out_dir: PathBuf,

	#[command(flatten)]
	options: OptionsCli,
}

#[derive(Args)]
struct OptionsCli {
	// NOTE: mirrors `CompilerOptions`, keep the two in sync.
	/// Emit the claim as bound, without rewriting it
	#[arg(long)]
	no_optimize: bool,

	/// Skip the search for contradictions
	#[arg(long)]
	no_contradictions: bool,

	/// Maximum number of facts derived for one set of gadgets
	#[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_INFERENCES)]
	max_inferences: usize,

	/// Leave a rule out of inference and optimisation (repeatable)
	#[arg(long = "disable-rule", value_name = "NAME")]
	disabled_rules: Vec<String>,
}

impl OptionsCli {
	fn into_options(self) -> CompilerOptions {
		let OptionsCli {
			no_optimize,
			no_contradictions,
			max_inferences,
			disabled_rules,
		} = self;
		CompilerOptions {
			optimize: !no_optimize,
			check_contradictions: !no_contradictions,
			max_inferences,
			disabled_rules,
		}
	}
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Commands::Compile(args) => {
			let claim_path = args.claim.clone();
			match compile(args) {
				Ok(stats) => {
					println!("{stats}");
					ExitCode::SUCCESS
				}
				Err(error) => {
					for line in diagnostics(&claim_path, &error) {
						eprintln!("{line}");
					}
					ExitCode::FAILURE
				}
			}
		}
		Commands::Rules => {
			for (name, kind) in RuleRegistry::standard().names() {
				println!("{:<14} {name}", format!("{kind:?}").to_lowercase());
			}
			ExitCode::SUCCESS
		}
	}
}

/// Logs go to stderr. `RUST_LOG` takes precedence over `--verbose`.
fn init_tracing(verbose: bool) {
	let default = if verbose { "debug" } else { "warn" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn compile(args: CompileArgs) -> Result<CompilationStats> {
	let claim = Claim::load(&args.claim, &args.data_dir)?;
	let proposition = claim.bind()?;

	let compiler = Compiler::with_options(args.options.into_options());
	let compiled = compiler.compile(proposition)?;
	let output = codegen::generate(&compiled.proposition, |reference| claim.witness_value(reference))?;

	fs::create_dir_all(&args.out_dir)
		.with_context(|| format!("cannot create `{}`", args.out_dir.display()))?;
	for (name, contents) in [
		("gadgets.txt", &output.gadgets),
		("instance.txt", &output.instances),
		("witness.txt", &output.witnesses),
	] {
		let path = args.out_dir.join(name);
		fs::write(&path, contents).with_context(|| format!("cannot write `{}`", path.display()))?;
	}
	tracing::info!(out_dir = %args.out_dir.display(), "wrote compiled statement");

	Ok(compiled.stats)
}

/// One `file:line:column: message` line per position the error points at.
fn diagnostics(claim: &Path, error: &anyhow::Error) -> Vec<String> {
	let positions = if let Some(error) = error.downcast_ref::<ClaimError>() {
		error.positions()
	} else if let Some(error) = error.downcast_ref::<CompileError>() {
		error.positions()
	} else {
		Vec::new()
	};

	let file = claim.display();
	let positions: Vec<SourcePosition> = positions.into_iter().filter(SourcePosition::is_known).collect();
	if positions.is_empty() {
		return vec![format!("{file}: {error:#}")];
	}
	positions
		.iter()
		.map(|position| format!("{file}:{position}: {error:#}"))
		.collect()
}
