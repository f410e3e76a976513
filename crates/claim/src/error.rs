use std::path::PathBuf;

use zkpc_core::{CompileError, SourcePosition};

#[derive(Debug, thiserror::Error)]
pub enum ClaimError {
	#[error("cannot read `{path}`")]
	Io {
		path: PathBuf,
		#[source]
		error: std::io::Error,
	},
	#[error("`{source_id}` is not valid JSON: {error}")]
	Json {
		source_id: String,
		#[source]
		error: serde_json::Error,
	},
	#[error("unknown subject `{subject}`")]
	UnknownSubject {
		subject: String,
		position: Option<SourcePosition>,
	},
	#[error("`{subject}.{selector}` does not resolve to a value")]
	Unresolved {
		subject: String,
		selector: String,
		position: Option<SourcePosition>,
	},
	#[error("unsupported literal `{literal}`")]
	UnsupportedLiteral {
		literal: String,
		position: Option<SourcePosition>,
	},
	#[error(transparent)]
	Compile(#[from] CompileError),
}

impl ClaimError {
	pub fn positions(&self) -> Vec<SourcePosition> {
		match self {
			ClaimError::UnknownSubject { position, .. }
			| ClaimError::Unresolved { position, .. }
			| ClaimError::UnsupportedLiteral { position, .. } => position.iter().copied().collect(),
			ClaimError::Compile(error) => error.positions(),
			ClaimError::Io { .. } | ClaimError::Json { .. } => Vec::new(),
		}
	}
}

pub type Result<T, E = ClaimError> = std::result::Result<T, E>;
