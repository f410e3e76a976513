use crate::source::SourcePosition;

/// A user-facing compile error.
///
/// These are caused by the statement being compiled and are reported verbatim. Defects in the rule
/// registry are not represented here; they panic instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
	#[error("contradiction: {message}")]
	Contradiction {
		message: String,
		positions: Vec<SourcePosition>,
	},
	#[error("type mismatch in `{field}`: expected {expected}, found {found}")]
	TypeMismatch {
		field: &'static str,
		expected: String,
		found: String,
		position: Option<SourcePosition>,
	},
	#[error("`{field}` must not be empty")]
	EmptyOperand { field: &'static str },
	#[error("malformed bounds: {message}")]
	MalformedBounds {
		message: String,
		positions: Vec<SourcePosition>,
	},
	#[error("numeric literal {literal} is outside of the field range [0, 2^{bits})")]
	NumericOutOfRange {
		literal: String,
		bits: u64,
		position: SourcePosition,
	},
	#[error("`{selector}` is exposed both as a witness and as an instance")]
	WitnessExposed {
		selector: String,
		positions: Vec<SourcePosition>,
	},
	#[error("a selector must be a non-empty path of non-empty field names")]
	EmptySelector,
	#[error("inference exceeded the limit of {limit} derived facts")]
	InferenceLimit { limit: usize },
}

impl CompileError {
	/// Every source position this error points at, for underlining.
	pub fn positions(&self) -> Vec<SourcePosition> {
		match self {
			CompileError::Contradiction { positions, .. }
			| CompileError::MalformedBounds { positions, .. }
			| CompileError::WitnessExposed { positions, .. } => positions.clone(),
			CompileError::TypeMismatch { position, .. } => position.iter().copied().collect(),
			CompileError::NumericOutOfRange { position, .. } => vec![*position],
			CompileError::EmptyOperand { .. }
			| CompileError::EmptySelector
			| CompileError::InferenceLimit { .. } => Vec::new(),
		}
	}
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
