use std::fmt;

/// Location of a piece of statement source text.
///
/// Diagnostics carry these so that a front end can underline the offending text. A default
/// position (`0:0`, zero length) is used for values that did not originate from source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourcePosition {
	/// 1-based line number.
	pub line: u32,
	/// 1-based column of the first character.
	pub column: u32,
	/// Length of the offending text in characters.
	pub length: u32,
}

impl SourcePosition {
	pub const fn new(line: u32, column: u32, length: u32) -> Self {
		Self {
			line,
			column,
			length,
		}
	}

	pub fn is_known(&self) -> bool {
		self.line != 0
	}
}

impl fmt::Display for SourcePosition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}:{}", self.line, self.column)
	}
}
