//! Capabilities supplied by whoever binds a statement to its data.

use crate::value::{Selector, Value, ValueType};

/// Read access to the data of one statement subject.
pub trait ValueAccessor {
	fn get(&self, selector: &Selector) -> Option<Value>;

	/// Identifies where the data came from, for diagnostics.
	fn source_id(&self) -> String;
}

/// Type information about the data of one statement subject.
pub trait Schema {
	fn type_of(&self, selector: &Selector) -> Option<ValueType>;
}
