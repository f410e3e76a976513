//! Knowledge of a MiMC preimage.
//!
//! # Constraints
//!
//! 91 rounds of `x^7`, four multiplications each, proving `MiMC(preimage) = image`.

use super::field::FieldSpec;
use crate::{error::Result, value::ValueType, variable::Variable};

pub const COST: u64 = 364;
pub const TEMPLATE: &str = "MIMC_HASH {preimage} {image}";

const PREIMAGE: FieldSpec = FieldSpec::new("preimage", ValueType::SCALAR).witness_only();
const IMAGE: FieldSpec = FieldSpec::new("image", ValueType::NUMERIC);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MiMCHash {
	preimage: Variable,
	image: Variable,
}

impl MiMCHash {
	pub fn new(preimage: Variable, image: Variable) -> Result<Self> {
		PREIMAGE.check(&preimage)?;
		IMAGE.check(&image)?;
		Ok(Self { preimage, image })
	}

	pub fn preimage(&self) -> &Variable {
		&self.preimage
	}

	pub fn image(&self) -> &Variable {
		&self.image
	}

	pub fn bindings(&self) -> Vec<(String, &Variable)> {
		vec![("preimage".into(), &self.preimage), ("image".into(), &self.image)]
	}
}
