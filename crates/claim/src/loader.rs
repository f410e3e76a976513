use std::{
	collections::BTreeMap,
	fs,
	path::{Path, PathBuf},
};

use zkpc_core::{Proposition, Reference, Value, ValueAccessor};

use crate::{
	bind,
	document::ClaimDocument,
	error::{ClaimError, Result},
	json::JsonData,
};

/// A claim document together with the data of every subject it declares.
#[derive(Debug, Clone)]
pub struct Claim {
	path: PathBuf,
	document: ClaimDocument,
	data: BTreeMap<String, JsonData>,
}

impl Claim {
	/// Reads the claim at `path` and the data files of its subjects from `data_dir`.
	pub fn load(path: &Path, data_dir: &Path) -> Result<Self> {
		let _span = tracing::info_span!("Load claim", path = %path.display()).entered();

		let text = fs::read_to_string(path).map_err(|error| ClaimError::Io {
			path: path.to_owned(),
			error,
		})?;
		let document = ClaimDocument::from_json(&path.display().to_string(), &text)?;

		let mut data = BTreeMap::new();
		for (alias, subject) in &document.subjects {
			let source = data_dir.join(&subject.source);
			tracing::debug!(alias, role = ?subject.role, source = %source.display(), "loading subject");
			data.insert(alias.clone(), JsonData::load(&source)?);
		}

		Ok(Self {
			path: path.to_owned(),
			document,
			data,
		})
	}

	pub fn from_parts(
		path: impl Into<PathBuf>,
		document: ClaimDocument,
		data: BTreeMap<String, JsonData>,
	) -> Self {
		Self {
			path: path.into(),
			document,
			data,
		}
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	pub fn document(&self) -> &ClaimDocument {
		&self.document
	}

	pub fn bind(&self) -> Result<Proposition> {
		bind::bind(&self.document, &self.data)
	}

	/// Looks up the secret value behind a witness reference, for code generation.
	pub fn witness_value(&self, reference: &Reference) -> Option<Value> {
		self.data.get(reference.subject())?.get(reference.selector())
	}
}
