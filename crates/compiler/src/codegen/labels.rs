use std::collections::HashMap;

use zkpc_core::{Literal, Reference, Variable};

pub const NULL_LABEL: &str = "NULL";

/// Stable labels for the variables of a statement, numbered in first-seen order.
#[derive(Debug, Default)]
pub struct Labels {
	witnesses: Vec<Reference>,
	witness_index: HashMap<Reference, usize>,
	instances: Vec<Literal>,
	instance_index: HashMap<Literal, usize>,
}

impl Labels {
	pub fn new() -> Self {
		Self::default()
	}

	/// The label of `variable`, assigning the next free one on first sight.
	pub fn label(&mut self, variable: &Variable) -> String {
		match variable {
			Variable::Witness(witness) => {
				let i = intern(&mut self.witnesses, &mut self.witness_index, witness.reference());
				witness_label(i)
			}
			Variable::Instance(instance) => {
				let i = intern(&mut self.instances, &mut self.instance_index, instance.literal());
				instance_label(i)
			}
			Variable::Null => NULL_LABEL.to_string(),
		}
	}

	/// Witness references in label order.
	pub fn witnesses(&self) -> impl Iterator<Item = (String, &Reference)> {
		self.witnesses.iter().enumerate().map(|(i, r)| (witness_label(i), r))
	}

	/// Instance values in label order.
	pub fn instances(&self) -> impl Iterator<Item = (String, &Literal)> {
		self.instances.iter().enumerate().map(|(i, l)| (instance_label(i), l))
	}
}

fn intern<T: Clone + Eq + std::hash::Hash>(
	order: &mut Vec<T>,
	index: &mut HashMap<T, usize>,
	item: &T,
) -> usize {
	if let Some(&i) = index.get(item) {
		return i;
	}
	let i = order.len();
	order.push(item.clone());
	index.insert(item.clone(), i);
	i
}

fn witness_label(i: usize) -> String {
	format!("W{i}")
}

fn instance_label(i: usize) -> String {
	format!("I{i}")
}
