use tracing::debug;

use crate::plog::value::{Node, Value};
use crate::plog::{Catalog, ErrorKind, PlogError, Result};

/// Name returned when no detector entry matches a parent instance.
pub const RAW_TYPE: &str = "raw";

/// Resolve the payload type that follows a decoded parent node.
///
/// Detector entries are consulted in installation order; exactly one may
/// match. No match falls back to `raw`.
pub fn detect(catalog: &Catalog, parent: &Node) -> Result<String> {
	let Value::Tree(tree) = &parent.value else {
		return Err(PlogError::new(ErrorKind::ParentNotTree)
			.with_module("detector")
			.with_type(parent.name.clone()));
	};
	if tree.is_empty() {
		return Err(PlogError::new(ErrorKind::EmptyParentTree)
			.with_module("detector")
			.with_type(parent.name.clone()));
	}

	let mut detected: Option<&str> = None;

	for entry in catalog.detectors() {
		if entry.parent != parent.name {
			continue;
		}

		let mut matched = true;
		let mut mismatched: Vec<&str> = Vec::new();
		for (field_name, expected) in &entry.predicates {
			let Some(node) = tree.get(field_name) else {
				// A predicate naming an absent field can never match.
				debug!(child = %entry.child, field = %field_name, "detector field missing");
				matched = false;
				break;
			};
			if node.value != *expected {
				mismatched.push(field_name.as_str());
			}
		}

		if !matched || !mismatched.is_empty() {
			debug!(child = %entry.child, fields = ?mismatched, "detector mismatched");
			continue;
		}

		// Two matches mean the catalog is not orthogonal.
		if let Some(first) = detected {
			return Err(PlogError::new(ErrorKind::NonUniqueDetectors {
				first: first.to_owned(),
				second: entry.child.clone(),
			})
			.with_module("detector")
			.with_type(parent.name.clone()));
		}
		detected = Some(&entry.child);
	}

	match detected {
		Some(child) => {
			debug!(parent = %parent.name, child, "detector matched");
			Ok(child.to_owned())
		}
		None => {
			debug!(parent = %parent.name, "type not detected, returning raw sequence");
			Ok(RAW_TYPE.to_owned())
		}
	}
}

#[cfg(test)]
mod tests;
