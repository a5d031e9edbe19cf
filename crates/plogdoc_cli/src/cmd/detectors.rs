use std::path::PathBuf;

use plogdoc_core::plog::Result;

use crate::cmd::util::load_catalog;

/// List detector entries in installation order.
pub fn run(describe: Vec<PathBuf>) -> Result<()> {
	let catalog = load_catalog(&describe)?;

	for entry in catalog.detectors() {
		println!("{} -> {}", entry.parent, entry.child);
		for (field, value) in &entry.predicates {
			println!("  {field} = {value}");
		}
	}

	Ok(())
}
