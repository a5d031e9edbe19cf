use std::path::PathBuf;

use plogdoc_core::plog::{decode_record, PlogFile, Result};

use crate::cmd::util::{load_catalog, print_tree, tree_to_json};

/// Decode records through the detector loop and print each tree.
pub fn run(path: PathBuf, describe: Vec<PathBuf>, limit: Option<usize>, json: bool) -> Result<()> {
	let catalog = load_catalog(&describe)?;
	let file = PlogFile::open(&path)?;
	let (_, offset) = file.header(&catalog)?;

	let mut count = 0_usize;
	for record in file.records(&catalog, offset) {
		if limit.is_some_and(|limit| count >= limit) {
			break;
		}

		let record = record?;
		let tree = decode_record(&catalog, &record)?;

		if json {
			let mut object = serde_json::Map::new();
			object.insert("index".to_owned(), serde_json::json!(record.index));
			object.insert("timestamp".to_owned(), serde_json::json!(record.timestamp));
			object.insert("tree".to_owned(), tree_to_json(&tree));
			println!("{}", serde_json::Value::Object(object));
		} else {
			println!("record {} @ {} ({} bytes)", record.index, record.file_offset, record.size);
			print_tree(&tree, 2);
		}

		count += 1;
	}

	Ok(())
}
