use std::path::PathBuf;

use cxxsnap::libcxx::{Result, Snapshot, TypeKind, TypeLayout};

/// Dump type layouts, optionally filtered by a name substring.
pub fn run(path: PathBuf, type_name: Option<String>, json: bool) -> Result<()> {
	let snapshot = Snapshot::open(&path)?;

	let mut layouts: Vec<&TypeLayout> = snapshot
		.types
		.iter()
		.filter(|layout| match &type_name {
			Some(filter) => layout.name.contains(filter.as_str()),
			None => true,
		})
		.collect();
	layouts.sort_by(|left, right| left.name.cmp(&right.name));

	if json {
		println!("{}", serde_json::to_string_pretty(&layouts)?);
		return Ok(());
	}

	for layout in layouts {
		match &layout.kind {
			TypeKind::Scalar { scalar } => {
				println!("{} size={} scalar={scalar:?}", layout.name, layout.size);
			}
			TypeKind::Pointer { pointee } => {
				println!("{} size={} pointer -> {pointee}", layout.name, layout.size);
			}
			TypeKind::Struct { fields } => {
				println!("{} size={} struct", layout.name, layout.size);
				for field in fields {
					match field.value {
						Some(value) => println!("  {}: {} = {}", field.name, field.ty, value),
						None => println!("  {}: {} @ {}", field.name, field.ty, field.offset),
					}
				}
			}
		}
	}

	Ok(())
}
