use std::path::PathBuf;

use cxxsnap::libcxx::{Registry, Result, Snapshot};
use serde::Serialize;

#[derive(Serialize)]
struct InfoReport {
	path: String,
	compression: &'static str,
	region_count: usize,
	captured_bytes: usize,
	type_count: usize,
	root_count: usize,
	dispatchable_roots: usize,
}

/// Print high-level snapshot statistics.
pub fn run(path: PathBuf, json: bool) -> Result<()> {
	let snapshot = Snapshot::open(&path)?;
	let registry = Registry::with_defaults();

	let report = InfoReport {
		path: path.display().to_string(),
		compression: snapshot.compression.as_str(),
		region_count: snapshot.region_count(),
		captured_bytes: snapshot.captured_bytes(),
		type_count: snapshot.types.len(),
		root_count: snapshot.roots.len(),
		dispatchable_roots: snapshot.roots.iter().filter(|root| registry.matches(&root.type_name)).count(),
	};

	if json {
		println!("{}", serde_json::to_string_pretty(&report)?);
		return Ok(());
	}

	println!("path: {}", report.path);
	println!("compression: {}", report.compression);
	println!("endianness: little");
	println!("pointer_size: 8");
	println!("region_count: {}", report.region_count);
	println!("captured_bytes: {}", report.captured_bytes);
	println!("type_count: {}", report.type_count);
	println!("root_count: {}", report.root_count);
	println!("dispatchable_roots: {}", report.dispatchable_roots);

	Ok(())
}
