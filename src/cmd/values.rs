use std::path::PathBuf;

use cxxsnap::libcxx::{DecodeCtx, Registry, Result, Snapshot, render_brief};
use serde::Serialize;

#[derive(Serialize)]
struct RootReport {
	name: String,
	#[serde(rename = "type")]
	type_name: String,
	addr: u64,
	dispatched: bool,
	summary: String,
}

/// Summarize every root value in the snapshot.
pub fn run(path: PathBuf, json: bool) -> Result<()> {
	let snapshot = Snapshot::open(&path)?;
	let registry = Registry::with_defaults();
	let ctx = DecodeCtx::new(&snapshot, &snapshot.types);

	let mut reports = Vec::with_capacity(snapshot.roots.len());
	for root in &snapshot.roots {
		let summary = match snapshot.value(root) {
			Ok(value) => render_brief(ctx, &registry, value),
			Err(err) => format!("<{err}>"),
		};
		reports.push(RootReport {
			name: root.name.clone(),
			type_name: root.type_name.clone(),
			addr: root.addr,
			dispatched: registry.matches(&root.type_name),
			summary,
		});
	}

	if json {
		println!("{}", serde_json::to_string_pretty(&reports)?);
		return Ok(());
	}

	for report in reports {
		println!("{}: {} @ 0x{:x} = {}", report.name, report.type_name, report.addr, report.summary);
	}

	Ok(())
}
