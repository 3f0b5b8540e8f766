#![allow(missing_docs)]

mod support;

use cxxsnap::libcxx::{Compression, DecodeCtx, Registry, Snapshot, render_brief};

#[test]
fn plain_snapshot_decodes_every_root() {
	let path = support::write_plain("plain.json");
	let snapshot = Snapshot::open(&path).expect("snapshot opens");
	assert_eq!(snapshot.compression, Compression::None);

	let registry = Registry::with_defaults();
	let ctx = DecodeCtx::new(&snapshot, &snapshot.types);

	let numbers = snapshot.value(snapshot.root("numbers").expect("root exists")).expect("type resolves");
	let decoder = registry.resolve(ctx, numbers).expect("vector dispatches");
	assert_eq!(decoder.summary(), "vector (length=3, capacity=4)");
	assert_eq!(decoder.elements().expect("elements present").count(), 3);

	let greeting = snapshot.value(snapshot.root("greeting").expect("root exists")).expect("type resolves");
	assert_eq!(render_brief(ctx, &registry, greeting), "\"hello\"");

	let broken = snapshot.value(snapshot.root("broken").expect("root exists")).expect("type resolves");
	let decoder = registry.resolve(ctx, broken).expect("list dispatches");
	assert_eq!(decoder.summary(), "invalid");
	assert!(decoder.elements().is_none());
}

#[test]
fn compressed_snapshot_decodes_identically() {
	let path = support::write_zstd("compressed.json.zst");
	let snapshot = Snapshot::open(&path).expect("snapshot opens");
	assert_eq!(snapshot.compression, Compression::Zstd);

	let registry = Registry::with_defaults();
	let ctx = DecodeCtx::new(&snapshot, &snapshot.types);

	let numbers = snapshot.value(snapshot.root("numbers").expect("root exists")).expect("type resolves");
	let decoder = registry.resolve(ctx, numbers).expect("vector dispatches");
	assert_eq!(decoder.summary(), "vector (length=3, capacity=4)");
}

#[test]
fn invalid_decoder_is_contained_per_root() {
	// One corrupted root must not poison the others.
	let path = support::write_plain("contained.json");
	let snapshot = Snapshot::open(&path).expect("snapshot opens");

	let registry = Registry::with_defaults();
	let ctx = DecodeCtx::new(&snapshot, &snapshot.types);

	let mut summaries = Vec::new();
	for root in &snapshot.roots {
		let value = snapshot.value(root).expect("type resolves");
		summaries.push(render_brief(ctx, &registry, value));
	}
	assert_eq!(summaries, ["vector (length=3, capacity=4)", "\"hello\"", "invalid"]);
}
