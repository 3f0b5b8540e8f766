#![allow(dead_code)]

//! Shared snapshot fixture for integration tests: one region holding a
//! vector, a long-representation string, and a list with a corrupted
//! stored count.

use std::fs;
use std::path::PathBuf;

use cxxsnap::libcxx::{FieldLayout, Manifest, RegionManifest, Root, ScalarKind, TemplateArg, TypeKind, TypeLayout, TypeTable};

pub const REGION_BASE: u64 = 0x1000;

fn scalar(name: &str, size: u64, kind: ScalarKind) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size,
		kind: TypeKind::Scalar { scalar: kind },
		template_args: Vec::new(),
	}
}

fn pointer(name: &str, pointee: &str) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size: 8,
		kind: TypeKind::Pointer { pointee: pointee.into() },
		template_args: Vec::new(),
	}
}

fn record(name: &str, size: u64, fields: Vec<FieldLayout>) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size,
		kind: TypeKind::Struct { fields },
		template_args: Vec::new(),
	}
}

fn field(name: &str, offset: u64, ty: &str) -> FieldLayout {
	FieldLayout {
		name: name.into(),
		offset,
		ty: ty.into(),
		value: None,
	}
}

fn with_args(mut layout: TypeLayout, args: Vec<TemplateArg>) -> TypeLayout {
	layout.template_args = args;
	layout
}

fn types() -> TypeTable {
	TypeTable::from_layouts(vec![
		scalar("int", 4, ScalarKind::SignedInt),
		scalar("char", 1, ScalarKind::Char),
		scalar("unsigned char", 1, ScalarKind::UnsignedInt),
		scalar("unsigned long", 8, ScalarKind::UnsignedInt),
		pointer("int*", "int"),
		pointer("char*", "char"),
		record("__vec_pair", 8, vec![field("__first_", 0, "int*")]),
		with_args(
			record(
				"std::__1::vector<int>",
				24,
				vec![field("__begin_", 0, "int*"), field("__end_", 8, "int*"), field("__end_cap_", 16, "__vec_pair")],
			),
			vec![TemplateArg::Type("int".into())],
		),
		record("__short", 24, vec![field("__size_", 0, "unsigned char"), field("__data_", 1, "char")]),
		record(
			"__long",
			24,
			vec![
				field("__cap_", 0, "unsigned long"),
				field("__size_", 8, "unsigned long"),
				field("__data_", 16, "char*"),
			],
		),
		record("__rep", 24, vec![field("__s", 0, "__short"), field("__l", 0, "__long")]),
		record("__str_pair", 24, vec![field("__first_", 0, "__rep")]),
		with_args(
			record("std::__1::basic_string<char>", 24, vec![field("__r_", 0, "__str_pair")]),
			vec![TemplateArg::Type("char".into())],
		),
		pointer("__list_node*", "__list_node"),
		record(
			"__list_node",
			24,
			vec![
				field("__next_", 0, "__list_node*"),
				field("__prev_", 8, "__list_node*"),
				field("__value_", 16, "int"),
			],
		),
		record(
			"__node_base",
			16,
			vec![field("__next_", 0, "__list_node*"), field("__prev_", 8, "__list_node*")],
		),
		record("__list_pair", 8, vec![field("__first_", 0, "unsigned long")]),
		record(
			"std::__1::list<int>",
			32,
			vec![field("__end_", 0, "__node_base"), field("__size_alloc_", 16, "__list_pair")],
		),
	])
}

fn put64(bytes: &mut [u8], offset: usize, value: u64) {
	bytes[offset..offset + 8].copy_from_slice(&value.to_le_bytes());
}

fn put32(bytes: &mut [u8], offset: usize, value: u32) {
	bytes[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
}

fn region_bytes() -> Vec<u8> {
	let mut bytes = vec![0_u8; 0x130];

	// vector<int> header at 0x1000: three ints at 0x1100, capacity four.
	put64(&mut bytes, 0x000, 0x1100);
	put64(&mut bytes, 0x008, 0x110c);
	put64(&mut bytes, 0x010, 0x1110);
	put32(&mut bytes, 0x100, 1);
	put32(&mut bytes, 0x104, 2);
	put32(&mut bytes, 0x108, 3);

	// basic_string at 0x1020: long representation, "hello" at 0x1120.
	bytes[0x020] = 0x01;
	put64(&mut bytes, 0x028, 5);
	put64(&mut bytes, 0x030, 0x1120);
	bytes[0x120..0x126].copy_from_slice(b"hello\0");

	// list at 0x1040: sentinel self-loop (zero nodes) but stored count 2.
	put64(&mut bytes, 0x040, 0x1040);
	put64(&mut bytes, 0x048, 0x1040);
	put64(&mut bytes, 0x050, 2);

	bytes
}

fn hex(bytes: &[u8]) -> String {
	let mut out = String::with_capacity(bytes.len() * 2);
	for byte in bytes {
		out.push_str(&format!("{byte:02x}"));
	}
	out
}

pub fn manifest() -> Manifest {
	Manifest {
		types: types(),
		regions: vec![RegionManifest {
			base: REGION_BASE,
			bytes: hex(&region_bytes()),
		}],
		roots: vec![
			Root {
				name: "numbers".to_owned(),
				type_name: "std::__1::vector<int>".to_owned(),
				addr: 0x1000,
			},
			Root {
				name: "greeting".to_owned(),
				type_name: "std::__1::basic_string<char>".to_owned(),
				addr: 0x1020,
			},
			Root {
				name: "broken".to_owned(),
				type_name: "std::__1::list<int>".to_owned(),
				addr: 0x1040,
			},
		],
	}
}

fn scratch_path(name: &str) -> PathBuf {
	std::env::temp_dir().join(format!("cxxsnap-{}-{name}", std::process::id()))
}

/// Write the fixture as a plain JSON snapshot and return its path.
pub fn write_plain(name: &str) -> PathBuf {
	let path = scratch_path(name);
	let json = serde_json::to_vec(&manifest()).expect("manifest serializes");
	fs::write(&path, json).expect("fixture writes");
	path
}

/// Write the fixture zstd-compressed and return its path.
pub fn write_zstd(name: &str) -> PathBuf {
	let path = scratch_path(name);
	let json = serde_json::to_vec(&manifest()).expect("manifest serializes");
	let compressed = zstd::encode_all(&json[..], 3).expect("fixture compresses");
	fs::write(&path, compressed).expect("fixture writes");
	path
}
