use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::libcxx::compression::{Compression, decode_bytes};
use crate::libcxx::layout::TypeTable;
use crate::libcxx::mem::{Memory, unreadable};
use crate::libcxx::value::TypedValue;
use crate::libcxx::{CxxError, Result};

/// On-disk snapshot manifest: type layouts, captured memory regions and the
/// named root values the producer exported.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
	/// Exported type layouts, keyed by declared name.
	pub types: TypeTable,
	/// Captured memory regions.
	#[serde(default)]
	pub regions: Vec<RegionManifest>,
	/// Named values to inspect.
	#[serde(default)]
	pub roots: Vec<Root>,
}

/// One captured memory region, bytes hex-encoded.
#[derive(Debug, Serialize, Deserialize)]
pub struct RegionManifest {
	/// Base address of the region in the inspected process.
	pub base: u64,
	/// Region content as a hex string.
	pub bytes: String,
}

/// One named root value exported by the snapshot producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Root {
	/// Name to look the value up by.
	pub name: String,
	/// Declared type name, resolved against the type table.
	#[serde(rename = "type")]
	pub type_name: String,
	/// Address of the value in the inspected process.
	pub addr: u64,
}

#[derive(Debug)]
struct Region {
	base: u64,
	bytes: Vec<u8>,
}

/// A loaded snapshot: decoded regions acting as target memory, plus the
/// type table and root list from the manifest.
#[derive(Debug)]
pub struct Snapshot {
	/// Compression mode the file was stored with.
	pub compression: Compression,
	/// Type layouts from the manifest.
	pub types: TypeTable,
	/// Root values from the manifest.
	pub roots: Vec<Root>,
	regions: Vec<Region>,
}

impl Snapshot {
	/// Read a snapshot file, transparently decompressing zstd.
	pub fn open(path: impl AsRef<Path>) -> Result<Self> {
		let raw = fs::read(path)?;
		let (compression, bytes) = decode_bytes(raw)?;
		let manifest: Manifest = serde_json::from_slice(&bytes)?;
		Self::from_manifest(manifest, compression)
	}

	/// Build a snapshot from an already-parsed manifest.
	pub fn from_manifest(manifest: Manifest, compression: Compression) -> Result<Self> {
		let mut regions = Vec::with_capacity(manifest.regions.len());
		for region in &manifest.regions {
			regions.push(Region {
				base: region.base,
				bytes: decode_hex(region.base, &region.bytes)?,
			});
		}
		Ok(Self {
			compression,
			types: manifest.types,
			roots: manifest.roots,
			regions,
		})
	}

	/// Look up a root by name.
	pub fn root(&self, name: &str) -> Result<&Root> {
		self.roots
			.iter()
			.find(|root| root.name == name)
			.ok_or_else(|| CxxError::RootNotFound { name: name.to_owned() })
	}

	/// Typed view of a root value, its type resolved against the table.
	pub fn value(&self, root: &Root) -> Result<TypedValue<'_>> {
		Ok(TypedValue {
			addr: root.addr,
			ty: self.types.require(&root.type_name)?,
		})
	}

	/// Total bytes captured across all regions.
	pub fn captured_bytes(&self) -> usize {
		self.regions.iter().map(|region| region.bytes.len()).sum()
	}

	/// Number of captured regions.
	pub fn region_count(&self) -> usize {
		self.regions.len()
	}
}

impl Memory for Snapshot {
	fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
		for region in &self.regions {
			let Some(offset) = addr.checked_sub(region.base) else {
				continue;
			};
			let offset = offset as usize;
			let Some(end) = offset.checked_add(len) else {
				continue;
			};
			if end <= region.bytes.len() {
				return Ok(region.bytes[offset..end].to_vec());
			}
		}
		Err(unreadable(addr, len))
	}
}

fn decode_hex(base: u64, hex: &str) -> Result<Vec<u8>> {
	let bytes = hex.as_bytes();
	if bytes.len() % 2 != 0 {
		return Err(CxxError::InvalidRegionHex { base, at: bytes.len() });
	}
	let mut out = Vec::with_capacity(bytes.len() / 2);
	for (index, chunk) in bytes.chunks_exact(2).enumerate() {
		let high = hex_digit(chunk[0]).ok_or(CxxError::InvalidRegionHex { base, at: index * 2 })?;
		let low = hex_digit(chunk[1]).ok_or(CxxError::InvalidRegionHex { base, at: index * 2 + 1 })?;
		out.push(high << 4 | low);
	}
	Ok(out)
}

fn hex_digit(byte: u8) -> Option<u8> {
	match byte {
		b'0'..=b'9' => Some(byte - b'0'),
		b'a'..=b'f' => Some(byte - b'a' + 10),
		b'A'..=b'F' => Some(byte - b'A' + 10),
		_ => None,
	}
}
