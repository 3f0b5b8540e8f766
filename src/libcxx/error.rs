use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CxxError>;

/// Errors produced while loading snapshots and decoding container layouts.
///
/// `Unreadable` and `Inconsistent` never escape a container decoder: the
/// decoder catches them and downgrades itself to the invalid sentinel, so a
/// single bad value cannot abort inspection of everything else.
#[derive(Debug, Error)]
pub enum CxxError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Snapshot file starts with neither a JSON manifest nor a zstd frame.
	#[error("unsupported compression or not a snapshot (magic={magic:?})")]
	UnknownMagic {
		/// First up-to-4 bytes of the stream.
		magic: [u8; 4],
	},
	/// Decompressed stream is not a JSON manifest.
	#[error("decompressed data is not a snapshot manifest")]
	NotSnapshotAfterDecompress,
	/// Decompression output exceeded configured safety limit.
	#[error("decompressed output exceeded limit {limit} bytes")]
	DecompressedTooLarge {
		/// Maximum allowed output bytes.
		limit: usize,
	},
	/// Snapshot manifest failed to parse.
	#[error("manifest: {0}")]
	Manifest(#[from] serde_json::Error),
	/// Region bytes were not a valid hex string.
	#[error("invalid hex in region at base 0x{base:016x}, byte {at}")]
	InvalidRegionHex {
		/// Region base address.
		base: u64,
		/// Offending character offset inside the hex string.
		at: usize,
	},
	/// Memory read failed: unmapped address, hole between regions, or a
	/// layout field that was optimized away.
	#[error("unreadable memory: 0x{addr:016x} ({len} bytes)")]
	Unreadable {
		/// Start address of the failed read.
		addr: u64,
		/// Requested length.
		len: usize,
	},
	/// Independently-derived counts disagree or a structural link violated
	/// the expected topology.
	#[error("inconsistent {what}: stored={stored}, derived={derived}")]
	Inconsistent {
		/// What was being reconciled.
		what: &'static str,
		/// Count taken from a control field.
		stored: i64,
		/// Count derived by traversal or arithmetic.
		derived: i64,
	},
	/// A layout referenced a type name missing from the type table.
	#[error("unknown type: {name}")]
	UnknownTypeName {
		/// Missing type name.
		name: String,
	},
	/// A decoder required a field the layout does not declare.
	#[error("missing field {field} on {type_name}")]
	MissingField {
		/// Struct type name.
		type_name: String,
		/// Missing field name.
		field: &'static str,
	},
	/// A decoder required a template argument the layout does not carry.
	#[error("missing template argument {index} on {type_name}")]
	MissingTemplateArg {
		/// Struct type name.
		type_name: String,
		/// Zero-based template argument index.
		index: usize,
	},
	/// A field was expected to hold a constant (static member) value.
	#[error("field {field} on {type_name} has no constant value")]
	MissingConstant {
		/// Struct type name.
		type_name: String,
		/// Field that was expected to carry a constant.
		field: &'static str,
	},
	/// A field was expected to be a pointer.
	#[error("expected pointer field {field} on {type_name}")]
	ExpectedPointer {
		/// Struct type name.
		type_name: String,
		/// Field that was expected to be a pointer.
		field: &'static str,
	},
	/// Requested snapshot root value was not found.
	#[error("root value not found: {name}")]
	RootNotFound {
		/// Requested root name.
		name: String,
	},
}
