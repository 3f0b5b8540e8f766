use crate::libcxx::mem::Memory;
use crate::libcxx::value::Element;

/// Sentinel size marking a decoder that failed validation.
pub const INVALID_SIZE: i64 = -1;

/// Rendering hint attached to a decoder's summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
	/// Summary is character content and should be quoted when embedded.
	String,
}

/// Boxed lazy element cursor. Each call to [`Decoder::elements`] derives a
/// fresh cursor from the decoder's stored root state.
pub type Elements<'a> = Box<dyn Iterator<Item = Element<'a>> + 'a>;

/// One validated view of a container value.
///
/// Construction runs the two-phase plausibility protocol: a cheap boundary
/// probe, then (where an independent stored count exists) a full traversal
/// whose count must agree with the control field. A decoder that failed
/// either phase reports the `"invalid"` summary and exposes no elements.
pub trait Decoder<'a> {
	/// One-line description: `"empty"`, `"invalid"`, or a kind-specific
	/// `(length=N[, capacity=M])` / `(count=N)` rendering.
	fn summary(&self) -> String;

	/// Lazy element sequence. `None` when the decoder is invalid or the
	/// container is empty; callers must treat absence as "nothing to show".
	fn elements(&self) -> Option<Elements<'a>>;

	/// Rendering hint for the summary.
	fn hint(&self) -> Option<Hint> {
		None
	}
}

/// Probe one boundary element: true when `width` bytes at `addr` read back.
///
/// Two targeted reads are far cheaper than discovering unmapped memory in
/// the middle of a full traversal, so every decoder probes its first and
/// last logically-indexed element before committing.
pub fn probe(mem: &dyn Memory, addr: u64, width: u64) -> bool {
	mem.read(addr, width.max(1) as usize).is_ok()
}

/// Probe both boundary elements of a contiguous run.
pub fn probe_bounds(mem: &dyn Memory, first: u64, last: u64, width: u64) -> bool {
	probe(mem, first, width) && probe(mem, last, width)
}
