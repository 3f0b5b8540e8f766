use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE, probe_bounds};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::mem::Memory;
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::Result;

/// Word width assumed when the `__bits_per_word` constant was optimized out.
pub const DEFAULT_BITS_PER_WORD: u64 = 64;

/// Internal representation selected at construction.
enum Repr<'a> {
	/// Contiguous element storage.
	Plain {
		begin: u64,
		end: u64,
		elem: &'a TypeLayout,
	},
	/// Bit-packed boolean storage.
	Bits {
		begin: u64,
		bits_per_word: u64,
	},
	/// Validation failed; only the generic summary is available.
	Invalid,
}

/// Decoder for `std::vector`, including the bit-packed `vector<bool>`
/// specialization (selected by the presence of a `__bits_per_word` member).
pub struct VectorDecoder<'a> {
	ctx: DecodeCtx<'a>,
	display: String,
	size: i64,
	capacity: i64,
	repr: Repr<'a>,
}

impl<'a> VectorDecoder<'a> {
	/// Derive size/capacity from the control fields and probe both boundary
	/// elements before trusting them.
	pub fn new(ctx: DecodeCtx<'a>, display: &str, value: TypedValue<'a>) -> Self {
		let mut decoder = Self {
			ctx,
			display: display.to_owned(),
			size: INVALID_SIZE,
			capacity: INVALID_SIZE,
			repr: Repr::Invalid,
		};

		if value.ty.field("__bits_per_word").is_some() {
			let bits_per_word = value.ty.constant("__bits_per_word").unwrap_or(DEFAULT_BITS_PER_WORD).max(1);
			if let Ok((begin, size, capacity)) = locate_bits(ctx, value, bits_per_word) {
				decoder.size = size;
				decoder.capacity = capacity;
				decoder.repr = Repr::Bits { begin, bits_per_word };
			}
		} else if let Ok((begin, end, elem, size, capacity)) = locate_plain(ctx, value) {
			decoder.size = size;
			decoder.capacity = capacity;
			decoder.repr = Repr::Plain { begin, end, elem };
		}

		if decoder.size > decoder.capacity {
			// Implausible control fields; do not walk this storage.
			decoder.invalidate();
			return decoder;
		}

		if decoder.size > 0 && !decoder.probe_boundaries() {
			decoder.invalidate();
		}
		decoder
	}

	fn invalidate(&mut self) {
		self.size = INVALID_SIZE;
		self.repr = Repr::Invalid;
	}

	fn probe_boundaries(&self) -> bool {
		match &self.repr {
			Repr::Plain { begin, end, elem } => {
				let width = elem.size.max(1);
				probe_bounds(self.ctx.mem, *begin, end.saturating_sub(width), width)
			}
			Repr::Bits { begin, bits_per_word } => {
				let word_bytes = (bits_per_word / 8).max(1);
				let last_word = begin + (self.size as u64 - 1) / bits_per_word * word_bytes;
				probe_bounds(self.ctx.mem, *begin, last_word, word_bytes)
			}
			Repr::Invalid => false,
		}
	}

	/// Logical element count, or the invalid sentinel.
	pub fn size(&self) -> i64 {
		self.size
	}
}

impl<'a> Decoder<'a> for VectorDecoder<'a> {
	fn summary(&self) -> String {
		let suffix = if matches!(self.repr, Repr::Bits { .. }) { "<bool>" } else { "" };
		match self.size {
			0 => format!("empty {}{} (capacity={})", self.display, suffix, self.capacity),
			size if size > 0 => format!("{}{} (length={}, capacity={})", self.display, suffix, size, self.capacity),
			_ => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		if self.size <= 0 {
			return None;
		}
		match &self.repr {
			Repr::Plain { begin, end, elem } => Some(Box::new(PtrCursor {
				addr: *begin,
				end: *end,
				elem,
				index: 0,
			})),
			Repr::Bits { begin, bits_per_word } => Some(Box::new(BitCursor {
				mem: self.ctx.mem,
				word_addr: *begin,
				word: 0,
				bit: 0,
				bits_per_word: *bits_per_word,
				remaining: self.size as u64,
				index: 0,
			})),
			Repr::Invalid => None,
		}
	}
}

fn locate_plain<'a>(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Result<(u64, u64, &'a TypeLayout, i64, i64)> {
	let (begin, pointee) = value.ptr_field(ctx, "__begin_")?;
	let (end, _) = value.ptr_field(ctx, "__end_")?;
	let (end_cap, _) = value.field(ctx.types, "__end_cap_")?.ptr_field(ctx, "__first_")?;

	let elem = match value.ty.template_type(0) {
		Some(name) => ctx.types.require(name)?,
		None => pointee,
	};
	let width = elem.size.max(1);

	let size = end.wrapping_sub(begin) as i64 / width as i64;
	let capacity = end_cap.wrapping_sub(begin) as i64 / width as i64;
	if end < begin || end_cap < begin {
		return Ok((begin, end, elem, INVALID_SIZE, INVALID_SIZE));
	}
	Ok((begin, end, elem, size, capacity))
}

fn locate_bits<'a>(ctx: DecodeCtx<'a>, value: TypedValue<'a>, bits_per_word: u64) -> Result<(u64, i64, i64)> {
	let (begin, _) = value.ptr_field(ctx, "__begin_")?;
	let size = value.uint_field(ctx, "__size_")? as i64;
	let cap_words = value.field(ctx.types, "__cap_alloc_")?.uint_field(ctx, "__first_")?;
	Ok((begin, size, (cap_words * bits_per_word) as i64))
}

/// Pointer-arithmetic cursor over contiguous element storage. Shared by the
/// vector and array decoders.
pub(crate) struct PtrCursor<'a> {
	pub(crate) addr: u64,
	pub(crate) end: u64,
	pub(crate) elem: &'a TypeLayout,
	pub(crate) index: usize,
}

impl<'a> Iterator for PtrCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.addr >= self.end {
			return None;
		}
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue {
				addr: self.addr,
				ty: self.elem,
			}),
		};
		self.addr += self.elem.size.max(1);
		self.index += 1;
		Some(element)
	}
}

/// Bit cursor over packed boolean storage; wraps to the next storage word
/// every `bits_per_word` bits.
struct BitCursor<'a> {
	mem: &'a dyn Memory,
	word_addr: u64,
	word: u64,
	bit: u64,
	bits_per_word: u64,
	remaining: u64,
	index: usize,
}

impl<'a> Iterator for BitCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.remaining == 0 {
			return None;
		}
		let word_bytes = (self.bits_per_word / 8).max(1);
		if self.bit == 0 {
			self.word = self.mem.read_uint(self.word_addr, word_bytes).ok()?;
		}
		let set = self.word >> self.bit & 1 != 0;
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Bool(set),
		};
		self.bit += 1;
		if self.bit >= self.bits_per_word {
			self.word_addr += word_bytes;
			self.bit = 0;
		}
		self.remaining -= 1;
		self.index += 1;
		Some(element)
	}
}

/// Begin/end/end-capacity triple backing vectors and the deque block map.
/// Reused by the deque decoder; not itself dispatchable.
pub struct SplitBuffer {
	/// First element address.
	pub begin: u64,
	/// One past the last element.
	pub end: u64,
	/// Element count, or the invalid sentinel.
	pub size: i64,
	/// Capacity in elements, or the invalid sentinel.
	pub capacity: i64,
}

impl SplitBuffer {
	/// Read the triple out of a split-buffer record, measuring in elements
	/// of `elem_size` bytes.
	pub fn read<'a>(ctx: DecodeCtx<'a>, value: TypedValue<'a>, elem_size: u64) -> Self {
		let width = elem_size.max(1);
		let located = (|| -> Result<(u64, u64, u64)> {
			let (begin, _) = value.ptr_field(ctx, "__begin_")?;
			let (end, _) = value.ptr_field(ctx, "__end_")?;
			let (end_cap, _) = value.field(ctx.types, "__end_cap_")?.ptr_field(ctx, "__first_")?;
			Ok((begin, end, end_cap))
		})();

		match located {
			Ok((begin, end, end_cap)) if begin <= end && end <= end_cap => Self {
				begin,
				end,
				size: ((end - begin) / width) as i64,
				capacity: ((end_cap - begin) / width) as i64,
			},
			_ => Self {
				begin: 0,
				end: 0,
				size: INVALID_SIZE,
				capacity: INVALID_SIZE,
			},
		}
	}

	/// Whether the triple passed validation.
	pub fn is_valid(&self) -> bool {
		self.size >= 0
	}

	/// Read the pointer stored in slot `index`. Slots are pointer-sized;
	/// only the deque block map uses this view.
	pub fn ptr_at(&self, mem: &dyn Memory, index: u64) -> Result<u64> {
		mem.read_ptr(self.begin + index * crate::libcxx::mem::PTR_SIZE)
	}
}
