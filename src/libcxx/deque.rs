use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE, probe};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::mem::{Memory, PTR_SIZE};
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::vector::SplitBuffer;
use crate::libcxx::{CxxError, Result};

/// Decoder for `std::deque`: a split buffer of pointers to fixed-size
/// element blocks (the block map), a logical start offset into the first
/// block, and an independently stored element count.
///
/// Logical index `i` lives at `map[(start + i) / block_size]` offset
/// `(start + i) % block_size`.
pub struct DequeDecoder<'a> {
	ctx: DecodeCtx<'a>,
	display: String,
	block_size: u64,
	map: SplitBuffer,
	start: u64,
	size: i64,
	capacity: i64,
	elem: Option<&'a TypeLayout>,
}

impl<'a> DequeDecoder<'a> {
	/// Read the control fields, dereference every block pointer once as a
	/// cheap probe, then reconcile a full traversal against the stored count.
	pub fn new(ctx: DecodeCtx<'a>, display: &str, value: TypedValue<'a>) -> Self {
		let mut decoder = Self {
			ctx,
			display: display.to_owned(),
			block_size: 0,
			map: SplitBuffer {
				begin: 0,
				end: 0,
				size: INVALID_SIZE,
				capacity: INVALID_SIZE,
			},
			start: 0,
			size: INVALID_SIZE,
			capacity: INVALID_SIZE,
			elem: None,
		};

		if decoder.locate(value).is_err() || !decoder.validate() {
			decoder.size = INVALID_SIZE;
		}
		decoder
	}

	fn locate(&mut self, value: TypedValue<'a>) -> Result<()> {
		self.elem = Some(self.ctx.types.require(value.ty.require_template_type(0)?)?);
		self.block_size = value.ty.constant("__block_size").ok_or(CxxError::MissingConstant {
			type_name: value.ty.name.to_string(),
			field: "__block_size",
		})?;
		self.map = SplitBuffer::read(self.ctx, value.field(self.ctx.types, "__map_")?, PTR_SIZE);
		self.start = value.uint_field(self.ctx, "__start_")?;
		self.size = value.field(self.ctx.types, "__size_")?.uint_field(self.ctx, "__first_")? as i64;
		Ok(())
	}

	fn validate(&mut self) -> bool {
		if self.block_size == 0 || !self.map.is_valid() {
			return false;
		}
		self.capacity = self.map.capacity * self.block_size as i64;
		if self.size == 0 {
			return true;
		}
		if self.start >= self.block_size || self.size > self.map.size * self.block_size as i64 {
			return false;
		}

		// Dereference each block pointer once before walking elements; a bad
		// map is caught here instead of mid-traversal.
		let elem_width = self.elem.map(|ty| ty.size.max(1)).unwrap_or(1);
		for index in 0..self.map.size as u64 {
			match self.map.ptr_at(self.ctx.mem, index) {
				Ok(block) if probe(self.ctx.mem, block, elem_width) => {}
				_ => return false,
			}
		}

		let walked = self.cursor().count() as i64;
		walked == self.size
	}

	fn cursor(&self) -> DequeCursor<'a> {
		DequeCursor {
			mem: self.ctx.mem,
			elem: self.elem.expect("cursor requires located element type"),
			block_size: self.block_size,
			start: self.start,
			remaining: self.size.max(0) as u64,
			map_begin: self.map.begin,
			map_end: self.map.end,
			index: 0,
		}
	}
}

impl<'a> Decoder<'a> for DequeDecoder<'a> {
	fn summary(&self) -> String {
		match self.size {
			0 => "empty".to_owned(),
			size if size > 0 => format!("{} (length={}, capacity={})", self.display, size, self.capacity),
			_ => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		if self.size <= 0 {
			return None;
		}
		Some(Box::new(self.cursor()))
	}
}

/// Cursor mapping logical indices through the block map. Reaching the end
/// of the map stops iteration early without declaring the deque invalid;
/// that is the natural boundary of a well-formed map, not corruption.
struct DequeCursor<'a> {
	mem: &'a dyn Memory,
	elem: &'a TypeLayout,
	block_size: u64,
	start: u64,
	remaining: u64,
	map_begin: u64,
	map_end: u64,
	index: usize,
}

impl<'a> Iterator for DequeCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.remaining == 0 {
			return None;
		}
		let logical = self.start + self.index as u64;
		let block_ptr_addr = self.map_begin + logical / self.block_size * PTR_SIZE;
		if block_ptr_addr >= self.map_end {
			return None;
		}
		let block = self.mem.read_ptr(block_ptr_addr).ok()?;
		let addr = block + logical % self.block_size * self.elem.size.max(1);

		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue { addr, ty: self.elem }),
		};
		self.remaining -= 1;
		self.index += 1;
		Some(element)
	}
}

#[cfg(test)]
mod tests;
