use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::mem::Memory;
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::{CxxError, Result};

/// Node geometry shared by the chain cursors: where the link and payload
/// live inside one node record.
#[derive(Clone, Copy)]
struct NodeShape<'a> {
	next_offset: u64,
	value_offset: u64,
	value_ty: &'a TypeLayout,
}

impl<'a> NodeShape<'a> {
	fn of(ctx: DecodeCtx<'a>, node_ty: &'a TypeLayout) -> Result<Self> {
		let next = node_ty.require_field("__next_")?;
		let value = node_ty.require_field("__value_")?;
		Ok(Self {
			next_offset: next.offset,
			value_offset: value.offset,
			value_ty: ctx.types.require(&value.ty)?,
		})
	}
}

/// Decoder for `std::list`: a circular doubly-linked chain around an
/// embedded sentinel node, with an independently stored element count.
pub struct ListDecoder<'a> {
	ctx: DecodeCtx<'a>,
	display: String,
	sentinel: u64,
	head: u64,
	shape: Option<NodeShape<'a>>,
	size: i64,
}

impl<'a> ListDecoder<'a> {
	/// Read the sentinel and stored count, then reconcile a full traversal
	/// against the count; any disagreement invalidates the decoder.
	pub fn new(ctx: DecodeCtx<'a>, display: &str, value: TypedValue<'a>) -> Self {
		let mut decoder = Self {
			ctx,
			display: display.to_owned(),
			sentinel: 0,
			head: 0,
			shape: None,
			size: INVALID_SIZE,
		};

		if decoder.locate(value).is_err() || !decoder.validate() {
			decoder.size = INVALID_SIZE;
		}
		decoder
	}

	fn locate(&mut self, value: TypedValue<'a>) -> Result<()> {
		self.size = value.field(self.ctx.types, "__size_alloc_")?.uint_field(self.ctx, "__first_")? as i64;

		let sentinel = value.field(self.ctx.types, "__end_")?;
		self.sentinel = sentinel.addr;

		let next_field = sentinel.ty.require_field("__next_")?;
		let node_ty = self.ctx.types.require(self.ctx.types.require(&next_field.ty)?.pointee().ok_or(CxxError::ExpectedPointer {
			type_name: sentinel.ty.name.to_string(),
			field: "__next_",
		})?)?;
		self.shape = Some(NodeShape::of(self.ctx, node_ty)?);
		self.head = self.ctx.mem.read_ptr(self.sentinel + next_field.offset)?;
		Ok(())
	}

	fn validate(&self) -> bool {
		if self.size < 0 || self.size as usize > self.ctx.limits.max_elements {
			return false;
		}
		if self.size == 0 {
			return true;
		}
		self.cursor().count() as i64 == self.size
	}

	fn cursor(&self) -> ListCursor<'a> {
		ListCursor {
			mem: self.ctx.mem,
			shape: self.shape.expect("cursor requires located node shape"),
			sentinel: self.sentinel,
			current: self.head,
			remaining: self.size.max(0) as u64,
			index: 0,
		}
	}
}

impl<'a> Decoder<'a> for ListDecoder<'a> {
	fn summary(&self) -> String {
		match self.size {
			0 => "empty".to_owned(),
			size if size > 0 => format!("{} (length={})", self.display, size),
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

/// Chain cursor for the circular list: stops when the walk returns to the
/// sentinel or the stored count is exhausted, whichever comes first.
struct ListCursor<'a> {
	mem: &'a dyn Memory,
	shape: NodeShape<'a>,
	sentinel: u64,
	current: u64,
	remaining: u64,
	index: usize,
}

impl<'a> Iterator for ListCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.current == self.sentinel || self.remaining == 0 {
			return None;
		}
		let next = self.mem.read_ptr(self.current + self.shape.next_offset).ok()?;
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue {
				addr: self.current + self.shape.value_offset,
				ty: self.shape.value_ty,
			}),
		};
		self.current = next;
		self.remaining -= 1;
		self.index += 1;
		Some(element)
	}
}

/// Decoder for `std::forward_list`: singly-linked from a before-begin
/// placeholder, no sentinel and no stored count. The size is derived
/// entirely by walking the chain to its null link.
pub struct ForwardListDecoder<'a> {
	ctx: DecodeCtx<'a>,
	display: String,
	head: u64,
	shape: Option<NodeShape<'a>>,
	size: i64,
}

impl<'a> ForwardListDecoder<'a> {
	/// Locate the head link and count the chain; an unreadable link or a
	/// chain longer than the traversal ceiling invalidates the decoder.
	pub fn new(ctx: DecodeCtx<'a>, display: &str, value: TypedValue<'a>) -> Self {
		let mut decoder = Self {
			ctx,
			display: display.to_owned(),
			head: 0,
			shape: None,
			size: INVALID_SIZE,
		};

		match decoder.locate(value).and_then(|()| decoder.walk_count()) {
			Ok(count) => decoder.size = count,
			Err(_) => decoder.size = INVALID_SIZE,
		}
		decoder
	}

	fn locate(&mut self, value: TypedValue<'a>) -> Result<()> {
		let before_begin = value.walk(self.ctx.types, &["__before_begin_", "__first_"])?;
		let next_field = before_begin.ty.require_field("__next_")?;
		let node_ty = self.ctx.types.require(self.ctx.types.require(&next_field.ty)?.pointee().ok_or(CxxError::ExpectedPointer {
			type_name: before_begin.ty.name.to_string(),
			field: "__next_",
		})?)?;
		self.shape = Some(NodeShape::of(self.ctx, node_ty)?);
		self.head = self.ctx.mem.read_ptr(before_begin.addr + next_field.offset)?;
		Ok(())
	}

	fn walk_count(&self) -> Result<i64> {
		let shape = self.shape.expect("walk requires located node shape");
		let mut node = self.head;
		let mut count = 0_i64;
		while node != 0 {
			if count as usize >= self.ctx.limits.max_elements {
				return Err(CxxError::Inconsistent {
					what: "forward_list chain",
					stored: self.ctx.limits.max_elements as i64,
					derived: count,
				});
			}
			node = self.ctx.mem.read_ptr(node + shape.next_offset)?;
			count += 1;
		}
		Ok(count)
	}
}

impl<'a> Decoder<'a> for ForwardListDecoder<'a> {
	fn summary(&self) -> String {
		match self.size {
			0 => "empty".to_owned(),
			size if size > 0 => format!("{} (length={})", self.display, size),
			_ => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		if self.size <= 0 {
			return None;
		}
		let shape = self.shape?;
		Some(Box::new(ForwardCursor {
			mem: self.ctx.mem,
			shape,
			current: self.head,
			index: 0,
		}))
	}
}

struct ForwardCursor<'a> {
	mem: &'a dyn Memory,
	shape: NodeShape<'a>,
	current: u64,
	index: usize,
}

impl<'a> Iterator for ForwardCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.current == 0 {
			return None;
		}
		let next = self.mem.read_ptr(self.current + self.shape.next_offset).ok()?;
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue {
				addr: self.current + self.shape.value_offset,
				ty: self.shape.value_ty,
			}),
		};
		self.current = next;
		self.index += 1;
		Some(element)
	}
}
