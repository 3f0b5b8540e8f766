use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE, probe};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::mem::Memory;
use crate::libcxx::registry::{Registry, render_brief};
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::Result;

/// Node geometry of the balanced tree: child and parent links plus the
/// payload location inside one node record.
#[derive(Clone, Copy)]
struct TreeShape<'a> {
	left_offset: u64,
	right_offset: u64,
	parent_offset: u64,
	value_offset: u64,
	value_ty: &'a TypeLayout,
}

impl<'a> TreeShape<'a> {
	fn of(ctx: DecodeCtx<'a>, node_ty: &'a TypeLayout) -> Result<Self> {
		let value = node_ty.require_field("__value_")?;
		Ok(Self {
			left_offset: node_ty.require_field("__left_")?.offset,
			right_offset: node_ty.require_field("__right_")?.offset,
			parent_offset: node_ty.require_field("__parent_")?.offset,
			value_offset: value.offset,
			value_ty: ctx.types.require(&value.ty)?,
		})
	}
}

/// Key/mapped split of an associative node payload. The payload wraps the
/// pair in a union member, `__cc_` in current layouts and `__cc` in older
/// ones; the offsets here are folded through that wrapper.
#[derive(Clone, Copy)]
pub(crate) struct PairShape<'a> {
	first_offset: u64,
	first_ty: &'a TypeLayout,
	second_offset: u64,
	second_ty: &'a TypeLayout,
}

impl<'a> PairShape<'a> {
	pub(crate) fn of(ctx: DecodeCtx<'a>, value_ty: &'a TypeLayout) -> Result<Self> {
		let cc = match value_ty.field("__cc_").or_else(|| value_ty.field("__cc")) {
			Some(cc) => cc,
			None => value_ty.require_field("__cc_")?,
		};
		let pair_ty = ctx.types.require(&cc.ty)?;
		let first = pair_ty.require_field("first")?;
		let second = pair_ty.require_field("second")?;
		Ok(Self {
			first_offset: cc.offset + first.offset,
			first_ty: ctx.types.require(&first.ty)?,
			second_offset: cc.offset + second.offset,
			second_ty: ctx.types.require(&second.ty)?,
		})
	}

	/// Element carrying the mapped value, labelled with the rendered key.
	pub(crate) fn element(&self, ctx: DecodeCtx<'a>, registry: &'a Registry, index: usize, payload_addr: u64) -> Element<'a> {
		let key = TypedValue {
			addr: payload_addr + self.first_offset,
			ty: self.first_ty,
		};
		Element {
			label: format!("[{index}] {}", render_brief(ctx, registry, key)),
			value: ElementValue::Typed(TypedValue {
				addr: payload_addr + self.second_offset,
				ty: self.second_ty,
			}),
		}
	}
}

/// Decoder for the red-black tree shared by `std::set`, `std::map` and
/// their multi variants: in-order traversal from the leftmost node, with
/// an independently stored node count to reconcile against.
pub struct TreeDecoder<'a> {
	ctx: DecodeCtx<'a>,
	registry: &'a Registry,
	display: String,
	begin: u64,
	shape: Option<TreeShape<'a>>,
	pair: Option<PairShape<'a>>,
	size: i64,
}

impl<'a> TreeDecoder<'a> {
	/// Decoder for set-like containers: each element is the key itself.
	pub fn for_set(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, display, value, false)
	}

	/// Decoder for map-like containers: each element splits into a key
	/// label and a mapped value.
	pub fn for_map(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, display, value, true)
	}

	fn build(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>, split: bool) -> Self {
		let mut decoder = Self {
			ctx,
			registry,
			display: display.to_owned(),
			begin: 0,
			shape: None,
			pair: None,
			size: INVALID_SIZE,
		};

		if decoder.locate(value, split).is_err() || !decoder.validate() {
			decoder.size = INVALID_SIZE;
		}
		decoder
	}

	fn locate(&mut self, value: TypedValue<'a>, split: bool) -> Result<()> {
		let tree = value.field(self.ctx.types, "__tree_")?;
		let (begin, node_ty) = tree.ptr_field(self.ctx, "__begin_node_")?;
		self.begin = begin;
		self.size = tree.field(self.ctx.types, "__pair3_")?.uint_field(self.ctx, "__first_")? as i64;

		let shape = TreeShape::of(self.ctx, node_ty)?;
		if split {
			self.pair = Some(PairShape::of(self.ctx, shape.value_ty)?);
		}
		self.shape = Some(shape);
		Ok(())
	}

	fn validate(&self) -> bool {
		if self.size < 0 || self.size as usize > self.ctx.limits.max_elements {
			return false;
		}
		if self.size == 0 {
			return true;
		}
		let Some(shape) = self.shape else {
			return false;
		};
		if self.begin == 0 || !probe(self.ctx.mem, self.begin + shape.value_offset, shape.value_ty.size) {
			return false;
		}
		self.cursor(shape).count() as i64 == self.size
	}

	fn cursor(&self, shape: TreeShape<'a>) -> TreeCursor<'a> {
		TreeCursor {
			mem: self.ctx.mem,
			shape,
			node: self.begin,
			remaining: self.size.max(0) as u64,
			steps: self.ctx.limits.max_elements,
			index: 0,
		}
	}
}

impl<'a> Decoder<'a> for TreeDecoder<'a> {
	fn summary(&self) -> String {
		match self.size {
			0 => "empty".to_owned(),
			size if size > 0 => format!("{} (count={})", self.display, size),
			_ => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		if self.size <= 0 {
			return None;
		}
		let cursor = self.cursor(self.shape?);
		match self.pair {
			Some(pair) => {
				let ctx = self.ctx;
				let registry = self.registry;
				Some(Box::new(cursor.enumerate().map(move |(index, element)| {
					let ElementValue::Typed(payload) = element.value else {
						return element;
					};
					pair.element(ctx, registry, index, payload.addr)
				})))
			}
			None => Some(Box::new(cursor)),
		}
	}
}

/// In-order cursor: leftmost node first, successor via right subtree's
/// leftmost node, else ascend parent links while the node is not its
/// parent's left child. A null parent mid-ascent is a structural fault;
/// the cursor stops there without yielding the current node, so the
/// traversal count falls short of the stored count.
struct TreeCursor<'a> {
	mem: &'a dyn Memory,
	shape: TreeShape<'a>,
	node: u64,
	remaining: u64,
	steps: usize,
	index: usize,
}

impl<'a> TreeCursor<'a> {
	fn hop(&mut self) -> Option<()> {
		self.steps = self.steps.checked_sub(1)?;
		Some(())
	}

	fn successor(&mut self, node: u64) -> Option<u64> {
		let right = self.mem.read_ptr(node + self.shape.right_offset).ok()?;
		if right != 0 {
			let mut current = right;
			loop {
				self.hop()?;
				let left = self.mem.read_ptr(current + self.shape.left_offset).ok()?;
				if left == 0 {
					return Some(current);
				}
				current = left;
			}
		}

		let mut current = node;
		loop {
			self.hop()?;
			let parent = self.mem.read_ptr(current + self.shape.parent_offset).ok()?;
			if parent == 0 {
				return None;
			}
			if self.mem.read_ptr(parent + self.shape.left_offset).ok()? == current {
				return Some(parent);
			}
			current = parent;
		}
	}
}

impl<'a> Iterator for TreeCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.remaining == 0 || self.node == 0 {
			return None;
		}
		let current = self.node;
		self.remaining -= 1;
		if self.remaining > 0 {
			self.node = self.successor(current)?;
		}
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue {
				addr: current + self.shape.value_offset,
				ty: self.shape.value_ty,
			}),
		};
		self.index += 1;
		Some(element)
	}
}
