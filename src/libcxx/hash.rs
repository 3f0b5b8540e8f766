use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE, probe};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::mem::Memory;
use crate::libcxx::registry::Registry;
use crate::libcxx::tree::PairShape;
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::{CxxError, Result};

/// Decoder for the hash table behind the unordered containers. Every
/// element sits on one singly-linked chain threaded through all buckets,
/// headed by the table's first-node link; the bucket array itself never
/// needs to be touched. The stored element count is reconciled against a
/// full walk of that chain.
pub struct HashTableDecoder<'a> {
	ctx: DecodeCtx<'a>,
	registry: &'a Registry,
	display: String,
	head: u64,
	next_offset: u64,
	value_offset: u64,
	value_ty: Option<&'a TypeLayout>,
	pair: Option<PairShape<'a>>,
	size: i64,
}

impl<'a> HashTableDecoder<'a> {
	/// Decoder for `unordered_set` and `unordered_multiset`.
	pub fn for_set(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, display, value, false)
	}

	/// Decoder for `unordered_map` and `unordered_multimap`.
	pub fn for_map(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, display, value, true)
	}

	fn build(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>, split: bool) -> Self {
		let mut decoder = Self {
			ctx,
			registry,
			display: display.to_owned(),
			head: 0,
			next_offset: 0,
			value_offset: 0,
			value_ty: None,
			pair: None,
			size: INVALID_SIZE,
		};

		if decoder.locate(value, split).is_err() || !decoder.validate() {
			decoder.size = INVALID_SIZE;
		}
		decoder
	}

	fn locate(&mut self, value: TypedValue<'a>, split: bool) -> Result<()> {
		let hash_table = value.field(self.ctx.types, "__table_")?;
		self.size = hash_table.field(self.ctx.types, "__p2_")?.uint_field(self.ctx, "__first_")? as i64;

		let first = hash_table.walk(self.ctx.types, &["__p1_", "__first_"])?;
		let next_field = first.ty.require_field("__next_")?;
		let node_ty = self.ctx.types.require(self.ctx.types.require(&next_field.ty)?.pointee().ok_or(CxxError::ExpectedPointer {
			type_name: first.ty.name.to_string(),
			field: "__next_",
		})?)?;
		self.head = self.ctx.mem.read_ptr(first.addr + next_field.offset)?;

		self.next_offset = node_ty.require_field("__next_")?.offset;
		let value_field = node_ty.require_field("__value_")?;
		self.value_offset = value_field.offset;
		let value_ty = self.ctx.types.require(&value_field.ty)?;
		if split {
			self.pair = Some(PairShape::of(self.ctx, value_ty)?);
		}
		self.value_ty = Some(value_ty);
		Ok(())
	}

	fn validate(&self) -> bool {
		if self.size < 0 || self.size as usize > self.ctx.limits.max_elements {
			return false;
		}
		if self.size == 0 {
			return true;
		}
		let Some(value_ty) = self.value_ty else {
			return false;
		};
		if self.head == 0 || !probe(self.ctx.mem, self.head + self.value_offset, value_ty.size) {
			return false;
		}
		matches!(self.walk_count(), Ok(count) if count == self.size)
	}

	fn walk_count(&self) -> Result<i64> {
		let mut node = self.head;
		let mut count = 0_i64;
		while node != 0 {
			if count as usize >= self.ctx.limits.max_elements {
				return Err(CxxError::Inconsistent {
					what: "hash table chain",
					stored: self.size,
					derived: count,
				});
			}
			node = self.ctx.mem.read_ptr(node + self.next_offset)?;
			count += 1;
		}
		Ok(count)
	}

	fn cursor(&self, value_ty: &'a TypeLayout) -> ChainCursor<'a> {
		ChainCursor {
			mem: self.ctx.mem,
			next_offset: self.next_offset,
			value_offset: self.value_offset,
			value_ty,
			current: self.head,
			index: 0,
		}
	}
}

impl<'a> Decoder<'a> for HashTableDecoder<'a> {
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
		let cursor = self.cursor(self.value_ty?);
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

struct ChainCursor<'a> {
	mem: &'a dyn Memory,
	next_offset: u64,
	value_offset: u64,
	value_ty: &'a TypeLayout,
	current: u64,
	index: usize,
}

impl<'a> Iterator for ChainCursor<'a> {
	type Item = Element<'a>;

	fn next(&mut self) -> Option<Element<'a>> {
		if self.current == 0 {
			return None;
		}
		let next = self.mem.read_ptr(self.current + self.next_offset).ok()?;
		let element = Element {
			label: format!("[{}]", self.index),
			value: ElementValue::Typed(TypedValue {
				addr: self.current + self.value_offset,
				ty: self.value_ty,
			}),
		};
		self.current = next;
		self.index += 1;
		Some(element)
	}
}
