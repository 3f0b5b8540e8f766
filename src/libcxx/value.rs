use crate::libcxx::layout::{TypeLayout, TypeTable};
use crate::libcxx::mem::Memory;
use crate::libcxx::{CxxError, Result};

/// Borrowed view of one typed location in target memory.
///
/// Values are created fresh per inspection request and never outlive the
/// type table they borrow from; the engine does not retain them.
#[derive(Debug, Clone, Copy)]
pub struct TypedValue<'a> {
	/// Address of the value in target memory.
	pub addr: u64,
	/// Declared layout of the value.
	pub ty: &'a TypeLayout,
}

impl<'a> TypedValue<'a> {
	/// View of a declared field inside this record.
	pub fn field(&self, types: &'a TypeTable, name: &'static str) -> Result<TypedValue<'a>> {
		let field = self.ty.require_field(name)?;
		Ok(TypedValue {
			addr: self.addr + field.offset,
			ty: types.require(&field.ty)?,
		})
	}

	/// View reached by following a chain of field names.
	pub fn walk(&self, types: &'a TypeTable, path: &[&'static str]) -> Result<TypedValue<'a>> {
		let mut current = *self;
		for name in path {
			current = current.field(types, name)?;
		}
		Ok(current)
	}

	/// Stored pointer value of a pointer-typed field, plus the pointee layout.
	pub fn ptr_field(&self, ctx: DecodeCtx<'a>, name: &'static str) -> Result<(u64, &'a TypeLayout)> {
		let field = self.field(ctx.types, name)?;
		let pointee = field.ty.pointee().ok_or_else(|| CxxError::ExpectedPointer {
			type_name: self.ty.name.to_string(),
			field: name,
		})?;
		Ok((ctx.mem.read_ptr(field.addr)?, ctx.types.require(pointee)?))
	}

	/// Stored value of an unsigned integer field.
	pub fn uint_field(&self, ctx: DecodeCtx<'a>, name: &'static str) -> Result<u64> {
		let field = self.field(ctx.types, name)?;
		ctx.mem.read_uint(field.addr, field.ty.size)
	}
}

/// One labelled entry of a container's element sequence.
#[derive(Debug, Clone)]
pub struct Element<'a> {
	/// Display label, `[index]` plus an optional key rendering.
	pub label: String,
	/// Element payload.
	pub value: ElementValue<'a>,
}

/// Payload of one element.
///
/// Packed-bit containers yield computed booleans rather than addressable
/// memory, so the payload is a closed two-variant union.
#[derive(Debug, Clone)]
pub enum ElementValue<'a> {
	/// Memory-backed value the host may dispatch recursively.
	Typed(TypedValue<'a>),
	/// Bit extracted from packed storage.
	Bool(bool),
}

/// Traversal ceilings applied by every decoder.
#[derive(Debug, Clone, Copy)]
pub struct DecodeLimits {
	/// Hard cap on elements visited by any single traversal. Guards against
	/// corrupted links forming unbounded chains.
	pub max_elements: usize,
}

impl Default for DecodeLimits {
	fn default() -> Self {
		Self { max_elements: 65_536 }
	}
}

/// Borrowed decoding context threaded through every decoder.
#[derive(Clone, Copy)]
pub struct DecodeCtx<'a> {
	/// Read-only target memory.
	pub mem: &'a dyn Memory,
	/// Type introspection tables.
	pub types: &'a TypeTable,
	/// Traversal ceilings.
	pub limits: DecodeLimits,
}

impl<'a> DecodeCtx<'a> {
	/// Context over `mem` and `types` with default limits.
	pub fn new(mem: &'a dyn Memory, types: &'a TypeTable) -> Self {
		Self {
			mem,
			types,
			limits: DecodeLimits::default(),
		}
	}
}
