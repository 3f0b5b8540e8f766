//! Synthetic memory images and type layouts for decoder unit tests.

use crate::libcxx::layout::{FieldLayout, ScalarKind, TemplateArg, TypeKind, TypeLayout, TypeTable};
use crate::libcxx::mem::{Memory, unreadable};
use crate::libcxx::Result;

/// One contiguous writable region standing in for target memory. Reads
/// outside the written span fail as unreadable, which is how tests model
/// unmapped addresses.
pub struct Image {
	base: u64,
	bytes: Vec<u8>,
}

impl Image {
	pub fn new(base: u64) -> Self {
		Self { base, bytes: Vec::new() }
	}

	fn ensure(&mut self, end: usize) {
		if self.bytes.len() < end {
			self.bytes.resize(end, 0);
		}
	}

	pub fn wbytes(&mut self, addr: u64, bytes: &[u8]) {
		let off = (addr - self.base) as usize;
		self.ensure(off + bytes.len());
		self.bytes[off..off + bytes.len()].copy_from_slice(bytes);
	}

	pub fn w8(&mut self, addr: u64, value: u8) {
		self.wbytes(addr, &[value]);
	}

	pub fn w16(&mut self, addr: u64, value: u16) {
		self.wbytes(addr, &value.to_le_bytes());
	}

	pub fn w32(&mut self, addr: u64, value: u32) {
		self.wbytes(addr, &value.to_le_bytes());
	}

	pub fn w64(&mut self, addr: u64, value: u64) {
		self.wbytes(addr, &value.to_le_bytes());
	}
}

impl Memory for Image {
	fn read(&self, addr: u64, len: usize) -> Result<Vec<u8>> {
		let start = addr.checked_sub(self.base).ok_or(unreadable(addr, len))? as usize;
		let end = start.checked_add(len).ok_or(unreadable(addr, len))?;
		if end > self.bytes.len() {
			return Err(unreadable(addr, len));
		}
		Ok(self.bytes[start..end].to_vec())
	}
}

pub fn scalar(name: &str, size: u64, kind: ScalarKind) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size,
		kind: TypeKind::Scalar { scalar: kind },
		template_args: Vec::new(),
	}
}

pub fn int_ty() -> TypeLayout {
	scalar("int", 4, ScalarKind::SignedInt)
}

pub fn char_ty() -> TypeLayout {
	scalar("char", 1, ScalarKind::Char)
}

pub fn pointer_to(name: &str, pointee: &str) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size: 8,
		kind: TypeKind::Pointer { pointee: pointee.into() },
		template_args: Vec::new(),
	}
}

pub fn record(name: &str, size: u64, fields: Vec<FieldLayout>) -> TypeLayout {
	TypeLayout {
		name: name.into(),
		size,
		kind: TypeKind::Struct { fields },
		template_args: Vec::new(),
	}
}

pub fn field(name: &str, offset: u64, ty: &str) -> FieldLayout {
	FieldLayout {
		name: name.into(),
		offset,
		ty: ty.into(),
		value: None,
	}
}

pub fn constant(name: &str, ty: &str, value: u64) -> FieldLayout {
	FieldLayout {
		name: name.into(),
		offset: 0,
		ty: ty.into(),
		value: Some(value),
	}
}

pub fn with_args(mut layout: TypeLayout, args: Vec<TemplateArg>) -> TypeLayout {
	layout.template_args = args;
	layout
}

pub fn table(layouts: Vec<TypeLayout>) -> TypeTable {
	TypeTable::from_layouts(layouts)
}
