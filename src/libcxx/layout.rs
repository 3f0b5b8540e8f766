use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::libcxx::{CxxError, Result};

/// Structural layout of one declared type in the inspected process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeLayout {
	/// Fully-qualified declared name, template arguments included.
	pub name: Box<str>,
	/// Byte size of one instance.
	pub size: u64,
	/// Scalar, pointer, or record shape.
	pub kind: TypeKind,
	/// Template arguments, where the producer recorded them.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub template_args: Vec<TemplateArg>,
}

/// Shape of a declared type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TypeKind {
	/// Primitive value interpreted directly from bytes.
	Scalar {
		/// Interpretation of the raw bytes.
		scalar: ScalarKind,
	},
	/// Pointer to another declared type.
	Pointer {
		/// Declared pointee type name.
		pointee: Box<str>,
	},
	/// Record with named fields at fixed offsets.
	Struct {
		/// Field declarations in layout order.
		fields: Vec<FieldLayout>,
	},
}

/// Interpretation of a scalar's raw bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalarKind {
	/// Boolean, nonzero means true.
	Bool,
	/// Character unit of the declared width.
	Char,
	/// Two's-complement signed integer.
	SignedInt,
	/// Unsigned integer.
	UnsignedInt,
	/// IEEE-754 float of the declared width.
	Float,
}

/// One field declaration inside a record layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldLayout {
	/// Field name as declared.
	pub name: Box<str>,
	/// Byte offset from the start of the record. Unused for constants.
	#[serde(default)]
	pub offset: u64,
	/// Declared field type name.
	pub ty: Box<str>,
	/// Compile-time constant value for static members. `None` models a
	/// constant the producer could not recover (optimized out).
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<u64>,
}

/// One recorded template argument.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateArg {
	/// Type argument, by declared name.
	Type(Box<str>),
	/// Non-type constant argument.
	Const(u64),
}

/// Name-indexed table of every type layout the snapshot producer exported.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTable {
	types: HashMap<Box<str>, TypeLayout>,
}

impl TypeTable {
	/// Build a table from a flat list of layouts. Later duplicates win.
	pub fn from_layouts(layouts: Vec<TypeLayout>) -> Self {
		let mut types = HashMap::with_capacity(layouts.len());
		for layout in layouts {
			types.insert(layout.name.clone(), layout);
		}
		Self { types }
	}

	/// Look up a layout by declared name.
	pub fn get(&self, name: &str) -> Option<&TypeLayout> {
		self.types.get(name)
	}

	/// Look up a layout by declared name, erroring when absent.
	pub fn require(&self, name: &str) -> Result<&TypeLayout> {
		self.get(name).ok_or_else(|| CxxError::UnknownTypeName { name: name.to_owned() })
	}

	/// Number of layouts in the table.
	pub fn len(&self) -> usize {
		self.types.len()
	}

	/// Whether the table holds no layouts.
	pub fn is_empty(&self) -> bool {
		self.types.is_empty()
	}

	/// Iterate layouts in unspecified order.
	pub fn iter(&self) -> impl Iterator<Item = &TypeLayout> {
		self.types.values()
	}
}

impl TypeLayout {
	/// Find a field declaration by name.
	pub fn field(&self, name: &str) -> Option<&FieldLayout> {
		match &self.kind {
			TypeKind::Struct { fields } => fields.iter().find(|field| field.name.as_ref() == name),
			_ => None,
		}
	}

	/// Find a field declaration by name, erroring when absent.
	pub fn require_field(&self, name: &'static str) -> Result<&FieldLayout> {
		self.field(name).ok_or_else(|| CxxError::MissingField {
			type_name: self.name.to_string(),
			field: name,
		})
	}

	/// Field declarations in layout order, empty for non-records.
	pub fn fields(&self) -> &[FieldLayout] {
		match &self.kind {
			TypeKind::Struct { fields } => fields,
			_ => &[],
		}
	}

	/// Constant value of a static member field, when recorded.
	pub fn constant(&self, name: &str) -> Option<u64> {
		self.field(name).and_then(|field| field.value)
	}

	/// Declared pointee type name when this layout is a pointer.
	pub fn pointee(&self) -> Option<&str> {
		match &self.kind {
			TypeKind::Pointer { pointee } => Some(pointee),
			_ => None,
		}
	}

	/// Type name carried by template argument `index`.
	pub fn template_type(&self, index: usize) -> Option<&str> {
		match self.template_args.get(index) {
			Some(TemplateArg::Type(name)) => Some(name),
			_ => None,
		}
	}

	/// Constant carried by template argument `index`.
	pub fn template_const(&self, index: usize) -> Option<u64> {
		match self.template_args.get(index) {
			Some(TemplateArg::Const(value)) => Some(*value),
			_ => None,
		}
	}

	/// Type name carried by template argument `index`, erroring when absent.
	pub fn require_template_type(&self, index: usize) -> Result<&str> {
		self.template_type(index).ok_or_else(|| CxxError::MissingTemplateArg {
			type_name: self.name.to_string(),
			index,
		})
	}

	/// Constant carried by template argument `index`, erroring when absent.
	pub fn require_template_const(&self, index: usize) -> Result<u64> {
		self.template_const(index).ok_or_else(|| CxxError::MissingTemplateArg {
			type_name: self.name.to_string(),
			index,
		})
	}
}
