use std::collections::HashMap;

use crate::libcxx::adaptor::AdaptorDecoder;
use crate::libcxx::array::ArrayDecoder;
use crate::libcxx::bitset::BitsetDecoder;
use crate::libcxx::decoder::{Decoder, Hint};
use crate::libcxx::deque::DequeDecoder;
use crate::libcxx::hash::HashTableDecoder;
use crate::libcxx::layout::{ScalarKind, TypeKind};
use crate::libcxx::list::{ForwardListDecoder, ListDecoder};
use crate::libcxx::pointer::PointerDecoder;
use crate::libcxx::string::StringDecoder;
use crate::libcxx::tree::TreeDecoder;
use crate::libcxx::tuple::{PairDecoder, TupleDecoder};
use crate::libcxx::value::{DecodeCtx, TypedValue};
use crate::libcxx::vector::VectorDecoder;

/// Decoder constructor stored in the dispatch table.
pub type Ctor = for<'a> fn(DecodeCtx<'a>, &'a Registry, &str, TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a>;

struct Entry {
	display: Box<str>,
	ctor: Ctor,
}

/// Name-based dispatch from a declared container type to its decoder.
///
/// Keys are base names with template arguments stripped; each registration
/// also inserts every known namespace-wrapping variant of the name, so a
/// type matches regardless of inline-namespace versioning. Composite
/// decoders receive `&Registry` back as their recursive-dispatch capability.
pub struct Registry {
	table: HashMap<Box<str>, Entry>,
}

impl Default for Registry {
	fn default() -> Self {
		Self::with_defaults()
	}
}

impl Registry {
	/// Registry covering the full libc++ container catalogue.
	pub fn with_defaults() -> Self {
		let mut registry = Self { table: HashMap::new() };

		registry.add_version("std::", "basic_string", "string", string_ctor);
		registry.add_container("std::", "bitset", bitset_ctor);
		registry.add_container("std::", "deque", deque_ctor);
		registry.add_container("std::", "list", list_ctor);
		registry.add_container("std::", "forward_list", forward_list_ctor);
		registry.add_container("std::", "vector", vector_ctor);
		registry.add_container("std::", "array", array_ctor);
		registry.add_container("std::", "set", set_ctor);
		registry.add_container("std::", "multiset", set_ctor);
		registry.add_container("std::", "map", map_ctor);
		registry.add_container("std::", "multimap", map_ctor);
		registry.add_container("std::", "unordered_set", unordered_set_ctor);
		registry.add_container("std::", "unordered_multiset", unordered_set_ctor);
		registry.add_container("std::", "unordered_map", unordered_map_ctor);
		registry.add_container("std::", "unordered_multimap", unordered_map_ctor);
		registry.add_version("std::", "pair", "pair", pair_ctor);
		registry.add_version("std::", "tuple", "tuple", tuple_ctor);
		registry.add_version("std::", "stack", "stack", adaptor_ctor);
		registry.add_version("std::", "queue", "queue", adaptor_ctor);
		registry.add_version("std::", "priority_queue", "priority_queue", adaptor_ctor);
		registry.add_version("std::", "unique_ptr", "unique_ptr", unique_ptr_ctor);
		registry.add_version("std::", "shared_ptr", "shared_ptr", shared_ptr_ctor);
		registry.add_version("std::", "weak_ptr", "weak_ptr", shared_ptr_ctor);

		// Types compiled with the debug-mode namespace wrapper.
		for (name, ctor) in DEBUG_NAMES {
			registry.add(&format!("std::__debug::{name}"), name, *ctor);
		}

		registry
	}

	fn add(&mut self, pattern: &str, display: &str, ctor: Ctor) {
		self.table.insert(
			pattern.into(),
			Entry {
				display: display.into(),
				ctor,
			},
		);
	}

	/// Register `name` under `base` and under the versioning inline
	/// namespace inside `base`.
	fn add_version(&mut self, base: &str, name: &str, display: &str, ctor: Ctor) {
		self.add(&format!("{base}{name}"), display, ctor);
		self.add(&format!("{base}__1::{name}"), display, ctor);
	}

	/// Register `name` under every container-namespace wrapping of `base`.
	fn add_container(&mut self, base: &str, name: &str, ctor: Ctor) {
		self.add_version(base, name, name, ctor);
		self.add_version(&format!("{base}__cxx2011::"), name, name, ctor);
	}

	/// Base name of a templated type: namespace path kept, template
	/// argument list stripped. `None` for non-template names.
	pub fn base_name(type_name: &str) -> Option<&str> {
		let trimmed = type_name.trim();
		let open = trimmed.find('<')?;
		if !trimmed.ends_with('>') {
			return None;
		}
		Some(trimmed[..open].trim_end())
	}

	/// Whether a declared type name dispatches to some decoder.
	pub fn matches(&self, type_name: &str) -> bool {
		Self::base_name(type_name).is_some_and(|base| self.table.contains_key(base))
	}

	/// Construct the decoder for `value`, or `None` when no decoder matches
	/// its declared type name. An unknown type is a decline, not an error.
	pub fn resolve<'a>(&'a self, ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Option<Box<dyn Decoder<'a> + 'a>> {
		let base = Self::base_name(&value.ty.name)?;
		let entry = self.table.get(base)?;
		Some((entry.ctor)(ctx, self, &entry.display, value))
	}
}

const DEBUG_NAMES: &[(&str, Ctor)] = &[
	("bitset", bitset_ctor),
	("deque", deque_ctor),
	("list", list_ctor),
	("forward_list", forward_list_ctor),
	("vector", vector_ctor),
	("array", array_ctor),
	("set", set_ctor),
	("multiset", set_ctor),
	("map", map_ctor),
	("multimap", map_ctor),
	("unordered_set", unordered_set_ctor),
	("unordered_multiset", unordered_set_ctor),
	("unordered_map", unordered_map_ctor),
	("unordered_multimap", unordered_map_ctor),
	("stack", adaptor_ctor),
	("queue", adaptor_ctor),
	("priority_queue", adaptor_ctor),
	("unique_ptr", unique_ptr_ctor),
];

/// Label-quality rendering of one typed value: a resolved decoder's summary
/// (quoted for string-like values), or a scalar formatted from raw bytes.
/// Used for map key labels and smart-pointer summaries.
pub fn render_brief<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, value: TypedValue<'a>) -> String {
	if let Some(decoder) = registry.resolve(ctx, value) {
		let summary = decoder.summary();
		return match decoder.hint() {
			Some(Hint::String) => format!("\"{summary}\""),
			None => summary,
		};
	}
	render_scalar(ctx, value)
}

fn render_scalar(ctx: DecodeCtx<'_>, value: TypedValue<'_>) -> String {
	let rendered = match &value.ty.kind {
		TypeKind::Scalar { scalar } => render_scalar_kind(ctx, value, *scalar),
		TypeKind::Pointer { .. } => ctx.mem.read_ptr(value.addr).map(|ptr| format!("0x{ptr:x}")),
		TypeKind::Struct { .. } => return "{...}".to_owned(),
	};
	rendered.unwrap_or_else(|_| "<unreadable>".to_owned())
}

fn render_scalar_kind(ctx: DecodeCtx<'_>, value: TypedValue<'_>, kind: ScalarKind) -> crate::libcxx::Result<String> {
	let size = value.ty.size.max(1);
	Ok(match kind {
		ScalarKind::Bool => {
			if ctx.mem.read_uint(value.addr, size)? != 0 {
				"true".to_owned()
			} else {
				"false".to_owned()
			}
		}
		ScalarKind::Char => {
			let raw = ctx.mem.read_uint(value.addr, size)?;
			match char::from_u32(raw as u32) {
				Some(ch) if !ch.is_control() => format!("'{ch}'"),
				_ => raw.to_string(),
			}
		}
		ScalarKind::SignedInt => ctx.mem.read_int(value.addr, size)?.to_string(),
		ScalarKind::UnsignedInt => ctx.mem.read_uint(value.addr, size)?.to_string(),
		ScalarKind::Float => {
			let raw = ctx.mem.read_uint(value.addr, size)?;
			if size == 4 {
				f32::from_bits(raw as u32).to_string()
			} else {
				f64::from_bits(raw).to_string()
			}
		}
	})
}

fn string_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(StringDecoder::new(ctx, value))
}

fn vector_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(VectorDecoder::new(ctx, display, value))
}

fn array_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(ArrayDecoder::new(ctx, value))
}

fn deque_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(DequeDecoder::new(ctx, display, value))
}

fn list_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(ListDecoder::new(ctx, display, value))
}

fn forward_list_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(ForwardListDecoder::new(ctx, display, value))
}

fn set_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(TreeDecoder::for_set(ctx, registry, display, value))
}

fn map_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(TreeDecoder::for_map(ctx, registry, display, value))
}

fn unordered_set_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(HashTableDecoder::for_set(ctx, registry, display, value))
}

fn unordered_map_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(HashTableDecoder::for_map(ctx, registry, display, value))
}

fn pair_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(PairDecoder::new(ctx, value))
}

fn tuple_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(TupleDecoder::new(ctx, value))
}

fn adaptor_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(AdaptorDecoder::new(ctx, registry, display, value))
}

fn unique_ptr_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(PointerDecoder::for_unique(ctx, registry, value))
}

fn shared_ptr_ctor<'a>(ctx: DecodeCtx<'a>, registry: &'a Registry, _display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(PointerDecoder::for_shared(ctx, registry, value))
}

fn bitset_ctor<'a>(ctx: DecodeCtx<'a>, _registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Box<dyn Decoder<'a> + 'a> {
	Box::new(BitsetDecoder::new(ctx, display, value))
}

#[cfg(test)]
mod tests;
