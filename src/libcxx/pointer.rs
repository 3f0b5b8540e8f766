use crate::libcxx::decoder::{Decoder, Elements, probe};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::registry::{Registry, render_brief};
use crate::libcxx::value::{DecodeCtx, TypedValue};
use crate::libcxx::Result;

enum Target<'a> {
	Invalid,
	Null,
	Object(TypedValue<'a>),
}

/// Decoder for the owning smart pointers. A null pointer is a valid empty
/// state; a non-null pointer is dereferenced and, when the pointee's type
/// dispatches to a decoder of its own, that inner decoder supplies both
/// the summary detail and the forwarded element sequence.
pub struct PointerDecoder<'a> {
	ctx: DecodeCtx<'a>,
	registry: &'a Registry,
	target: Target<'a>,
	inner: Option<Box<dyn Decoder<'a> + 'a>>,
}

impl<'a> PointerDecoder<'a> {
	/// Decoder for `std::unique_ptr`: the raw pointer sits inside the
	/// pointer/deleter compressed pair.
	pub fn for_unique(ctx: DecodeCtx<'a>, registry: &'a Registry, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, locate_unique(ctx, value))
	}

	/// Decoder for `std::shared_ptr` and `std::weak_ptr`: the raw pointer
	/// is a direct member.
	pub fn for_shared(ctx: DecodeCtx<'a>, registry: &'a Registry, value: TypedValue<'a>) -> Self {
		Self::build(ctx, registry, value.ptr_field(ctx, "__ptr_"))
	}

	fn build(ctx: DecodeCtx<'a>, registry: &'a Registry, located: Result<(u64, &'a TypeLayout)>) -> Self {
		let target = match located {
			Err(_) => Target::Invalid,
			Ok((0, _)) => Target::Null,
			Ok((ptr, ty)) => {
				let pointee = TypedValue { addr: ptr, ty };
				if probe(ctx.mem, ptr, ty.size.max(1)) {
					Target::Object(pointee)
				} else {
					Target::Invalid
				}
			}
		};
		let inner = match &target {
			Target::Object(pointee) => registry.resolve(ctx, *pointee),
			_ => None,
		};
		Self {
			ctx,
			registry,
			target,
			inner,
		}
	}
}

fn locate_unique<'a>(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Result<(u64, &'a TypeLayout)> {
	let pair = value.field(ctx.types, "__ptr_")?;
	pair.ptr_field(ctx, "__first_")
}

impl<'a> Decoder<'a> for PointerDecoder<'a> {
	fn summary(&self) -> String {
		match &self.target {
			Target::Invalid => "invalid".to_owned(),
			Target::Null => "empty".to_owned(),
			Target::Object(pointee) => {
				format!("0x{:x} => {}", pointee.addr, render_brief(self.ctx, self.registry, *pointee))
			}
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		self.inner.as_ref()?.elements()
	}
}
