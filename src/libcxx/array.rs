use crate::libcxx::decoder::{Decoder, Elements, INVALID_SIZE};
use crate::libcxx::layout::TypeLayout;
use crate::libcxx::value::{DecodeCtx, TypedValue};
use crate::libcxx::vector::PtrCursor;

/// Decoder for `std::array`. Length is a compile-time constant from the
/// type's template arguments; beyond basic readability there is nothing to
/// validate.
pub struct ArrayDecoder<'a> {
	base: u64,
	size: i64,
	elem: Option<&'a TypeLayout>,
}

impl<'a> ArrayDecoder<'a> {
	/// Read element type and length from the template arguments.
	pub fn new(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Self {
		let located = (|| {
			let elem = ctx.types.require(value.ty.require_template_type(0)?)?;
			let size = value.ty.require_template_const(1)?;
			let base = value.field(ctx.types, "__elems_")?.addr;
			Ok::<_, crate::libcxx::CxxError>((base, size, elem))
		})();

		match located {
			Ok((base, size, elem)) => Self {
				base,
				size: size as i64,
				elem: Some(elem),
			},
			Err(_) => Self {
				base: 0,
				size: INVALID_SIZE,
				elem: None,
			},
		}
	}
}

impl<'a> Decoder<'a> for ArrayDecoder<'a> {
	fn summary(&self) -> String {
		if self.size < 0 {
			return "invalid".to_owned();
		}
		format!("(length={})", self.size)
	}

	fn elements(&self) -> Option<Elements<'a>> {
		let elem = self.elem.filter(|_| self.size > 0)?;
		Some(Box::new(PtrCursor {
			addr: self.base,
			end: self.base + self.size as u64 * elem.size.max(1),
			elem,
			index: 0,
		}))
	}
}
