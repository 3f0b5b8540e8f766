use crate::libcxx::decoder::{Decoder, Elements};
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::Result;

/// Decoder for `std::pair`: two inline members, no indirection to probe.
pub struct PairDecoder<'a> {
	halves: Option<(TypedValue<'a>, TypedValue<'a>)>,
}

impl<'a> PairDecoder<'a> {
	/// Split the pair into its members; a layout missing either member
	/// invalidates the decoder.
	pub fn new(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Self {
		let halves = value
			.field(ctx.types, "first")
			.and_then(|first| Ok((first, value.field(ctx.types, "second")?)))
			.ok();
		Self { halves }
	}
}

impl<'a> Decoder<'a> for PairDecoder<'a> {
	fn summary(&self) -> String {
		match self.halves {
			Some(_) => "pair".to_owned(),
			None => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		let (first, second) = self.halves?;
		Some(Box::new(
			[
				Element {
					label: "[0] = first ".to_owned(),
					value: ElementValue::Typed(first),
				},
				Element {
					label: "[1] = second".to_owned(),
					value: ElementValue::Typed(second),
				},
			]
			.into_iter(),
		))
	}
}

/// Decoder for `std::tuple`: the element leaves are the fields of the
/// nested implementation base, each leaf holding the element in its
/// `value` member. Leaves are resolved eagerly since the whole tuple is
/// inline memory.
pub struct TupleDecoder<'a> {
	leaves: Option<Vec<TypedValue<'a>>>,
}

impl<'a> TupleDecoder<'a> {
	/// Resolve every leaf of the tuple; an unexpected layout invalidates
	/// the decoder.
	pub fn new(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Self {
		Self {
			leaves: Self::locate(ctx, value).ok(),
		}
	}

	fn locate(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Result<Vec<TypedValue<'a>>> {
		let base = value.field(ctx.types, "base_")?;
		let mut leaves = Vec::with_capacity(base.ty.fields().len());
		for leaf_field in base.ty.fields() {
			let leaf_ty = ctx.types.require(&leaf_field.ty)?;
			let held = leaf_ty.require_field("value")?;
			leaves.push(TypedValue {
				addr: base.addr + leaf_field.offset + held.offset,
				ty: ctx.types.require(&held.ty)?,
			});
		}
		Ok(leaves)
	}
}

impl<'a> Decoder<'a> for TupleDecoder<'a> {
	fn summary(&self) -> String {
		match &self.leaves {
			Some(leaves) if leaves.is_empty() => "empty".to_owned(),
			Some(_) => "tuple".to_owned(),
			None => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		let leaves = self.leaves.as_ref()?;
		if leaves.is_empty() {
			return None;
		}
		let elements: Vec<Element<'a>> = leaves
			.iter()
			.enumerate()
			.map(|(index, leaf)| Element {
				label: format!("[{index}]"),
				value: ElementValue::Typed(*leaf),
			})
			.collect();
		Some(Box::new(elements.into_iter()))
	}
}
