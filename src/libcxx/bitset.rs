use crate::libcxx::decoder::{Decoder, Elements};
use crate::libcxx::value::{DecodeCtx, Element, ElementValue, TypedValue};
use crate::libcxx::vector::DEFAULT_BITS_PER_WORD;
use crate::libcxx::Result;

/// Decoder for `std::bitset`. The declared width is the first template
/// argument; storage is a word array at `__first_`. Word geometry comes
/// from the `__n_words` and `__bits_per_word` constants, with derived
/// fallbacks when the producer could not recover them. Set-bit positions
/// are collected eagerly at construction since the whole object is inline.
pub struct BitsetDecoder {
	display: String,
	bit_count: u64,
	set_bits: Option<Vec<u64>>,
}

impl BitsetDecoder {
	/// Read every storage word and collect the set-bit positions; an
	/// unreadable word or an implausible geometry invalidates the decoder.
	pub fn new(ctx: DecodeCtx<'_>, display: &str, value: TypedValue<'_>) -> Self {
		let bit_count = value.ty.template_const(0).unwrap_or(0);
		Self {
			display: display.to_owned(),
			bit_count,
			set_bits: collect_set_bits(ctx, value, bit_count).ok(),
		}
	}
}

fn collect_set_bits(ctx: DecodeCtx<'_>, value: TypedValue<'_>, bit_count: u64) -> Result<Vec<u64>> {
	let first = value.ty.require_field("__first_")?;
	let bits_per_word = value.ty.constant("__bits_per_word").unwrap_or(DEFAULT_BITS_PER_WORD).max(1);
	let word_count = value.ty.constant("__n_words").unwrap_or(bit_count.div_ceil(bits_per_word));
	if bit_count as usize > ctx.limits.max_elements {
		return Err(crate::libcxx::CxxError::Inconsistent {
			what: "bitset width",
			stored: bit_count as i64,
			derived: ctx.limits.max_elements as i64,
		});
	}

	let word_size = (bits_per_word / 8).max(1);
	let mut set_bits = Vec::new();
	for word_index in 0..word_count {
		let mut word = ctx.mem.read_uint(value.addr + first.offset + word_index * word_size, word_size)?;
		let mut bit_index = 0_u64;
		while word != 0 {
			if word & 0x1 != 0 {
				set_bits.push(word_index * bits_per_word + bit_index);
			}
			word >>= 1;
			bit_index += 1;
		}
	}
	Ok(set_bits)
}

impl<'a> Decoder<'a> for BitsetDecoder {
	fn summary(&self) -> String {
		match self.set_bits {
			Some(_) => format!("{} (length={})", self.display, self.bit_count),
			None => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		let set_bits = self.set_bits.clone()?;
		if set_bits.is_empty() {
			return None;
		}
		Some(Box::new(set_bits.into_iter().map(|position| Element {
			label: format!("[{position}]"),
			value: ElementValue::Bool(true),
		})))
	}
}
