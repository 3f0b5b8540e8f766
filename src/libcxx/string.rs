use crate::libcxx::decoder::{Decoder, Elements, Hint, INVALID_SIZE, probe_bounds};
use crate::libcxx::value::{DecodeCtx, TypedValue};
use crate::libcxx::Result;

/// Low bit of the shared size byte selects the long representation.
const LONG_MASK: u64 = 0x1;

/// Decoder for `std::basic_string`.
///
/// The string header is a two-variant union: an inline short buffer and an
/// out-of-line pointer+length, discriminated by the low bit of the short
/// size field. Character width comes from the first template argument.
pub struct StringDecoder<'a> {
	ctx: DecodeCtx<'a>,
	ptr: u64,
	size: i64,
	char_size: u64,
}

impl<'a> StringDecoder<'a> {
	/// Locate the active representation and probe its boundary characters.
	pub fn new(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Self {
		let char_size = value
			.ty
			.template_type(0)
			.and_then(|name| ctx.types.get(name))
			.map(|layout| layout.size.max(1))
			.unwrap_or(1);

		let (ptr, size) = match locate(ctx, value) {
			Ok(found) => found,
			Err(_) => (0, INVALID_SIZE),
		};

		let mut decoder = Self { ctx, ptr, size, char_size };
		if decoder.size >= 0 {
			// Touch the first and last character before trusting the pair;
			// the last slot is one past the content, the terminator.
			let last = decoder.ptr + decoder.size as u64 * decoder.char_size;
			if !probe_bounds(ctx.mem, decoder.ptr, last, decoder.char_size) {
				decoder.ptr = 0;
				decoder.size = INVALID_SIZE;
			}
		}
		decoder
	}

	/// Decoded character content, when valid.
	pub fn content(&self) -> Option<String> {
		if self.size < 0 {
			return None;
		}
		let len = self.size as usize * self.char_size as usize;
		let bytes = self.ctx.mem.read(self.ptr, len).ok()?;
		Some(decode_units(&bytes, self.char_size))
	}
}

impl<'a> Decoder<'a> for StringDecoder<'a> {
	fn summary(&self) -> String {
		match self.content() {
			Some(text) => text,
			None => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		None
	}

	fn hint(&self) -> Option<Hint> {
		if self.size >= 0 { Some(Hint::String) } else { None }
	}
}

fn locate<'a>(ctx: DecodeCtx<'a>, value: TypedValue<'a>) -> Result<(u64, i64)> {
	let rep = value.walk(ctx.types, &["__r_", "__first_"])?;
	let short = rep.field(ctx.types, "__s")?;

	let size_field = short.field(ctx.types, "__size_")?;
	let raw = ctx.mem.read_uint(size_field.addr, size_field.ty.size)?;

	if raw & LONG_MASK == 0 {
		let data = short.field(ctx.types, "__data_")?;
		return Ok((data.addr, (raw >> 1) as i64));
	}

	let long = rep.field(ctx.types, "__l")?;
	let size = long.uint_field(ctx, "__size_")? as i64;
	let (ptr, _) = long.ptr_field(ctx, "__data_")?;
	Ok((ptr, size))
}

fn decode_units(bytes: &[u8], char_size: u64) -> String {
	match char_size {
		2 => bytes
			.chunks_exact(2)
			.map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
			.map(|unit| char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER))
			.collect(),
		4 => bytes
			.chunks_exact(4)
			.map(|quad| u32::from_le_bytes([quad[0], quad[1], quad[2], quad[3]]))
			.map(|unit| char::from_u32(unit).unwrap_or(char::REPLACEMENT_CHARACTER))
			.collect(),
		_ => String::from_utf8_lossy(bytes).into_owned(),
	}
}

#[cfg(test)]
mod tests;
