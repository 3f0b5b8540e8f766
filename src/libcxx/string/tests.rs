mod unit_string_decode {

	use crate::libcxx::decoder::{Decoder, Hint};
	use crate::libcxx::layout::{ScalarKind, TemplateArg, TypeTable};
	use crate::libcxx::string::StringDecoder;
	use crate::libcxx::testsupport::{Image, field, pointer_to, record, scalar, table, with_args};
	use crate::libcxx::value::{DecodeCtx, TypedValue};

	const STR: u64 = 0x1000;
	const HEAP: u64 = 0x2000;

	fn string_table() -> TypeTable {
		table(vec![
			scalar("char", 1, ScalarKind::Char),
			scalar("unsigned char", 1, ScalarKind::UnsignedInt),
			scalar("unsigned long", 8, ScalarKind::UnsignedInt),
			pointer_to("char*", "char"),
			record("__short", 24, vec![field("__size_", 0, "unsigned char"), field("__data_", 1, "char")]),
			record(
				"__long",
				24,
				vec![
					field("__cap_", 0, "unsigned long"),
					field("__size_", 8, "unsigned long"),
					field("__data_", 16, "char*"),
				],
			),
			record("__rep", 24, vec![field("__s", 0, "__short"), field("__l", 0, "__long")]),
			record("__pair", 24, vec![field("__first_", 0, "__rep")]),
			with_args(
				record("std::__1::basic_string<char>", 24, vec![field("__r_", 0, "__pair")]),
				vec![TemplateArg::Type("char".into())],
			),
		])
	}

	fn write_short(img: &mut Image, text: &str) {
		img.w8(STR, (text.len() as u8) << 1);
		img.wbytes(STR + 1, text.as_bytes());
		img.w8(STR + 1 + text.len() as u64, 0);
	}

	fn write_long(img: &mut Image, text: &str) {
		img.w8(STR, 0x1);
		img.w64(STR + 8, text.len() as u64);
		img.w64(STR + 16, HEAP);
		img.wbytes(HEAP, text.as_bytes());
		img.w8(HEAP + text.len() as u64, 0);
	}

	fn decode<'a>(ctx: DecodeCtx<'a>) -> StringDecoder<'a> {
		let ty = ctx.types.require("std::__1::basic_string<char>").expect("layout exists");
		StringDecoder::new(ctx, TypedValue { addr: STR, ty })
	}

	#[test]
	fn short_representation_decodes_inline_content() {
		let types = string_table();
		let mut img = Image::new(STR);
		write_short(&mut img, "hi");

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "hi");
		assert_eq!(decoder.hint(), Some(Hint::String));
		assert!(decoder.elements().is_none());
	}

	#[test]
	fn long_representation_decodes_heap_content() {
		let types = string_table();
		let mut img = Image::new(STR);
		write_long(&mut img, "hello");

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "hello");
	}

	#[test]
	fn short_and_long_of_same_content_summarize_identically() {
		let types = string_table();

		let mut short_img = Image::new(STR);
		write_short(&mut short_img, "roundtrip");
		let short = decode(DecodeCtx::new(&short_img, &types)).summary();

		let mut long_img = Image::new(STR);
		write_long(&mut long_img, "roundtrip");
		let long = decode(DecodeCtx::new(&long_img, &types)).summary();

		assert_eq!(short, long);
	}

	#[test]
	fn empty_short_string_is_valid_and_empty() {
		let types = string_table();
		let mut img = Image::new(STR);
		write_short(&mut img, "");

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "");
		assert_eq!(decoder.hint(), Some(Hint::String));
	}

	#[test]
	fn unmapped_long_pointer_invalidates() {
		let types = string_table();
		let mut img = Image::new(STR);
		img.w8(STR, 0x1);
		img.w64(STR + 8, 5);
		img.w64(STR + 16, 0xdead_0000);

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "invalid");
		assert_eq!(decoder.hint(), None);
	}
}
