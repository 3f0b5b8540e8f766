mod unit_deque_decode {

	use crate::libcxx::decoder::Decoder;
	use crate::libcxx::deque::DequeDecoder;
	use crate::libcxx::layout::{ScalarKind, TemplateArg, TypeTable};
	use crate::libcxx::testsupport::{Image, constant, field, int_ty, pointer_to, record, scalar, table, with_args};
	use crate::libcxx::value::{DecodeCtx, ElementValue, TypedValue};

	const DEQ: u64 = 0x1000;
	const MAP: u64 = 0x2000;
	const BLOCK0: u64 = 0x3000;
	const BLOCK1: u64 = 0x3100;
	const BLOCK_SIZE: u64 = 4;

	fn deque_table() -> TypeTable {
		table(vec![
			int_ty(),
			scalar("unsigned long", 8, ScalarKind::UnsignedInt),
			pointer_to("int*", "int"),
			pointer_to("int**", "int*"),
			record("__map_pair", 8, vec![field("__first_", 0, "int**")]),
			record(
				"__map",
				24,
				vec![field("__begin_", 0, "int**"), field("__end_", 8, "int**"), field("__end_cap_", 16, "__map_pair")],
			),
			record("__deque_pair", 8, vec![field("__first_", 0, "unsigned long")]),
			with_args(
				record(
					"std::__1::deque<int>",
					48,
					vec![
						field("__map_", 0, "__map"),
						field("__start_", 24, "unsigned long"),
						field("__size_", 32, "__deque_pair"),
						constant("__block_size", "unsigned long", BLOCK_SIZE),
					],
				),
				vec![TemplateArg::Type("int".into())],
			),
		])
	}

	fn write_deque(img: &mut Image, map_slots: u64, start: u64, size: u64) {
		img.w64(DEQ, MAP);
		img.w64(DEQ + 8, MAP + map_slots * 8);
		img.w64(DEQ + 16, MAP + map_slots * 8);
		img.w64(DEQ + 24, start);
		img.w64(DEQ + 32, size);
	}

	fn write_blocks(img: &mut Image) {
		img.w64(MAP, BLOCK0);
		img.w64(MAP + 8, BLOCK1);
		for slot in 0..BLOCK_SIZE {
			img.w32(BLOCK0 + slot * 4, slot as u32);
			img.w32(BLOCK1 + slot * 4, 100 + slot as u32);
		}
	}

	fn decode<'a>(ctx: DecodeCtx<'a>) -> DequeDecoder<'a> {
		let ty = ctx.types.require("std::__1::deque<int>").expect("layout exists");
		DequeDecoder::new(ctx, "deque", TypedValue { addr: DEQ, ty })
	}

	#[test]
	fn five_ints_spanning_two_blocks() {
		let types = deque_table();
		let mut img = Image::new(DEQ);
		write_deque(&mut img, 2, 2, 5);
		write_blocks(&mut img);

		let ctx = DecodeCtx::new(&img, &types);
		let decoder = decode(ctx);
		assert_eq!(decoder.summary(), "deque (length=5, capacity=8)");

		let elements: Vec<_> = decoder.elements().expect("elements present").collect();
		assert_eq!(elements.len(), 5);
		for (index, element) in elements.iter().enumerate() {
			assert_eq!(element.label, format!("[{index}]"));
			let ElementValue::Typed(value) = element.value else {
				panic!("expected typed element");
			};

			// Same address the subscript operator would compute.
			let logical = 2 + index as u64;
			let block = if logical / BLOCK_SIZE == 0 { BLOCK0 } else { BLOCK1 };
			assert_eq!(value.addr, block + logical % BLOCK_SIZE * 4);
		}
	}

	#[test]
	fn empty_deque_with_valid_map() {
		let types = deque_table();
		let mut img = Image::new(DEQ);
		write_deque(&mut img, 0, 0, 0);

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "empty");
		assert!(decoder.elements().is_none());
	}

	#[test]
	fn stored_count_exceeding_map_capacity_invalidates() {
		let types = deque_table();
		let mut img = Image::new(DEQ);
		write_deque(&mut img, 2, 0, 9);
		write_blocks(&mut img);

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "invalid");
		assert!(decoder.elements().is_none());
	}

	#[test]
	fn start_offset_beyond_one_block_invalidates() {
		let types = deque_table();
		let mut img = Image::new(DEQ);
		write_deque(&mut img, 2, BLOCK_SIZE, 2);
		write_blocks(&mut img);

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "invalid");
	}

	#[test]
	fn unmapped_block_pointer_fails_the_probe() {
		let types = deque_table();
		let mut img = Image::new(DEQ);
		write_deque(&mut img, 2, 0, 5);
		write_blocks(&mut img);
		img.w64(MAP + 8, 0xdead_0000);

		let decoder = decode(DecodeCtx::new(&img, &types));
		assert_eq!(decoder.summary(), "invalid");
	}
}
