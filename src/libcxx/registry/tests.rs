mod unit_name_dispatch {

	use crate::libcxx::registry::Registry;

	#[test]
	fn base_name_strips_template_arguments() {
		assert_eq!(Registry::base_name("std::__1::vector<int>"), Some("std::__1::vector"));
		assert_eq!(
			Registry::base_name("std::__1::map<int, std::__1::basic_string<char>>"),
			Some("std::__1::map"),
		);
		assert_eq!(Registry::base_name("std::__1::mutex"), None);
		assert_eq!(Registry::base_name("std::__1::vector<int>::iterator"), None);
	}

	#[test]
	fn every_namespace_variant_dispatches() {
		let registry = Registry::with_defaults();
		for name in [
			"std::vector<int>",
			"std::__1::vector<int>",
			"std::__cxx2011::vector<int>",
			"std::__cxx2011::__1::vector<int>",
			"std::__debug::vector<int>",
		] {
			assert!(registry.matches(name), "expected dispatch for {name}");
		}
	}

	#[test]
	fn catalogue_covers_the_container_families() {
		let registry = Registry::with_defaults();
		for name in [
			"std::__1::basic_string<char>",
			"std::__1::array<int, 3>",
			"std::__1::deque<int>",
			"std::__1::forward_list<int>",
			"std::__1::multiset<int>",
			"std::__1::unordered_multimap<int, int>",
			"std::__1::pair<int, int>",
			"std::__1::tuple<int, char>",
			"std::__1::priority_queue<int>",
			"std::__1::shared_ptr<int>",
			"std::__1::weak_ptr<int>",
			"std::__1::unique_ptr<int>",
			"std::__1::bitset<8>",
		] {
			assert!(registry.matches(name), "expected dispatch for {name}");
		}
		assert!(!registry.matches("std::__1::atomic<int>"));
		assert!(!registry.matches("int"));
	}

	#[test]
	fn unknown_type_resolves_to_none() {
		let registry = Registry::with_defaults();
		let types = crate::libcxx::testsupport::table(vec![crate::libcxx::testsupport::int_ty()]);
		let img = crate::libcxx::testsupport::Image::new(0x1000);
		let ctx = crate::libcxx::value::DecodeCtx::new(&img, &types);
		let ty = types.require("int").expect("layout exists");
		assert!(registry.resolve(ctx, crate::libcxx::value::TypedValue { addr: 0x1000, ty }).is_none());
	}
}

mod unit_render_brief {

	use crate::libcxx::registry::{Registry, render_brief};
	use crate::libcxx::testsupport::{Image, field, int_ty, pointer_to, record, scalar, table};
	use crate::libcxx::layout::ScalarKind;
	use crate::libcxx::value::{DecodeCtx, TypedValue};

	const ADDR: u64 = 0x1000;

	#[test]
	fn scalars_render_from_raw_bytes() {
		let types = table(vec![
			int_ty(),
			scalar("bool", 1, ScalarKind::Bool),
			scalar("char", 1, ScalarKind::Char),
			scalar("double", 8, ScalarKind::Float),
		]);
		let registry = Registry::with_defaults();
		let mut img = Image::new(ADDR);
		img.w32(ADDR, (-7_i32) as u32);
		img.w8(ADDR + 4, 1);
		img.w8(ADDR + 5, b'q');
		img.w64(ADDR + 8, 2.5_f64.to_bits());

		let ctx = DecodeCtx::new(&img, &types);
		let int_val = TypedValue { addr: ADDR, ty: types.require("int").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, int_val), "-7");
		let bool_val = TypedValue { addr: ADDR + 4, ty: types.require("bool").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, bool_val), "true");
		let char_val = TypedValue { addr: ADDR + 5, ty: types.require("char").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, char_val), "'q'");
		let float_val = TypedValue { addr: ADDR + 8, ty: types.require("double").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, float_val), "2.5");
	}

	#[test]
	fn pointers_and_records_render_opaque() {
		let types = table(vec![
			int_ty(),
			pointer_to("int*", "int"),
			record("plain", 4, vec![field("member", 0, "int")]),
		]);
		let registry = Registry::with_defaults();
		let mut img = Image::new(ADDR);
		img.w64(ADDR, 0xbeef);

		let ctx = DecodeCtx::new(&img, &types);
		let ptr_val = TypedValue { addr: ADDR, ty: types.require("int*").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, ptr_val), "0xbeef");
		let record_val = TypedValue { addr: ADDR, ty: types.require("plain").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, record_val), "{...}");
	}

	#[test]
	fn unreadable_scalar_renders_placeholder() {
		let types = table(vec![int_ty()]);
		let registry = Registry::with_defaults();
		let img = Image::new(ADDR);

		let ctx = DecodeCtx::new(&img, &types);
		let value = TypedValue { addr: 0xdead_0000, ty: types.require("int").expect("layout exists") };
		assert_eq!(render_brief(ctx, &registry, value), "<unreadable>");
	}
}
