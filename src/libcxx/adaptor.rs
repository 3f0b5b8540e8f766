use crate::libcxx::decoder::{Decoder, Elements, Hint};
use crate::libcxx::registry::{Registry, render_brief};
use crate::libcxx::value::{DecodeCtx, TypedValue};

/// Decoder for `std::stack`, `std::queue` and `std::priority_queue`: each
/// is a thin wrapper around its backing container member `c`, so the
/// decoder delegates everything to the backing container's decoder and
/// prefixes the adaptor name.
pub struct AdaptorDecoder<'a> {
	ctx: DecodeCtx<'a>,
	registry: &'a Registry,
	display: String,
	backing: Option<TypedValue<'a>>,
	inner: Option<Box<dyn Decoder<'a> + 'a>>,
}

impl<'a> AdaptorDecoder<'a> {
	/// Resolve the backing container member; a layout without it
	/// invalidates the decoder.
	pub fn new(ctx: DecodeCtx<'a>, registry: &'a Registry, display: &str, value: TypedValue<'a>) -> Self {
		let backing = value.field(ctx.types, "c").ok();
		let inner = backing.and_then(|container| registry.resolve(ctx, container));
		Self {
			ctx,
			registry,
			display: display.to_owned(),
			backing,
			inner,
		}
	}
}

impl<'a> Decoder<'a> for AdaptorDecoder<'a> {
	fn summary(&self) -> String {
		match self.backing {
			Some(container) => format!("{} = {}", self.display, render_brief(self.ctx, self.registry, container)),
			None => "invalid".to_owned(),
		}
	}

	fn elements(&self) -> Option<Elements<'a>> {
		self.inner.as_ref()?.elements()
	}

	fn hint(&self) -> Option<Hint> {
		self.inner.as_ref()?.hint()
	}
}
