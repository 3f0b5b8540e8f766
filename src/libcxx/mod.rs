mod adaptor;
mod array;
mod bitset;
mod compression;
mod decoder;
mod deque;
mod error;
mod hash;
mod layout;
mod list;
mod mem;
mod pointer;
mod registry;
mod snapshot;
mod string;
mod tree;
mod tuple;
mod value;
mod vector;

#[cfg(test)]
mod testsupport;

/// Stack, queue and priority_queue decoding.
pub use adaptor::AdaptorDecoder;
/// Fixed-size array decoding.
pub use array::ArrayDecoder;
/// Bitset decoding.
pub use bitset::BitsetDecoder;
/// Compression detection result.
pub use compression::Compression;
/// Decoder contract, invalid sentinel and boundary probes.
pub use decoder::{Decoder, Elements, Hint, INVALID_SIZE, probe, probe_bounds};
/// Deque decoding.
pub use deque::DequeDecoder;
/// Error and result aliases.
pub use error::{CxxError, Result};
/// Unordered container decoding.
pub use hash::HashTableDecoder;
/// Type layout model and lookup table.
pub use layout::{FieldLayout, ScalarKind, TemplateArg, TypeKind, TypeLayout, TypeTable};
/// Linked list decoding.
pub use list::{ForwardListDecoder, ListDecoder};
/// Target memory access.
pub use mem::{Memory, PTR_SIZE, sign_extend, unreadable};
/// Smart pointer decoding.
pub use pointer::PointerDecoder;
/// Name-based decoder dispatch.
pub use registry::{Ctor, Registry, render_brief};
/// Snapshot file loading and the manifest model.
pub use snapshot::{Manifest, RegionManifest, Root, Snapshot};
/// String decoding.
pub use string::StringDecoder;
/// Tree-backed set and map decoding.
pub use tree::TreeDecoder;
/// Pair and tuple decoding.
pub use tuple::{PairDecoder, TupleDecoder};
/// Typed views, elements and decode context.
pub use value::{DecodeCtx, DecodeLimits, Element, ElementValue, TypedValue};
/// Vector and split-buffer decoding.
pub use vector::{DEFAULT_BITS_PER_WORD, SplitBuffer, VectorDecoder};
