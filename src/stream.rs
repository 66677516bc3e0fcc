//! The public streaming-input facade (spec §6's "Stream facade"): wraps a
//! [`Chain`] with the entry points callers actually use — construction from
//! a buffer, append/trim/freeze/reset, and handing out [`View`]s and
//! iterators. `Chain`, `Chunk`, `View` and the iterators stay as separate,
//! independently testable modules (mirroring the teacher's one-concept-per-file
//! layout); this module is the thin front door spec §6 describes, analogous
//! to `facade.rs` for the regex side.

use crate::chain::{Chain, Statistics};
use crate::chunk::Chunk;
use crate::error::StreamError;
use crate::stream_iter::{FastIter, SafeIter};
use crate::view::View;

/// An incrementally-fed byte stream. Construct empty and `append` as data
/// arrives, or seed it from an initial buffer; `freeze` once no more data
/// will ever come, so readers waiting on a [`StreamError::WouldBlock`] know
/// to give up instead of retrying.
#[derive(Debug)]
pub struct Stream<'a> {
	chain: Chain<'a>,
}

impl<'a> Stream<'a> {
	pub fn new() -> Self {
		Self { chain: Chain::new() }
	}

	/// Seeds the stream with an initial owned copy of `data`.
	pub fn from_owned(data: Vec<u8>) -> Self {
		let mut stream: Self = Self::new();
		if !data.is_empty() {
			stream.chain.append(Chunk::owning(0, data)).expect("appending to a fresh chain never fails");
		}
		stream
	}

	/// Seeds the stream with a non-owning view of `data`; per spec §4.E, the
	/// caller must keep `data` alive for as long as this stream exists
	/// (enforced here by tying the chunk to `data`'s borrow via `'a`), or
	/// call [`Self::append`] again to force a promotion to owning.
	pub fn from_borrowed(data: &'a [u8]) -> Self {
		let mut stream: Self = Self::new();
		if !data.is_empty() {
			stream.chain.append(Chunk::borrowed(0, data)).expect("appending to a fresh chain never fails");
		}
		stream
	}

	/// Appends an owned copy of `data` at the current tail. A no-op for
	/// empty `data`, even on a frozen stream (spec §4.E).
	pub fn append(&mut self, data: &[u8]) -> Result<(), StreamError> {
		if data.is_empty() {
			return Ok(());
		}
		let offset: u64 = self.chain.end_offset();
		self.chain.append(Chunk::owning(offset, data.to_vec()))
	}

	/// Appends a non-owning reference to `data`. Any subsequent append
	/// forces this chunk to copy its bytes ([`Chunk::make_owning`]), so the
	/// caller only needs `data` to outlive the *next* append, not the whole
	/// stream.
	pub fn append_borrowed(&mut self, data: &'a [u8]) -> Result<(), StreamError> {
		if data.is_empty() {
			return Ok(());
		}
		let offset: u64 = self.chain.end_offset();
		self.chain.append(Chunk::borrowed(offset, data))
	}

	/// Appends a gap of `len` known-but-unavailable bytes.
	pub fn append_gap(&mut self, len: usize) -> Result<(), StreamError> {
		if len == 0 {
			return Ok(());
		}
		let offset: u64 = self.chain.end_offset();
		self.chain.append(Chunk::gap(offset, len))
	}

	/// Trims everything before `it`'s current offset.
	pub fn trim(&mut self, it: &SafeIter<'a, '_>) -> Result<(), StreamError> {
		self.chain.trim(it.position())
	}

	/// Trims everything before `offset` directly, for callers that already
	/// have a raw offset rather than a live iterator.
	pub fn trim_offset(&mut self, offset: u64) -> Result<(), StreamError> {
		self.chain.trim(offset)
	}

	pub fn freeze(&mut self) {
		self.chain.freeze();
	}

	pub fn unfreeze(&mut self) -> Result<(), StreamError> {
		self.chain.unfreeze()
	}

	pub fn reset(&mut self) {
		self.chain.reset();
	}

	pub fn is_frozen(&self) -> bool {
		self.chain.is_frozen()
	}

	pub fn statistics(&self) -> Statistics {
		self.chain.statistics()
	}

	/// An open-ended view starting at `begin`, tracking the stream's tail as
	/// it grows.
	pub fn view(&self, begin: u64) -> View<'a, '_> {
		View::new(&self.chain, begin)
	}

	/// A fixed `[begin, end)` view.
	pub fn view_fixed(&self, begin: u64, end: u64) -> View<'a, '_> {
		View::fixed(&self.chain, begin, end)
	}

	pub fn safe_iter(&self, pos: u64) -> SafeIter<'a, '_> {
		SafeIter::new(&self.chain, pos)
	}

	pub fn fast_iter(&self, pos: u64) -> FastIter<'a, '_> {
		FastIter::new(&self.chain, pos)
	}

	pub fn head_offset(&self) -> u64 {
		self.chain.head_offset()
	}

	pub fn end_offset(&self) -> u64 {
		self.chain.end_offset()
	}

	/// Drops the stream's connection to its chain's data without destroying
	/// the chain outright; further access through iterators/views already
	/// bound to it observably fails (spec's "chain outlives its parent
	/// stream iff iterators still reference it" ownership note — expressed
	/// here as an explicit call rather than drop-glue, since safe iterators
	/// borrow the chain rather than sharing reference-counted ownership of
	/// it, see `DESIGN.md`).
	pub fn invalidate(&mut self) {
		self.chain.invalidate();
	}
}

impl<'a> Default for Stream<'a> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn append_and_view() {
		let mut stream: Stream<'_> = Stream::new();
		stream.append(b"hello").unwrap();
		let view: View<'_, '_> = stream.view(0);
		assert_eq!(view.extract().unwrap(), b"hello");
	}

	#[test]
	fn from_owned_seeds_data() {
		let stream: Stream<'_> = Stream::from_owned(b"abc".to_vec());
		assert_eq!(stream.end_offset(), 3);
		assert_eq!(stream.view(0).extract().unwrap(), b"abc");
	}

	#[test]
	fn trim_via_iterator() {
		let mut stream: Stream<'_> = Stream::new();
		stream.append(b"0123456789").unwrap();
		let it: SafeIter<'_, '_> = stream.safe_iter(3);
		stream.trim(&it).unwrap();
		assert_eq!(stream.head_offset(), 3);
	}

	#[test]
	fn freeze_then_append_fails() {
		let mut stream: Stream<'_> = Stream::new();
		stream.append(b"x").unwrap();
		stream.freeze();
		assert_eq!(stream.append(b"y").unwrap_err(), StreamError::Frozen);
		stream.unfreeze().unwrap();
		stream.append(b"y").unwrap();
		assert_eq!(stream.view(0).extract().unwrap(), b"xy");
	}

	/// Spec §8 scenario S4: trimmed bytes keep their old offsets forever, new
	/// data keeps appending at the tail, and an iterator taken before the
	/// trim fails to dereference afterward while offset arithmetic on it
	/// (`+ 10`, which always succeeds per spec §4.F) still resolves
	/// correctly.
	#[test]
	fn s4_trim_then_append_preserves_offsets() {
		let mut stream: Stream<'_> = Stream::new();
		stream.append(b"01").unwrap();
		let i: SafeIter<'_, '_> = stream.safe_iter(0);
		let j: SafeIter<'_, '_> = stream.safe_iter(1);
		stream.trim(&j).unwrap();
		stream.append(b"23456789ab").unwrap();

		let mut i_plus_10: SafeIter<'_, '_> = i.advance(10);
		assert_eq!(i_plus_10.next(), Some(Ok(b'a')));

		let mut i: SafeIter<'_, '_> = i;
		assert_eq!(i.next(), Some(Err(StreamError::InvalidIterator)));
	}

	#[test]
	fn gap_then_statistics() {
		let mut stream: Stream<'_> = Stream::new();
		stream.append(b"AAA").unwrap();
		stream.append_gap(3).unwrap();
		stream.append(b"CCC").unwrap();
		let stats: Statistics = stream.statistics();
		assert_eq!(stats.num_data_bytes, 6);
		assert_eq!(stats.num_data_chunks, 2);
		assert_eq!(stats.num_gap_bytes, 3);
		assert_eq!(stats.num_gap_chunks, 1);
		assert_eq!(stream.view_fixed(2, 5).extract().unwrap_err(), StreamError::MissingData { offset: 2 });
	}
}
