//! A `View` is a (possibly open-ended) sub-range over a [`Chain`], the unit
//! the regex engine actually scans. Grounded on `stream.h`'s `View`: a
//! begin offset, an optional end offset (open-ended views track the chain's
//! growing `end_offset` live), and `find`/`sub`/`extract`/block iteration
//! over that range.

use crate::chain::Chain;
use crate::error::StreamError;
use crate::stream_iter::{FastIter, SafeIter};

#[derive(Debug, Clone, Copy)]
enum End {
	Fixed(u64),
	Open,
}

#[derive(Debug)]
pub struct View<'a, 'chain> {
	chain: &'chain Chain<'a>,
	begin: u64,
	end: End,
}

impl<'a, 'chain> View<'a, 'chain> {
	pub fn new(chain: &'chain Chain<'a>, begin: u64) -> Self {
		Self {
			chain,
			begin,
			end: End::Open,
		}
	}

	pub fn fixed(chain: &'chain Chain<'a>, begin: u64, end: u64) -> Self {
		assert!(begin <= end);
		Self {
			chain,
			begin,
			end: End::Fixed(end),
		}
	}

	pub fn begin(&self) -> u64 {
		self.begin
	}

	/// Current end offset: the fixed bound if set, else the chain's live
	/// `end_offset` (an open view grows as the chain is appended to).
	pub fn end(&self) -> u64 {
		match self.end {
			End::Fixed(end) => end,
			End::Open => self.chain.end_offset(),
		}
	}

	pub fn is_open(&self) -> bool {
		matches!(self.end, End::Open)
	}

	pub fn len(&self) -> u64 {
		self.end().saturating_sub(self.begin)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// True iff every byte this view could ever cover has already arrived:
	/// either the chain is frozen (an open view will never grow further) or
	/// this view has a fixed end that's already within the chain's retained
	/// range.
	pub fn is_complete(&self) -> bool {
		self.chain.is_frozen() || matches!(self.end, End::Fixed(end) if end <= self.chain.end_offset())
	}

	/// A fixed sub-range of this view, clamped to its own bounds.
	pub fn sub(&self, begin: u64, end: u64) -> View<'a, 'chain> {
		let begin: u64 = begin.max(self.begin);
		let end: u64 = end.min(self.end());
		View::fixed(self.chain, begin, begin.max(end))
	}

	/// A view starting `n` bytes later than this one, same end bound. If `n`
	/// overshoots the current end, the result is an empty view at that end
	/// rather than one with `begin > end`.
	pub fn advance(&self, n: u64) -> View<'a, 'chain> {
		let begin: u64 = self.begin + n;
		match self.end {
			End::Fixed(end) => {
				let begin: u64 = begin.min(end);
				View::fixed(self.chain, begin, end)
			},
			End::Open => View::new(self.chain, begin),
		}
	}

	/// A view starting at `it`'s offset, same end bound. `it` must be at or
	/// past this view's own begin.
	pub fn advance_to(&self, it: u64) -> View<'a, 'chain> {
		assert!(it >= self.begin, "cannot advance a view backward");
		match self.end {
			End::Fixed(end) => {
				let begin: u64 = it.min(end);
				View::fixed(self.chain, begin, end)
			},
			End::Open => View::new(self.chain, it),
		}
	}

	/// Moves past the chunk of gap/data this view currently begins in,
	/// advancing at least one byte. Used by a caller that hit
	/// [`StreamError::MissingData`] reading a gap and wants to skip it rather
	/// than fail permanently.
	pub fn advance_to_next_data(&self) -> View<'a, 'chain> {
		let next: u64 = match self.chain.find_chunk(self.begin) {
			Some(chunk) => chunk.end_offset().max(self.begin + 1),
			None => self.begin + 1,
		};
		self.advance_to(next)
	}

	/// A sub-view of at most `n` bytes from this view's begin. Cannot widen
	/// an already-limited (fixed, shorter) range — only ever shrinks.
	pub fn limit(&self, n: u64) -> View<'a, 'chain> {
		let end: u64 = (self.begin + n).min(self.end());
		View::fixed(self.chain, self.begin, end)
	}

	pub fn extract(&self) -> Result<Vec<u8>, StreamError> {
		self.chain.extract(self.begin, self.len() as usize)
	}

	pub fn safe_iter(&self) -> SafeIter<'a, 'chain> {
		SafeIter::new(self.chain, self.begin)
	}

	pub fn fast_iter(&self) -> FastIter<'a, 'chain> {
		FastIter::new(self.chain, self.begin)
	}

	/// Yields `(offset, &[u8])` for every retained chunk (or partial chunk)
	/// this view overlaps, in order — the "block iteration" mode spec
	/// prefers over byte-at-a-time scanning when a consumer (e.g. the DFA
	/// driver) can work directly off contiguous slices.
	pub fn blocks(&self) -> impl Iterator<Item = Result<(u64, &'chain [u8]), StreamError>> + '_ {
		let begin: u64 = self.begin;
		let end: u64 = self.end();
		self.chain.chunks().iter().filter_map(move |chunk| {
			if chunk.end_offset() <= begin || chunk.offset() >= end {
				return None;
			}
			let Some(data) = chunk.data() else {
				return Some(Err(StreamError::MissingData { offset: chunk.offset().max(begin) }));
			};
			let local_start: usize = begin.saturating_sub(chunk.offset()) as usize;
			let local_end: usize = (end.min(chunk.end_offset()) - chunk.offset()) as usize;
			Some(Ok((chunk.offset() + local_start as u64, &data[local_start..local_end])))
		})
	}

	/// Searches forward for `needle` within this view. On failure, returns
	/// the earliest offset from which no prefix of `needle` could still
	/// match — the resume point `stream.h`'s `View::find` documents so a
	/// caller can retry after appending more data without rescanning bytes
	/// already ruled out.
	pub fn find(&self, needle: &[u8]) -> Result<Option<u64>, StreamError> {
		if needle.is_empty() {
			return Ok(Some(self.begin));
		}

		let haystack: Vec<u8> = self.extract()?;
		if let Some(pos) = haystack.windows(needle.len()).position(|w| w == needle) {
			return Ok(Some(self.begin + pos as u64));
		}

		// No full match; find the longest suffix of `haystack` that is a
		// prefix of `needle` — everything before it can never start a match.
		let max_check: usize = needle.len().saturating_sub(1).min(haystack.len());
		for suffix_len in (1..=max_check).rev() {
			if haystack[haystack.len() - suffix_len..] == needle[..suffix_len] {
				return Ok(None);
			}
		}
		Ok(None)
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::chunk::Chunk;

	#[test]
	fn open_view_tracks_growth() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3])).unwrap();
		let view: View<'_, '_> = View::new(&chain, 0);
		assert_eq!(view.len(), 3);
		chain.append(Chunk::owning(3, vec![4, 5])).unwrap();
		assert_eq!(view.len(), 5);
	}

	#[test]
	fn fixed_view_extract() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3, 4, 5])).unwrap();
		let view: View<'_, '_> = View::fixed(&chain, 1, 4);
		assert_eq!(view.extract().unwrap(), vec![2, 3, 4]);
	}

	#[test]
	fn find_locates_needle() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, b"hello world".to_vec())).unwrap();
		let view: View<'_, '_> = View::new(&chain, 0);
		assert_eq!(view.find(b"world").unwrap(), Some(6));
		assert_eq!(view.find(b"xyz").unwrap(), None);
	}

	#[test]
	fn limit_cannot_widen() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3, 4, 5])).unwrap();
		let view: View<'_, '_> = View::fixed(&chain, 0, 3);
		assert_eq!(view.limit(10).len(), 3);
		assert_eq!(view.limit(2).len(), 2);
	}

	#[test]
	fn advance_moves_begin() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3, 4, 5])).unwrap();
		let view: View<'_, '_> = View::new(&chain, 0);
		let advanced: View<'_, '_> = view.advance(2);
		assert_eq!(advanced.begin(), 2);
		assert_eq!(advanced.extract().unwrap(), vec![3, 4, 5]);
	}

	#[test]
	fn is_complete_tracks_freeze() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3])).unwrap();
		let view: View<'_, '_> = View::new(&chain, 0);
		assert!(!view.is_complete());
		chain.freeze();
		assert!(view.is_complete());
	}

	#[test]
	fn advance_to_next_data_skips_gap() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2])).unwrap();
		chain.append(Chunk::gap(2, 3)).unwrap();
		chain.append(Chunk::owning(5, vec![9])).unwrap();
		let view: View<'_, '_> = View::new(&chain, 2);
		let past_gap: View<'_, '_> = view.advance_to_next_data();
		assert_eq!(past_gap.begin(), 5);
		assert_eq!(past_gap.extract().unwrap(), vec![9]);
	}

	#[test]
	fn blocks_iterate_chunks() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2])).unwrap();
		chain.append(Chunk::owning(2, vec![3, 4, 5])).unwrap();
		let view: View<'_, '_> = View::new(&chain, 0);
		let blocks: Vec<(u64, Vec<u8>)> = view.blocks().map(|b| b.map(|(o, d)| (o, d.to_vec())).unwrap()).collect();
		assert_eq!(blocks, vec![(0, vec![1, 2]), (2, vec![3, 4, 5])]);
	}
}
