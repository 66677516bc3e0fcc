//! An append-only sequence of [`crate::chunk::Chunk`]s spanning a monotone
//! byte-offset range, with trimming, freezing, and accumulated
//! [`Statistics`]. Grounded on `stream.h`'s `Chain`/`Statistics`.
//!
//! `justrx`/`stream.h` track a mutable/frozen/invalid state machine directly
//! on the stream object; here that's [`ChainState`], checked at the top of
//! every mutating method rather than encoded in the type, since the same
//! `Chain` value needs to move between states over its lifetime (can't be
//! modeled as a move-only typestate without forcing every consumer to hold
//! an owned value instead of `&mut Chain`).

use crate::chunk::Chunk;
use crate::error::StreamError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
	pub num_data_bytes: u64,
	pub num_data_chunks: u64,
	pub num_gap_bytes: u64,
	pub num_gap_chunks: u64,
}

impl std::ops::AddAssign for Statistics {
	fn add_assign(&mut self, other: Self) {
		self.num_data_bytes += other.num_data_bytes;
		self.num_data_chunks += other.num_data_chunks;
		self.num_gap_bytes += other.num_gap_bytes;
		self.num_gap_chunks += other.num_gap_chunks;
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
	Mutable,
	Frozen,
	Invalid,
}

/// Shared chain state. `Chain` handles hand out `Rc<RefCell<Inner>>`-free
/// direct ownership here since the chain itself is the single owner of its
/// chunks (spec's arena/Rc ownership model is used one level down, inside
/// [`Chunk`], to let chunks split/share owning buffers cheaply).
#[derive(Debug)]
pub struct Chain<'a> {
	chunks: Vec<Chunk<'a>>,
	head_offset: u64,
	end_offset: u64,
	state: ChainState,
	statistics: Statistics,
}

impl<'a> Chain<'a> {
	pub fn new() -> Self {
		Self {
			chunks: Vec::new(),
			head_offset: 0,
			end_offset: 0,
			state: ChainState::Mutable,
			statistics: Statistics::default(),
		}
	}

	pub fn statistics(&self) -> Statistics {
		self.statistics
	}

	pub fn head_offset(&self) -> u64 {
		self.head_offset
	}

	pub fn end_offset(&self) -> u64 {
		self.end_offset
	}

	pub fn is_frozen(&self) -> bool {
		self.state == ChainState::Frozen
	}

	pub fn is_valid(&self) -> bool {
		self.state != ChainState::Invalid
	}

	/// Appends a chunk. The chunk's own offset must equal this chain's
	/// current `end_offset` — chains only ever grow at the tail.
	pub fn append(&mut self, mut chunk: Chunk<'a>) -> Result<(), StreamError> {
		self.check_mutable()?;
		assert_eq!(chunk.offset(), self.end_offset, "chunks must append contiguously");

		chunk.make_owning();

		if chunk.is_gap() {
			self.statistics.num_gap_bytes += chunk.len() as u64;
			self.statistics.num_gap_chunks += 1;
		} else {
			self.statistics.num_data_bytes += chunk.len() as u64;
			self.statistics.num_data_chunks += 1;
		}

		self.end_offset = chunk.end_offset();
		self.chunks.push(chunk);
		Ok(())
	}

	/// Marks the chain as complete: no further `append` calls are allowed.
	/// Idempotent.
	pub fn freeze(&mut self) {
		if self.state == ChainState::Mutable {
			self.state = ChainState::Frozen;
		}
	}

	/// Reopens a frozen chain for further appends. A no-op on an already
	/// mutable chain; fails on an invalidated one, since there's no coming
	/// back from `invalidate()`.
	pub fn unfreeze(&mut self) -> Result<(), StreamError> {
		self.check_valid()?;
		if self.state == ChainState::Frozen {
			self.state = ChainState::Mutable;
		}
		Ok(())
	}

	/// Returns the chain to the state a freshly constructed one would be in:
	/// no chunks, zeroed offsets and statistics, mutable. Any iterator or
	/// view still referencing the old offset range now reads stale data
	/// rather than this reset one — callers must not keep iterators across
	/// a `reset()`, matching `stream.h`'s "reset" semantics of starting an
	/// entirely new logical stream rather than continuing the old one.
	pub fn reset(&mut self) {
		*self = Self::new();
	}

	/// Drops all chunks (or parts of chunks) before `offset`, advancing
	/// `head_offset`. `head_offset` only ever moves forward — once trimmed,
	/// an offset is never revisited, matching `stream.h`'s trim
	/// monotonicity. Returns [`StreamError::MissingData`] if `offset` is
	/// before the current head or past the current end.
	pub fn trim(&mut self, offset: u64) -> Result<(), StreamError> {
		self.check_valid()?;
		if offset < self.head_offset {
			return Ok(());
		}
		if offset > self.end_offset {
			return Err(StreamError::MissingData { offset });
		}

		let mut remaining: Vec<Chunk<'a>> = Vec::with_capacity(self.chunks.len());
		for chunk in self.chunks.drain(..) {
			if chunk.end_offset() <= offset {
				continue;
			}
			if chunk.offset() >= offset {
				remaining.push(chunk);
			} else {
				let (_, after) = chunk.split_at(offset);
				remaining.push(after);
			}
		}
		self.chunks = remaining;
		self.head_offset = offset;
		Ok(())
	}

	/// Locates the chunk covering `offset`, if still retained.
	pub fn find_chunk(&self, offset: u64) -> Option<&Chunk<'a>> {
		if offset < self.head_offset || offset >= self.end_offset {
			return None;
		}
		self.chunks.iter().find(|chunk| chunk.offset() <= offset && offset < chunk.end_offset())
	}

	pub fn chunks(&self) -> &[Chunk<'a>] {
		&self.chunks
	}

	/// Invalidates the chain: every iterator/view still pointing into it
	/// becomes [`StreamError::Invalid`] on next use. There's no coming back
	/// from this short of building a new `Chain`.
	pub fn invalidate(&mut self) {
		self.state = ChainState::Invalid;
		self.chunks.clear();
	}

	fn check_mutable(&self) -> Result<(), StreamError> {
		match self.state {
			ChainState::Mutable => Ok(()),
			ChainState::Frozen => Err(StreamError::Frozen),
			ChainState::Invalid => Err(StreamError::Invalid),
		}
	}

	fn check_valid(&self) -> Result<(), StreamError> {
		if self.state == ChainState::Invalid {
			Err(StreamError::Invalid)
		} else {
			Ok(())
		}
	}

	/// Reads `len` bytes starting at `offset` into a freshly allocated
	/// buffer, stitching together as many chunks as needed. Fails with
	/// [`StreamError::MissingData`] if any byte in range isn't available
	/// (trimmed away or a gap), and [`StreamError::WouldBlock`] if the range
	/// extends past `end_offset` on a chain that isn't frozen yet.
	pub fn extract(&self, offset: u64, len: usize) -> Result<Vec<u8>, StreamError> {
		self.check_valid()?;
		let end: u64 = offset + len as u64;
		if end > self.end_offset {
			return if self.is_frozen() {
				Err(StreamError::MissingData { offset: self.end_offset })
			} else {
				Err(StreamError::WouldBlock { offset: self.end_offset })
			};
		}
		if offset < self.head_offset {
			return Err(StreamError::MissingData { offset });
		}

		let mut out: Vec<u8> = Vec::with_capacity(len);
		let mut pos: u64 = offset;
		while pos < end {
			let chunk: &Chunk<'_> = self.find_chunk(pos).ok_or(StreamError::MissingData { offset: pos })?;
			let data: &[u8] = chunk.data().ok_or(StreamError::MissingData { offset: pos })?;
			let local_start: usize = (pos - chunk.offset()) as usize;
			let local_end: usize = ((end.min(chunk.end_offset())) - chunk.offset()) as usize;
			out.extend_from_slice(&data[local_start..local_end]);
			pos = chunk.offset() + local_end as u64;
		}
		Ok(out)
	}
}

impl<'a> Default for Chain<'a> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn append_and_extract() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3, 4])).unwrap();
		chain.append(Chunk::owning(4, vec![5, 6])).unwrap();
		assert_eq!(chain.extract(1, 4).unwrap(), vec![2, 3, 4, 5]);
	}

	#[test]
	fn frozen_chain_rejects_append() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1])).unwrap();
		chain.freeze();
		let err: StreamError = chain.append(Chunk::owning(1, vec![2])).unwrap_err();
		assert_eq!(err, StreamError::Frozen);
	}

	#[test]
	fn trim_advances_head_and_drops_data() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3, 4, 5])).unwrap();
		chain.trim(3).unwrap();
		assert_eq!(chain.head_offset(), 3);
		assert_eq!(chain.extract(3, 2).unwrap(), vec![4, 5]);
		assert!(chain.extract(0, 1).is_err());
	}

	#[test]
	fn extract_past_end_would_block_until_frozen() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2])).unwrap();
		assert_eq!(chain.extract(0, 5).unwrap_err(), StreamError::WouldBlock { offset: 2 });
		chain.freeze();
		assert_eq!(chain.extract(0, 5).unwrap_err(), StreamError::MissingData { offset: 2 });
	}

	#[test]
	fn unfreeze_allows_append_again() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1])).unwrap();
		chain.freeze();
		chain.unfreeze().unwrap();
		chain.append(Chunk::owning(1, vec![2])).unwrap();
		assert_eq!(chain.extract(0, 2).unwrap(), vec![1, 2]);
	}

	#[test]
	fn reset_clears_everything() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2, 3])).unwrap();
		chain.freeze();
		chain.reset();
		assert_eq!(chain.head_offset(), 0);
		assert_eq!(chain.end_offset(), 0);
		assert!(!chain.is_frozen());
		assert_eq!(chain.statistics(), Statistics::default());
	}

	#[test]
	fn statistics_accumulate() {
		let mut chain: Chain<'_> = Chain::new();
		chain.append(Chunk::owning(0, vec![1, 2])).unwrap();
		chain.append(Chunk::gap(2, 3)).unwrap();
		let stats: Statistics = chain.statistics();
		assert_eq!(stats.num_data_bytes, 2);
		assert_eq!(stats.num_gap_bytes, 3);
	}
}
