//! Error taxonomy for the regex facade and the streaming-input core.
//! "No match" is deliberately not a variant here — it's modeled as `Ok(None)`
//! at the facade, not a failure (spec §7).

use thiserror::Error;

/// Errors raised while compiling a pattern into a [`crate::dfa::Dfa`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
	#[error("unsupported pattern feature: {0}")]
	Unsupported(String),

	#[error("bad pattern syntax at byte {consumed}: {detail}")]
	BadSyntax { consumed: usize, detail: String },

	#[error("pattern requires an option this build doesn't support: {0}")]
	UnsupportedOption(&'static str),
}

/// Errors raised by chunk/chain/iterator/view operations over streaming
/// input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
	#[error("iterator is invalid: the chain was trimmed past its position")]
	InvalidIterator,

	#[error("iterator has expired: its chain has been dropped")]
	ExpiredIterator,

	#[error("requested data is missing from the chain (offset {offset} not covered)")]
	MissingData { offset: u64 },

	#[error("operation would block: data at offset {offset} has not arrived yet")]
	WouldBlock { offset: u64 },

	#[error("chain is frozen and cannot be appended to")]
	Frozen,

	#[error("iterator arithmetic would move before the beginning of the chain")]
	BeforeBeginning,

	#[error("cannot compare or difference iterators bound to different chains")]
	DifferentChains,

	#[error("chain's data has been invalidated by a prior trim")]
	Invalid,

	#[error("out of memory while growing the chain")]
	OutOfMemory,
}
