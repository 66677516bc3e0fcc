//! Public regex facade: pattern compilation, execution and capture
//! extraction, plus the `Options` bitset (spec §6). This is the crate's
//! front door — everything in `ccl`/`nfa`/`dfa`/`match_state` is reachable
//! through here.

use crate::ccl::CclGroup;
use crate::dfa::Dfa;
use crate::error::CompileError;
use crate::match_state::{Capture, MinimalMatcher, StandardMatcher};
use crate::nfa::Nfa;
use crate::regex::{Regex as RegexAst, RegexErrorKind};

bitflags::bitflags! {
	/// Compile-time options. `ICASE`/`NEWLINE`/`NOTEOL`/`NOTBOL` are accepted
	/// for API familiarity but rejected with [`CompileError::UnsupportedOption`]
	/// — spec's Open Questions flag these as out of scope for this engine.
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct Options: u32 {
		const EXTENDED     = 1 << 0;
		const NOSUB        = 1 << 1;
		const STD_MATCHER  = 1 << 2;
		const ANCHOR       = 1 << 3;
		const LAZY         = 1 << 4;
		const FIRST_MATCH  = 1 << 5;
		const DEBUG        = 1 << 6;
		const ICASE        = 1 << 7;
		const NEWLINE      = 1 << 8;
		const NOTEOL       = 1 << 9;
		const NOTBOL       = 1 << 10;
	}
}

const UNSUPPORTED_OPTIONS: &[(Options, &str)] = &[
	(Options::ICASE, "ICASE"),
	(Options::NEWLINE, "NEWLINE"),
	(Options::NOTEOL, "NOTEOL"),
	(Options::NOTBOL, "NOTBOL"),
];

/// A compiled pattern. Holds its own [`CclGroup`]/[`Dfa`] and is immutable
/// once built; `exec`/`partial_exec` borrow it, never mutate it.
#[derive(Debug)]
pub struct Regex {
	dfa: Dfa,
	options: Options,
	group_count: usize,
}

/// A completed match: overall span plus one entry per named/positional
/// capture group, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
	pub start: usize,
	pub end: usize,
	pub groups: Vec<Capture>,
}

impl Regex {
	#[tracing::instrument(skip(pattern))]
	pub fn compile(pattern: &str, options: Options) -> Result<Self, CompileError> {
		for &(flag, name) in UNSUPPORTED_OPTIONS {
			if options.contains(flag) {
				return Err(CompileError::UnsupportedOption(name));
			}
		}

		let ast: RegexAst = RegexAst::from_pattern(pattern).map_err(|e| CompileError::BadSyntax {
			consumed: e.consumed().len(),
			detail: e.kind().describe().to_owned(),
		})?;

		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&ast, &mut ccl_group);
		nfa.eliminate_epsilons();
		let dfa: Dfa = Dfa::build(&nfa, &mut ccl_group);

		let group_count: usize = nfa.tags().len() / 2;

		Ok(Self { dfa, options, group_count })
	}

	/// Executes the pattern against `input`, returning the leftmost-longest
	/// match starting at or after `start`, if any. `NOMATCH` is `Ok(None)`,
	/// not an error (spec §7).
	pub fn exec(&self, input: &str, start: usize) -> Option<Match> {
		let haystack: &str = &input[start..];
		if self.options.contains(Options::NOSUB) || !self.options.contains(Options::STD_MATCHER) {
			return self.exec_minimal(haystack, start);
		}

		let mut best: Option<Match> = None;
		for (offset, _) in haystack.char_indices() {
			let mut matcher: StandardMatcher<'_> = StandardMatcher::init(&self.dfa);
			for ch in haystack[offset..].chars() {
				matcher.advance(ch);
				if matcher.is_dead() {
					break;
				}
			}
			if let Some(len) = matcher.done() {
				let groups: Vec<Capture> = matcher.captures(self.dfa.tags());
				best = Some(Match {
					start: start + offset,
					end: start + offset + len,
					groups,
				});
				break;
			}
			if self.options.contains(Options::ANCHOR) {
				break;
			}
		}
		best
	}

	fn exec_minimal(&self, haystack: &str, start: usize) -> Option<Match> {
		for (offset, _) in haystack.char_indices() {
			let mut matcher: MinimalMatcher<'_> = MinimalMatcher::init(&self.dfa);
			let mut last_accept_end: Option<usize> = if matcher.done() { Some(0) } else { None };
			let mut consumed: usize = 0;
			for ch in haystack[offset..].chars() {
				consumed += ch.len_utf8();
				matcher.advance(ch);
				if matcher.done() {
					last_accept_end = Some(consumed);
				}
				if matcher.is_dead() {
					break;
				}
			}
			if let Some(end) = last_accept_end {
				return Some(Match {
					start: start + offset,
					end: start + offset + end,
					groups: Vec::new(),
				});
			}
			if self.options.contains(Options::ANCHOR) {
				break;
			}
		}
		None
	}

	/// Like `exec`, but treats `input` as a non-final prefix: failing to
	/// find a match doesn't rule one out once more data arrives. Returns
	/// `Ok(None)` if no match yet (caller should supply more input before
	/// concluding `NOMATCH`), mirroring spec §6's partial-execution contract
	/// for streamed input.
	pub fn partial_exec(&self, input: &str, start: usize) -> PartialMatch {
		match self.exec(input, start) {
			Some(m) => PartialMatch::Matched(m),
			None => {
				// If the minimal matcher is still alive at end of input, the
				// pattern might complete once more bytes arrive.
				let haystack: &str = &input[start..];
				let mut matcher: MinimalMatcher<'_> = MinimalMatcher::init(&self.dfa);
				for ch in haystack.chars() {
					matcher.advance(ch);
					if matcher.is_dead() {
						break;
					}
				}
				if matcher.is_dead() {
					PartialMatch::NoMatch
				} else {
					PartialMatch::Incomplete
				}
			},
		}
	}

	pub fn group_count(&self) -> usize {
		self.group_count
	}

	/// Access to the compiled automaton, for callers driving a long-lived
	/// [`MinimalMatcher`]/[`StandardMatcher`] themselves across chunks as
	/// they arrive, rather than re-scanning a whole accumulated buffer on
	/// every call the way [`Self::exec`]/[`Self::partial_exec`] do. This is
	/// the streaming entry point spec §4.D/§6 describes: `partial_exec`
	/// above is a convenience wrapper over a single already-assembled
	/// buffer, not a substitute for holding match state across feeds.
	pub fn dfa(&self) -> &Dfa {
		&self.dfa
	}

	/// A fresh minimal (accept-id-only) matcher positioned at its initial
	/// state, ready for `advance` calls as codepoints arrive.
	pub fn minimal_matcher(&self) -> MinimalMatcher<'_> {
		MinimalMatcher::init(&self.dfa)
	}

	/// A fresh standard (capture-tracking) matcher positioned at its initial
	/// state.
	pub fn standard_matcher(&self) -> StandardMatcher<'_> {
		StandardMatcher::init(&self.dfa)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartialMatch {
	Matched(Match),
	Incomplete,
	NoMatch,
}

impl RegexErrorKind {
	fn describe(&self) -> &'static str {
		match self {
			RegexErrorKind::ExpectedChar(_) => "expected a specific character",
			RegexErrorKind::MissingClose(..) => "missing closing delimiter",
			RegexErrorKind::InvalidTerm => "invalid term",
			RegexErrorKind::InvalidLiteral => "invalid literal",
			RegexErrorKind::InvalidEscape => "invalid escape",
			RegexErrorKind::InvalidRepetitionBound(..) => "invalid repetition bound",
			RegexErrorKind::NumberTooBig => "number too big",
			RegexErrorKind::ExpectedDecimalDigits => "expected decimal digits",
			RegexErrorKind::ExpectedHexDigits => "expected hex digits",
			RegexErrorKind::InvalidCodePoint(_) => "invalid code point",
			RegexErrorKind::InvalidCaptureName => "invalid capture name",
			RegexErrorKind::TooManyCaptures => "too many captures",
			RegexErrorKind::EscapeClassInGroupRange => "escape class used as group range endpoint",
			RegexErrorKind::InvertedEscapeClassInGroup => "inverted escape class used inside group",
			RegexErrorKind::ExpectedOneOf { .. } => "expected one of a set of characters",
			RegexErrorKind::Nom(_) => "internal parser error",
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn compile_and_match_literal() {
		let re: Regex = Regex::compile("abc", Options::STD_MATCHER).unwrap();
		let m: Match = re.exec("xxabcxx", 0).expect("should match");
		assert_eq!(&"xxabcxx"[m.start..m.end], "abc");
	}

	#[test]
	fn compile_and_match_capture() {
		let re: Regex = Regex::compile("a(?<x>b+)c", Options::STD_MATCHER).unwrap();
		let input: &str = "zzabbbcz";
		let m: Match = re.exec(input, 0).expect("should match");
		assert_eq!(&input[m.start..m.end], "abbbc");
		assert_eq!(m.groups.len(), 1);
		let (s, e) = m.groups[0].expect("capture participated");
		assert_eq!(&input[s..e], "bbb");
	}

	#[test]
	fn no_match_is_none_not_error() {
		let re: Regex = Regex::compile("xyz", Options::STD_MATCHER).unwrap();
		assert_eq!(re.exec("abc", 0), None);
	}

	#[test]
	fn icase_is_unsupported() {
		let err: CompileError = Regex::compile("abc", Options::ICASE).unwrap_err();
		assert_eq!(err, CompileError::UnsupportedOption("ICASE"));
	}

	/// Spec §8 scenario S3: feeding a pattern's input across two separate
	/// chunks via a matcher held open between calls, rather than re-scanning
	/// an accumulated buffer — `-1` after the first partial chunk means
	/// "keep feeding", and the match completes once the second chunk's `b`
	/// arrives.
	#[test]
	fn s3_streaming_partial_exec() {
		let re: Regex = Regex::compile("a+b", Options::empty()).unwrap();
		let mut matcher = re.minimal_matcher();
		for ch in "aaa".chars() {
			assert_eq!(matcher.advance(ch), 0);
		}
		assert!(!matcher.is_dead());
		assert_eq!(matcher.advance('a'), 0);
		assert_eq!(matcher.advance('b'), 1);
		assert!(matcher.done());
	}

	#[test]
	fn minimal_matcher_has_no_groups() {
		let re: Regex = Regex::compile("a(?<x>b+)c", Options::NOSUB).unwrap();
		let m: Match = re.exec("abbbc", 0).expect("should match");
		assert!(m.groups.is_empty());
	}
}
