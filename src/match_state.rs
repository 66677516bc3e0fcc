//! Match state: the per-input simulation objects driven against a
//! [`crate::dfa::Dfa`]. Two flavors per spec, mirroring `justrx`'s
//! `dfa-interpreter-min.c` (accept-id only) and `dfa-interpreter-std.c`
//! (full capture tracking).

use crate::dfa::Dfa;
use crate::nfa::TagEvent;

/// Minimal matcher: no capture tracking, just "did we match, and are we
/// still alive". `advance` mirrors `jrx_match_state_advance`'s tri-state
/// return: `> 0` accepted, `0` alive-but-not-yet-accepting, `< 0` dead.
#[derive(Debug)]
pub struct MinimalMatcher<'dfa> {
	dfa: &'dfa Dfa,
	state: Option<usize>,
	accepted: bool,
}

impl<'dfa> MinimalMatcher<'dfa> {
	pub fn init(dfa: &'dfa Dfa) -> Self {
		let start: usize = dfa.start();
		Self {
			dfa,
			state: Some(start),
			accepted: dfa.is_final(start),
		}
	}

	/// Feeds one character. Once dead (`-1`), latches: every subsequent call
	/// is a no-op returning `-1` rather than re-deriving a state, matching
	/// the original's single dead-state sentinel.
	pub fn advance(&mut self, ch: char) -> i32 {
		let Some(state) = self.state else {
			return -1;
		};

		match self.dfa.step(state, ch) {
			None => {
				self.state = None;
				-1
			},
			Some(transition) => {
				let target: usize = transition.target.expect("live transition always has a target");
				self.state = Some(target);
				self.accepted = self.dfa.is_final(target);
				if self.accepted { 1 } else { 0 }
			},
		}
	}

	pub fn done(&self) -> bool {
		self.accepted
	}

	pub fn is_dead(&self) -> bool {
		self.state.is_none()
	}
}

/// A single captured group: byte offsets `[start, end)` into the scanned
/// input, or `None` if that capture didn't participate in the match.
pub type Capture = Option<(usize, usize)>;

/// Standard matcher: full register tracking per tag, disambiguated by
/// leftmost-longest (spec §4.D) — later accepting states overwrite the
/// recorded match only because scanning naturally proceeds left to right and
/// DFA transitions are already committed to the longest live prefix.
#[derive(Debug)]
pub struct StandardMatcher<'dfa> {
	dfa: &'dfa Dfa,
	state: Option<usize>,
	pos: usize,
	/// Current register file: one slot per tag, `(start, end)` positions
	/// toggled by `TagEvent::Set`/`Reset` as transitions are taken. Only the
	/// most recent write per tag survives — repeated captures inside a loop
	/// keep their last iteration's span, not the full history.
	registers: Vec<Option<usize>>,
	/// Snapshot taken the last time a final state was reached.
	best: Option<(usize, Vec<Option<usize>>)>,
}

impl<'dfa> StandardMatcher<'dfa> {
	pub fn init(dfa: &'dfa Dfa) -> Self {
		let start: usize = dfa.start();
		let mut matcher: Self = Self {
			dfa,
			state: Some(start),
			pos: 0,
			registers: vec![None; dfa.tags().len()],
			best: None,
		};
		if let Some(tags) = dfa.final_tags(start) {
			matcher.apply(tags);
			matcher.best = Some((0, matcher.registers.clone()));
		}
		matcher
	}

	fn apply(&mut self, tags: &[TagEvent]) {
		for event in tags {
			match event {
				TagEvent::Set(tag) => {
					let id: usize = self.tag_index(tag);
					self.registers[id] = Some(self.pos);
				},
				TagEvent::Reset(tag) => {
					let id: usize = self.tag_index(tag);
					self.registers[id] = None;
				},
			}
		}
	}

	fn tag_index(&self, tag: &crate::nfa::Tag) -> usize {
		self.dfa.tags().iter().position(|t| t == tag).expect("tag must be known to this dfa")
	}

	pub fn advance(&mut self, ch: char) -> i32 {
		let Some(state) = self.state else {
			return -1;
		};

		match self.dfa.step(state, ch) {
			None => {
				self.state = None;
				-1
			},
			Some(transition) => {
				let target: usize = transition.target.expect("live transition always has a target");
				self.apply(&transition.tags);
				self.pos += ch.len_utf8();
				self.state = Some(target);
				if let Some(tags) = self.dfa.final_tags(target) {
					self.apply(tags);
					self.best = Some((self.pos, self.registers.clone()));
					1
				} else {
					0
				}
			},
		}
	}

	pub fn is_dead(&self) -> bool {
		self.state.is_none()
	}

	/// Final match length and per-tag register snapshot, if any accept was
	/// ever reached. The matcher keeps scanning past the first accept to
	/// prefer the longest one, per the leftmost-longest rule — `best` is
	/// only ever overwritten by a later (hence longer, since position is
	/// monotone) accept.
	pub fn done(&self) -> Option<usize> {
		self.best.as_ref().map(|(len, _)| *len)
	}

	/// Resolves the final register file into capture spans, pairing each
	/// `StartCapture`/`StopCapture` tag for the same capture.
	pub fn captures(&self, tags: &[crate::nfa::Tag]) -> Vec<Capture> {
		use crate::nfa::Tag;
		use std::collections::BTreeMap;

		let Some((_, registers)) = &self.best else {
			return Vec::new();
		};

		let mut starts: BTreeMap<u32, usize> = BTreeMap::new();
		let mut ends: BTreeMap<u32, usize> = BTreeMap::new();
		let mut order: Vec<u32> = Vec::new();

		for (idx, tag) in tags.iter().enumerate() {
			let Some(pos) = registers[idx] else { continue };
			match tag {
				Tag::StartCapture(capture) => {
					let id: u32 = capture.regex.id.get();
					if !starts.contains_key(&id) {
						order.push(id);
					}
					starts.insert(id, pos);
				},
				Tag::StopCapture(capture) => {
					ends.insert(capture.regex.id.get(), pos);
				},
			}
		}

		order
			.into_iter()
			.map(|id| match (starts.get(&id), ends.get(&id)) {
				(Some(&s), Some(&e)) => Some((s, e)),
				_ => None,
			})
			.collect()
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::ccl::CclGroup;
	use crate::nfa::Nfa;
	use crate::regex::Regex;

	fn build(pattern: &str) -> (Dfa, CclGroup) {
		let regex: Regex = Regex::from_pattern(pattern).unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		nfa.eliminate_epsilons();
		let dfa: Dfa = Dfa::build(&nfa, &mut ccl_group);
		(dfa, ccl_group)
	}

	#[test]
	fn minimal_matcher_accepts() {
		let (dfa, _group) = build("ab+c");
		let mut matcher: MinimalMatcher<'_> = MinimalMatcher::init(&dfa);
		for ch in "abbbc".chars() {
			matcher.advance(ch);
		}
		assert!(matcher.done());
	}

	#[test]
	fn minimal_matcher_dead_latches() {
		let (dfa, _group) = build("abc");
		let mut matcher: MinimalMatcher<'_> = MinimalMatcher::init(&dfa);
		assert_eq!(matcher.advance('x'), -1);
		assert_eq!(matcher.advance('a'), -1);
		assert!(matcher.is_dead());
	}

	#[test]
	fn standard_matcher_tracks_capture() {
		let (dfa, _group) = build("a(?<x>b+)c");
		let mut matcher: StandardMatcher<'_> = StandardMatcher::init(&dfa);
		for ch in "abbbc".chars() {
			matcher.advance(ch);
		}
		let len: usize = matcher.done().expect("should match");
		assert_eq!(len, "abbbc".len());
		let captures: Vec<Capture> = matcher.captures(dfa.tags());
		assert_eq!(captures, vec![Some((1, 4))]);
	}
}
