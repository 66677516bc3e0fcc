//! NFA construction from a [`crate::regex::Regex`] AST, plus the one-shot
//! epsilon-elimination pass that turns it into the epsilon-free automaton
//! `dfa.rs` performs subset construction over.
//!
//! Kept close to the teacher's `nfa.rs` vocabulary (`NfaState`,
//! `SpontaneousTransition`, `Tag`) but labels character transitions with CCL
//! ids from a shared [`CclGroup`] rather than raw codepoint ranges, and
//! separates epsilon elimination into its own pass (`eliminate_epsilons`)
//! instead of folding closure into DFA construction, matching the original
//! `justrx` design spec.md follows.

use std::collections::BTreeSet;

use crate::ccl::CclGroup;
use crate::regex::{Regex, RegexCapture};

#[derive(Clone, Copy, Eq, Ord, PartialEq, PartialOrd, Hash)]
pub struct NfaIdx(usize);

impl std::fmt::Debug for NfaIdx {
	fn fmt(&self, fmt: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		fmt.debug_tuple("NfaIdx").field(&self.0).finish()
	}
}

#[derive(Debug)]
pub struct NfaState {
	/// Direct character transitions: `(ccl id, target)`. Populated while
	/// building the AST; read by [`Nfa::eliminate_epsilons`].
	transitions: Vec<(usize, NfaIdx)>,
	spontaneous: Vec<SpontaneousTransition>,
}

#[derive(Debug)]
pub struct SpontaneousTransition {
	pub kind: SpontaneousTransitionKind,
	pub target: NfaIdx,
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum SpontaneousTransitionKind {
	Epsilon,
	Positive(Tag),
	Negative(Tag),
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum Tag {
	StartCapture(Capture),
	StopCapture(Capture),
}

#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub struct Capture {
	pub regex: RegexCapture,
}

/// A single tag operation carried by an epsilon-free transition, produced by
/// replaying the epsilon path that used to lead to it.
#[derive(Debug, Clone, Eq, Ord, PartialEq, PartialOrd)]
pub enum TagEvent {
	Set(Tag),
	Reset(Tag),
}

/// An epsilon-free transition: consume the CCL, land on `target`, applying
/// `tags` (in order) as you go. Produced by [`Nfa::eliminate_epsilons`].
#[derive(Debug, Clone)]
pub struct EpsilonFreeTransition {
	pub ccl: usize,
	pub target: NfaIdx,
	pub tags: Vec<TagEvent>,
}

#[derive(Debug)]
pub struct Nfa {
	states: Vec<NfaState>,
	tags: Vec<Tag>,
	start: NfaIdx,
	accept: NfaIdx,
	/// Populated by [`Nfa::eliminate_epsilons`]; empty beforehand.
	epsilon_free: Vec<Vec<EpsilonFreeTransition>>,
	/// For each state, the tag path replayed on immediately accepting there
	/// via an epsilon-only path (empty if the state doesn't reach accept
	/// without consuming input).
	accepting_tags: Vec<Option<Vec<TagEvent>>>,
}

impl Nfa {
	pub fn from_regex(regex: &Regex, ccl_group: &mut CclGroup) -> Self {
		let mut nfa: Self = Self {
			states: vec![NfaState::new(), NfaState::new()],
			tags: Vec::new(),
			start: NfaIdx(0),
			accept: NfaIdx(1),
			epsilon_free: Vec::new(),
			accepting_tags: Vec::new(),
		};
		let mut builder: Builder<'_> = Builder { nfa: &mut nfa, ccl_group };
		let tags: BTreeSet<Tag> = builder.build(regex, NfaIdx(0), NfaIdx(1));
		nfa.tags = tags.into_iter().collect();
		nfa
	}

	pub fn start(&self) -> NfaIdx {
		self.start
	}

	pub fn is_accept(&self, idx: NfaIdx) -> bool {
		idx == self.accept
	}

	pub fn tags(&self) -> &[Tag] {
		&self.tags
	}

	/// Replaces every epsilon/tagged-epsilon path with a direct, epsilon-free
	/// transition carrying the tag events accumulated along that path. Run
	/// once, up front; `dfa.rs`'s subset construction never needs to chase
	/// epsilons itself afterward.
	#[tracing::instrument(skip(self))]
	pub fn eliminate_epsilons(&mut self) {
		self.epsilon_free = Vec::with_capacity(self.states.len());
		self.accepting_tags = Vec::with_capacity(self.states.len());

		for idx in 0..self.states.len() {
			let idx: NfaIdx = NfaIdx(idx);
			let closure: Vec<(NfaIdx, Vec<TagEvent>)> = self.epsilon_closure(idx);

			let mut out: Vec<EpsilonFreeTransition> = Vec::new();
			let mut accept_tags: Option<Vec<TagEvent>> = None;

			for (state, path) in closure.iter() {
				if *state == self.accept && accept_tags.is_none() {
					accept_tags = Some(path.clone());
				}
				for &(ccl, target) in self.states[state.0].transitions.iter() {
					let mut tags: Vec<TagEvent> = path.clone();
					let target_closure: Vec<(NfaIdx, Vec<TagEvent>)> = self.epsilon_closure(target);
					// Land on the first state in the target's own closure
					// that either accepts or carries further transitions;
					// chain its leading tag path onto ours.
					if let Some((landing, lead)) = target_closure.into_iter().next() {
						tags.extend(lead);
						out.push(EpsilonFreeTransition { ccl, target: landing, tags });
					}
				}
			}

			debug!("state {idx:?}: {} epsilon-free transitions", out.len());
			self.epsilon_free.push(out);
			self.accepting_tags.push(accept_tags);
		}
	}

	pub fn epsilon_free_transitions(&self, idx: NfaIdx) -> &[EpsilonFreeTransition] {
		&self.epsilon_free[idx.0]
	}

	pub fn accepting_tags(&self, idx: NfaIdx) -> Option<&[TagEvent]> {
		self.accepting_tags[idx.0].as_deref()
	}

	fn epsilon_closure(&self, start: NfaIdx) -> Vec<(NfaIdx, Vec<TagEvent>)> {
		let mut visited: BTreeSet<NfaIdx> = BTreeSet::new();
		let mut result: Vec<(NfaIdx, Vec<TagEvent>)> = Vec::new();
		let mut stack: Vec<(NfaIdx, Vec<TagEvent>)> = vec![(start, Vec::new())];

		while let Some((state, path)) = stack.pop() {
			if !visited.insert(state) {
				continue;
			}
			result.push((state, path.clone()));
			if state == self.accept {
				continue;
			}
			for spontaneous in self.states[state.0].spontaneous.iter() {
				let mut next_path: Vec<TagEvent> = path.clone();
				match &spontaneous.kind {
					SpontaneousTransitionKind::Positive(tag) => next_path.push(TagEvent::Set(tag.clone())),
					SpontaneousTransitionKind::Negative(tag) => next_path.push(TagEvent::Reset(tag.clone())),
					SpontaneousTransitionKind::Epsilon => {},
				}
				stack.push((spontaneous.target, next_path));
			}
		}

		result
	}
}

struct Builder<'a> {
	nfa: &'a mut Nfa,
	ccl_group: &'a mut CclGroup,
}

impl<'a> Builder<'a> {
	fn new_state(&mut self) -> NfaIdx {
		let idx: NfaIdx = NfaIdx(self.nfa.states.len());
		self.nfa.states.push(NfaState::new());
		idx
	}

	fn build(&mut self, regex: &Regex, mut current: NfaIdx, target: NfaIdx) -> BTreeSet<Tag> {
		match regex {
			Regex::AnyChar => {
				let ccl: usize = self.ccl_group.any();
				self.nfa.states[current.0].transitions.push((ccl, target));
				BTreeSet::new()
			},
			&Regex::Literal(ch) => {
				let ccl: usize = self.ccl_group.intern(crate::ccl::Ccl::from_char(ch));
				self.nfa.states[current.0].transitions.push((ccl, target));
				BTreeSet::new()
			},
			Regex::Capture { info, item } => self.capture(info.clone(), item, current, target),
			Regex::Group { negated, items } => {
				let mut ccl: crate::ccl::Ccl = crate::ccl::Ccl::empty();
				for &(start, end) in items.iter() {
					if start <= end {
						ccl = ccl.join(&crate::ccl::Ccl::from_range(u32::from(start), u32::from(end) + 1));
					}
				}
				if *negated {
					ccl.negate();
				}
				let ccl_id: usize = self.ccl_group.intern(ccl);
				self.nfa.states[current.0].transitions.push((ccl_id, target));
				BTreeSet::new()
			},
			Regex::KleeneClosure(item) => {
				let item_start: NfaIdx = self.new_state();
				let item_end: NfaIdx = self.new_state();
				let item_skip: NfaIdx = self.new_state();

				self.epsilon(current, item_start);
				self.epsilon(current, item_skip);

				let tags: BTreeSet<Tag> = self.build(item, item_start, item_end);

				self.epsilon(item_end, item_start);
				self.epsilon(item_end, target);

				self.negative_tags(tags.iter().cloned(), item_skip, target);

				tags
			},
			Regex::BoundedRepetition { min, max, item } => {
				if min > max {
					todo!("warn invalid repetition");
				}
				let middle: NfaIdx = self.new_state();
				let mut tags: BTreeSet<Tag> = BTreeSet::new();

				for _ in 0..*min {
					let sub_target: NfaIdx = self.new_state();
					tags.append(&mut self.build(item, current, sub_target));
					current = sub_target;
				}

				self.epsilon(current, middle);
				self.epsilon(current, target);

				current = middle;
				for i in *min..*max {
					let sub_target: NfaIdx = if i + 1 < *max { self.new_state() } else { target };
					self.epsilon(current, target);
					tags.append(&mut self.build(item, current, sub_target));
					current = sub_target;
				}
				tags
			},
			Regex::Sequence(items) => {
				let mut tags: BTreeSet<Tag> = BTreeSet::new();
				for (i, sub_item) in items.iter().enumerate() {
					let sub_target: NfaIdx = if i + 1 < items.len() { self.new_state() } else { target };
					tags.append(&mut self.build(sub_item, current, sub_target));
					current = sub_target;
				}
				tags
			},
			Regex::Alternation(items) => self.alternate(items, current, target),
		}
	}

	fn capture(&mut self, capture: RegexCapture, item: &Regex, current: NfaIdx, target: NfaIdx) -> BTreeSet<Tag> {
		let capture: Capture = Capture { regex: capture };
		let start_capture: Tag = Tag::StartCapture(capture.clone());
		let end_capture: Tag = Tag::StopCapture(capture);

		let sub_start: NfaIdx = self.new_state();
		let sub_end: NfaIdx = self.new_state();

		self.nfa.states[current.0].spontaneous.push(SpontaneousTransition {
			kind: SpontaneousTransitionKind::Positive(start_capture.clone()),
			target: sub_start,
		});

		let mut tags: BTreeSet<Tag> = self.build(item, sub_start, sub_end);

		self.nfa.states[sub_end.0].spontaneous.push(SpontaneousTransition {
			kind: SpontaneousTransitionKind::Positive(end_capture.clone()),
			target,
		});

		tags.insert(start_capture);
		tags.insert(end_capture);
		tags
	}

	fn alternate(&mut self, items: &[Regex], current: NfaIdx, target: NfaIdx) -> BTreeSet<Tag> {
		let mut tags: BTreeSet<Tag> = BTreeSet::new();
		let mut branches: Vec<(NfaIdx, BTreeSet<Tag>)> = Vec::new();

		for sub_item in items.iter() {
			let sub_start: NfaIdx = self.new_state();
			let sub_target: NfaIdx = self.new_state();
			self.epsilon(current, sub_start);
			branches.push((sub_target, self.build(sub_item, sub_start, sub_target)));
		}

		for (i, (sub_state, sub_tags)) in branches.iter().enumerate() {
			let mut sub_current: NfaIdx = *sub_state;
			for (other, (_, other_tags)) in branches.iter().enumerate() {
				if other == i {
					continue;
				}
				let sub_target: NfaIdx = self.new_state();
				self.negative_tags(other_tags.iter().cloned(), sub_current, sub_target);
				sub_current = sub_target;
			}
			self.epsilon(sub_current, target);
			tags = &tags | sub_tags;
		}

		tags
	}

	fn negative_tags(&mut self, tags: impl Iterator<Item = Tag>, mut current: NfaIdx, target: NfaIdx) {
		for tag in tags {
			let next: NfaIdx = self.new_state();
			self.nfa.states[current.0].spontaneous.push(SpontaneousTransition {
				kind: SpontaneousTransitionKind::Negative(tag),
				target: next,
			});
			current = next;
		}
		self.epsilon(current, target);
	}

	fn epsilon(&mut self, from: NfaIdx, to: NfaIdx) {
		self.nfa.states[from.0].spontaneous.push(SpontaneousTransition {
			kind: SpontaneousTransitionKind::Epsilon,
			target: to,
		});
	}
}

impl NfaState {
	fn new() -> Self {
		Self {
			transitions: Vec::new(),
			spontaneous: Vec::new(),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::regex::Regex;

	#[test]
	fn builds_and_eliminates_epsilons() {
		let regex: Regex = Regex::from_pattern("a(?<x>b+)c").unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		nfa.eliminate_epsilons();

		// Every reachable transition from the start state must be
		// epsilon-free: it consumes a CCL and lands somewhere concrete.
		let start: NfaIdx = nfa.start();
		assert!(!nfa.epsilon_free_transitions(start).is_empty());
	}

	#[test]
	fn capture_tags_present() {
		let regex: Regex = Regex::from_pattern("(?<x>a)").unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		assert_eq!(nfa.tags().len(), 2);
	}
}
