//! Subset construction over an already epsilon-free [`crate::nfa::Nfa`].
//!
//! Unlike the re2c/TDFA paper the teacher's original `dfa.rs` cites (closure
//! computed lazily, on the fly, during determinization), this module assumes
//! `nfa.eliminate_epsilons()` has already run: every `Nfa::epsilon_free_transitions`
//! call returns direct, already-closed edges, so subset construction here is
//! the classic untagged algorithm plus bookkeeping for which tag events fire
//! on each edge. Lazy state expansion still follows the teacher's
//! reserve-a-slot-before-recursing approach to avoid infinite regress on
//! cyclic kernels (e.g. `a*`).

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::ccl::CclGroup;
use crate::interval_tree::{Interval, IntervalTree};
use crate::nfa::{Nfa, NfaIdx, Tag, TagEvent};

pub type Kernel = BTreeSet<NfaIdx>;

#[derive(Debug, Clone)]
pub struct Dfa {
	states: Vec<DfaState>,
	tags: Vec<Tag>,
}

#[derive(Debug, Clone)]
struct DfaState {
	transitions: IntervalTree<u32, Transition>,
	/// Tag events to apply when this state is reached as a final state.
	final_tags: Option<Vec<TagEvent>>,
	ascii_cache: [Option<usize>; 0x80],
}

#[derive(Debug, Clone, Default)]
pub struct Transition {
	/// Index of the target state, or `None` for the dead state.
	pub target: Option<usize>,
	pub tags: Vec<TagEvent>,
}

impl Dfa {
	/// Builds the whole DFA eagerly (the `LAZY` option instead keeps states
	/// reserved as `Unreserved` until first reached — tracked by `facade.rs`
	/// wrapping this same worklist with an on-demand driver; this
	/// constructor always drains the worklist to completion).
	#[tracing::instrument(skip(nfa, ccl_group))]
	pub fn build(nfa: &Nfa, ccl_group: &mut CclGroup) -> Self {
		let mut dfa: Self = Self {
			states: Vec::new(),
			tags: nfa.tags().to_vec(),
		};

		// Each kernel gets its index assigned exactly once, at the moment
		// it's first discovered; `worklist` only ever holds kernels whose
		// index has already been reserved, so popping one never re-allocates.
		let mut index_of: BTreeMap<Kernel, usize> = BTreeMap::new();
		let mut worklist: VecDeque<Kernel> = VecDeque::new();

		let start_kernel: Kernel = Kernel::from([nfa.start()]);
		index_of.insert(start_kernel.clone(), 0);
		dfa.states.push(DfaState::empty());
		worklist.push_back(start_kernel);

		while let Some(kernel) = worklist.pop_front() {
			let this_index: usize = index_of[&kernel];

			let final_tags: Option<Vec<TagEvent>> = kernel
				.iter()
				.find_map(|&s| nfa.accepting_tags(s).map(|tags| tags.to_vec()));

			debug!("expanding kernel {kernel:?} -> state {this_index}, final: {}", final_tags.is_some());

			// Collect every (ccl, target, tags) triple reachable from any
			// member of this kernel.
			let mut edges: Vec<(usize, NfaIdx, Vec<TagEvent>)> = Vec::new();
			for &state in kernel.iter() {
				for transition in nfa.epsilon_free_transitions(state) {
					edges.push((transition.ccl, transition.target, transition.tags.clone()));
				}
			}

			let ccl_ids: Vec<usize> = edges.iter().map(|(ccl, ..)| *ccl).collect();
			let pieces: Vec<usize> = ccl_group.disambiguate(&ccl_ids);

			let mut transitions: IntervalTree<u32, Transition> = IntervalTree::new();
			for &piece in pieces.iter() {
				let mut target_kernel: Kernel = Kernel::new();
				let mut tags: Vec<TagEvent> = Vec::new();
				for (ccl, target, edge_tags) in edges.iter() {
					if ccl_group.get(piece).do_intersect(ccl_group.get(*ccl)) {
						target_kernel.insert(*target);
						tags.extend(edge_tags.iter().cloned());
					}
				}
				if target_kernel.is_empty() {
					continue;
				}

				let target_index: usize = *index_of.entry(target_kernel.clone()).or_insert_with(|| {
					let idx: usize = dfa.states.len();
					dfa.states.push(DfaState::empty());
					worklist.push_back(target_kernel.clone());
					idx
				});

				for range in ccl_group.get(piece).ranges() {
					transitions.insert(
						Interval::new(*range.start(), *range.end()),
						Transition {
							target: Some(target_index),
							tags: tags.clone(),
						},
						|a, _| a.clone(),
					);
				}
			}

			let mut state: DfaState = DfaState::empty();
			state.transitions = transitions;
			state.final_tags = final_tags;
			state.build_ascii_cache();
			dfa.states[this_index] = state;
		}

		dfa
	}

	pub fn tags(&self) -> &[Tag] {
		&self.tags
	}

	pub fn start(&self) -> usize {
		0
	}

	pub fn is_final(&self, state: usize) -> bool {
		self.states[state].final_tags.is_some()
	}

	pub fn final_tags(&self, state: usize) -> Option<&[TagEvent]> {
		self.states[state].final_tags.as_deref()
	}

	/// Looks up the transition for `ch` from `state`. Returns `None` for the
	/// dead state (no outgoing edge matches).
	pub fn step(&self, state: usize, ch: char) -> Option<&Transition> {
		let code: u32 = u32::from(ch);
		let dstate: &DfaState = &self.states[state];
		if code < 0x80 {
			if let Some(idx) = dstate.ascii_cache[code as usize] {
				return Some(&dstate.transitions[idx].1);
			}
			return None;
		}
		dstate.transitions.lookup(code)
	}
}

impl DfaState {
	fn empty() -> Self {
		Self {
			transitions: IntervalTree::new(),
			final_tags: None,
			ascii_cache: [None; 0x80],
		}
	}

	fn build_ascii_cache(&mut self) {
		for code in 0..0x80u32 {
			self.ascii_cache[code as usize] = (0..self.transitions.len()).find(|&i| {
				let (interval, _) = &self.transitions[i];
				interval.start() <= code && code <= interval.end()
			});
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::regex::Regex;

	#[test]
	fn builds_simple_dfa() {
		let regex: Regex = Regex::from_pattern("ab+c").unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		nfa.eliminate_epsilons();
		let dfa: Dfa = Dfa::build(&nfa, &mut ccl_group);

		let mut state: usize = dfa.start();
		for ch in "abbbc".chars() {
			let transition: &Transition = dfa.step(state, ch).expect("transition should exist");
			state = transition.target.expect("live transition");
		}
		assert!(dfa.is_final(state));
	}

	#[test]
	fn dead_state_on_mismatch() {
		let regex: Regex = Regex::from_pattern("abc").unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		nfa.eliminate_epsilons();
		let dfa: Dfa = Dfa::build(&nfa, &mut ccl_group);

		let state: usize = dfa.start();
		assert!(dfa.step(state, 'x').is_none());
	}

	#[test]
	fn captures_produce_tag_events() {
		let regex: Regex = Regex::from_pattern("(?<x>a+)b").unwrap();
		let mut ccl_group: CclGroup = CclGroup::new();
		let mut nfa: Nfa = Nfa::from_regex(&regex, &mut ccl_group);
		nfa.eliminate_epsilons();
		let dfa: Dfa = Dfa::build(&nfa, &mut ccl_group);
		assert_eq!(dfa.tags().len(), 2);
	}
}
