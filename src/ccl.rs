//! Character-class sets (CCL): a set of Unicode codepoint ranges plus a
//! bitmask of zero-width assertions. A group of CCLs (`CclGroup`) owns
//! canonical instances and hands out small integer ids, mirroring how
//! `justrx`'s `ccl.c` caches the predefined classes and dedups on insert.

use crate::interval_tree::{Interval, IntervalTree, Number};
use std::ops::RangeInclusive;

bitflags::bitflags! {
	/// Zero-width assertions a CCL can carry alongside (or instead of) codepoint
	/// ranges. Four custom slots are reserved for caller-defined assertions the
	/// engine never interprets itself (spec §4.A).
	#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
	pub struct Assertions: u16 {
		const BEGIN_OF_LINE  = 1 << 0;
		const END_OF_LINE    = 1 << 1;
		const BEGIN_OF_DATA  = 1 << 2;
		const END_OF_DATA    = 1 << 3;
		const WORD_BOUNDARY  = 1 << 4;
		const NOT_WORD_BOUNDARY = 1 << 5;
		const CUSTOM_0 = 1 << 6;
		const CUSTOM_1 = 1 << 7;
		const CUSTOM_2 = 1 << 8;
		const CUSTOM_3 = 1 << 9;
	}
}

/// A single character class: a set of half-open codepoint ranges `[begin,
/// end)` plus an assertion mask. Stored internally over the closed-interval
/// `IntervalTree`, translating at the boundary (`[begin, end)` <-> `[begin,
/// end-1]`) since codepoints never reach `u32::MAX`.
#[derive(Debug, Clone)]
pub struct Ccl {
	ranges: IntervalTree<u32, ()>,
	assertions: Assertions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predefined {
	Digit,
	Space,
	Word,
	NotDigit,
	NotSpace,
	NotWord,
}

impl Ccl {
	pub fn empty() -> Self {
		Self {
			ranges: IntervalTree::new(),
			assertions: Assertions::empty(),
		}
	}

	pub fn epsilon() -> Self {
		Self::empty()
	}

	pub fn any() -> Self {
		Self::from_range(0, char::MAX as u32)
	}

	pub fn from_range(begin: u32, end_exclusive: u32) -> Self {
		let mut ccl: Self = Self::empty();
		if begin < end_exclusive {
			ccl.ranges.insert(Interval::new(begin, end_exclusive - 1), (), |(), ()| ());
		}
		ccl
	}

	pub fn from_char(c: char) -> Self {
		Self::from_range(c as u32, c as u32 + 1)
	}

	pub fn from_predefined(which: Predefined) -> Self {
		let mut ccl: Self = Self::empty();
		match which {
			Predefined::Digit => ccl.add_range(b'0' as u32, b'9' as u32 + 1),
			Predefined::Space => {
				for c in [' ', '\t', '\n', '\r', '\x0b', '\x0c'] {
					ccl.add_range(c as u32, c as u32 + 1);
				}
			},
			Predefined::Word => {
				ccl.add_range(b'a' as u32, b'z' as u32 + 1);
				ccl.add_range(b'A' as u32, b'Z' as u32 + 1);
				ccl.add_range(b'0' as u32, b'9' as u32 + 1);
				ccl.add_range(b'_' as u32, b'_' as u32 + 1);
			},
			Predefined::NotDigit => return Self::from_predefined(Predefined::Digit).negated(),
			Predefined::NotSpace => return Self::from_predefined(Predefined::Space).negated(),
			Predefined::NotWord => return Self::from_predefined(Predefined::Word).negated(),
		}
		ccl
	}

	fn add_range(&mut self, begin: u32, end_exclusive: u32) {
		if begin < end_exclusive {
			self.ranges.insert(Interval::new(begin, end_exclusive - 1), (), |(), ()| ());
		}
	}

	pub fn add_assertions(&mut self, assertions: Assertions) {
		self.assertions |= assertions;
	}

	pub fn assertions(&self) -> Assertions {
		self.assertions
	}

	pub fn is_empty(&self) -> bool {
		self.ranges.len() == 0 && self.assertions.is_empty()
	}

	pub fn contains(&self, c: u32) -> bool {
		self.ranges.lookup(c).is_some()
	}

	/// `justrx`'s `_ccl_negate` treats an empty codepoint set as "no
	/// characters", so its negation is the full range; the assertion mask
	/// negates independently of the codepoint ranges.
	pub fn negate(&mut self) {
		let mut closed: Vec<Interval<u32>> = self.ranges.iter().map(|(interval, ())| *interval).collect();
		let complement: Vec<Interval<u32>> = Interval::complement(&mut closed);
		let mut ranges: IntervalTree<u32, ()> = IntervalTree::new();
		for interval in complement {
			ranges.insert(interval, (), |(), ()| ());
		}
		self.ranges = ranges;
		self.assertions = !self.assertions;
	}

	pub fn negated(mut self) -> Self {
		self.negate();
		self
	}

	/// Union of `self` and `other`, re-canonicalized (adjacent/overlapping
	/// ranges merged) regardless of whether the inputs already were, matching
	/// `_ccl_group_add_to`'s defensive dedup walk.
	pub fn join(&self, other: &Self) -> Self {
		let mut joined: Self = self.clone();
		for (interval, ()) in other.ranges.iter() {
			joined.ranges.insert(*interval, (), |(), ()| ());
		}
		joined.assertions |= other.assertions;
		joined
	}

	pub fn intersect(&self, other: &Self) -> Self {
		let mut result: Self = Self::empty();
		for (a, ()) in self.ranges.iter() {
			for (b, ()) in other.ranges.iter() {
				let begin: u32 = a.start().max(b.start());
				let end: u32 = a.end().min(b.end());
				if begin <= end {
					result.ranges.insert(Interval::new(begin, end), (), |(), ()| ());
				}
			}
		}
		result.assertions = self.assertions & other.assertions;
		result
	}

	pub fn do_intersect(&self, other: &Self) -> bool {
		!self.intersect(other).is_empty()
	}

	pub fn ranges(&self) -> impl Iterator<Item = RangeInclusive<u32>> + '_ {
		self.ranges.iter().map(|(interval, ())| interval.start()..=interval.end())
	}

	/// Subtracts `other`'s codepoint ranges from `self`'s, leaving the
	/// remainder as zero or more disjoint ranges. Used by `disambiguate` to
	/// split overlapping input CCLs into a disjoint partition.
	pub fn subtract_ranges(&self, other: &Self) -> Vec<Interval<u32>> {
		let mut remainder: Vec<Interval<u32>> = self.ranges.iter().map(|(interval, ())| *interval).collect();
		for (cut, ()) in other.ranges.iter() {
			let mut next: Vec<Interval<u32>> = Vec::new();
			for piece in remainder {
				if piece.end() < cut.start() || cut.end() < piece.start() {
					next.push(piece);
					continue;
				}
				if piece.start() < cut.start() {
					next.push(Interval::new(piece.start(), cut.start().down()));
				}
				if cut.end() < piece.end() {
					next.push(Interval::new(cut.end().up(), piece.end()));
				}
			}
			remainder = next;
		}
		remainder
	}
}

/// Owns a canonicalized collection of CCLs used while compiling a pattern,
/// handing out small ids and caching the predefined/any/empty instances so
/// repeated requests for the same class share storage.
#[derive(Debug, Default)]
pub struct CclGroup {
	members: Vec<Ccl>,
	any: Option<usize>,
	empty: Option<usize>,
}

impl CclGroup {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn intern(&mut self, ccl: Ccl) -> usize {
		for (id, existing) in self.members.iter().enumerate() {
			if ccls_equal(existing, &ccl) {
				return id;
			}
		}
		self.members.push(ccl);
		self.members.len() - 1
	}

	pub fn any(&mut self) -> usize {
		if let Some(id) = self.any {
			return id;
		}
		let id: usize = self.intern(Ccl::any());
		self.any = Some(id);
		id
	}

	pub fn empty(&mut self) -> usize {
		if let Some(id) = self.empty {
			return id;
		}
		let id: usize = self.intern(Ccl::empty());
		self.empty = Some(id);
		id
	}

	pub fn get(&self, id: usize) -> &Ccl {
		&self.members[id]
	}

	/// Splits a set of (possibly overlapping) CCL ids into the minimal
	/// disjoint partition such that each output class is a subset of, or
	/// disjoint from, every input class. This is the classic DFA alphabet
	/// refinement used before subset construction (spec §4.A).
	pub fn disambiguate(&mut self, ids: &[usize]) -> Vec<usize> {
		let mut pieces: Vec<Ccl> = ids.iter().map(|&id| self.members[id].clone()).collect();
		let mut changed: bool = true;
		while changed {
			changed = false;
			'outer: for i in 0..pieces.len() {
				for j in 0..pieces.len() {
					if i == j {
						continue;
					}
					if pieces[i].do_intersect(&pieces[j]) && !ccls_equal(&pieces[i], &pieces[j]) {
						let remainder: Vec<Interval<u32>> = pieces[i].subtract_ranges(&pieces[j]);
						let overlap: Ccl = pieces[i].intersect(&pieces[j]);
						if !overlap.is_empty() && remainder.iter().map(|i| i.end() - i.start() + 1).sum::<u32>() > 0 {
							let mut remainder_ccl: Ccl = Ccl::empty();
							for interval in remainder {
								remainder_ccl.ranges.insert(interval, (), |(), ()| ());
							}
							remainder_ccl.assertions = pieces[i].assertions;
							pieces[i] = overlap;
							pieces.push(remainder_ccl);
							changed = true;
							break 'outer;
						}
					}
				}
			}
		}
		pieces.into_iter().filter(|p| !p.is_empty()).map(|p| self.intern(p)).collect()
	}
}

fn ccls_equal(a: &Ccl, b: &Ccl) -> bool {
	a.assertions == b.assertions
		&& a.ranges.len() == b.ranges.len()
		&& a.ranges
			.iter()
			.zip(b.ranges.iter())
			.all(|((ia, ()), (ib, ()))| ia == ib)
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn from_range_contains() {
		let ccl: Ccl = Ccl::from_range('a' as u32, 'd' as u32 + 1);
		assert!(ccl.contains('a' as u32));
		assert!(ccl.contains('c' as u32));
		assert!(!ccl.contains('e' as u32));
	}

	#[test]
	fn negate_round_trips() {
		let digits: Ccl = Ccl::from_predefined(Predefined::Digit);
		let not_digits: Ccl = digits.clone().negated();
		assert!(!not_digits.contains(b'5' as u32));
		assert!(not_digits.contains(b'x' as u32));
		let back: Ccl = not_digits.negated();
		assert!(back.contains(b'5' as u32));
		assert!(!back.contains(b'x' as u32));
	}

	#[test]
	fn negate_empty_is_any() {
		let empty: Ccl = Ccl::empty();
		let full: Ccl = empty.negated();
		assert!(full.contains(0));
		assert!(full.contains('z' as u32));
	}

	#[test]
	fn join_merges_overlap() {
		let a: Ccl = Ccl::from_range(0, 10);
		let b: Ccl = Ccl::from_range(5, 20);
		let joined: Ccl = a.join(&b);
		for c in 0..20 {
			assert!(joined.contains(c));
		}
		assert!(!joined.contains(20));
	}

	#[test]
	fn intersect_and_do_intersect() {
		let a: Ccl = Ccl::from_range(0, 10);
		let b: Ccl = Ccl::from_range(5, 20);
		assert!(a.do_intersect(&b));
		let overlap: Ccl = a.intersect(&b);
		assert!(overlap.contains(7));
		assert!(!overlap.contains(2));
		let c: Ccl = Ccl::from_range(100, 200);
		assert!(!a.do_intersect(&c));
	}

	#[test]
	fn disambiguate_splits_overlap() {
		let mut group: CclGroup = CclGroup::new();
		let a: usize = group.intern(Ccl::from_range(0, 10));
		let b: usize = group.intern(Ccl::from_range(5, 15));
		let pieces: Vec<usize> = group.disambiguate(&[a, b]);
		assert!(pieces.len() >= 2);
		for i in 0..pieces.len() {
			for j in (i + 1)..pieces.len() {
				assert!(!group.get(pieces[i]).do_intersect(group.get(pieces[j])));
			}
		}
	}

	#[test]
	fn assertions_carry_through_negate() {
		let mut ccl: Ccl = Ccl::empty();
		ccl.add_assertions(Assertions::BEGIN_OF_LINE);
		ccl.negate();
		assert!(!ccl.assertions().contains(Assertions::BEGIN_OF_LINE));
		assert!(ccl.assertions().contains(Assertions::END_OF_LINE));
	}
}
