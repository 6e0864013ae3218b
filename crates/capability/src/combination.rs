//! Most-specific-first enumeration of lookup keys.
//!
//! # Purpose
//!
//! Multi-argument dispatch has to try concrete keys in a fixed precedence
//! order: an exact match on every position beats a match where one position
//! fell back to a default, which beats one where more positions fell back.
//! [`CombinationPlan`] is the single source of truth for that order. It is a
//! pure function of its inputs, so the same plan can be iterated any number of
//! times and its inputs double as a cache key.
//!
//! # Order
//!
//! Given `N` required tuples and (optionally) `N` default tuples with `S` slots each:
//!
//! 1. The cartesian product of the required tuples.
//! 2. For each slot `d`:
//!    - one position defaulted: for each position `p`, last to first, the
//!      product with `p` replaced by `defaults[p][d]`;
//!    - one position kept: for each position `p`, first to last, the product
//!      where only `p` keeps its required tuple and every other position is
//!      `defaults[q][d]`.
//!
//!    With two or more slots the trailing slot is the catch-all fallback and
//!    only contributes the "one position kept" family.
//! 3. The cartesian product of the default tuples themselves, ending with the
//!    maximally defaulted key.
//!
//! A key that an earlier family already produced is never yielded again.
//!
//! # Invariants
//!
//! - The full required product is always yielded first and in order.
//!   - Tested by: `tests::prop_required_product_comes_first`
//!   - Failure symptom: a wildcard registration shadows an exact one.
//! - No key is yielded twice.
//!   - Enforced in: [`Combinations::next`] (seen set).
//!   - Tested by: `tests::prop_no_duplicates`
//! - With defaults, the last key is every position at its last slot.
//!   - Tested by: `tests::prop_maximally_defaulted_key_is_last`

use rustc_hash::FxHashSet;
use smallvec::{SmallVec, smallvec};

use crate::capability::Capability;
use crate::error::DispatchError;
use crate::requirement::Requirement;

/// One concrete lookup key: a capability per position.
pub type Combination = SmallVec<[Capability; 4]>;

/// Ordered families of per-position tuples whose products form the lookup order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CombinationPlan {
	arity: usize,
	families: Vec<Vec<Requirement>>,
}

impl CombinationPlan {
	/// Builds the plan for `required`, falling back through `defaults`.
	///
	/// `defaults` is either empty (exact products only) or holds one tuple per
	/// position, all with the same number of slots.
	pub fn new(required: &[Requirement], defaults: &[Requirement]) -> Result<Self, DispatchError> {
		let arity = required.len();
		let mut families = vec![required.to_vec()];

		if defaults.is_empty() {
			return Ok(Self { arity, families });
		}
		if defaults.len() != arity {
			return Err(DispatchError::ArityMismatch {
				what: "default tuples",
				expected: arity,
				actual: defaults.len(),
			});
		}

		let slots = defaults[0].len();
		if let Some(bad) = defaults.iter().find(|d| d.len() != slots || d.is_empty()) {
			return Err(DispatchError::ArityMismatch {
				what: "default slots per position",
				expected: slots.max(1),
				actual: bad.len(),
			});
		}

		let fallback = |pos: usize, slot: usize| Requirement::from(defaults[pos][slot].clone());

		for slot in 0..slots {
			let catch_all = slots > 1 && slot + 1 == slots;
			if !catch_all {
				for pos in (0..arity).rev() {
					let mut family = required.to_vec();
					family[pos] = fallback(pos, slot);
					families.push(family);
				}
			}
			for keep in 0..arity {
				families.push(
					(0..arity)
						.map(|pos| {
							if pos == keep {
								required[pos].clone()
							} else {
								fallback(pos, slot)
							}
						})
						.collect(),
				);
			}
		}

		families.push(defaults.to_vec());
		Ok(Self { arity, families })
	}

	#[inline]
	pub fn arity(&self) -> usize {
		self.arity
	}

	/// Starts a fresh pass over the lookup order.
	pub fn iter(&self) -> Combinations<'_> {
		Combinations {
			families: self.families.iter(),
			current: None,
			seen: FxHashSet::default(),
		}
	}
}

impl<'a> IntoIterator for &'a CombinationPlan {
	type Item = Combination;
	type IntoIter = Combinations<'a>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Lazy iterator over a [`CombinationPlan`].
pub struct Combinations<'a> {
	families: std::slice::Iter<'a, Vec<Requirement>>,
	current: Option<Product<'a>>,
	seen: FxHashSet<Combination>,
}

impl Iterator for Combinations<'_> {
	type Item = Combination;

	fn next(&mut self) -> Option<Combination> {
		loop {
			if let Some(product) = &mut self.current {
				for combo in product.by_ref() {
					if self.seen.insert(combo.clone()) {
						return Some(combo);
					}
				}
			}
			self.current = Some(Product::new(self.families.next()?));
		}
	}
}

/// Odometer over the cartesian product of per-position tuples, last position fastest.
struct Product<'a> {
	positions: &'a [Requirement],
	cursor: SmallVec<[usize; 4]>,
	done: bool,
}

impl<'a> Product<'a> {
	fn new(positions: &'a [Requirement]) -> Self {
		Self {
			positions,
			cursor: smallvec![0; positions.len()],
			done: positions.iter().any(|tags| tags.is_empty()),
		}
	}
}

impl Iterator for Product<'_> {
	type Item = Combination;

	fn next(&mut self) -> Option<Combination> {
		if self.done {
			return None;
		}
		let combo = self
			.cursor
			.iter()
			.zip(self.positions)
			.map(|(&idx, tags)| tags[idx].clone())
			.collect();

		self.done = true;
		for (idx, tags) in self.cursor.iter_mut().zip(self.positions).rev() {
			*idx += 1;
			if *idx < tags.len() {
				self.done = false;
				break;
			}
			*idx = 0;
		}
		Some(combo)
	}
}
