//! Permutation genetic operators.
//!
//! The genome is a permutation of operation indices, so every operator must
//! return a valid permutation: order crossover fills non-segment positions
//! from the other parent's relative order, swap mutation exchanges two
//! positions. Both are property-tested for permutation validity.
//!
//! # References
//!
//! - Davis (1985), "Applying Adaptive Algorithms to Epistatic Domains"
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::{index, SliceRandom};
use rand::Rng;

/// Creates a uniformly random permutation of `0..n`.
pub fn random_permutation<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// Order crossover (OX) for permutations.
///
/// Picks two cut points `start < end`, copies the slice `[start, end)`
/// verbatim from each parent into its child at the same positions, then
/// fills the remaining positions left to right with the other parent's
/// values in their original order, skipping values already placed.
///
/// Both children are valid permutations of the shared element set.
///
/// # Panics
/// Panics if parents have different lengths or are empty.
pub fn order_crossover<R: Rng>(
    parent1: &[usize],
    parent2: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    assert!(n > 0, "parents must not be empty");

    if n == 1 {
        return (parent1.to_vec(), parent2.to_vec());
    }

    let (start, end) = cut_points(n, rng);
    let child1 = ox_build_child(parent1, parent2, start, end);
    let child2 = ox_build_child(parent2, parent1, start, end);
    (child1, child2)
}

/// Build one OX child: copy `[start, end)` from `template`, fill the rest
/// from `donor` in donor order.
fn ox_build_child(template: &[usize], donor: &[usize], start: usize, end: usize) -> Vec<usize> {
    let n = template.len();
    let mut child = vec![usize::MAX; n];
    let mut in_segment = vec![false; n];

    for i in start..end {
        child[i] = template[i];
        in_segment[template[i]] = true;
    }

    let mut donor_values = donor.iter().filter(|&&v| !in_segment[v]);
    for slot in child.iter_mut() {
        if *slot == usize::MAX {
            *slot = *donor_values
                .next()
                .expect("donor contains every value missing from the segment");
        }
    }

    child
}

/// Swap mutation: exchanges two distinct random positions.
///
/// No-op on permutations shorter than 2.
pub fn swap_mutation<R: Rng>(perm: &mut [usize], rng: &mut R) {
    let n = perm.len();
    if n < 2 {
        return;
    }
    let picked = index::sample(rng, n, 2);
    perm.swap(picked.index(0), picked.index(1));
}

/// Two distinct cut points `(start, end)` with `start < end`, both in `0..n`.
fn cut_points<R: Rng>(n: usize, rng: &mut R) -> (usize, usize) {
    let picked = index::sample(rng, n, 2);
    let (a, b) = (picked.index(0), picked.index(1));
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}
