//! Randomized property tests over the public `enumerate` surface.
//!
//! Exercises the universal invariants from the component design: every
//! emitted representation's relators evaluate to the identity, no two
//! emitted representations are conjugate by a single relabeling, and
//! `enumerate` is deterministic given the same inputs. Small enough
//! inputs that brute-forcing "are these two reps conjugate" over all
//! permutations of the vertex set stays cheap.

use proptest::prelude::*;
use sims_engine::{enumerate, PermutationRep};

fn all_permutations(n: usize) -> Vec<Vec<usize>> {
    fn permute(prefix: &mut Vec<usize>, remaining: &[usize], out: &mut Vec<Vec<usize>>) {
        if remaining.is_empty() {
            out.push(prefix.clone());
            return;
        }
        for i in 0..remaining.len() {
            let mut rest = remaining.to_vec();
            let x = rest.remove(i);
            prefix.push(x);
            permute(prefix, &rest, out);
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    permute(&mut Vec::new(), &(0..n).collect::<Vec<_>>(), &mut out);
    out
}

/// Are `a` and `b` the same action up to relabeling the `{0..d-1}` vertex
/// set by a single permutation?
fn are_conjugate(a: &PermutationRep, b: &PermutationRep) -> bool {
    let d = a[0].len();
    if b[0].len() != d || a.len() != b.len() {
        return false;
    }
    for sigma in all_permutations(d) {
        let matches = a.iter().zip(b.iter()).all(|(pa, pb)| {
            (0..d).all(|i| sigma[pa[i] as usize] == pb[sigma[i] as usize] as usize)
        });
        if matches {
            return true;
        }
    }
    false
}

fn apply_word(rep: &PermutationRep, word: &[i16], start: usize) -> usize {
    let mut v = start;
    for &letter in word {
        let gen = &rep[letter.unsigned_abs() as usize - 1];
        v = if letter > 0 {
            gen[v] as usize
        } else {
            gen.iter().position(|&x| x as usize == v).unwrap()
        };
    }
    v
}

fn relator_is_identity(rep: &PermutationRep, word: &[i16]) -> bool {
    let degree = rep[0].len();
    (0..degree).all(|v| apply_word(rep, word, v) == v)
}

fn small_relator(rank: i16) -> impl Strategy<Value = Vec<i16>> {
    prop::collection::vec(
        (1..=rank).prop_flat_map(|g| prop_oneof![Just(g), Just(-g)]),
        1..=4,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn emitted_reps_satisfy_every_relator(
        rank in 1i16..=2,
        max_degree in 1u8..=3,
        relators in prop::collection::vec(small_relator(2), 0..=2),
    ) {
        let rank = rank as u16;
        let relators: Vec<Vec<i16>> = relators
            .into_iter()
            .map(|r| r.into_iter().filter(|&l| l.unsigned_abs() as u16 <= rank).collect::<Vec<_>>())
            .filter(|r: &Vec<i16>| !r.is_empty())
            .collect();

        let reps = enumerate(rank, max_degree, &relators, &[], 1).unwrap();
        for rep in &reps {
            for relator in &relators {
                prop_assert!(relator_is_identity(rep, relator));
            }
        }
    }

    #[test]
    fn emitted_reps_are_pairwise_non_conjugate(
        rank in 1i16..=2,
        max_degree in 1u8..=3,
    ) {
        let rank = rank as u16;
        let reps = enumerate(rank, max_degree, &[], &[], 1).unwrap();
        for i in 0..reps.len() {
            for j in (i + 1)..reps.len() {
                prop_assert!(!are_conjugate(&reps[i], &reps[j]));
            }
        }
    }

    #[test]
    fn enumerate_is_deterministic(
        rank in 1i16..=2,
        max_degree in 1u8..=3,
    ) {
        let rank = rank as u16;
        let short = vec![vec![1i16, 1]];
        let a = enumerate(rank, max_degree, &short, &[], 1).unwrap();
        let b = enumerate(rank, max_degree, &short, &[], 1).unwrap();
        prop_assert_eq!(a, b);
    }
}
