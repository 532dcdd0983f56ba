//! End-to-head chain merging.
//!
//! Whenever the last element of one chain equals the first element of
//! another, the second chain (minus its duplicated head) is spliced onto the
//! first and removed. Merging repeats until no chain ends where another one
//! starts.
//!
//! The merge runs as an explicit worklist over chain ids with an index from
//! head vertex to live chains, so it needs no recursion. A chain's tail only
//! changes when it absorbs another chain and heads never change, so once a
//! chain has been extended as far as possible it stays a fixed point; the
//! result is the same fixed point a rescanning pairwise merge reaches.

use std::collections::HashMap;

/// Merge successor chains into maximal chains, preserving discovery order.
///
/// A chain that closes into a cycle ends with its first element repeated.
pub fn merge_chains(chains: Vec<Vec<usize>>) -> Vec<Vec<usize>> {
    let mut live: Vec<Option<Vec<usize>>> = chains
        .into_iter()
        .map(|c| if c.is_empty() { None } else { Some(c) })
        .collect();
    let mut by_head: HashMap<usize, Vec<usize>> = HashMap::new();
    for (id, chain) in live.iter().enumerate() {
        if let Some(&head) = chain.as_ref().and_then(|c| c.first()) {
            by_head.entry(head).or_default().push(id);
        }
    }

    let mut worklist: Vec<usize> = (0..live.len()).rev().collect();
    while let Some(id) = worklist.pop() {
        loop {
            let Some(tail) = live[id].as_ref().and_then(|c| c.last().copied()) else {
                break;
            };
            let next = by_head
                .get(&tail)
                .and_then(|ids| ids.iter().copied().find(|&other| other != id));
            let Some(other) = next else {
                break;
            };
            let Some(absorbed) = live[other].take() else {
                break;
            };
            if let Some(ids) = by_head.get_mut(&absorbed[0]) {
                ids.retain(|&x| x != other);
            }
            if let Some(chain) = live[id].as_mut() {
                chain.extend_from_slice(&absorbed[1..]);
            }
        }
    }

    live.into_iter().flatten().collect()
}
