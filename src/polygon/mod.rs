//! Cycle decomposition of a permutation matrix into polygon rings.
//!
//! Pipeline per sample
//! 1) Active-set filter: slot `i` is active iff `perm[i][i] != 1`; active
//!    slots keep their order and are relabelled `0..K`.
//! 2) Restriction to active rows × active columns. The restriction of an
//!    arbitrary matrix need not be a bijection; it is only used for scoring.
//! 3) Per-row argmax (first maximum wins) gives every active slot a
//!    successor, i.e. one 2-element chain `[i, succ(i)]` per row.
//! 4) Chains are merged end-to-head with an explicit worklist until no chain
//!    ends where another begins (see [`merge`]).
//! 5) Rings are returned in original slot indices, in discovery order,
//!    without the repeated closing vertex. The first vertex of a ring is
//!    whichever slot started its chain.
//!
//! Nothing here guarantees the successor map is a bijection on the active
//! set, and rings of one or two slots are returned as-is.
//!
//! [`format`] applies one of the output coordinate conventions to a resolved
//! ring.

mod assemble;
pub mod format;
pub mod merge;

pub use assemble::{
    active_slots, assemble, assemble_permutation, resolve_ring, restrict, successor_chains,
};
pub use format::{FormattedRing, RingFormat};
pub use merge::merge_chains;
