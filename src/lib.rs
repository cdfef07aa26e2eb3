//! # Succinct String Dictionary
//!
//! *A sorted set of byte strings in close to the information-theoretic
//! minimum of space, still answering prefix queries.*
//!
//! ## Intuition First
//!
//! A pointer-based trie is a luxury apartment building: every node gets its
//! own address and a hallway of pointers to its children. Comfortable, but
//! the hallways cost far more than the tenants. A succinct trie demolishes
//! the hallways and writes the whole floor plan down as one bit sequence —
//! and with a little indexing on the side, you can still knock on any
//! door in constant time.
//!
//! ## The Problem
//!
//! Storing *n* keys in a pointer trie costs a machine word or more per node.
//! For large dictionaries (search engine vocabularies, input-method
//! lexicons, IP tables) the pointers dwarf the payload. The tree *shape* of
//! an n-node trie only carries about $2n$ bits of information, so anything
//! beyond that is overhead we should be able to shed.
//!
//! ## Historical Context
//!
//! ```text
//! 1989  Jacobson    Succinct trees: rank/select over a 2n-bit encoding
//! 1996  Munro-Raman Constant-time rank and select in o(n) extra space
//! 2006  Delpratt    "Engineering the LOUDS succinct tree representation"
//! 2008  Okanohara   Practical succinct dictionaries with tail compression
//! ```
//!
//! LOUDS (Level-Order Unary Degree Sequence) lists every node in
//! breadth-first order and writes its degree in unary: one `0` per child,
//! then a closing `1`. Parent and child hops become rank/select arithmetic
//! on that sequence.
//!
//! ## Mathematical Formulation
//!
//! For a trie of $n$ nodes the LOUDS sequence uses $2n + O(1)$ bits. With
//! the terminal/tail flags ($2n$ bits), edge labels ($8$ bits per edge) and
//! out-of-line tails, the whole dictionary stays within a small factor of
//! the entropy of the key set, while supporting:
//!
//! - `prefix_search(s)`: the longest stored prefix of $s$.
//! - `common_prefix_search(s)`: all stored prefixes of $s$.
//! - `predictive_search(s)`: all stored extensions of $s$.
//! - `decode(id)`: the key with identifier $id \in [0, N)$.
//!
//! ## What Could Go Wrong
//!
//! 1. **Static only**: the structure is frozen at build time. Adding a key
//!    means rebuilding; this crate never mutates after construction.
//! 2. **Off-by-one arithmetic**: LOUDS navigation mixes 0- and 1-based
//!    rank/select conventions. The [`BitVector`] contract (exclusive rank,
//!    0-indexed select) is pinned in one place and everything else derives
//!    from it.
//!
//! ## Implementation Notes
//!
//! This crate provides:
//! - [`BitVector`]: append-then-freeze rank/select bit vector.
//! - [`PackedIntVector`]: bit-packed integer sequence.
//! - [`Dict`]: the LOUDS trie dictionary with tail compression and a
//!   stable binary serialization.
//!
//! ## References
//!
//! - Jacobson, G. (1989). "Space-efficient Static Trees and Graphs."
//! - Delpratt, O., Rahman, N., & Raman, R. (2006). "Engineering the LOUDS
//!   Succinct Tree Representation."
//! - Okanohara, D., & Tsujii, J. (2009). "Text Categorization with All
//!   Substring Features" (succinct dictionaries in practice).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bitvec;
mod builder;
mod codec;
pub mod dict;
pub mod error;
pub mod intvec;

pub use bitvec::BitVector;
pub use dict::Dict;
pub use error::Error;
pub use intvec::PackedIntVector;
