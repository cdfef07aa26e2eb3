//! Succinct trie dictionary over byte-string keys.
//!
//! Stores a sorted set of byte strings in a level-order trie encoded as a
//! LOUDS bit sequence (roughly two bits per node), with two parallel bit
//! vectors marking terminal nodes and out-of-line tail suffixes, and an
//! edge-label array indexed by rank. Each distinct key owns a dense
//! identifier in `[0, N)`: its rank among terminal nodes in level order.
//!
//! # Queries
//!
//! - [`Dict::prefix_search`]: longest stored key that is a prefix of the
//!   input.
//! - [`Dict::common_prefix_search`]: every stored key that is a prefix of
//!   the input, shortest first.
//! - [`Dict::predictive_search`]: every stored key that extends the input.
//! - [`Dict::decode`]: identifier back to its key.
//!
//! # Navigation arithmetic
//!
//! A position/zero-count pair `(pos, zeros)` walks the LOUDS vector. For
//! the node numbered `n` in level order, `pos` is one past the node's
//! opening one-bit (`select1(n) + 1`) and `zeros = pos - n`, so
//! `pos - zeros` recovers `n` and indexes the terminal/tail vectors
//! directly. A child step scans the node's zero-run comparing edge labels
//! and jumps through `select1`; the parent step inverts it through
//! `select0`. Every query is built on these two steps.
//!
//! # Tail compression
//!
//! A subtree holding exactly one key with at least two unconsumed bytes
//! stores the whole remaining suffix out of line instead of one node per
//! byte. Tail storage is either a flat list of suffixes or, when built with
//! `nested_tails`, a second dictionary over the *reversed* suffixes (shared
//! endings become shared prefixes and collapse), with each tail slot
//! holding a bit-packed inner identifier of minimal width.
//!
//! # Binary format
//!
//! Little-endian, versioned by an 8-byte magic. Fields in order:
//!
//! | field | encoding |
//! |---|---|
//! | magic | `SDICTV01` |
//! | louds, terminal, tail | bit length u64, then raw words |
//! | tail_ids | bit length u64, then raw words |
//! | key_num | u64 |
//! | edges | length u64, then raw label bytes |
//! | nested flag | u8 |
//! | tail store | nested: inner dictionary, same format; flat: count u64, then per tail length u64 + bytes |
//!
//! Loading validates the structural invariants and rejects trailing bytes;
//! a reloaded dictionary re-serializes byte-identically.

use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use crate::bitvec::BitVector;
use crate::builder;
use crate::codec::Cursor;
use crate::error::{Error, Result};
use crate::intvec::PackedIntVector;

const MAGIC: &[u8; 8] = b"SDICTV01";

/// Internal navigation sentinel; never exposed through the public API.
const NOT_FOUND: usize = usize::MAX;

/// An immutable succinct string dictionary.
///
/// Built once with [`Dict::build`] or loaded with [`Dict::from_bytes`];
/// afterwards the structure is read-only and freely shareable across
/// threads.
pub struct Dict {
    louds: BitVector,
    terminal: BitVector,
    tail: BitVector,
    tail_ids: PackedIntVector,
    tail_id_width: usize,
    edges: Vec<u8>,
    key_num: usize,
    tails: TailStore,
    ready: bool,
}

/// Out-of-line tail suffixes: a plain list, or a dictionary over the
/// reversed suffixes addressed through the packed identifier vector.
enum TailStore {
    Flat(Vec<Vec<u8>>),
    Nested(Box<Dict>),
}

impl std::fmt::Debug for Dict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Dict");
        s.field("keys", &self.key_num);
        match &self.tails {
            TailStore::Flat(tails) => s.field("tails", &tails.len()),
            TailStore::Nested(inner) => s.field("nested_tails", &inner.key_num),
        };
        s.finish()
    }
}

/// Bits needed to address identifiers in `[0, key_count)`; 0 when a single
/// identifier (or none) exists.
fn id_width(key_count: usize) -> usize {
    if key_count <= 1 {
        0
    } else {
        (usize::BITS - (key_count - 1).leading_zeros()) as usize
    }
}

fn reversed(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().rev().copied().collect()
}

impl Dict {
    /// Build a dictionary from `keys`. The input may be unsorted and may
    /// contain duplicates; distinct keys are indexed in level order of
    /// their trie nodes. With `nested_tails`, the out-of-line suffixes are
    /// themselves stored in a nested dictionary over their reversals.
    pub fn build<K: AsRef<[u8]>>(keys: &[K], nested_tails: bool) -> Self {
        let mut sorted: Vec<&[u8]> = keys.iter().map(|k| k.as_ref()).collect();
        sorted.sort_unstable();
        sorted.dedup();

        let parts = builder::build_parts(&sorted);
        let mut dict = Dict {
            louds: parts.louds,
            terminal: parts.terminal,
            tail: parts.tail,
            tail_ids: PackedIntVector::new(),
            tail_id_width: 0,
            edges: parts.edges,
            key_num: parts.key_num,
            tails: TailStore::Flat(parts.tails),
            ready: parts.key_num > 0,
        };
        if nested_tails {
            dict.nest_tails();
        }
        dict
    }

    /// Replace the flat tail list with a dictionary of reversed tails plus
    /// packed inner identifiers.
    fn nest_tails(&mut self) {
        let TailStore::Flat(tails) = &self.tails else {
            return;
        };
        if tails.is_empty() {
            return;
        }

        let rev_tails: Vec<Vec<u8>> = tails.iter().map(|t| reversed(t)).collect();
        let inner = Dict::build(&rev_tails, false);
        let width = id_width(inner.len());

        let mut ids = PackedIntVector::new();
        for rev in &rev_tails {
            // Every reversed tail is a key of the inner dictionary, so the
            // longest-prefix hit is the exact match.
            let hit = inner.prefix_search(rev);
            debug_assert!(matches!(hit, Some((_, len)) if len == rev.len()));
            let (id, _) = hit.unwrap_or((0, 0));
            ids.push(id as u64, width);
        }

        self.tail_ids = ids;
        self.tail_id_width = width;
        self.tails = TailStore::Nested(Box::new(inner));
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.key_num
    }

    /// Return true if the dictionary holds no keys.
    pub fn is_empty(&self) -> bool {
        self.key_num == 0
    }

    /// Approximate heap memory usage in bytes, nested tails included.
    pub fn heap_bytes(&self) -> usize {
        let tail_store = match &self.tails {
            TailStore::Flat(tails) => {
                tails.capacity() * std::mem::size_of::<Vec<u8>>()
                    + tails.iter().map(|t| t.capacity()).sum::<usize>()
            }
            TailStore::Nested(inner) => inner.heap_bytes(),
        };
        self.louds.heap_bytes()
            + self.terminal.heap_bytes()
            + self.tail.heap_bytes()
            + self.tail_ids.heap_bytes()
            + self.edges.capacity()
            + tail_store
    }

    /// Step from the node at `(pos, zeros)` to its child along `label`.
    /// On failure `pos` becomes the internal sentinel.
    fn child(&self, label: u8, pos: &mut usize, zeros: &mut usize) {
        loop {
            if self.louds.get(*pos) {
                *pos = NOT_FOUND;
                return;
            }
            match self.edges.get(*zeros - 2) {
                Some(&l) if l == label => {
                    let Some(s) = self.louds.select1(*zeros - 1) else {
                        *pos = NOT_FOUND;
                        return;
                    };
                    let next = s + 1;
                    *zeros = next - *zeros + 1;
                    *pos = next;
                    return;
                }
                Some(_) => {
                    *pos += 1;
                    *zeros += 1;
                }
                None => {
                    *pos = NOT_FOUND;
                    return;
                }
            }
        }
    }

    /// Descend along `key`, collecting `(id, matched_len)` for every stored
    /// key that is a prefix of it, shortest first. Shared by prefix and
    /// common-prefix search.
    fn traverse(&self, key: &[u8], limit: usize) -> Vec<(usize, usize)> {
        let mut hits = Vec::new();
        if !self.ready || limit == 0 {
            return hits;
        }

        let mut pos = 2usize;
        let mut zeros = 2usize;
        let mut depth = 0usize;
        while pos != NOT_FOUND {
            let ones = pos - zeros;
            if self.tail.get(ones) {
                if let Some(tail_len) = self.tail_match(key, depth, self.tail.rank1(ones)) {
                    hits.push((self.terminal.rank1(ones), depth + tail_len));
                }
                break;
            } else if self.terminal.get(ones) {
                hits.push((self.terminal.rank1(ones), depth));
                if hits.len() == limit {
                    break;
                }
            }
            if depth == key.len() {
                break;
            }
            self.child(key[depth], &mut pos, &mut zeros);
            depth += 1;
        }
        hits
    }

    /// Longest stored key that is a prefix of `key`, as
    /// `(identifier, matched length)`, or [`None`] when no stored key is a
    /// prefix of the input.
    pub fn prefix_search(&self, key: &[u8]) -> Option<(usize, usize)> {
        self.traverse(key, usize::MAX).pop()
    }

    /// Identifiers of all stored keys that are prefixes of `key`, in
    /// ascending length order, at most `limit` of them.
    pub fn common_prefix_search(&self, key: &[u8], limit: usize) -> Vec<usize> {
        self.traverse(key, limit)
            .into_iter()
            .map(|(id, _)| id)
            .collect()
    }

    /// Identifiers of all stored keys that have `key` as a prefix, at most
    /// `limit` of them, in depth-first left-to-right order over the
    /// subtrie.
    pub fn predictive_search(&self, key: &[u8], limit: usize) -> Vec<usize> {
        let mut ids = Vec::new();
        if !self.ready || limit == 0 {
            return ids;
        }

        let mut pos = 2usize;
        let mut zeros = 2usize;
        for (depth, &label) in key.iter().enumerate() {
            let ones = pos - zeros;
            if self.tail.get(ones) {
                // Tail leaf reached before the input ran out: the single
                // key below extends the input iff the rest of the input is
                // a prefix of the stored suffix.
                if let Some(t) = self.tail_bytes(self.tail.rank1(ones)) {
                    if t.starts_with(&key[depth..]) {
                        ids.push(self.terminal.rank1(ones));
                    }
                }
                return ids;
            }
            self.child(label, &mut pos, &mut zeros);
            if pos == NOT_FOUND {
                return ids;
            }
        }
        self.enumerate(pos, zeros, limit, &mut ids);
        ids
    }

    /// Depth-first collection of terminal identifiers in the subtrie rooted
    /// at `(pos, zeros)`.
    fn enumerate(&self, pos: usize, zeros: usize, limit: usize, out: &mut Vec<usize>) {
        let ones = pos - zeros;
        if self.terminal.get(ones) {
            out.push(self.terminal.rank1(ones));
        }
        let mut i = 0;
        while out.len() < limit && !self.louds.get(pos + i) {
            let Some(s) = self.louds.select1(zeros + i - 1) else {
                return;
            };
            let next = s + 1;
            self.enumerate(next, next - zeros - i + 1, limit, out);
            i += 1;
        }
    }

    /// Reconstruct the key owning `id`, or [`None`] if the identifier is
    /// out of range.
    pub fn decode(&self, id: usize) -> Option<Vec<u8>> {
        if !self.ready || id >= self.key_num {
            return None;
        }
        let node = self.terminal.select1(id)?;
        let mut pos = self.louds.select1(node)? + 1;
        let mut zeros = pos - node;

        let mut out = Vec::new();
        loop {
            zeros = pos - zeros + 1;
            pos = self.louds.select0(zeros - 1)?;
            if zeros < 2 {
                break;
            }
            out.push(self.edges.get(zeros - 2).copied()?);
        }
        out.reverse();

        if self.tail.get(node) {
            let t = self.tail_bytes(self.tail.rank1(node))?;
            out.extend_from_slice(&t);
        }
        Some(out)
    }

    /// The `idx`-th out-of-line tail suffix.
    fn tail_bytes(&self, idx: usize) -> Option<Vec<u8>> {
        match &self.tails {
            TailStore::Flat(tails) => tails.get(idx).cloned(),
            TailStore::Nested(inner) => {
                let id = self
                    .tail_ids
                    .get_bits(idx * self.tail_id_width, self.tail_id_width)
                    as usize;
                let mut t = inner.decode(id)?;
                t.reverse();
                Some(t)
            }
        }
    }

    /// Match the `idx`-th tail against `key[depth..]`; the full tail must
    /// fit. Returns the tail length on success.
    fn tail_match(&self, key: &[u8], depth: usize, idx: usize) -> Option<usize> {
        let t = self.tail_bytes(idx)?;
        let rest = &key[depth..];
        if t.len() <= rest.len() && rest[..t.len()] == t[..] {
            Some(t.len())
        } else {
            None
        }
    }

    /// Serialize into the binary image described in the module docs.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(MAGIC);
        self.louds.encode_into(out);
        self.terminal.encode_into(out);
        self.tail.encode_into(out);
        self.tail_ids.encode_into(out);
        out.extend_from_slice(&(self.key_num as u64).to_le_bytes());
        out.extend_from_slice(&(self.edges.len() as u64).to_le_bytes());
        out.extend_from_slice(&self.edges);
        match &self.tails {
            TailStore::Nested(inner) => {
                out.push(1);
                inner.encode_into(out);
            }
            TailStore::Flat(tails) => {
                out.push(0);
                out.extend_from_slice(&(tails.len() as u64).to_le_bytes());
                for t in tails {
                    out.extend_from_slice(&(t.len() as u64).to_le_bytes());
                    out.extend_from_slice(t);
                }
            }
        }
    }

    /// Deserialize the output of [`Dict::to_bytes`], validating the
    /// structural invariants.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut cur = Cursor::new(bytes);
        let dict = Self::decode_from(&mut cur)?;
        if cur.remaining() != 0 {
            return Err(Error::InvalidEncoding(
                "trailing bytes after dictionary".to_string(),
            ));
        }
        Ok(dict)
    }

    fn decode_from(cur: &mut Cursor) -> Result<Self> {
        if cur.take(8)? != MAGIC {
            return Err(Error::InvalidEncoding(
                "bad magic for dictionary".to_string(),
            ));
        }
        let louds = BitVector::decode_from(cur)?;
        let terminal = BitVector::decode_from(cur)?;
        let tail = BitVector::decode_from(cur)?;
        let tail_ids = PackedIntVector::decode_from(cur)?;
        let key_num = cur.u64()? as usize;
        let edges_len = cur.count(1, "edge array")?;
        let edges = cur.take(edges_len)?.to_vec();

        let (tails, tail_id_width) = match cur.u8()? {
            0 => {
                let n = cur.count(8, "tail list")?;
                let mut tails = Vec::with_capacity(n);
                for _ in 0..n {
                    let len = cur.count(1, "tail")?;
                    tails.push(cur.take(len)?.to_vec());
                }
                (TailStore::Flat(tails), 0)
            }
            1 => {
                let inner = Dict::decode_from(cur)?;
                let width = id_width(inner.len());
                (TailStore::Nested(Box::new(inner)), width)
            }
            other => {
                return Err(Error::InvalidEncoding(format!(
                    "bad tail-store flag ({other})"
                )));
            }
        };

        let dict = Dict {
            louds,
            terminal,
            tail,
            tail_ids,
            tail_id_width,
            edges,
            key_num,
            tails,
            ready: key_num > 0,
        };
        dict.validate()?;
        Ok(dict)
    }

    /// Structural invariants every well-formed image satisfies; anything
    /// else is rejected before queries can run on it.
    fn validate(&self) -> Result<()> {
        let fail = |msg: &str| Err(Error::InvalidEncoding(msg.to_string()));

        if self.louds.len() < 2 || self.louds.get(0) || !self.louds.get(1) {
            return fail("louds vector must start with the super-root bits 0,1");
        }
        if self.terminal.len() != self.tail.len() {
            return fail("terminal and tail vectors must have equal length");
        }
        if self.terminal.count_ones() != self.key_num {
            return fail("terminal bit count does not match the key count");
        }
        if self.louds.count_ones() != self.terminal.len() + 1 {
            return fail("louds one-bits do not match the node count");
        }
        if self.edges.len() + 1 != self.louds.count_zeros() {
            return fail("edge array does not match the louds zero count");
        }
        let tail_count = self.tail.count_ones();
        match &self.tails {
            TailStore::Flat(tails) => {
                if tails.len() != tail_count {
                    return fail("tail list does not match the tail bit count");
                }
            }
            TailStore::Nested(_) => {
                if self.tail_ids.len_bits() != tail_count * self.tail_id_width {
                    return fail("packed tail identifiers do not match the tail bit count");
                }
            }
        }
        Ok(())
    }

    /// Write the serialized image to a stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Read a dictionary from a stream. Consumes the stream to its end;
    /// bytes after the image are rejected.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    /// Save the serialized image to a file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    /// Load a dictionary from a file written by [`Dict::save`].
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_bytes(&fs::read(path)?)
    }
}
