//! Compressed, skip-accelerated posting lists.
//!
//! A posting list stores, for every document containing a term, the document
//! identifier and the sorted list of token positions of the term within that
//! document. Both are kept in two VByte-compressed byte buffers:
//!
//! - **Doc buffer**: per posting, the gap from the previous `DocId` followed by
//!   the offset of the posting's entry in the coord buffer.
//! - **Coord buffer**: per posting, the term frequency followed by the gaps
//!   between consecutive positions (the first gap is taken from zero).
//!
//! A sparse skip table of `(doc_id, doc_buffer_offset)` checkpoints placed
//! every `max(4, floor(sqrt(len)))` postings lets [`DocIterator::skip_to`]
//! jump close to its target instead of decoding every posting on the way.
//! The skip table is an acceleration structure only: seeking lands on the
//! same posting with or without it.

mod iter;

use sift_common::{Result, verify_data};

use crate::vbyte;

pub use iter::{CoordIterator, DocIterator, Postings};

/// Dense document identifier assigned while the index is built.
pub type DocId = u32;

/// Minimum distance, in postings, between two skip table checkpoints.
pub const MIN_SKIP_STEP: usize = 4;

/// Decompressed view of one term's occurrence in one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Posting {
    pub doc_id: DocId,
    pub term_frequency: u32,
}

/// Byte offset into one of the buffers of a posting list.
///
/// Offsets are only turned into slice indices through [`ByteOffset::resolve`],
/// which checks them against the length of the buffer they point into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ByteOffset(u32);

impl ByteOffset {
    /// Largest buffer length whose every offset is representable.
    pub const MAX_BUFFER_LEN: usize = u32::MAX as usize;

    /// `None` if `offset` does not fit in 32 bits.
    pub(crate) fn try_new(offset: usize) -> Option<Self> {
        u32::try_from(offset).ok().map(ByteOffset)
    }

    /// For offsets into buffers already bounded by
    /// [`MAX_BUFFER_LEN`](Self::MAX_BUFFER_LEN).
    pub(crate) fn new(offset: usize) -> Self {
        debug_assert!(offset <= Self::MAX_BUFFER_LEN);
        ByteOffset(offset as u32)
    }

    /// Raw offset value.
    pub fn get(self) -> usize {
        self.0 as usize
    }

    /// Returns the offset as an index into `buf`, or `None` if it points
    /// past the last byte.
    pub fn resolve(self, buf: &[u8]) -> Option<usize> {
        let offset = self.get();
        (offset < buf.len()).then_some(offset)
    }
}

/// Skip table checkpoint: the identifier of a posting and the doc buffer
/// offset at which that posting's encoding starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkipEntry {
    pub doc_id: DocId,
    pub offset: ByteOffset,
}

/// Per-term list of postings with positions, stored in compressed form.
///
/// Postings must be appended in strictly increasing `DocId` order and the
/// skip table built with [`build_skips`](Self::build_skips) once all of them
/// are in. After that the list is read-only; any number of iterators may
/// traverse it concurrently since each one carries its own cursor state.
#[derive(Debug, Clone, Default)]
pub struct CompressedPostingList {
    docs: Vec<u8>,
    coords: Vec<u8>,
    len: usize,
    last_doc_id: DocId,
    skips: Vec<SkipEntry>,
}

impl CompressedPostingList {
    pub const fn new() -> Self {
        CompressedPostingList {
            docs: Vec::new(),
            coords: Vec::new(),
            len: 0,
            last_doc_id: 0,
            skips: Vec::new(),
        }
    }

    /// Appends the postings of one document.
    ///
    /// # Arguments
    ///
    /// * `doc_id` - Must be strictly greater than the previously appended id.
    ///   This is not checked in release builds; violating it produces a list
    ///   that decodes to garbage.
    /// * `coordinates` - Non-decreasing token positions of the term in the
    ///   document. Its length becomes the posting's term frequency; an empty
    ///   slice records a posting without positions.
    ///
    /// # Panics
    ///
    /// Panics if the doc or coord buffer already holds more than
    /// [`ByteOffset::MAX_BUFFER_LEN`] bytes, since the posting's offsets
    /// would no longer fit in 32 bits.
    pub fn add(&mut self, doc_id: DocId, coordinates: &[u32]) {
        debug_assert!(
            self.len == 0 || doc_id > self.last_doc_id,
            "posting list: doc_id {doc_id} appended after {}",
            self.last_doc_id
        );
        let (Some(_), Some(coord_offset)) = (
            ByteOffset::try_new(self.docs.len()),
            ByteOffset::try_new(self.coords.len()),
        ) else {
            panic!(
                "posting list: buffers exceed {} bytes",
                ByteOffset::MAX_BUFFER_LEN
            );
        };

        let gap = doc_id.wrapping_sub(self.last_doc_id);
        vbyte::encode(gap, &mut self.docs);
        vbyte::encode(coord_offset.0, &mut self.docs);

        vbyte::encode(coordinates.len() as u32, &mut self.coords);
        let mut prev = 0u32;
        for &coord in coordinates {
            vbyte::encode(coord.wrapping_sub(prev), &mut self.coords);
            prev = coord;
        }

        self.last_doc_id = doc_id;
        self.len += 1;
    }

    /// Rebuilds the skip table by replaying the doc buffer.
    ///
    /// Must be called after the last [`add`](Self::add) for skip-accelerated
    /// seeking to take effect. Calling it again yields the same table.
    pub fn build_skips(&mut self) {
        self.skips.clear();
        if self.len == 0 {
            return;
        }

        let step = self.skip_step();
        self.skips.reserve(self.len.div_ceil(step));

        let mut offset = 0usize;
        let mut doc_id: DocId = 0;
        for i in 0..self.len {
            let start = offset;
            doc_id = doc_id.wrapping_add(vbyte::decode(&self.docs, &mut offset));
            vbyte::decode(&self.docs, &mut offset);
            if i % step == 0 {
                self.skips.push(SkipEntry {
                    doc_id,
                    offset: ByteOffset::new(start),
                });
            }
        }
    }

    /// Distance in postings between two skip checkpoints for this list.
    pub fn skip_step(&self) -> usize {
        self.len.isqrt().max(MIN_SKIP_STEP)
    }

    /// Skip table checkpoints, empty until [`build_skips`](Self::build_skips).
    pub fn skips(&self) -> &[SkipEntry] {
        &self.skips
    }

    /// Number of postings (documents) in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a cursor positioned on the first posting.
    pub fn cursor(&self) -> DocIterator<'_> {
        DocIterator::new(self)
    }

    /// Iterates over the decompressed postings in ascending `DocId` order.
    pub fn iter(&self) -> Postings<'_> {
        Postings::new(self.cursor())
    }

    /// Document identifiers of all postings, ascending.
    pub fn doc_ids(&self) -> Vec<DocId> {
        self.iter().map(|posting| posting.doc_id).collect()
    }

    /// Decompresses the whole list.
    pub fn decompress(&self) -> Vec<Posting> {
        self.iter().collect()
    }

    /// Raw doc buffer (gaps and coord offsets).
    pub fn doc_buffer(&self) -> &[u8] {
        &self.docs
    }

    /// Raw coord buffer (term frequencies and position gaps).
    pub fn coord_buffer(&self) -> &[u8] {
        &self.coords
    }

    /// Documents present in both lists.
    ///
    /// The lagging side is advanced with [`DocIterator::skip_to`]. Result
    /// postings carry no positions (term frequency 0).
    pub fn intersect(&self, other: &CompressedPostingList) -> CompressedPostingList {
        let mut result = CompressedPostingList::new();
        let mut left = self.cursor();
        let mut right = other.cursor();
        while let (Some(l), Some(r)) = (left.doc_id(), right.doc_id()) {
            if l == r {
                result.add(l, &[]);
                left.advance();
                right.advance();
            } else if l < r {
                left.skip_to(r);
            } else {
                right.skip_to(l);
            }
        }
        result.build_skips();
        result
    }

    /// Documents present in either list.
    ///
    /// Result postings carry no positions (term frequency 0).
    pub fn merge(&self, other: &CompressedPostingList) -> CompressedPostingList {
        let mut result = CompressedPostingList::new();
        let mut left = self.cursor();
        let mut right = other.cursor();
        loop {
            match (left.doc_id(), right.doc_id()) {
                (None, None) => break,
                (Some(l), None) => {
                    result.add(l, &[]);
                    left.advance();
                }
                (None, Some(r)) => {
                    result.add(r, &[]);
                    right.advance();
                }
                (Some(l), Some(r)) => {
                    if l == r {
                        result.add(l, &[]);
                        left.advance();
                        right.advance();
                    } else if l < r {
                        result.add(l, &[]);
                        left.advance();
                    } else {
                        result.add(r, &[]);
                        right.advance();
                    }
                }
            }
        }
        result.build_skips();
        result
    }

    /// Keeps the postings of this list whose documents also appear in
    /// `filter`, together with their term frequencies and positions.
    pub fn retain_docs(&self, filter: &CompressedPostingList) -> CompressedPostingList {
        let mut result = CompressedPostingList::new();
        let mut coords = Vec::new();
        let mut postings = self.cursor();
        let mut allowed = filter.cursor();
        while let (Some(doc_id), Some(allowed_id)) = (postings.doc_id(), allowed.doc_id()) {
            if doc_id == allowed_id {
                coords.clear();
                coords.extend(postings.coords());
                result.add(doc_id, &coords);
                postings.advance();
                allowed.advance();
            } else if doc_id < allowed_id {
                postings.skip_to(allowed_id);
            } else {
                allowed.skip_to(doc_id);
            }
        }
        result.build_skips();
        result
    }

    /// Reassembles a posting list from its persisted parts.
    ///
    /// The buffers are replayed in full: every posting must decode completely,
    /// gaps after the first must be non-zero, and each posting's coord entry
    /// must start exactly where the previous one ended. The skip table is not
    /// built.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptIndex` error if the buffers do not describe exactly
    /// `len` well-formed postings.
    pub fn from_parts(len: usize, docs: Vec<u8>, coords: Vec<u8>) -> Result<Self> {
        verify_data!(doc_buffer, docs.len() <= ByteOffset::MAX_BUFFER_LEN);
        verify_data!(coord_buffer, coords.len() <= ByteOffset::MAX_BUFFER_LEN);

        let mut doc_offset = 0usize;
        let mut coord_offset = 0usize;
        let mut doc_id: DocId = 0;
        for i in 0..len {
            let gap = vbyte::decode_exact(&docs, &mut doc_offset);
            verify_data!(doc_buffer, gap.is_some());
            let gap = gap.unwrap_or_default();
            verify_data!(doc_gap, i == 0 || gap > 0);
            let next_doc_id = doc_id.checked_add(gap);
            verify_data!(doc_id, next_doc_id.is_some());
            doc_id = next_doc_id.unwrap_or_default();

            let stored = vbyte::decode_exact(&docs, &mut doc_offset);
            verify_data!(coord_offset, stored == Some(coord_offset as u32));

            let term_frequency = vbyte::decode_exact(&coords, &mut coord_offset);
            verify_data!(coord_buffer, term_frequency.is_some());
            for _ in 0..term_frequency.unwrap_or_default() {
                let delta = vbyte::decode_exact(&coords, &mut coord_offset);
                verify_data!(coord_buffer, delta.is_some());
            }
        }
        verify_data!(doc_buffer, doc_offset == docs.len());
        verify_data!(coord_buffer, coord_offset == coords.len());

        Ok(CompressedPostingList {
            docs,
            coords,
            len,
            last_doc_id: doc_id,
            skips: Vec::new(),
        })
    }
}

impl<'a> IntoIterator for &'a CompressedPostingList {
    type Item = Posting;
    type IntoIter = Postings<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
