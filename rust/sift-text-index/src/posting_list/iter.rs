//! Cursors over a compressed posting list.

use super::{ByteOffset, CompressedPostingList, DocId, Posting};
use crate::vbyte;

/// Decoded state of the posting a [`DocIterator`] is positioned on.
#[derive(Debug, Clone, Copy)]
struct Current {
    doc_id: DocId,
    term_frequency: u32,
    /// Doc buffer offset where this posting's encoding starts.
    start: usize,
    /// Coord buffer offset of the first position gap.
    coords: usize,
}

/// Forward-only cursor over the postings of a [`CompressedPostingList`].
///
/// The cursor decodes one posting at a time. It is either positioned on a
/// posting or exhausted; it never moves backward. Positions of the current
/// posting are available through [`coords`](Self::coords).
#[derive(Debug, Clone)]
pub struct DocIterator<'a> {
    list: &'a CompressedPostingList,
    /// Doc buffer offset of the next undecoded posting.
    next: usize,
    current: Option<Current>,
}

impl<'a> DocIterator<'a> {
    pub(crate) fn new(list: &'a CompressedPostingList) -> Self {
        let mut iter = DocIterator {
            list,
            next: 0,
            current: None,
        };
        iter.read_next(0);
        iter
    }

    /// Returns true once the cursor has moved past the last posting.
    pub fn is_end(&self) -> bool {
        self.current.is_none()
    }

    /// Identifier of the current posting's document.
    pub fn doc_id(&self) -> Option<DocId> {
        self.current.map(|current| current.doc_id)
    }

    /// The current posting.
    pub fn posting(&self) -> Option<Posting> {
        self.current.map(|current| Posting {
            doc_id: current.doc_id,
            term_frequency: current.term_frequency,
        })
    }

    /// Moves to the next posting. No-op once exhausted.
    pub fn advance(&mut self) {
        if let Some(current) = self.current {
            self.read_next(current.doc_id);
        }
    }

    /// Moves forward to the first posting with `doc_id >= target`.
    ///
    /// The cursor never moves backward: if it already sits on a posting at or
    /// past `target`, it stays where it is. With a skip table the cursor first
    /// jumps to the last checkpoint at or before `target` (when that
    /// checkpoint lies ahead), then scans linearly.
    pub fn skip_to(&mut self, target: DocId) {
        let Some(current) = self.current else {
            return;
        };
        if current.doc_id >= target {
            return;
        }

        let skips = self.list.skips();
        let idx = skips.partition_point(|skip| skip.doc_id <= target);
        if let Some(skip) = idx.checked_sub(1).map(|i| skips[i]) {
            if skip.offset.get() > current.start {
                if let Some(start) = skip.offset.resolve(&self.list.docs) {
                    self.jump(start, skip.doc_id);
                }
            }
        }

        while let Some(doc_id) = self.doc_id() {
            if doc_id >= target {
                break;
            }
            self.advance();
        }
    }

    /// Positions of the term within the current document, ascending.
    ///
    /// Returns an empty iterator when the cursor is exhausted.
    pub fn coords(&self) -> CoordIterator<'a> {
        match self.current {
            Some(current) => {
                CoordIterator::new(&self.list.coords, current.coords, current.term_frequency)
            }
            None => CoordIterator::new(&self.list.coords, 0, 0),
        }
    }

    fn read_next(&mut self, prev_doc_id: DocId) {
        if self.next >= self.list.docs.len() {
            self.current = None;
            return;
        }
        let start = self.next;
        let gap = vbyte::decode(&self.list.docs, &mut self.next);
        self.load(start, prev_doc_id.wrapping_add(gap));
    }

    /// Repositions the cursor on the posting encoded at `start`, whose
    /// identifier is already known from a skip checkpoint.
    fn jump(&mut self, start: usize, doc_id: DocId) {
        self.next = start;
        vbyte::decode(&self.list.docs, &mut self.next);
        self.load(start, doc_id);
    }

    /// Decodes the coord offset and term frequency of the posting whose gap
    /// has just been consumed.
    fn load(&mut self, start: usize, doc_id: DocId) {
        let coord_offset = ByteOffset(vbyte::decode(&self.list.docs, &mut self.next));
        let (term_frequency, coords) = match coord_offset.resolve(&self.list.coords) {
            Some(mut offset) => {
                let term_frequency = vbyte::decode(&self.list.coords, &mut offset);
                (term_frequency, offset)
            }
            None => (0, self.list.coords.len()),
        };
        self.current = Some(Current {
            doc_id,
            term_frequency,
            start,
            coords,
        });
    }
}

/// Lazily reconstructs the absolute positions of one posting.
///
/// Besides plain iteration, [`seek`](Self::seek) advances to the first
/// position at or past a target without consuming it, so a sequence of
/// increasing targets is answered in a single forward pass.
#[derive(Debug, Clone)]
pub struct CoordIterator<'a> {
    coords: &'a [u8],
    offset: usize,
    remaining: u32,
    current: Option<u32>,
}

impl<'a> CoordIterator<'a> {
    fn new(coords: &'a [u8], offset: usize, term_frequency: u32) -> Self {
        let mut iter = CoordIterator {
            coords,
            offset,
            remaining: term_frequency,
            current: None,
        };
        iter.step(0);
        iter
    }

    /// The position the iterator is on, without consuming it.
    pub fn current(&self) -> Option<u32> {
        self.current
    }

    /// Moves forward to the first position `>= target` and returns it.
    /// Positions already passed are never revisited.
    pub fn seek(&mut self, target: u32) -> Option<u32> {
        while let Some(coord) = self.current {
            if coord >= target {
                return Some(coord);
            }
            self.step(coord);
        }
        None
    }

    fn step(&mut self, prev: u32) {
        if self.remaining == 0 {
            self.current = None;
            return;
        }
        self.remaining -= 1;
        let delta = vbyte::decode(self.coords, &mut self.offset);
        self.current = Some(prev.wrapping_add(delta));
    }
}

impl Iterator for CoordIterator<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        let coord = self.current?;
        self.step(coord);
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining as usize + usize::from(self.current.is_some());
        (len, Some(len))
    }
}

impl ExactSizeIterator for CoordIterator<'_> {}

/// Iterator over the decompressed postings of a list.
#[derive(Debug, Clone)]
pub struct Postings<'a> {
    cursor: DocIterator<'a>,
}

impl<'a> Postings<'a> {
    pub(crate) fn new(cursor: DocIterator<'a>) -> Self {
        Postings { cursor }
    }
}

impl Iterator for Postings<'_> {
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        let posting = self.cursor.posting()?;
        self.cursor.advance();
        Some(posting)
    }
}
