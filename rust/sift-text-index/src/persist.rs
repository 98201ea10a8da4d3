//! Binary dump and reload of an [`InvertedIndex`].
//!
//! # Layout
//!
//! All integers are little-endian.
//!
//! ```text
//! u64 term_count
//! term_count times:
//!     u64 term_len, term_len bytes of UTF-8
//!     u64 posting_count
//!     u64 doc_buffer_len,   doc_buffer_len bytes
//!     u64 coord_buffer_len, coord_buffer_len bytes
//! u64 doc_count
//! doc_count times: u32 document length, indexed by DocId
//! ```
//!
//! Terms are written in sorted order so that the same index always produces
//! the same bytes. Skip tables are not stored: [`InvertedIndex::read_from`]
//! rebuilds them before returning.

use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{LE, ReadBytesExt, WriteBytesExt};
use sift_common::{Result, error::Error, verify_data};

use crate::{inverted_index::InvertedIndex, posting_list::CompressedPostingList};

impl InvertedIndex {
    /// Serializes the index into `w`.
    ///
    /// # Returns
    ///
    /// The number of bytes written.
    pub fn write_to<W>(&self, w: &mut W) -> Result<u64>
    where
        W: Write + ?Sized,
    {
        let mut terms: Vec<(&String, &CompressedPostingList)> = self.terms.iter().collect();
        terms.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut written = 8u64;
        w.write_u64::<LE>(terms.len() as u64)?;
        for (term, list) in terms {
            write_bytes(w, term.as_bytes())?;
            w.write_u64::<LE>(list.len() as u64)?;
            write_bytes(w, list.doc_buffer())?;
            write_bytes(w, list.coord_buffer())?;
            written += 8 * 4
                + (term.len() + list.doc_buffer().len() + list.coord_buffer().len()) as u64;
        }

        w.write_u64::<LE>(self.doc_lengths.len() as u64)?;
        for &length in &self.doc_lengths {
            w.write_u32::<LE>(length)?;
        }
        written += 8 + 4 * self.doc_lengths.len() as u64;
        Ok(written)
    }

    /// Deserializes an index written by [`write_to`](Self::write_to) and
    /// builds its skip tables.
    ///
    /// The whole input must be consumed: trailing bytes are rejected.
    ///
    /// # Errors
    ///
    /// Returns a `CorruptIndex` error if the data is truncated, a term is not
    /// valid UTF-8 or appears twice, a posting list does not decode to its
    /// recorded posting count, a posting refers to a document outside the
    /// document length table, or unexpected data follows the table. Other
    /// read failures are reported as `Io` errors.
    pub fn read_from<R>(r: &mut R) -> Result<InvertedIndex>
    where
        R: Read + ?Sized,
    {
        let mut index = InvertedIndex::new();
        let mut max_doc_id: Option<u32> = None;

        let term_count = read_u64(r, "term_count")?;
        for _ in 0..term_count {
            let term = String::from_utf8(read_bytes(r, "term")?)
                .map_err(|e| Error::corrupt_index("term", e.to_string()))?;
            let posting_count = read_u64(r, "posting_count")?;
            verify_data!(posting_count, posting_count <= usize::MAX as u64);
            let docs = read_bytes(r, "doc_buffer")?;
            let coords = read_bytes(r, "coord_buffer")?;

            let list = CompressedPostingList::from_parts(posting_count as usize, docs, coords)
                .map_err(|e| Error::corrupt_index(term.as_str(), e.to_string()))?;
            if let Some(last) = list.iter().last() {
                max_doc_id = max_doc_id.max(Some(last.doc_id));
            }
            verify_data!(term, !index.terms.contains_key(&term));
            index.terms.insert(term, list);
        }

        let doc_count = read_u64(r, "doc_count")?;
        verify_data!(doc_count, doc_count <= u32::MAX as u64 + 1);
        let mut lengths = Vec::new();
        for _ in 0..doc_count {
            lengths.push(read_u32(r, "doc_lengths")?);
        }
        index.doc_lengths = lengths;
        verify_data!(
            doc_lengths,
            max_doc_id.is_none_or(|doc_id| (doc_id as u64) < doc_count)
        );

        let mut probe = [0u8; 1];
        let trailing = r
            .read(&mut probe)
            .map_err(|e| Error::io("index trailer", e))?;
        verify_data!(trailer, trailing == 0);

        index.build_skips();
        Ok(index)
    }

    /// Writes the index to a file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<u64> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        let mut writer = BufWriter::new(file);
        let written = self.write_to(&mut writer)?;
        writer
            .flush()
            .map_err(|e| Error::io(path.display().to_string(), e))?;
        log::info!(
            "saved index to {}: {} terms, {} documents, {written} bytes",
            path.display(),
            self.term_count(),
            self.doc_count()
        );
        Ok(written)
    }

    /// Loads an index file written by [`save`](Self::save).
    pub fn load(path: impl AsRef<Path>) -> Result<InvertedIndex> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Error::io(path.display().to_string(), e))?;
        let index = Self::read_from(&mut BufReader::new(file))?;
        log::info!(
            "loaded index from {}: {} terms, {} documents",
            path.display(),
            index.term_count(),
            index.doc_count()
        );
        Ok(index)
    }
}

fn write_bytes<W: Write + ?Sized>(w: &mut W, bytes: &[u8]) -> io::Result<()> {
    w.write_u64::<LE>(bytes.len() as u64)?;
    w.write_all(bytes)
}

fn read_u64<R: Read + ?Sized>(r: &mut R, element: &str) -> Result<u64> {
    r.read_u64::<LE>().map_err(|e| read_error(element, e))
}

fn read_u32<R: Read + ?Sized>(r: &mut R, element: &str) -> Result<u32> {
    r.read_u32::<LE>().map_err(|e| read_error(element, e))
}

/// Reads a length-prefixed byte string. The buffer grows with the data
/// actually present, so a bogus length cannot trigger a huge allocation.
fn read_bytes<R: Read + ?Sized>(r: &mut R, element: &str) -> Result<Vec<u8>> {
    let len = read_u64(r, element)?;
    let mut buf = Vec::new();
    r.take(len)
        .read_to_end(&mut buf)
        .map_err(|e| read_error(element, e))?;
    verify_data!(element, buf.len() as u64 == len);
    Ok(buf)
}

fn read_error(element: &str, e: io::Error) -> Error {
    if e.kind() == io::ErrorKind::UnexpectedEof {
        Error::corrupt_index(element, "unexpected end of data")
    } else {
        Error::io(element, e)
    }
}
