//! Exact phrase matching over term positions.

use crate::{
    inverted_index::InvertedIndex,
    posting_list::{CompressedPostingList, CoordIterator, DocIterator},
    preprocessor::Preprocessor,
};

/// A sequence of terms that must occur at consecutive positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseQuery {
    terms: Vec<String>,
}

impl PhraseQuery {
    pub fn new<S: Into<String>>(terms: impl IntoIterator<Item = S>) -> Self {
        PhraseQuery {
            terms: terms.into_iter().map(Into::into).collect(),
        }
    }

    pub fn parse(phrase: &str, preprocessor: &Preprocessor) -> Self {
        PhraseQuery {
            terms: preprocessor.preprocess(phrase),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Documents that contain the whole phrase.
    ///
    /// Result postings carry no positions. A phrase with no terms, or with a
    /// term that is not indexed, matches nothing.
    pub fn execute(&self, index: &InvertedIndex) -> CompressedPostingList {
        let mut result = CompressedPostingList::new();
        if self.terms.is_empty() {
            return result;
        }

        let mut cursors: Vec<DocIterator<'_>> = Vec::with_capacity(self.terms.len());
        for term in &self.terms {
            match index.get_postings(term) {
                Some(list) => cursors.push(list.cursor()),
                None => return result,
            }
        }

        'docs: loop {
            let mut target = 0;
            for cursor in &cursors {
                match cursor.doc_id() {
                    Some(doc_id) => target = target.max(doc_id),
                    None => break 'docs,
                }
            }

            let mut synced = true;
            for cursor in cursors.iter_mut() {
                if cursor.doc_id() != Some(target) {
                    cursor.skip_to(target);
                    synced = false;
                }
            }
            if !synced {
                continue;
            }

            if has_phrase(&cursors) {
                result.add(target, &[]);
            }
            for cursor in cursors.iter_mut() {
                cursor.advance();
            }
        }

        result.build_skips();
        log::debug!(
            "phrase query {:?} matched {} documents",
            self.terms,
            result.len()
        );
        result
    }
}

/// Checks whether the document all cursors sit on has a start position
/// `base` of the first term such that term `i` occurs at `base + i`.
///
/// One coordinate iterator per following term is shared by all candidate
/// starts; since starts increase, each iterator only ever moves forward.
fn has_phrase(cursors: &[DocIterator<'_>]) -> bool {
    let Some((first, rest)) = cursors.split_first() else {
        return false;
    };
    let mut following: Vec<CoordIterator<'_>> = rest.iter().map(DocIterator::coords).collect();

    'starts: for base in first.coords() {
        for (i, coords) in following.iter_mut().enumerate() {
            let Some(wanted) = base.checked_add(i as u32 + 1) else {
                return false;
            };
            match coords.seek(wanted) {
                Some(pos) if pos == wanted => (),
                Some(_) => continue 'starts,
                None => return false,
            }
        }
        return true;
    }
    false
}
