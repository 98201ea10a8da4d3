//! Boolean AND/OR query evaluation.

use std::borrow::Cow;

use sift_common::Result;

use super::{ast::QueryNode, parser::parse_query};
use crate::{
    inverted_index::InvertedIndex,
    posting_list::{CompressedPostingList, DocId},
    preprocessor::Preprocessor,
};

/// A parsed boolean query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoolQuery {
    root: QueryNode,
}

impl BoolQuery {
    pub fn new(root: QueryNode) -> Self {
        BoolQuery { root }
    }

    /// Parses `query`, lemmatizing its terms with `preprocessor`.
    pub fn parse(query: &str, preprocessor: &Preprocessor) -> Result<Self> {
        let root = parse_query(query, |term| preprocessor.lemmatize(term))?;
        log::debug!("boolean query {query:?} parsed as {root}");
        Ok(BoolQuery { root })
    }

    pub fn root(&self) -> &QueryNode {
        &self.root
    }

    /// Evaluates the query tree bottom-up: a term yields its posting list
    /// (empty if the term is not indexed), AND intersects, OR merges.
    pub fn execute(&self, index: &InvertedIndex) -> CompressedPostingList {
        evaluate(&self.root, index).into_owned()
    }

    /// Matching documents in ascending `DocId` order, at most `limit` of them.
    pub fn search(&self, index: &InvertedIndex, limit: Option<usize>) -> Vec<DocId> {
        let list = evaluate(&self.root, index);
        let doc_ids: Vec<DocId> = list
            .iter()
            .map(|posting| posting.doc_id)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        log::debug!(
            "boolean query {} matched {} documents, returning {}",
            self.root,
            list.len(),
            doc_ids.len()
        );
        doc_ids
    }
}

fn evaluate<'a>(node: &QueryNode, index: &'a InvertedIndex) -> Cow<'a, CompressedPostingList> {
    match node {
        QueryNode::Term(term) => match index.get_postings(term) {
            Some(list) => Cow::Borrowed(list),
            None => Cow::Owned(CompressedPostingList::new()),
        },
        QueryNode::And(left, right) => {
            Cow::Owned(evaluate(left, index).intersect(&evaluate(right, index)))
        }
        QueryNode::Or(left, right) => {
            Cow::Owned(evaluate(left, index).merge(&evaluate(right, index)))
        }
    }
}
