//! Boolean query syntax tree.

use std::fmt;

/// Node of a parsed boolean query. Children are owned, and a tree is never
/// modified after the parser builds it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryNode {
    /// A single lemmatized term.
    Term(String),
    /// Documents matching both sides.
    And(Box<QueryNode>, Box<QueryNode>),
    /// Documents matching either side.
    Or(Box<QueryNode>, Box<QueryNode>),
}

impl QueryNode {
    pub fn term(term: impl Into<String>) -> QueryNode {
        QueryNode::Term(term.into())
    }

    pub fn and(left: QueryNode, right: QueryNode) -> QueryNode {
        QueryNode::And(Box::new(left), Box::new(right))
    }

    pub fn or(left: QueryNode, right: QueryNode) -> QueryNode {
        QueryNode::Or(Box::new(left), Box::new(right))
    }

    /// Leaf terms from left to right.
    pub fn terms(&self) -> Vec<&str> {
        let mut terms = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                QueryNode::Term(term) => terms.push(term.as_str()),
                QueryNode::And(left, right) | QueryNode::Or(left, right) => {
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        terms
    }
}

/// Fully parenthesized form, e.g. `(hello OR (simple AND text))`.
impl fmt::Display for QueryNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryNode::Term(term) => f.write_str(term),
            QueryNode::And(left, right) => write!(f, "({left} AND {right})"),
            QueryNode::Or(left, right) => write!(f, "({left} OR {right})"),
        }
    }
}
