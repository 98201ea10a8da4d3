//! Boolean query parser.
//!
//! The query is split on whitespace, with `(` and `)` always standing on
//! their own. Operator words are recognized case-insensitively:
//!
//! | operator | spellings |
//! |---|---|
//! | AND | `and`, `и`, `&`, `&&` |
//! | OR | `or`, `или`, `\|`, `\|\|` |
//!
//! Every other token is a term and goes through the lemmatizer; operators
//! and parentheses never do. AND binds tighter than OR, both associate to
//! the left, and parentheses group.

use sift_common::{Result, error::Error};

use super::ast::QueryNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

impl Operator {
    /// Recognizes an operator token, ignoring case.
    pub fn from_token(token: &str) -> Option<Operator> {
        match token.to_lowercase().as_str() {
            "and" | "и" | "&" | "&&" => Some(Operator::And),
            "or" | "или" | "|" | "||" => Some(Operator::Or),
            _ => None,
        }
    }

    fn precedence(self) -> u8 {
        match self {
            Operator::And => 2,
            Operator::Or => 1,
        }
    }

    fn apply(self, left: QueryNode, right: QueryNode) -> QueryNode {
        match self {
            Operator::And => QueryNode::and(left, right),
            Operator::Or => QueryNode::or(left, right),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Open,
    Close,
    Operator(Operator),
    Term(&'a str),
}

/// Entry of the operator stack.
#[derive(Debug, Clone, Copy)]
enum Pending {
    Open,
    Operator(Operator),
}

/// Splits a query into raw tokens.
fn split(query: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for chunk in query.split_whitespace() {
        let mut rest = chunk;
        while !rest.is_empty() {
            match rest.find(['(', ')']) {
                Some(0) => {
                    tokens.push(if rest.starts_with('(') {
                        Token::Open
                    } else {
                        Token::Close
                    });
                    rest = &rest[1..];
                }
                Some(pos) => {
                    tokens.push(classify(&rest[..pos]));
                    rest = &rest[pos..];
                }
                None => {
                    tokens.push(classify(rest));
                    rest = "";
                }
            }
        }
    }
    tokens
}

fn classify(word: &str) -> Token<'_> {
    match Operator::from_token(word) {
        Some(op) => Token::Operator(op),
        None => Token::Term(word),
    }
}

/// Parses a boolean query, passing every term through `lemmatize`.
///
/// # Errors
///
/// Returns a `Parse` error for a `)` without matching `(`, a `(` left open
/// at the end of the query, an operator missing an operand, or a query that
/// does not reduce to exactly one expression (an empty query included).
pub fn parse_query<F>(query: &str, lemmatize: F) -> Result<QueryNode>
where
    F: Fn(&str) -> String,
{
    let mut nodes: Vec<QueryNode> = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();

    let reduce = |nodes: &mut Vec<QueryNode>, op: Operator| -> Result<()> {
        match (nodes.pop(), nodes.pop()) {
            (Some(right), Some(left)) => {
                nodes.push(op.apply(left, right));
                Ok(())
            }
            _ => Err(Error::parse(
                query,
                format!("{op:?} operator needs two operands"),
            )),
        }
    };

    for token in split(query) {
        match token {
            Token::Open => pending.push(Pending::Open),
            Token::Close => loop {
                match pending.pop() {
                    Some(Pending::Operator(op)) => reduce(&mut nodes, op)?,
                    Some(Pending::Open) => break,
                    None => return Err(Error::parse(query, "')' without matching '('")),
                }
            },
            Token::Operator(op) => {
                while let Some(&Pending::Operator(top)) = pending.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    pending.pop();
                    reduce(&mut nodes, top)?;
                }
                pending.push(Pending::Operator(op));
            }
            Token::Term(term) => nodes.push(QueryNode::Term(lemmatize(term))),
        }
    }

    while let Some(top) = pending.pop() {
        match top {
            Pending::Open => return Err(Error::parse(query, "'(' without matching ')'")),
            Pending::Operator(op) => reduce(&mut nodes, op)?,
        }
    }

    if nodes.len() > 1 {
        return Err(Error::parse(
            query,
            format!("{} expressions without an operator between them", nodes.len()),
        ));
    }
    nodes
        .pop()
        .ok_or_else(|| Error::parse(query, "query has no terms"))
}
