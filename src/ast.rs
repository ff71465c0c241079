//! # Sorrel Expression Language - Abstract Syntax Tree
//!
//! This module defines the token and node model for Sorrel, a small
//! dynamically-typed expression language with literals, property
//! navigation, collection selection/projection and the usual operator
//! zoo, evaluated against a caller-supplied root value.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the tokenizer
//! - **[nodes]** - Expression tree nodes with spans and canonical rendering
//! - **[operators]** - Binary and unary operators
//!
//! ## Quick Start
//!
//! ```text
//! items.?[price > 100].![name]
//! ```
//!
//! This selects the items costing more than 100 and projects their names.
//!
//! ## Core Concepts
//!
//! ### One pass, three stages
//!
//! A source string is tokenized ([`crate::lexer::Tokenizer`]), parsed into
//! a [`Node`] tree ([`crate::parser::Parser`]), and then either rendered
//! back to canonical text or evaluated ([`crate::evaluator`]) against a
//! root [`crate::Value`].
//!
//! ### Closed node set
//!
//! [`Node`] is a single enum; evaluation and rendering are exhaustive
//! matches, so adding a node kind is a compile-time checklist rather than
//! a scavenger hunt through virtual dispatch.
//!
//! ### Rendering
//!
//! Every node renders to canonical source text ([`Node::render`]); for a
//! parsed expression the rendering reparses to the same structure, with
//! binary operators fully parenthesized:
//!
//! ```text
//! 2+3*4   =>   (2 + (3 * 4))
//! ```
pub mod nodes;
pub mod operators;
pub mod tokens;

pub use nodes::{LiteralValue, Node, SelectionKind, Span};
pub use operators::{BinOp, UnaryOp};
pub use tokens::{Token, TokenKind};
