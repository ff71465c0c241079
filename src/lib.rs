pub mod ast;
pub mod evaluator;
pub mod expression;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{BinOp, LiteralValue, Node, SelectionKind, Span, Token, TokenKind, UnaryOp};
pub use evaluator::{EvalError, Evaluator, ExpressionState, NoopResolver, Resolver};
pub use expression::{ExpressionParser, ParsedExpression, ParserConfig, TemplateContext};
pub use lexer::{LexError, Tokenizer};
pub use output::{from_json, to_json};
pub use parser::{ParseError, Parser};
pub use value::Value;
