use crate::ast::{Token, TokenKind};

/// Alternative textual operator names, reclassified to operator token kinds
/// during identifier lexing. `and`, `or`, `matches`, `instanceof` and
/// `between` are also textual operators but are handled contextually by the
/// parser. Must stay sorted: lookup is a binary search.
const ALTERNATIVE_OPERATOR_NAMES: [&str; 10] = [
    "BETWEEN", "DIV", "EQ", "GE", "GT", "LE", "LT", "MOD", "NE", "NOT",
];

/// Errors raised while tokenizing, with the character offset they occurred at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// Quoted string with no closing quote (offset of the opening quote)
    NonTerminatingString { position: usize },
    /// A character that only makes sense as part of a pair (`|` without `|`)
    MissingCharacter { expected: char, position: usize },
    /// A character the language has no use for
    UnsupportedCharacter { character: char, position: usize },
    /// Backslash escapes are not supported; quotes are doubled instead
    UnexpectedEscapeChar { position: usize },
    /// `L` suffix on a floating-point literal
    RealCannotBeLong { position: usize },
    /// `0x` with no hex digits after it
    NotANumber { position: usize },
}

impl std::fmt::Display for LexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexError::NonTerminatingString { position } => {
                write!(f, "non-terminating quoted string starting at position {}", position)
            }
            LexError::MissingCharacter { expected, position } => {
                write!(f, "missing expected character '{}' at position {}", expected, position)
            }
            LexError::UnsupportedCharacter { character, position } => write!(
                f,
                "unsupported character '{}' ({}) at position {}",
                character, *character as u32, position
            ),
            LexError::UnexpectedEscapeChar { position } => {
                write!(f, "unexpected escape character at position {}", position)
            }
            LexError::RealCannotBeLong { position } => {
                write!(f, "real number cannot have a long suffix at position {}", position)
            }
            LexError::NotANumber { position } => {
                write!(f, "malformed numeric literal at position {}", position)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Single-pass tokenizer over the whole input.
///
/// The input is processed as a char vector with a `'\0'` sentinel appended,
/// so lookahead never needs a bounds branch in the hot path.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    max: usize,
    tokens: Vec<Token>,
}

impl Tokenizer {
    pub fn new(input: &str) -> Self {
        let mut chars: Vec<char> = input.chars().collect();
        chars.push('\0');
        let max = chars.len();
        Tokenizer {
            chars,
            pos: 0,
            max,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the entire input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while self.pos < self.max {
            let ch = self.chars[self.pos];

            if ch.is_alphabetic() {
                self.lex_identifier();
                continue;
            }

            match ch {
                '+' => {
                    if self.is_two_char_token(TokenKind::Inc) {
                        self.push_pair_token(TokenKind::Inc);
                    } else {
                        self.push_char_token(TokenKind::Plus);
                    }
                }
                '_' => self.lex_identifier(),
                '-' => {
                    if self.is_two_char_token(TokenKind::Dec) {
                        self.push_pair_token(TokenKind::Dec);
                    } else {
                        self.push_char_token(TokenKind::Minus);
                    }
                }
                ':' => self.push_char_token(TokenKind::Colon),
                '.' => self.push_char_token(TokenKind::Dot),
                ',' => self.push_char_token(TokenKind::Comma),
                '*' => self.push_char_token(TokenKind::Star),
                '/' => self.push_char_token(TokenKind::Div),
                '%' => self.push_char_token(TokenKind::Mod),
                '(' => self.push_char_token(TokenKind::LParen),
                ')' => self.push_char_token(TokenKind::RParen),
                '[' => self.push_char_token(TokenKind::LSquare),
                ']' => self.push_char_token(TokenKind::RSquare),
                '#' => self.push_char_token(TokenKind::Hash),
                '{' => self.push_char_token(TokenKind::LCurly),
                '}' => self.push_char_token(TokenKind::RCurly),
                '@' => self.push_char_token(TokenKind::BeanRef),
                '^' => {
                    if self.is_two_char_token(TokenKind::SelectFirst) {
                        self.push_pair_token(TokenKind::SelectFirst);
                    } else {
                        self.push_char_token(TokenKind::Power);
                    }
                }
                '!' => {
                    if self.is_two_char_token(TokenKind::Ne) {
                        self.push_pair_token(TokenKind::Ne);
                    } else if self.is_two_char_token(TokenKind::Project) {
                        self.push_pair_token(TokenKind::Project);
                    } else {
                        self.push_char_token(TokenKind::Not);
                    }
                }
                '=' => {
                    if self.is_two_char_token(TokenKind::Eq) {
                        self.push_pair_token(TokenKind::Eq);
                    } else {
                        self.push_char_token(TokenKind::Assign);
                    }
                }
                '&' => {
                    if self.is_two_char_token(TokenKind::SymbolicAnd) {
                        self.push_pair_token(TokenKind::SymbolicAnd);
                    } else {
                        self.push_char_token(TokenKind::FactoryBeanRef);
                    }
                }
                '|' => {
                    if !self.is_two_char_token(TokenKind::SymbolicOr) {
                        return Err(LexError::MissingCharacter {
                            expected: '|',
                            position: self.pos,
                        });
                    }
                    self.push_pair_token(TokenKind::SymbolicOr);
                }
                '?' => {
                    if self.is_two_char_token(TokenKind::Select) {
                        self.push_pair_token(TokenKind::Select);
                    } else if self.is_two_char_token(TokenKind::Elvis) {
                        self.push_pair_token(TokenKind::Elvis);
                    } else if self.is_two_char_token(TokenKind::SafeNavi) {
                        self.push_pair_token(TokenKind::SafeNavi);
                    } else {
                        self.push_char_token(TokenKind::QMark);
                    }
                }
                '$' => {
                    if self.is_two_char_token(TokenKind::SelectLast) {
                        self.push_pair_token(TokenKind::SelectLast);
                    } else {
                        // '$' is another way to start an identifier
                        self.lex_identifier();
                    }
                }
                '>' => {
                    if self.is_two_char_token(TokenKind::Ge) {
                        self.push_pair_token(TokenKind::Ge);
                    } else {
                        self.push_char_token(TokenKind::Gt);
                    }
                }
                '<' => {
                    if self.is_two_char_token(TokenKind::Le) {
                        self.push_pair_token(TokenKind::Le);
                    } else {
                        self.push_char_token(TokenKind::Lt);
                    }
                }
                '0'..='9' => self.lex_numeric_literal(ch == '0')?,
                ' ' | '\t' | '\r' | '\n' => self.pos += 1,
                '\'' | '"' => self.lex_quoted_string_literal(ch)?,
                '\0' => self.pos += 1, // sentinel, takes us to the end
                '\\' => {
                    return Err(LexError::UnexpectedEscapeChar { position: self.pos });
                }
                _ => {
                    return Err(LexError::UnsupportedCharacter {
                        character: ch,
                        position: self.pos,
                    });
                }
            }
        }

        Ok(self.tokens)
    }

    /// Quoted string with SQL-style doubling: `'a''b'` holds `a'b`.
    /// The payload keeps the surrounding quotes; the parser strips them.
    fn lex_quoted_string_literal(&mut self, quote: char) -> Result<(), LexError> {
        let start = self.pos;

        loop {
            self.pos += 1;
            if self.is_exhausted() {
                return Err(LexError::NonTerminatingString { position: start });
            }

            if self.chars[self.pos] == quote {
                if self.chars.get(self.pos + 1) == Some(&quote) {
                    self.pos += 1; // doubled quote, keep going
                } else {
                    break;
                }
            }
        }

        self.pos += 1;
        let data = self.subslice(start, self.pos);
        self.tokens
            .push(Token::with_data(TokenKind::LiteralString, data, start, self.pos));
        Ok(())
    }

    fn lex_numeric_literal(&mut self, first_char_is_zero: bool) -> Result<(), LexError> {
        let start = self.pos;
        let mut is_real = false;

        // Hexadecimal
        if first_char_is_zero && matches!(self.char_at(self.pos + 1), Some('x') | Some('X')) {
            self.pos += 2;
            let hex_start = self.pos;
            while self.is_hex_digit(self.char_at(self.pos)) {
                self.pos += 1;
            }
            if self.pos == hex_start {
                return Err(LexError::NotANumber { position: start });
            }

            let data = self.subslice(hex_start, self.pos);
            let is_long = matches!(self.char_at(self.pos), Some('L') | Some('l'));
            let kind = if is_long {
                TokenKind::LiteralHexLong
            } else {
                TokenKind::LiteralHexInt
            };
            self.tokens.push(Token::with_data(kind, data, start, self.pos));
            if is_long {
                self.pos += 1;
            }
            return Ok(());
        }

        // Integer part
        while self.is_digit(self.char_at(self.pos)) {
            self.pos += 1;
        }

        // A '.' indicates this number is a real
        if self.char_at(self.pos) == Some('.') {
            is_real = true;
            let dotpos = self.pos;
            self.pos += 1;
            while self.is_digit(self.char_at(self.pos)) {
                self.pos += 1;
            }
            if self.pos == dotpos + 1 {
                // Something like '3.': really an int, possibly the start of
                // '3.toString()'. Rewind and leave the dot for the parser.
                self.pos = dotpos;
                let data = self.subslice(start, self.pos);
                self.tokens
                    .push(Token::with_data(TokenKind::LiteralInt, data, start, self.pos));
                return Ok(());
            }
        }

        let mut end_of_number = self.pos;

        // Long suffix
        if matches!(self.char_at(self.pos), Some('L') | Some('l')) {
            if is_real {
                return Err(LexError::RealCannotBeLong { position: start });
            }
            let data = self.subslice(start, end_of_number);
            self.tokens
                .push(Token::with_data(TokenKind::LiteralLong, data, start, end_of_number));
            self.pos += 1;
            return Ok(());
        }

        // Exponent
        if matches!(self.char_at(self.pos), Some('e') | Some('E')) {
            self.pos += 1;
            if matches!(self.char_at(self.pos), Some('+') | Some('-')) {
                self.pos += 1;
            }
            while self.is_digit(self.char_at(self.pos)) {
                self.pos += 1;
            }

            end_of_number = self.pos;
            let mut is_float = false;
            match self.char_at(self.pos) {
                Some('f') | Some('F') => {
                    is_float = true;
                    self.pos += 1;
                }
                Some('d') | Some('D') => self.pos += 1,
                _ => {}
            }

            let kind = if is_float {
                TokenKind::LiteralRealFloat
            } else {
                TokenKind::LiteralReal
            };
            let data = self.subslice(start, end_of_number);
            self.tokens.push(Token::with_data(kind, data, start, self.pos));
            return Ok(());
        }

        // Float/double suffix; the suffix char is consumed but stays out of
        // the payload.
        let mut is_float = false;
        match self.char_at(self.pos) {
            Some('f') | Some('F') => {
                is_real = true;
                is_float = true;
                self.pos += 1;
            }
            Some('d') | Some('D') => {
                is_real = true;
                self.pos += 1;
            }
            _ => {}
        }

        let data = self.subslice(start, end_of_number);
        let kind = if !is_real {
            TokenKind::LiteralInt
        } else if is_float {
            TokenKind::LiteralRealFloat
        } else {
            TokenKind::LiteralReal
        };
        self.tokens.push(Token::with_data(kind, data, start, self.pos));
        Ok(())
    }

    fn lex_identifier(&mut self) {
        let start = self.pos;
        while self.is_identifier_char(self.char_at(self.pos)) {
            self.pos += 1;
        }

        let text = self.subslice(start, self.pos);

        // Alternative (textual) operator spellings reclassify here.
        if (2..=7).contains(&text.len()) {
            let upper = text.to_ascii_uppercase();
            if let Ok(idx) = ALTERNATIVE_OPERATOR_NAMES.binary_search(&upper.as_str()) {
                let kind = alternative_operator_kind(ALTERNATIVE_OPERATOR_NAMES[idx]);
                self.tokens.push(Token::with_data(kind, text, start, self.pos));
                return;
            }
        }

        self.tokens
            .push(Token::with_data(TokenKind::Identifier, text, start, self.pos));
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    fn subslice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.chars.len());
        let start = start.min(end);
        self.chars[start..end].iter().collect()
    }

    fn is_two_char_token(&self, kind: TokenKind) -> bool {
        let Some(chars) = kind.chars() else {
            return false;
        };
        let mut expected = chars.chars();
        chars.len() == 2
            && self.pos + 1 < self.chars.len()
            && expected.next() == Some(self.chars[self.pos])
            && expected.next() == Some(self.chars[self.pos + 1])
    }

    fn push_char_token(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.pos, self.pos + 1));
        self.pos += 1;
    }

    fn push_pair_token(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.pos, self.pos + 2));
        self.pos += 2;
    }

    fn is_identifier_char(&self, ch: Option<char>) -> bool {
        matches!(ch, Some(c) if c.is_alphabetic() || c.is_ascii_digit() || c == '_' || c == '$')
    }

    fn is_digit(&self, ch: Option<char>) -> bool {
        matches!(ch, Some(c) if c.is_ascii_digit())
    }

    fn is_hex_digit(&self, ch: Option<char>) -> bool {
        matches!(ch, Some(c) if c.is_ascii_hexdigit())
    }

    fn is_exhausted(&self) -> bool {
        self.pos == self.max - 1
    }
}

fn alternative_operator_kind(name: &str) -> TokenKind {
    match name {
        "BETWEEN" => TokenKind::Between,
        "DIV" => TokenKind::Div,
        "EQ" => TokenKind::Eq,
        "GE" => TokenKind::Ge,
        "GT" => TokenKind::Gt,
        "LE" => TokenKind::Le,
        "LT" => TokenKind::Lt,
        "MOD" => TokenKind::Mod,
        "NE" => TokenKind::Ne,
        _ => TokenKind::Not,
    }
}

#[test]
fn test_alternative_operator_names_sorted() {
    let mut sorted = ALTERNATIVE_OPERATOR_NAMES;
    sorted.sort_unstable();
    assert_eq!(sorted, ALTERNATIVE_OPERATOR_NAMES);
}

#[test]
fn test_dot_rewind_after_int() {
    let tokens = Tokenizer::new("3.toString()").tokenize().unwrap();
    assert_eq!(tokens[0].kind, TokenKind::LiteralInt);
    assert_eq!(tokens[0].data.as_deref(), Some("3"));
    assert_eq!(tokens[1].kind, TokenKind::Dot);
    assert_eq!(tokens[2].kind, TokenKind::Identifier);
}
