//! # Lexer for fwemu assembly
//!
//! Whitespace is significant: a single space separates the mnemonic from its
//! arguments, and a label is terminated by `": "`.

use logos::Logos;

/// Tokens for fwemu assembly
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// Jump label (L0, L12, ...)
    #[regex(r"L[0-9]+", |lex| lex.slice().to_string(), priority = 5)]
    Label(String),

    /// Decimal number, kept as text until its field width is known
    #[regex(r"[0-9]+", |lex| lex.slice().to_string(), priority = 4)]
    Number(String),

    /// Instruction mnemonic
    #[regex(r"[A-Z]+", |lex| lex.slice().to_string(), priority = 3)]
    Mnemonic(String),

    /// Any other alphanumeric token
    #[regex(r"[A-Za-z0-9]+", |lex| lex.slice().to_string(), priority = 2)]
    Word(String),

    /// Label terminator
    #[token(": ")]
    LabelSeparator,

    /// Mnemonic / argument separator
    #[token(" ")]
    Space,

    /// Argument separator
    #[token(",")]
    Comma,
}

impl Token {
    /// Text of a token that may stand as an instruction argument
    pub fn argument_text(&self) -> Option<&str> {
        match self {
            Token::Label(s) | Token::Number(s) | Token::Mnemonic(s) | Token::Word(s) => Some(s),
            _ => None,
        }
    }
}

/// Tokenize a line; `None` if it contains a character no token accepts
pub fn tokenize(text: &str) -> Option<Vec<Token>> {
    Token::lexer(text).collect::<Result<Vec<_>, _>>().ok()
}
