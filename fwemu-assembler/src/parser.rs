//! Assembly line parser
//!
//! ```text
//! line     := [label ": "] MNEMONIC [" " argument ("," argument)*]
//! label    := "L" digit+
//! argument := digit+ | alphanumeric+
//! ```

use crate::error::{AssemblerError, Result};
use crate::lexer::{tokenize, Token};

/// Instruction argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// Decimal literal, as written
    Literal(String),
    /// Reference to a label
    Label(String),
}

/// One parsed source line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub label: Option<String>,
    pub mnemonic: String,
    pub args: Vec<Argument>,
}

/// Parse a single line of assembly.
///
/// `line` is the 1-based source line number used in error messages.
pub fn parse_line(text: &str, line: usize) -> Result<Line> {
    let parts: Vec<&str> = text.split(": ").collect();
    let (label, body) = match parts.as_slice() {
        [body] => (None, *body),
        [label, body] => (Some(parse_label(label, line)?), *body),
        _ => {
            return Err(AssemblerError::syntax(
                line,
                "only one label at the start of a command can be given",
            ))
        }
    };

    let (mnemonic, args) = parse_command(body, line)?;
    Ok(Line { label, mnemonic, args })
}

fn parse_label(text: &str, line: usize) -> Result<String> {
    match tokenize(text).as_deref() {
        Some([Token::Label(name)]) => Ok(name.clone()),
        _ => Err(AssemblerError::syntax(
            line,
            format!("label {:?} does not match the label pattern", text),
        )),
    }
}

fn parse_command(text: &str, line: usize) -> Result<(String, Vec<Argument>)> {
    let malformed = || {
        AssemblerError::syntax(
            line,
            format!("command {:?} does not match the command pattern", text),
        )
    };

    let tokens = tokenize(text).ok_or_else(malformed)?;
    let mut tokens = tokens.into_iter();

    let mnemonic = match tokens.next() {
        Some(Token::Mnemonic(name)) => name,
        _ => return Err(malformed()),
    };

    let mut args = Vec::new();
    match tokens.next() {
        None => return Ok((mnemonic, args)),
        Some(Token::Space) => {}
        Some(_) => return Err(malformed()),
    }

    loop {
        let token = tokens.next().ok_or_else(malformed)?;
        let arg = match token {
            Token::Number(digits) => Argument::Literal(digits),
            other => Argument::Label(other.argument_text().ok_or_else(malformed)?.to_string()),
        };
        args.push(arg);

        match tokens.next() {
            None => return Ok((mnemonic, args)),
            Some(Token::Comma) => {}
            Some(_) => return Err(malformed()),
        }
    }
}
