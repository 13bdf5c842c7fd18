//! Boolean expressions over signal ids, as used by `strong_if` and
//! `active_if`.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := and ("or" and)*
//! and     := unary ("and" unary)*
//! unary   := "not" unary | primary
//! primary := IDENT | "true" | "false" | "(" expr ")"
//! ```

use std::collections::BTreeSet;
use std::fmt;

use logos::Logos;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExprError {
    #[error("Unexpected character '{ch}' at {position}")]
    InvalidCharacter { ch: char, position: usize },
    #[error("Unexpected token '{token}' at {position}")]
    UnexpectedToken { token: String, position: usize },
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(bool),
    Signal(String),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum Token {
    #[token("and")]
    And,
    #[token("or")]
    Or,
    #[token("not")]
    Not,
    #[token("true")]
    #[token("True")]
    True,
    #[token("false")]
    #[token("False")]
    False,
    #[token("(")]
    Open,
    #[token(")")]
    Close,
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(name) => f.write_str(name),
            Token::And => f.write_str("and"),
            Token::Or => f.write_str("or"),
            Token::Not => f.write_str("not"),
            Token::True => f.write_str("true"),
            Token::False => f.write_str("false"),
            Token::Open => f.write_str("("),
            Token::Close => f.write_str(")"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(Token, usize)>, ExprError> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| match token {
            Ok(token) => Ok((token, span.start)),
            Err(()) => Err(ExprError::InvalidCharacter {
                ch: source[span.start..].chars().next().unwrap_or('\0'),
                position: span.start,
            }),
        })
        .collect()
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    cursor: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    fn or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.and()?;
        while self.peek() == Some(&Token::Or) {
            self.cursor += 1;
            let right = self.and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.unary()?;
        while self.peek() == Some(&Token::And) {
            self.cursor += 1;
            let right = self.unary()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr, ExprError> {
        if self.peek() == Some(&Token::Not) {
            self.cursor += 1;
            return Ok(Expr::Not(Box::new(self.unary()?)));
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ExprError> {
        match self.next() {
            Some((Token::Ident(name), _)) => Ok(Expr::Signal(name)),
            Some((Token::True, _)) => Ok(Expr::Const(true)),
            Some((Token::False, _)) => Ok(Expr::Const(false)),
            Some((Token::Open, _)) => {
                let inner = self.or()?;
                match self.next() {
                    Some((Token::Close, _)) => Ok(inner),
                    Some((token, position)) => Err(ExprError::UnexpectedToken {
                        token: token.to_string(),
                        position,
                    }),
                    None => Err(ExprError::UnexpectedEnd),
                }
            }
            Some((token, position)) => Err(ExprError::UnexpectedToken {
                token: token.to_string(),
                position,
            }),
            None => Err(ExprError::UnexpectedEnd),
        }
    }
}

impl Expr {
    pub fn parse(source: &str) -> Result<Expr, ExprError> {
        let mut parser = Parser {
            tokens: tokenize(source)?,
            cursor: 0,
        };
        let expr = parser.or()?;
        match parser.next() {
            None => Ok(expr),
            Some((token, position)) => Err(ExprError::UnexpectedToken {
                token: token.to_string(),
                position,
            }),
        }
    }

    /// Evaluates against signal values; ids the lookup does not know are false.
    pub fn eval<F>(&self, lookup: &F) -> bool
    where
        F: Fn(&str) -> Option<bool>,
    {
        match self {
            Expr::Const(value) => *value,
            Expr::Signal(name) => lookup(name).unwrap_or(false),
            Expr::Not(inner) => !inner.eval(lookup),
            Expr::And(a, b) => a.eval(lookup) && b.eval(lookup),
            Expr::Or(a, b) => a.eval(lookup) || b.eval(lookup),
        }
    }

    /// Every signal id the expression mentions.
    pub fn signals(&self) -> BTreeSet<&str> {
        let mut out = BTreeSet::new();
        self.collect_signals(&mut out);
        out
    }

    fn collect_signals<'a>(&'a self, out: &mut BTreeSet<&'a str>) {
        match self {
            Expr::Const(_) => {}
            Expr::Signal(name) => {
                out.insert(name.as_str());
            }
            Expr::Not(inner) => inner.collect_signals(out),
            Expr::And(a, b) | Expr::Or(a, b) => {
                a.collect_signals(out);
                b.collect_signals(out);
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(value) => write!(f, "{value}"),
            Expr::Signal(name) => f.write_str(name),
            Expr::Not(inner) => write!(f, "not {inner}"),
            Expr::And(a, b) => write!(f, "({a} and {b})"),
            Expr::Or(a, b) => write!(f, "({a} or {b})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn eval(source: &str, values: &[(&str, bool)]) -> bool {
        let map: HashMap<&str, bool> = values.iter().copied().collect();
        Expr::parse(source)
            .unwrap()
            .eval(&|name: &str| map.get(name).copied())
    }

    #[test]
    fn precedence_and_binds_tighter_than_or() {
        assert!(eval("a or b and c", &[("a", true), ("b", false), ("c", false)]));
        assert!(!eval("(a or b) and c", &[("a", true), ("b", false), ("c", false)]));
    }

    #[test]
    fn not_and_constants() {
        assert!(eval("not a", &[("a", false)]));
        assert!(eval("not not a", &[("a", true)]));
        assert!(eval("True and not False", &[]));
    }

    #[test]
    fn unknown_signal_is_false() {
        assert!(!eval("missing", &[]));
        assert!(eval("missing or present", &[("present", true)]));
    }

    #[test]
    fn malformed_expressions_are_rejected() {
        assert_eq!(Expr::parse("a and"), Err(ExprError::UnexpectedEnd));
        assert!(matches!(
            Expr::parse("(a or b"),
            Err(ExprError::UnexpectedEnd)
        ));
        assert!(matches!(
            Expr::parse("a b"),
            Err(ExprError::UnexpectedToken { position: 2, .. })
        ));
        assert!(matches!(
            Expr::parse("a && b"),
            Err(ExprError::InvalidCharacter { ch: '&', .. })
        ));
    }

    #[test]
    fn lexer_reports_offending_character_and_offset() {
        assert_eq!(
            Expr::parse("k1 and 9k"),
            Err(ExprError::InvalidCharacter { ch: '9', position: 7 })
        );
        assert_eq!(
            Expr::parse("k1 or\tk2 | k3"),
            Err(ExprError::InvalidCharacter { ch: '|', position: 9 })
        );
    }

    #[test]
    fn keywords_inside_identifiers_stay_identifiers() {
        let expr = Expr::parse("android or notable").unwrap();
        let ids: Vec<&str> = expr.signals().into_iter().collect();
        assert_eq!(ids, vec!["android", "notable"]);
    }

    #[test]
    fn collects_signal_ids() {
        let expr = Expr::parse("k1 and (k2 or not k1)").unwrap();
        let ids: Vec<&str> = expr.signals().into_iter().collect();
        assert_eq!(ids, vec!["k1", "k2"]);
    }
}
