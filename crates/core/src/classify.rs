//! Token reclassification: raw tokens -> semantic tokens.
//!
//! Resolves the format's context-dependent ambiguity (keyword vs variable vs
//! named-entity label) with up to three tokens of lookahead, first match
//! wins. Keyword comparisons are case-insensitive; the recognized spelling
//! tables are fixed at compile time and scoped to this module.

use std::io::BufRead;

use crate::error::LpError;
use crate::lexer::{RawToken, Spanned, TokenWindow};
use crate::sections::SectionKeyword;

// ──────────────────────────────────────────────
// Keyword tables
// ──────────────────────────────────────────────

const KEYWORDS_MINIMIZE: &[&str] = &["min", "minimize", "minimise"];
const KEYWORDS_MAXIMIZE: &[&str] = &["max", "maximize", "maximise"];
const KEYWORDS_CONSTRAINTS: &[&str] = &["st", "s.t.", "subject to", "such that"];
const KEYWORDS_BOUNDS: &[&str] = &["bounds", "bound"];
const KEYWORDS_BINARY: &[&str] = &["bin", "binary", "binaries"];
const KEYWORDS_GENERAL: &[&str] = &["gen", "general", "generals", "int", "integer", "integers"];
const KEYWORDS_SEMI: &[&str] = &["semi", "semi-continuous", "semis"];
const KEYWORDS_SOS: &[&str] = &["sos"];
const KEYWORDS_END: &[&str] = &["end"];
const KEYWORDS_FREE: &[&str] = &["free"];
const KEYWORDS_INFINITY: &[&str] = &["inf", "infinity"];

fn section_keyword(s: &str) -> Option<SectionKeyword> {
    let lower = s.to_ascii_lowercase();
    let lower = lower.as_str();
    let tables: &[(&[&str], SectionKeyword)] = &[
        (KEYWORDS_MINIMIZE, SectionKeyword::Minimize),
        (KEYWORDS_MAXIMIZE, SectionKeyword::Maximize),
        (KEYWORDS_CONSTRAINTS, SectionKeyword::Constraints),
        (KEYWORDS_BOUNDS, SectionKeyword::Bounds),
        (KEYWORDS_BINARY, SectionKeyword::Binary),
        (KEYWORDS_GENERAL, SectionKeyword::General),
        (KEYWORDS_SEMI, SectionKeyword::SemiContinuous),
        (KEYWORDS_SOS, SectionKeyword::Sos),
        (KEYWORDS_END, SectionKeyword::End),
    ];
    tables
        .iter()
        .find(|(table, _)| table.contains(&lower))
        .map(|&(_, kw)| kw)
}

// ──────────────────────────────────────────────
// Semantic tokens
// ──────────────────────────────────────────────

/// Comparison direction. The strict variants exist so the classifier can
/// represent `<` and `>`; the section processors that see them reject them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmp {
    Le,
    Lt,
    Eq,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Section(SectionKeyword),
    /// Named-entity label (`name:`) -- constraint name, objective name, or
    /// SOS name depending on context
    Label(String),
    Var(String),
    Const(f64),
    Cmp(Cmp),
    /// Special-ordered-set type marker: 1 or 2
    SosType(u8),
    /// The `free` bound marker
    Free,
    BracketOpen,
    BracketClose,
    Slash,
    Asterisk,
    Hat,
}

/// Consume the whole raw token stream and produce the semantic token stream.
pub fn classify<R: BufRead>(window: &mut TokenWindow<R>) -> Result<Vec<Spanned<Token>>, LpError> {
    let file = window.filename().to_owned();
    let mut out: Vec<Spanned<Token>> = Vec::new();

    loop {
        let line = window.peek(0).line;
        let t0 = window.peek(0).token.clone();

        if t0 == RawToken::Eof {
            break;
        }

        // `/*` comment: skipped two raw tokens at a time until `*/` or end
        // of input. An unterminated comment silently runs to the end.
        if t0 == RawToken::Slash && window.peek(1).token == RawToken::Asterisk {
            loop {
                window.advance(2)?;
                let closed = matches!(
                    (&window.peek(0).token, &window.peek(1).token),
                    (RawToken::Asterisk, RawToken::Slash)
                );
                if closed || window.peek(0).token == RawToken::Eof {
                    break;
                }
            }
            window.advance(2)?;
            continue;
        }

        if let RawToken::Str(s) = &t0 {
            // hyphenated compound keyword, e.g. "semi-continuous"
            if let (RawToken::Minus, RawToken::Str(s2)) =
                (&window.peek(1).token, &window.peek(2).token)
            {
                if let Some(kw) = section_keyword(&format!("{}-{}", s, s2)) {
                    out.push(Spanned {
                        token: Token::Section(kw),
                        line,
                    });
                    window.advance(3)?;
                    continue;
                }
            }

            // two-word keyword, e.g. "subject to"
            if let RawToken::Str(s2) = &window.peek(1).token {
                if let Some(kw) = section_keyword(&format!("{} {}", s, s2)) {
                    out.push(Spanned {
                        token: Token::Section(kw),
                        line,
                    });
                    window.advance(2)?;
                    continue;
                }
            }

            // single-word keyword
            if let Some(kw) = section_keyword(s) {
                out.push(Spanned {
                    token: Token::Section(kw),
                    line,
                });
                window.advance(1)?;
                continue;
            }

            // SOS type marker: "S1 ::" or "S2 ::"
            if window.peek(1).token == RawToken::Colon && window.peek(2).token == RawToken::Colon {
                let kind = match s.to_ascii_lowercase().as_str() {
                    "s1" => 1u8,
                    "s2" => 2u8,
                    _ => {
                        return Err(LpError::MalformedSosEntry {
                            file,
                            line,
                            message: format!("invalid special-ordered-set type '{}'", s),
                        });
                    }
                };
                out.push(Spanned {
                    token: Token::SosType(kind),
                    line,
                });
                window.advance(3)?;
                continue;
            }

            // named-entity label
            if window.peek(1).token == RawToken::Colon {
                out.push(Spanned {
                    token: Token::Label(s.clone()),
                    line,
                });
                window.advance(2)?;
                continue;
            }

            let lower = s.to_ascii_lowercase();
            if KEYWORDS_FREE.contains(&lower.as_str()) {
                out.push(Spanned {
                    token: Token::Free,
                    line,
                });
                window.advance(1)?;
                continue;
            }
            if KEYWORDS_INFINITY.contains(&lower.as_str()) {
                out.push(Spanned {
                    token: Token::Const(f64::INFINITY),
                    line,
                });
                window.advance(1)?;
                continue;
            }

            // anything else is a variable reference
            out.push(Spanned {
                token: Token::Var(s.clone()),
                line,
            });
            window.advance(1)?;
            continue;
        }

        let (token, consumed) = match t0 {
            RawToken::Plus => match &window.peek(1).token {
                // unary plus is a no-op on magnitude
                RawToken::Num(v) => (Token::Const(*v), 2),
                RawToken::BracketOpen => (Token::BracketOpen, 2),
                _ => (Token::Const(1.0), 1),
            },
            RawToken::Minus => match &window.peek(1).token {
                RawToken::Num(v) => (Token::Const(-*v), 2),
                RawToken::BracketOpen => {
                    return Err(LpError::MalformedExpression {
                        file,
                        line,
                        message: "a bracketed group may not be negated".to_string(),
                    });
                }
                _ => (Token::Const(-1.0), 1),
            },
            RawToken::Num(v) => {
                if window.peek(1).token == RawToken::BracketOpen {
                    return Err(LpError::MalformedExpression {
                        file,
                        line,
                        message: "a coefficient may not precede a bracketed group".to_string(),
                    });
                }
                (Token::Const(v), 1)
            }
            RawToken::BracketOpen => (Token::BracketOpen, 1),
            RawToken::BracketClose => (Token::BracketClose, 1),
            RawToken::Slash => (Token::Slash, 1),
            RawToken::Asterisk => (Token::Asterisk, 1),
            RawToken::Hat => (Token::Hat, 1),
            RawToken::Less => match window.peek(1).token {
                RawToken::Equal => (Token::Cmp(Cmp::Le), 2),
                _ => (Token::Cmp(Cmp::Lt), 1),
            },
            RawToken::Greater => match window.peek(1).token {
                RawToken::Equal => (Token::Cmp(Cmp::Ge), 2),
                _ => (Token::Cmp(Cmp::Gt), 1),
            },
            RawToken::Equal => (Token::Cmp(Cmp::Eq), 1),
            other => {
                return Err(LpError::UnknownToken {
                    file,
                    line,
                    message: format!("token {:?} is not legal here", other),
                });
            }
        };
        out.push(Spanned { token, line });
        window.advance(consumed)?;
    }

    Ok(out)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    fn classify_str(src: &str) -> Result<Vec<Token>, LpError> {
        let lexer = Lexer::new(src.as_bytes(), "test.lp");
        let mut window = TokenWindow::new(lexer)?;
        Ok(classify(&mut window)?.into_iter().map(|t| t.token).collect())
    }

    #[test]
    fn keyword_spellings_are_case_insensitive() {
        for spelling in ["min", "MINIMIZE", "Minimise"] {
            assert_eq!(
                classify_str(spelling).unwrap(),
                vec![Token::Section(SectionKeyword::Minimize)],
                "spelling {}",
                spelling
            );
        }
        assert_eq!(
            classify_str("Subject To").unwrap(),
            vec![Token::Section(SectionKeyword::Constraints)]
        );
        assert_eq!(
            classify_str("s.t.").unwrap(),
            vec![Token::Section(SectionKeyword::Constraints)]
        );
        assert_eq!(
            classify_str("SEMI-CONTINUOUS").unwrap(),
            vec![Token::Section(SectionKeyword::SemiContinuous)]
        );
    }

    #[test]
    fn label_and_sos_type_markers() {
        assert_eq!(
            classify_str("c1: S1:: s2::").unwrap(),
            vec![
                Token::Label("c1".to_string()),
                Token::SosType(1),
                Token::SosType(2),
            ]
        );
    }

    #[test]
    fn bad_sos_type_marker_is_fatal() {
        let err = classify_str("S3:: x").unwrap_err();
        assert!(matches!(err, LpError::MalformedSosEntry { .. }), "{err:?}");
    }

    #[test]
    fn free_and_infinity_words() {
        assert_eq!(
            classify_str("x Free inf INFINITY").unwrap(),
            vec![
                Token::Var("x".to_string()),
                Token::Free,
                Token::Const(f64::INFINITY),
                Token::Const(f64::INFINITY),
            ]
        );
    }

    #[test]
    fn signs_fold_into_constants() {
        assert_eq!(
            classify_str("+ 3 - 4 + - 5").unwrap(),
            vec![
                Token::Const(3.0),
                Token::Const(-4.0),
                Token::Const(1.0),
                Token::Const(-5.0),
            ]
        );
    }

    #[test]
    fn plus_bracket_is_bracket_minus_bracket_is_fatal() {
        assert_eq!(
            classify_str("+ [ x ]").unwrap(),
            vec![
                Token::BracketOpen,
                Token::Var("x".to_string()),
                Token::BracketClose,
            ]
        );
        let err = classify_str("- [ x ]").unwrap_err();
        assert!(matches!(err, LpError::MalformedExpression { .. }));
    }

    #[test]
    fn constant_before_bracket_is_fatal() {
        let err = classify_str("2 [ x ]").unwrap_err();
        assert!(matches!(err, LpError::MalformedExpression { .. }));
    }

    #[test]
    fn comparison_operators() {
        assert_eq!(
            classify_str("<= < >= > =").unwrap(),
            vec![
                Token::Cmp(Cmp::Le),
                Token::Cmp(Cmp::Lt),
                Token::Cmp(Cmp::Ge),
                Token::Cmp(Cmp::Gt),
                Token::Cmp(Cmp::Eq),
            ]
        );
    }

    #[test]
    fn block_comment_is_skipped() {
        assert_eq!(
            classify_str("x1 /* a b */ x2").unwrap(),
            vec![Token::Var("x1".to_string()), Token::Var("x2".to_string())]
        );
    }

    #[test]
    fn unterminated_block_comment_consumes_to_end() {
        assert_eq!(
            classify_str("x1 /* never closed").unwrap(),
            vec![Token::Var("x1".to_string())]
        );
    }

    #[test]
    fn lone_colon_is_unknown() {
        let err = classify_str(": x").unwrap_err();
        assert!(matches!(err, LpError::UnknownToken { .. }));
    }
}
