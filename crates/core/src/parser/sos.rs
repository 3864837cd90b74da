//! Special-ordered-set section micro-grammar.
//!
//! Each set is `name: S1:: var: weight var: weight ...`. The classifier has
//! already turned every `string :` pair into a named-entity label, so inside
//! a set body the labels are reinterpreted as variable names; the entry list
//! ends at the first label not followed by a numeric constant (typically the
//! next set's name, which is followed by its type marker instead).

use crate::classify::Token;
use crate::error::LpError;
use crate::lexer::Spanned;
use crate::model::{Sos, SosEntry, VariablePool};

fn tok(tokens: &[Spanned<Token>], i: usize) -> Option<&Token> {
    tokens.get(i).map(|t| &t.token)
}

pub(super) fn process_sos(
    tokens: &[Spanned<Token>],
    pool: &mut VariablePool,
    filename: &str,
) -> Result<Vec<Sos>, LpError> {
    let mut out = Vec::new();
    let mut rest = tokens;

    while !rest.is_empty() {
        let line = rest[0].line;

        let name = match &rest[0].token {
            Token::Label(n) => n.clone(),
            other => {
                return Err(LpError::MalformedSosEntry {
                    file: filename.to_owned(),
                    line,
                    message: format!("expected a set name, got {:?}", other),
                });
            }
        };
        rest = &rest[1..];

        let kind = match rest.first() {
            Some(Spanned {
                token: Token::SosType(k),
                ..
            }) => *k,
            Some(t) => {
                return Err(LpError::MalformedSosEntry {
                    file: filename.to_owned(),
                    line: t.line,
                    message: format!("expected a set type after '{}', got {:?}", name, t.token),
                });
            }
            None => {
                return Err(LpError::UnexpectedEndOfSection {
                    file: filename.to_owned(),
                    line,
                    section: "sos",
                });
            }
        };
        rest = &rest[1..];

        let mut entries = Vec::new();
        while let (Some(Token::Label(v)), Some(Token::Const(w))) = (tok(rest, 0), tok(rest, 1)) {
            entries.push(SosEntry {
                var: pool.resolve(v),
                weight: *w,
            });
            rest = &rest[2..];
        }

        out.push(Sos {
            name,
            kind,
            entries,
        });
    }

    Ok(out)
}
