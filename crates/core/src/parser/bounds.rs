//! Bounds section micro-grammar.
//!
//! Patterns, tried in order at each position:
//! `var free` | `const <= var <= const` | `const cmp var` | `var cmp const`.
//! Strict comparisons are rejected everywhere in this section.

use crate::classify::{Cmp, Token};
use crate::error::LpError;
use crate::lexer::Spanned;
use crate::model::VariablePool;

fn tok(tokens: &[Spanned<Token>], i: usize) -> Option<&Token> {
    tokens.get(i).map(|t| &t.token)
}

pub(super) fn process_bounds(
    tokens: &[Spanned<Token>],
    pool: &mut VariablePool,
    filename: &str,
) -> Result<(), LpError> {
    let mut rest = tokens;

    while !rest.is_empty() {
        let line = rest[0].line;

        // var free
        if let (Some(Token::Var(v)), Some(Token::Free)) = (tok(rest, 0), tok(rest, 1)) {
            let id = pool.resolve(v);
            let var = pool.get_mut(id);
            var.lower = f64::NEG_INFINITY;
            var.upper = f64::INFINITY;
            rest = &rest[2..];
            continue;
        }

        // const cmp var cmp const
        if let (
            Some(Token::Const(lb)),
            Some(Token::Cmp(d1)),
            Some(Token::Var(v)),
            Some(Token::Cmp(d2)),
            Some(Token::Const(ub)),
        ) = (
            tok(rest, 0),
            tok(rest, 1),
            tok(rest, 2),
            tok(rest, 3),
            tok(rest, 4),
        ) {
            if *d1 != Cmp::Le || *d2 != Cmp::Le {
                return Err(LpError::MalformedBound {
                    file: filename.to_owned(),
                    line,
                    message: "a double-sided bound must use '<=' on both sides".to_string(),
                });
            }
            let (lb, ub) = (*lb, *ub);
            let id = pool.resolve(v);
            let var = pool.get_mut(id);
            var.lower = lb;
            var.upper = ub;
            rest = &rest[5..];
            continue;
        }

        // const cmp var
        if let (Some(Token::Const(c)), Some(Token::Cmp(dir)), Some(Token::Var(v))) =
            (tok(rest, 0), tok(rest, 1), tok(rest, 2))
        {
            let (c, dir) = (*c, *dir);
            let id = pool.resolve(v);
            let var = pool.get_mut(id);
            match dir {
                Cmp::Le => var.lower = c,
                Cmp::Ge => var.upper = c,
                Cmp::Eq => {
                    var.lower = c;
                    var.upper = c;
                }
                Cmp::Lt | Cmp::Gt => {
                    return Err(LpError::MalformedBound {
                        file: filename.to_owned(),
                        line,
                        message: "strict comparison is not allowed in a bound".to_string(),
                    });
                }
            }
            rest = &rest[3..];
            continue;
        }

        // var cmp const
        if let (Some(Token::Var(v)), Some(Token::Cmp(dir)), Some(Token::Const(c))) =
            (tok(rest, 0), tok(rest, 1), tok(rest, 2))
        {
            let (c, dir) = (*c, *dir);
            let id = pool.resolve(v);
            let var = pool.get_mut(id);
            match dir {
                Cmp::Le => var.upper = c,
                Cmp::Ge => var.lower = c,
                Cmp::Eq => {
                    var.lower = c;
                    var.upper = c;
                }
                Cmp::Lt | Cmp::Gt => {
                    return Err(LpError::MalformedBound {
                        file: filename.to_owned(),
                        line,
                        message: "strict comparison is not allowed in a bound".to_string(),
                    });
                }
            }
            rest = &rest[3..];
            continue;
        }

        return Err(LpError::MalformedBound {
            file: filename.to_owned(),
            line,
            message: "unrecognized bound pattern".to_string(),
        });
    }

    Ok(())
}
