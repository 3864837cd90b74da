//! Shared linear/quadratic expression grammar, used by the objective and
//! constraint processors.
//!
//! Pure over its input: takes a token slice, returns the parsed expression
//! and how many tokens it consumed. The caller interprets whatever follows
//! (typically a comparison operator or the end of the section).

use crate::classify::Token;
use crate::error::LpError;
use crate::lexer::Spanned;
use crate::model::{Expression, LinearTerm, QuadraticTerm, VariablePool};

fn tok(tokens: &[Spanned<Token>], i: usize) -> Option<&Token> {
    tokens.get(i).map(|t| &t.token)
}

fn line_at(tokens: &[Spanned<Token>], i: usize) -> u32 {
    tokens
        .get(i)
        .or_else(|| tokens.last())
        .map(|t| t.line)
        .unwrap_or(0)
}

/// Parse one expression from the start of `tokens`, matching the longest
/// applicable pattern first. Stops at the first token no pattern covers.
///
/// When `is_objective` is set, every bracketed quadratic group must be
/// followed by `/ 2` (the group denotes its value divided by two); outside
/// the objective the closing bracket alone ends the group.
pub(super) fn parse_expression(
    tokens: &[Spanned<Token>],
    is_objective: bool,
    section: &'static str,
    pool: &mut VariablePool,
    filename: &str,
) -> Result<(Expression, usize), LpError> {
    let mut expr = Expression::default();
    let mut pos = 0usize;

    if let Some(Token::Label(name)) = tok(tokens, 0) {
        expr.name = Some(name.clone());
        pos += 1;
    }

    loop {
        match (tok(tokens, pos), tok(tokens, pos + 1)) {
            // const var
            (Some(Token::Const(c)), Some(Token::Var(v))) => {
                expr.linear.push(LinearTerm {
                    coef: *c,
                    var: pool.resolve(v),
                });
                pos += 2;
            }
            // lone const
            (Some(Token::Const(c)), _) => {
                expr.offset += *c;
                pos += 1;
            }
            // lone var, implicit unit coefficient
            (Some(Token::Var(v)), _) => {
                expr.linear.push(LinearTerm {
                    coef: 1.0,
                    var: pool.resolve(v),
                });
                pos += 1;
            }
            (Some(Token::BracketOpen), _) => {
                pos = parse_quadratic_group(
                    tokens,
                    pos + 1,
                    is_objective,
                    section,
                    pool,
                    filename,
                    &mut expr,
                )?;
            }
            _ => break,
        }
    }

    Ok((expr, pos))
}

/// Parse the inside of a bracketed quadratic group, starting right after the
/// opening bracket; returns the position right after the group (and, in the
/// objective, after the required `/ 2`).
fn parse_quadratic_group(
    tokens: &[Spanned<Token>],
    start: usize,
    is_objective: bool,
    section: &'static str,
    pool: &mut VariablePool,
    filename: &str,
    expr: &mut Expression,
) -> Result<usize, LpError> {
    let mut pos = start;

    loop {
        match tok(tokens, pos) {
            None | Some(Token::BracketClose) => break,
            _ => {}
        }

        // const var ^ const
        if let (
            Some(Token::Const(c)),
            Some(Token::Var(v)),
            Some(Token::Hat),
            Some(Token::Const(e)),
        ) = (
            tok(tokens, pos),
            tok(tokens, pos + 1),
            tok(tokens, pos + 2),
            tok(tokens, pos + 3),
        ) {
            check_exponent(*e, tokens, pos + 3, filename)?;
            let id = pool.resolve(v);
            expr.quadratic.push(QuadraticTerm {
                coef: *c,
                var1: id,
                var2: id,
            });
            pos += 4;
            continue;
        }

        // var ^ const
        if let (Some(Token::Var(v)), Some(Token::Hat), Some(Token::Const(e))) = (
            tok(tokens, pos),
            tok(tokens, pos + 1),
            tok(tokens, pos + 2),
        ) {
            check_exponent(*e, tokens, pos + 2, filename)?;
            let id = pool.resolve(v);
            expr.quadratic.push(QuadraticTerm {
                coef: 1.0,
                var1: id,
                var2: id,
            });
            pos += 3;
            continue;
        }

        // const var * var
        if let (
            Some(Token::Const(c)),
            Some(Token::Var(v1)),
            Some(Token::Asterisk),
            Some(Token::Var(v2)),
        ) = (
            tok(tokens, pos),
            tok(tokens, pos + 1),
            tok(tokens, pos + 2),
            tok(tokens, pos + 3),
        ) {
            expr.quadratic.push(QuadraticTerm {
                coef: *c,
                var1: pool.resolve(v1),
                var2: pool.resolve(v2),
            });
            pos += 4;
            continue;
        }

        // var * var
        if let (Some(Token::Var(v1)), Some(Token::Asterisk), Some(Token::Var(v2))) = (
            tok(tokens, pos),
            tok(tokens, pos + 1),
            tok(tokens, pos + 2),
        ) {
            expr.quadratic.push(QuadraticTerm {
                coef: 1.0,
                var1: pool.resolve(v1),
                var2: pool.resolve(v2),
            });
            pos += 3;
            continue;
        }

        return Err(LpError::MalformedExpression {
            file: filename.to_owned(),
            line: line_at(tokens, pos),
            message: "malformed term in quadratic group".to_string(),
        });
    }

    if is_objective {
        match (tok(tokens, pos), tok(tokens, pos + 1), tok(tokens, pos + 2)) {
            (Some(Token::BracketClose), Some(Token::Slash), Some(Token::Const(d))) if *d == 2.0 => {
                Ok(pos + 3)
            }
            (None, _, _) | (_, None, _) | (_, _, None) => Err(LpError::UnexpectedEndOfSection {
                file: filename.to_owned(),
                line: line_at(tokens, pos),
                section,
            }),
            _ => Err(LpError::MalformedExpression {
                file: filename.to_owned(),
                line: line_at(tokens, pos),
                message: "a quadratic group in the objective must be followed by '/ 2'"
                    .to_string(),
            }),
        }
    } else {
        match tok(tokens, pos) {
            Some(Token::BracketClose) => Ok(pos + 1),
            _ => Err(LpError::UnexpectedEndOfSection {
                file: filename.to_owned(),
                line: line_at(tokens, pos),
                section,
            }),
        }
    }
}

fn check_exponent(
    e: f64,
    tokens: &[Spanned<Token>],
    i: usize,
    filename: &str,
) -> Result<(), LpError> {
    if e == 2.0 {
        Ok(())
    } else {
        Err(LpError::MalformedExpression {
            file: filename.to_owned(),
            line: line_at(tokens, i),
            message: format!("exponent must be 2, got {}", e),
        })
    }
}
