//! Section processors: one micro-grammar per section kind, each consuming
//! its token range and contributing to the model under construction.
//!
//! Sections are processed in a fixed order (objective, constraints, bounds,
//! general, binary, semi-continuous, sos, end). The order is observable:
//! a variable listed in both the general and the binary section ends up
//! binary, because the binary processor runs later.

mod bounds;
mod expression;
mod sos;

use crate::classify::{Cmp, Token};
use crate::error::LpError;
use crate::lexer::Spanned;
use crate::model::{
    Constraint, Expression, Model, Sense, Variable, VariableKind, VariablePool,
};
use crate::sections::{SectionKeyword, SectionMap};

/// Run every section processor over its range and assemble the model.
pub fn build_model(
    tokens: &[Spanned<Token>],
    sections: &SectionMap,
    filename: &str,
) -> Result<Model, LpError> {
    let mut pool = VariablePool::default();
    let mut sense = Sense::default();
    let mut objective = Expression::default();

    if let Some(range) = sections.get(&SectionKeyword::Minimize) {
        sense = Sense::Minimize;
        objective = process_objective(&tokens[range.clone()], "minimize", &mut pool, filename)?;
    } else if let Some(range) = sections.get(&SectionKeyword::Maximize) {
        sense = Sense::Maximize;
        objective = process_objective(&tokens[range.clone()], "maximize", &mut pool, filename)?;
    }

    let mut constraints = Vec::new();
    if let Some(range) = sections.get(&SectionKeyword::Constraints) {
        constraints = process_constraints(&tokens[range.clone()], &mut pool, filename)?;
    }

    if let Some(range) = sections.get(&SectionKeyword::Bounds) {
        bounds::process_bounds(&tokens[range.clone()], &mut pool, filename)?;
    }

    if let Some(range) = sections.get(&SectionKeyword::General) {
        mark_variables(&tokens[range.clone()], "general", &mut pool, filename, |var| {
            var.kind = if var.kind == VariableKind::SemiContinuous {
                VariableKind::SemiInteger
            } else {
                VariableKind::General
            };
        })?;
    }

    if let Some(range) = sections.get(&SectionKeyword::Binary) {
        mark_variables(&tokens[range.clone()], "binary", &mut pool, filename, |var| {
            var.kind = VariableKind::Binary;
            var.lower = 0.0;
            var.upper = 1.0;
        })?;
    }

    if let Some(range) = sections.get(&SectionKeyword::SemiContinuous) {
        mark_variables(
            &tokens[range.clone()],
            "semi-continuous",
            &mut pool,
            filename,
            |var| {
                var.kind = if var.kind == VariableKind::General {
                    VariableKind::SemiInteger
                } else {
                    VariableKind::SemiContinuous
                };
            },
        )?;
    }

    let mut sos_sets = Vec::new();
    if let Some(range) = sections.get(&SectionKeyword::Sos) {
        sos_sets = sos::process_sos(&tokens[range.clone()], &mut pool, filename)?;
    }

    // a recorded end section means there were tokens after `end`
    if let Some(range) = sections.get(&SectionKeyword::End) {
        let t = &tokens[range.start];
        return Err(LpError::UnknownToken {
            file: filename.to_owned(),
            line: t.line,
            message: "unexpected tokens after 'end'".to_string(),
        });
    }

    Ok(Model {
        sense,
        objective,
        constraints,
        variables: pool.into_variables(),
        sos: sos_sets,
    })
}

/// Parse the objective expression; the whole section range must be consumed.
fn process_objective(
    tokens: &[Spanned<Token>],
    section: &'static str,
    pool: &mut VariablePool,
    filename: &str,
) -> Result<Expression, LpError> {
    let (expr, used) = expression::parse_expression(tokens, true, section, pool, filename)?;
    if used < tokens.len() {
        let t = &tokens[used];
        return Err(LpError::MalformedExpression {
            file: filename.to_owned(),
            line: t.line,
            message: format!("unexpected token in '{}' section: {:?}", section, t.token),
        });
    }
    Ok(expr)
}

/// Parse `expr cmp const` rows until the section is exhausted.
fn process_constraints(
    tokens: &[Spanned<Token>],
    pool: &mut VariablePool,
    filename: &str,
) -> Result<Vec<Constraint>, LpError> {
    let end_line = tokens.last().map(|t| t.line).unwrap_or(0);
    let mut out = Vec::new();
    let mut rest = tokens;

    while !rest.is_empty() {
        let (expr, used) =
            expression::parse_expression(rest, false, "constraints", pool, filename)?;
        rest = &rest[used..];

        let dir = match rest.first() {
            Some(Spanned {
                token: Token::Cmp(dir),
                ..
            }) => *dir,
            Some(t) => {
                return Err(LpError::MalformedExpression {
                    file: filename.to_owned(),
                    line: t.line,
                    message: format!(
                        "expected comparison after constraint expression, got {:?}",
                        t.token
                    ),
                });
            }
            None => {
                return Err(LpError::UnexpectedEndOfSection {
                    file: filename.to_owned(),
                    line: end_line,
                    section: "constraints",
                });
            }
        };
        rest = &rest[1..];

        let rhs = match rest.first() {
            Some(Spanned {
                token: Token::Const(v),
                ..
            }) => *v,
            Some(t) => {
                return Err(LpError::MalformedExpression {
                    file: filename.to_owned(),
                    line: t.line,
                    message: format!("expected right-hand side constant, got {:?}", t.token),
                });
            }
            None => {
                return Err(LpError::UnexpectedEndOfSection {
                    file: filename.to_owned(),
                    line: end_line,
                    section: "constraints",
                });
            }
        };

        let mut con = Constraint::new(expr);
        match dir {
            Cmp::Le => con.upper = rhs,
            Cmp::Ge => con.lower = rhs,
            Cmp::Eq => {
                con.lower = rhs;
                con.upper = rhs;
            }
            Cmp::Lt | Cmp::Gt => {
                return Err(LpError::MalformedExpression {
                    file: filename.to_owned(),
                    line: rest.first().map(|t| t.line).unwrap_or(end_line),
                    message: "strict comparison is not allowed in a constraint".to_string(),
                });
            }
        }
        out.push(con);
        rest = &rest[1..];
    }

    Ok(out)
}

/// Shared body of the binary/general/semi-continuous processors: every
/// token in the range must be a variable reference.
fn mark_variables(
    tokens: &[Spanned<Token>],
    section: &'static str,
    pool: &mut VariablePool,
    filename: &str,
    mark: impl Fn(&mut Variable),
) -> Result<(), LpError> {
    for t in tokens {
        match &t.token {
            Token::Var(name) => {
                let id = pool.resolve(name);
                mark(pool.get_mut(id));
            }
            other => {
                return Err(LpError::UnknownToken {
                    file: filename.to_owned(),
                    line: t.line,
                    message: format!(
                        "expected variable name in '{}' section, got {:?}",
                        section, other
                    ),
                });
            }
        }
    }
    Ok(())
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
