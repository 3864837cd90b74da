//! lpread-core: LP-format model reader.
//!
//! Reads the LP text format describing a linear/quadratic optimization
//! problem (objective, constraints, variable bounds, integrality and
//! semicontinuity markers, special-ordered-set constraints) and produces a
//! normalized in-memory [`Model`] ready to be handed to a solving engine.
//!
//! # Public API
//!
//! Key entry points and types are re-exported at the crate root:
//!
//! - [`read_model()`] -- parse a file from disk
//! - [`parse_reader()`] -- parse any line-readable byte source
//! - [`parse_str()`] -- parse in-memory text
//! - [`Model`], [`Variable`], [`Constraint`], [`Expression`], [`Sos`] --
//!   the parse result
//! - [`LpError`] -- the single fatal error type
//!
//! The pipeline stages (lexer, classifier, section splitter, section
//! processors) are exposed as modules for selective use and testing.

pub mod classify;
pub mod error;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod read;
pub mod sections;

// ── Convenience re-exports: key types ────────────────────────────────

pub use error::LpError;
pub use model::{
    Constraint, Expression, LinearTerm, Model, QuadraticTerm, Sense, Sos, SosEntry, VarId,
    Variable, VariableKind,
};
pub use sections::SectionKeyword;

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use read::{parse_reader, parse_str, read_model};
