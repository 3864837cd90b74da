//! The parse result: an immutable optimization model, plus the variable
//! arena used to build it.
//!
//! Terms reference variables through [`VarId`] handles into a single owned
//! arena, so the model carries no shared references and no lifetimes.

use std::collections::HashMap;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableKind {
    #[default]
    Continuous,
    Binary,
    General,
    SemiContinuous,
    SemiInteger,
}

/// Handle to a variable in the model's arena. Stable across the whole
/// parse; also the variable's position in [`Model::variables`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct VarId(pub usize);

#[derive(Debug, Clone, Serialize)]
pub struct Variable {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    pub kind: VariableKind,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct LinearTerm {
    pub coef: f64,
    pub var: VarId,
}

/// `var1 == var2` denotes a squared term.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct QuadraticTerm {
    pub coef: f64,
    pub var1: VarId,
    pub var2: VarId,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Expression {
    pub name: Option<String>,
    pub offset: f64,
    pub linear: Vec<LinearTerm>,
    pub quadratic: Vec<QuadraticTerm>,
}

/// Row bounds: `lower` and `upper` are independently infinite by default;
/// an equality sets both to the same finite value.
#[derive(Debug, Clone, Serialize)]
pub struct Constraint {
    pub expr: Expression,
    pub lower: f64,
    pub upper: f64,
}

impl Constraint {
    pub fn new(expr: Expression) -> Self {
        Constraint {
            expr,
            lower: f64::NEG_INFINITY,
            upper: f64::INFINITY,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SosEntry {
    pub var: VarId,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Sos {
    pub name: String,
    /// 1: at most one entry nonzero; 2: at most two, adjacent in order
    pub kind: u8,
    pub entries: Vec<SosEntry>,
}

/// The pipeline's sole output. Constraints and SOS constraints are in file
/// order; variables are in first-reference order.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    pub sense: Sense,
    pub objective: Expression,
    pub constraints: Vec<Constraint>,
    pub variables: Vec<Variable>,
    pub sos: Vec<Sos>,
}

impl Model {
    pub fn variable(&self, id: VarId) -> &Variable {
        &self.variables[id.0]
    }
}

// ──────────────────────────────────────────────
// Variable arena
// ──────────────────────────────────────────────

/// Symbol table for variables: deduplicates by name, preserving
/// first-reference order.
#[derive(Debug, Default)]
pub struct VariablePool {
    vars: Vec<Variable>,
    by_name: HashMap<String, VarId>,
}

impl VariablePool {
    /// Return the variable registered under `name`, creating it on first
    /// lookup with default bounds `[0, +inf)` and continuous kind.
    pub fn resolve(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.by_name.get(name) {
            return id;
        }
        let id = VarId(self.vars.len());
        self.vars.push(Variable {
            name: name.to_owned(),
            lower: 0.0,
            upper: f64::INFINITY,
            kind: VariableKind::Continuous,
        });
        self.by_name.insert(name.to_owned(), id);
        id
    }

    pub fn get_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.vars[id.0]
    }

    /// Freeze the arena into the model's variable list.
    pub fn into_variables(self) -> Vec<Variable> {
        self.vars
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_registers_once_per_name() {
        let mut pool = VariablePool::default();
        let a = pool.resolve("x1");
        let b = pool.resolve("x2");
        let c = pool.resolve("x1");
        assert_eq!(a, c);
        assert_ne!(a, b);

        let vars = pool.into_variables();
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "x1");
        assert_eq!(vars[1].name, "x2");
    }

    #[test]
    fn new_variables_have_default_bounds_and_kind() {
        let mut pool = VariablePool::default();
        let id = pool.resolve("x");
        let vars = pool.into_variables();
        assert_eq!(vars[id.0].lower, 0.0);
        assert_eq!(vars[id.0].upper, f64::INFINITY);
        assert_eq!(vars[id.0].kind, VariableKind::Continuous);
    }
}
