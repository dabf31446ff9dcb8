//! Intermediate representation produced by the placeholder parser.

/// A binary operator allowed inside a placeholder formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Mul,
    Add,
    Sub,
    Div,
}

impl Operator {
    pub fn from_char(ch: char) -> Option<Operator> {
        match ch {
            '*' => Some(Operator::Mul),
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// Apply the operator to a single number. Division is unguarded.
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Mul => lhs * rhs,
            Operator::Add => lhs + rhs,
            Operator::Sub => lhs - rhs,
            Operator::Div => lhs / rhs,
        }
    }
}

/// A parsed `{{ ... }}` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// `name`
    Variable(String),
    /// `name <op> number`, e.g. `armorshredpercent*100`
    Formula {
        name: String,
        op: Operator,
        operand: f64,
    },
}

impl Expr {
    /// The referenced variable name, with or without a formula.
    pub fn name(&self) -> &str {
        match self {
            Expr::Variable(name) => name,
            Expr::Formula { name, .. } => name,
        }
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Expr::Formula { .. })
    }

    /// Apply the formula part (if any) to a single number.
    pub fn apply_to(&self, x: f64) -> f64 {
        match self {
            Expr::Variable(_) => x,
            Expr::Formula { op, operand, .. } => op.apply(x, *operand),
        }
    }
}

/// A placeholder after the precision suffix has been split off:
/// `rcooldownreduction.0*100` → expr `rcooldownreduction*100`, precision 0.
#[derive(Debug, Clone, PartialEq)]
pub struct Placeholder {
    pub expr: Expr,
    pub precision: Option<usize>,
}
