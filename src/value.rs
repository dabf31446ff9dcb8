use crate::ast::Expr;
use crate::error::EvalError;
use crate::formatter::join_ranks;

/// A per-rank quantity: one number for every rank, or one number per rank.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(f64),
    Vector(Vec<f64>),
}

impl Value {
    /// True for `0` and for a non-empty vector of zeros.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Scalar(x) => *x == 0.0,
            Value::Vector(v) => !v.is_empty() && v.iter().all(|x| *x == 0.0),
        }
    }

    /// Every entry lies strictly between 0 and 1.
    pub fn is_fraction(&self) -> bool {
        let inside = |x: &f64| *x > 0.0 && *x < 1.0;
        match self {
            Value::Scalar(x) => inside(x),
            Value::Vector(v) => !v.is_empty() && v.iter().all(inside),
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        match self {
            Value::Scalar(x) => std::slice::from_ref(x),
            Value::Vector(v) => v,
        }
    }

    pub fn map(&self, f: impl Fn(f64) -> f64) -> Value {
        match self {
            Value::Scalar(x) => Value::Scalar(f(*x)),
            Value::Vector(v) => Value::Vector(v.iter().map(|x| f(*x)).collect()),
        }
    }

    /// Apply a parsed formula element-wise. Division by zero propagates
    /// NaN/Infinity.
    pub fn apply_formula(&self, expr: &Expr) -> Value {
        match expr {
            Expr::Variable(_) => self.clone(),
            Expr::Formula { .. } => self.map(|x| expr.apply_to(x)),
        }
    }

    /// Multiply by 100 without rounding; the formatter trims later.
    pub fn scale_by_100(&self) -> Value {
        self.map(|x| x * 100.0)
    }

    pub fn add(&self, other: &Value) -> Result<Value, EvalError> {
        binary_op(self, other, |x, y| x + y)
    }

    pub fn mul(&self, other: &Value) -> Result<Value, EvalError> {
        binary_op(self, other, |x, y| x * y)
    }

    /// Tooltip text: `"275"` or `"4/8/12"`, collapsed when every entry
    /// formats the same.
    pub fn to_tooltip_string(&self) -> String {
        join_ranks(self.as_slice())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Scalar(x)
    }
}

/// Element-wise operation with scalar broadcasting.
fn binary_op(a: &Value, b: &Value, op: impl Fn(f64, f64) -> f64) -> Result<Value, EvalError> {
    match (a, b) {
        (Value::Scalar(x), Value::Scalar(y)) => Ok(Value::Scalar(op(*x, *y))),
        (Value::Vector(v), Value::Scalar(y)) => Ok(Value::Vector(v.iter().map(|x| op(*x, *y)).collect())),
        (Value::Scalar(x), Value::Vector(w)) => Ok(Value::Vector(w.iter().map(|y| op(*x, *y)).collect())),
        (Value::Vector(v), Value::Vector(w)) => {
            if v.len() != w.len() {
                return Err(EvalError::VectorLengthMismatch {
                    left: v.len(),
                    right: w.len(),
                });
            }
            Ok(Value::Vector(
                v.iter().zip(w).map(|(x, y)| op(*x, *y)).collect(),
            ))
        }
    }
}
