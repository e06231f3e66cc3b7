//! Binary decision variables.

/// Index of a variable within a [`BinaryModel`](super::BinaryModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// A 0/1 decision variable.
///
/// May be fixed to a single value, which the solver treats as a
/// variable bound rather than a constraint.
#[derive(Debug, Clone)]
pub struct BinaryVar {
    /// Variable name (diagnostics only; identity is the [`VarId`]).
    pub name: String,
    /// Fixed value, if any.
    pub fixed: Option<bool>,
}

impl BinaryVar {
    /// Creates a free binary variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed: None,
        }
    }

    /// Creates a variable fixed to `value`.
    pub fn fixed(name: impl Into<String>, value: bool) -> Self {
        Self {
            name: name.into(),
            fixed: Some(value),
        }
    }

    /// Whether this variable is fixed to a single value.
    pub fn is_fixed(&self) -> bool {
        self.fixed.is_some()
    }

    /// Values the variable may take, in ascending order.
    pub fn domain(&self) -> &'static [bool] {
        match self.fixed {
            Some(false) => &[false],
            Some(true) => &[true],
            None => &[false, true],
        }
    }
}
