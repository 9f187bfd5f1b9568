//! Search space definitions and exhaustive grid enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A concrete parameter value on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Int(i64),
    Float(f64),
}

impl fmt::Display for ParameterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => {
                // Keep a decimal point on integral floats so `1.0` never reads as an int.
                let text = v.to_string();
                if text.contains(['.', 'e', 'i', 'N']) {
                    f.write_str(&text)
                } else {
                    write!(f, "{text}.0")
                }
            }
        }
    }
}

/// A single parameter axis: a name and its discrete values in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDef {
    /// Parameter name as the optimizer knows it (e.g. "tam_pop").
    pub name: String,
    pub values: Vec<ParameterValue>,
}

/// The full search space: an ordered list of axes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchSpace {
    pub parameters: Vec<ParameterDef>,
}

impl SearchSpace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ints(mut self, name: impl Into<String>, values: &[i64]) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            values: values.iter().copied().map(ParameterValue::Int).collect(),
        });
        self
    }

    pub fn add_floats(mut self, name: impl Into<String>, values: &[f64]) -> Self {
        self.parameters.push(ParameterDef {
            name: name.into(),
            values: values.iter().copied().map(ParameterValue::Float).collect(),
        });
        self
    }

    /// Total number of grid points, `None` on overflow.
    pub fn grid_size(&self) -> Option<usize> {
        self.parameters
            .iter()
            .try_fold(1usize, |total, param| total.checked_mul(param.values.len()))
    }

    /// Cartesian product of all axes. The first axis varies slowest and the
    /// last axis fastest; combinations are indexed in that order.
    pub fn enumerate(&self) -> Vec<Combination> {
        let mut rows: Vec<Vec<ParameterValue>> = vec![Vec::new()];
        for param in &self.parameters {
            let mut next = Vec::with_capacity(rows.len() * param.values.len());
            for existing in &rows {
                for value in &param.values {
                    let mut row = existing.clone();
                    row.push(*value);
                    next.push(row);
                }
            }
            rows = next;
        }

        rows.into_iter()
            .enumerate()
            .map(|(index, values)| Combination { index, values })
            .collect()
    }
}

/// One point of the grid, tagged with its enumeration ordinal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combination {
    pub index: usize,
    pub values: Vec<ParameterValue>,
}

impl Combination {
    /// Values joined with dots, e.g. `200.0.95.0.1.0.005`.
    pub fn label(&self) -> String {
        self.joined(".")
    }

    /// Ordinal and label, unique within one generation run.
    pub fn identifier(&self) -> String {
        format!("{}-{}", self.index, self.label())
    }

    /// Values joined with single spaces, as the optimizer parses them.
    pub fn arguments(&self) -> String {
        self.joined(" ")
    }

    fn joined(&self, sep: &str) -> String {
        self.values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(sep)
    }
}
