//! The two algorithm families and their fixed experiment grids.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::search::{Combination, SearchSpace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmFamily {
    /// Genetic algorithm: population size, crossover rate and operator,
    /// mutation operator and rate.
    Genetic,
    /// GRASP local search: alpha and neighborhood size.
    Grasp,
}

impl AlgorithmFamily {
    pub fn search_space(&self) -> SearchSpace {
        match self {
            Self::Genetic => SearchSpace::new()
                .add_ints("tam_pop", &[200, 400, 800])
                .add_floats("taxa_cruz", &[0.95, 0.99])
                .add_ints("operador_cruz", &[0, 1])
                .add_ints("operador_mut", &[0, 1])
                .add_floats("taxa_mut", &[0.005, 0.010]),
            Self::Grasp => SearchSpace::new()
                .add_floats("alfa", &[0.3, 0.5, 0.7])
                .add_ints("num_vizinhos", &[15, 30, 60]),
        }
    }

    /// Leading token identifying the algorithm to the optimizer, if any.
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Genetic => Some("ag"),
            // The GRASP queue has always been written without a tag.
            Self::Grasp => None,
        }
    }

    /// Work-queue line for one combination:
    /// `[tag ]<index>-<label> <value> <value> ...`.
    pub fn encode(&self, combination: &Combination) -> String {
        let body = format!("{} {}", combination.identifier(), combination.arguments());
        match self.tag() {
            Some(tag) => format!("{tag} {body}"),
            None => body,
        }
    }
}

impl fmt::Display for AlgorithmFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genetic => write!(f, "genetic"),
            Self::Grasp => write!(f, "grasp"),
        }
    }
}
