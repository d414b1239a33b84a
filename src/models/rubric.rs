//! Grading rubrics: a grid of criteria against scoring levels.
//!
//! A rubric is stored denormalized: the criteria and levels define the axes,
//! and `cells` holds one entry per (criterion, level) pair with descriptive
//! text for graders. [`Rubric::build_cells`] materializes the full grid from
//! the axes plus any author-provided cell text.

use serde::{Deserialize, Serialize};

use super::audit::AuditInfo;
use crate::define_id_type;

define_id_type!(i64, RubricId);

/// One grading dimension, weighted as a percentage of the total score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    pub name: String,
    pub weight_pct: i32,
}

/// One scoring band (e.g. "Exemplary", "Developing") worth `points`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringLevel {
    pub name: String,
    pub points: i32,
}

/// Descriptive text for one (criterion, level) intersection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCell {
    pub criterion_index: usize,
    pub level_index: usize,
    pub description: String,
}

/// A complete grading rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rubric {
    pub id: Option<RubricId>,
    pub title: String,
    pub criteria: Vec<RubricCriterion>,
    pub levels: Vec<ScoringLevel>,
    pub cells: Vec<RubricCell>,
    pub audit: AuditInfo,
}

impl Rubric {
    /// Build the full criteria x levels grid.
    ///
    /// Cells present in `provided` (matched by index pair) keep their text;
    /// every other intersection gets a placeholder naming the criterion and
    /// level so graders can see which descriptions still need authoring.
    /// Provided cells pointing outside the grid are dropped.
    pub fn build_cells(
        criteria: &[RubricCriterion],
        levels: &[ScoringLevel],
        provided: &[RubricCell],
    ) -> Vec<RubricCell> {
        let mut cells = Vec::with_capacity(criteria.len() * levels.len());

        for (ci, criterion) in criteria.iter().enumerate() {
            for (li, level) in levels.iter().enumerate() {
                let description = provided
                    .iter()
                    .find(|c| c.criterion_index == ci && c.level_index == li)
                    .map(|c| c.description.clone())
                    .unwrap_or_else(|| format!("{} at level '{}'", criterion.name, level.name));

                cells.push(RubricCell {
                    criterion_index: ci,
                    level_index: li,
                    description,
                });
            }
        }

        cells
    }

    /// Sum of criterion weights. A valid rubric sums to 100.
    pub fn total_weight_pct(&self) -> i32 {
        self.criteria.iter().map(|c| c.weight_pct).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axes() -> (Vec<RubricCriterion>, Vec<ScoringLevel>) {
        let criteria = vec![
            RubricCriterion {
                name: "Clarity".to_string(),
                weight_pct: 40,
            },
            RubricCriterion {
                name: "Accuracy".to_string(),
                weight_pct: 60,
            },
        ];
        let levels = vec![
            ScoringLevel {
                name: "Exemplary".to_string(),
                points: 4,
            },
            ScoringLevel {
                name: "Proficient".to_string(),
                points: 3,
            },
            ScoringLevel {
                name: "Developing".to_string(),
                points: 1,
            },
        ];
        (criteria, levels)
    }

    #[test]
    fn test_matrix_is_full_cross_product() {
        let (criteria, levels) = axes();
        let cells = Rubric::build_cells(&criteria, &levels, &[]);

        assert_eq!(cells.len(), criteria.len() * levels.len());
        for ci in 0..criteria.len() {
            for li in 0..levels.len() {
                assert!(cells
                    .iter()
                    .any(|c| c.criterion_index == ci && c.level_index == li));
            }
        }
    }

    #[test]
    fn test_provided_text_wins_over_placeholder() {
        let (criteria, levels) = axes();
        let provided = vec![RubricCell {
            criterion_index: 1,
            level_index: 0,
            description: "All claims are sourced.".to_string(),
        }];

        let cells = Rubric::build_cells(&criteria, &levels, &provided);
        let cell = cells
            .iter()
            .find(|c| c.criterion_index == 1 && c.level_index == 0)
            .unwrap();
        assert_eq!(cell.description, "All claims are sourced.");

        // Untouched cells get the generated placeholder.
        let other = cells
            .iter()
            .find(|c| c.criterion_index == 0 && c.level_index == 2)
            .unwrap();
        assert_eq!(other.description, "Clarity at level 'Developing'");
    }

    #[test]
    fn test_out_of_range_provided_cells_are_dropped() {
        let (criteria, levels) = axes();
        let provided = vec![RubricCell {
            criterion_index: 9,
            level_index: 9,
            description: "dangling".to_string(),
        }];

        let cells = Rubric::build_cells(&criteria, &levels, &provided);
        assert_eq!(cells.len(), 6);
        assert!(!cells.iter().any(|c| c.description == "dangling"));
    }
}
