//! Composable query filters built from request parameters.
//!
//! Each filter is a plain struct of optional predicates. The local backend
//! applies them in memory through the `matches` methods; the Postgres
//! backend translates the same fields into boxed Diesel predicates. Absent
//! fields never constrain a query.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Course, CourseId, Enrollment, EnrollmentStatus, LifecycleStatus, TrainingProgram};

/// Dynamic filter over the course catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseFilter {
    pub status: Option<LifecycleStatus>,
    pub category: Option<String>,
    /// Case-insensitive substring match on title or code.
    pub q: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl CourseFilter {
    /// True when no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.category.is_none()
            && self.q.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// In-memory evaluation of the filter against a course.
    pub fn matches(&self, course: &Course) -> bool {
        if let Some(status) = self.status {
            if course.status != status {
                return false;
            }
        }
        if let Some(ref category) = self.category {
            if !course.category.eq_ignore_ascii_case(category) {
                return false;
            }
        }
        if let Some(ref q) = self.q {
            let needle = q.to_lowercase();
            let title_hit = course.title.to_lowercase().contains(&needle);
            let code_hit = course.code.to_lowercase().contains(&needle);
            if !title_hit && !code_hit {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if course.price < min {
                return false;
            }
        }
        if let Some(max) = self.max_price {
            if course.price > max {
                return false;
            }
        }
        true
    }
}

/// Dynamic filter over enrollments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnrollmentFilter {
    pub course_id: Option<CourseId>,
    pub learner_id: Option<String>,
    pub status: Option<EnrollmentStatus>,
}

impl EnrollmentFilter {
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        if let Some(course_id) = self.course_id {
            if enrollment.course_id != course_id {
                return false;
            }
        }
        if let Some(ref learner_id) = self.learner_id {
            if &enrollment.learner_id != learner_id {
                return false;
            }
        }
        if let Some(status) = self.status {
            if enrollment.status != status {
                return false;
            }
        }
        true
    }
}

/// Dynamic filter over training programs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgramFilter {
    pub status: Option<LifecycleStatus>,
    /// Case-insensitive substring match on title or code.
    pub q: Option<String>,
}

impl ProgramFilter {
    pub fn matches(&self, program: &TrainingProgram) -> bool {
        if let Some(status) = self.status {
            if program.status != status {
                return false;
            }
        }
        if let Some(ref q) = self.q {
            let needle = q.to_lowercase();
            let title_hit = program.title.to_lowercase().contains(&needle);
            let code_hit = program.code.to_lowercase().contains(&needle);
            if !title_hit && !code_hit {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AuditInfo;
    use rust_decimal::Decimal;

    fn course(title: &str, code: &str, category: &str, price: i64) -> Course {
        Course {
            id: None,
            code: code.to_string(),
            title: title.to_string(),
            description: String::new(),
            category: category.to_string(),
            price: Decimal::new(price, 2),
            passing_score_pct: 60,
            status: LifecycleStatus::Published,
            audit: AuditInfo::new("tester"),
        }
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CourseFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&course("Intro to Rust", "RS-101", "programming", 4900)));
    }

    #[test]
    fn test_text_search_hits_title_and_code() {
        let c = course("Intro to Rust", "RS-101", "programming", 4900);

        let by_title = CourseFilter {
            q: Some("rust".to_string()),
            ..Default::default()
        };
        assert!(by_title.matches(&c));

        let by_code = CourseFilter {
            q: Some("rs-1".to_string()),
            ..Default::default()
        };
        assert!(by_code.matches(&c));

        let miss = CourseFilter {
            q: Some("haskell".to_string()),
            ..Default::default()
        };
        assert!(!miss.matches(&c));
    }

    #[test]
    fn test_price_bounds_are_inclusive() {
        let c = course("Intro to Rust", "RS-101", "programming", 4900);

        let filter = CourseFilter {
            min_price: Some(Decimal::new(4900, 2)),
            max_price: Some(Decimal::new(4900, 2)),
            ..Default::default()
        };
        assert!(filter.matches(&c));

        let too_low = CourseFilter {
            max_price: Some(Decimal::new(4899, 2)),
            ..Default::default()
        };
        assert!(!too_low.matches(&c));
    }

    #[test]
    fn test_category_is_case_insensitive() {
        let c = course("Intro to Rust", "RS-101", "Programming", 4900);
        let filter = CourseFilter {
            category: Some("programming".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&c));
    }
}
