//! crates/result_admin_core/src/grade.rs
//!
//! Letter grades, grade points and the credit-weighted average used for CGPA.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grades in ascending order, so `Ord` follows academic standing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    F,
    D,
    C,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "B-")]
    BMinus,
    B,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "A-")]
    AMinus,
    A,
    #[serde(rename = "A+")]
    APlus,
}

/// Lower mark bound of each passing grade, scanned from the top.
const THRESHOLDS: [(f64, Grade); 9] = [
    (80.0, Grade::APlus),
    (75.0, Grade::A),
    (70.0, Grade::AMinus),
    (65.0, Grade::BPlus),
    (60.0, Grade::B),
    (55.0, Grade::BMinus),
    (50.0, Grade::CPlus),
    (45.0, Grade::C),
    (40.0, Grade::D),
];

impl Grade {
    pub const ALL: [Grade; 10] = [
        Grade::APlus,
        Grade::A,
        Grade::AMinus,
        Grade::BPlus,
        Grade::B,
        Grade::BMinus,
        Grade::CPlus,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized grade `{0}`")]
pub struct UnknownGrade(pub String);

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Grade::ALL
            .into_iter()
            .find(|g| g.as_str() == s.trim())
            .ok_or_else(|| UnknownGrade(s.to_string()))
    }
}

/// Maps any mark to a grade. Out-of-range marks are not rejected.
pub fn grade_for(mark: f64) -> Grade {
    THRESHOLDS
        .iter()
        .find(|(min, _)| mark >= *min)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}

pub fn grade_point_for(grade: Grade) -> f64 {
    match grade {
        Grade::APlus => 4.00,
        Grade::A => 3.75,
        Grade::AMinus => 3.50,
        Grade::BPlus => 3.25,
        Grade::B => 3.00,
        Grade::BMinus => 2.75,
        Grade::CPlus => 2.50,
        Grade::C => 2.25,
        Grade::D => 2.00,
        Grade::F => 0.00,
    }
}

/// Grade point for a letter stored as text; anything unrecognized is worth 0.
pub fn grade_point_for_label(label: &str) -> f64 {
    label.parse::<Grade>().map(grade_point_for).unwrap_or(0.0)
}

/// One course's contribution to an average.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedGradePoint {
    pub grade_point: f64,
    pub credit: f64,
}

/// Unrounded credit-weighted mean. Keep `value` for chained computation and
/// use [`GradeAverage::rounded`] for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeAverage {
    pub value: f64,
    pub total_credit: f64,
}

impl GradeAverage {
    pub fn rounded(&self) -> f64 {
        (self.value * 100.0).round() / 100.0
    }
}

impl fmt::Display for GradeAverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.rounded())
    }
}

pub fn average_grade_point(results: &[WeightedGradePoint]) -> GradeAverage {
    let total_credit: f64 = results.iter().map(|r| r.credit).sum();
    if results.is_empty() || total_credit <= 0.0 {
        return GradeAverage {
            value: 0.0,
            total_credit: 0.0,
        };
    }
    let weighted: f64 = results.iter().map(|r| r.grade_point * r.credit).sum();
    GradeAverage {
        value: weighted / total_credit,
        total_credit,
    }
}
