//! crates/result_admin_core/src/report.rs
//!
//! Exam monitoring reports built on the grade engine.

use std::collections::BTreeMap;

use crate::domain::{display_or_unspecified, ExamResult};
use crate::grade::{average_grade_point, grade_for, grade_point_for, Grade, GradeAverage, WeightedGradePoint};

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptRow {
    pub course: String,
    pub mark: f64,
    pub grade: Grade,
    pub grade_point: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub rows: Vec<TranscriptRow>,
    pub average: GradeAverage,
}

pub fn transcript(results: &[ExamResult]) -> Transcript {
    let rows: Vec<TranscriptRow> = results
        .iter()
        .map(|r| {
            let grade = grade_for(r.mark);
            TranscriptRow {
                course: display_or_unspecified(r.course.as_ref(), |c| c.label()),
                mark: r.mark,
                grade,
                grade_point: grade_point_for(grade),
                credit: r.credit(),
            }
        })
        .collect();

    let weighted: Vec<WeightedGradePoint> = rows
        .iter()
        .map(|row| WeightedGradePoint {
            grade_point: row.grade_point,
            credit: row.credit,
        })
        .collect();

    Transcript {
        average: average_grade_point(&weighted),
        rows,
    }
}

/// Number of results per grade, best grade first. Grades with no results are omitted.
pub fn grade_distribution(results: &[ExamResult]) -> Vec<(Grade, usize)> {
    let mut counts: BTreeMap<Grade, usize> = BTreeMap::new();
    for r in results {
        *counts.entry(grade_for(r.mark)).or_insert(0) += 1;
    }
    counts.into_iter().rev().collect()
}
