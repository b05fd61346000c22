//! crates/result_admin_core/src/domain.rs
//!
//! Records returned by the result-management backend and the payloads sent
//! back to it. Reference fields are either populated sub-objects or absent;
//! a bare identifier the backend failed to populate is treated as absent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display text for a reference that did not resolve.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Deserializes a reference field, keeping only populated objects.
pub mod populated {
    use serde::de::{DeserializeOwned, Error};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Option::<Value>::deserialize(deserializer)? {
            Some(value @ Value::Object(_)) => serde_json::from_value(value)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }
}

//=========================================================================================
// Populated Reference Shapes
//=========================================================================================

/// Departments, academic sessions, committees and semesters all populate as `{_id, name}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub credit: Option<f64>,
}

impl CourseRef {
    pub fn label(&self) -> String {
        match (self.code.is_empty(), self.title.is_empty()) {
            (false, false) => format!("{} - {}", self.code, self.title),
            (false, true) => self.code.clone(),
            _ => self.title.clone(),
        }
    }
}

/// A populated student, teacher or external teacher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRef {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
}

/// Renders an optional populated reference, falling back to [`NOT_SPECIFIED`].
pub fn display_or_unspecified<T>(value: Option<&T>, render: impl Fn(&T) -> String) -> String {
    value
        .map(render)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

/// Renders an optional scalar attribute the same way as a missing reference.
pub fn optional_text(value: Option<&String>) -> String {
    display_or_unspecified(value, |s| s.clone())
}

//=========================================================================================
// Managed Entities
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub department: Option<NamedRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub session: Option<NamedRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub department: Option<NamedRef>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTeacher {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub designation: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Committee {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub department: Option<NamedRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub session: Option<NamedRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub chairman: Option<PersonRef>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Which collection an examiner reference points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ExaminerKind {
    #[default]
    Teacher,
    ExternalTeacher,
}

impl fmt::Display for ExaminerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExaminerKind::Teacher => write!(f, "Internal"),
            ExaminerKind::ExternalTeacher => write!(f, "External"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub course: Option<CourseRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub committee: Option<NamedRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub semester: Option<NamedRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub first_examiner: Option<PersonRef>,
    #[serde(default)]
    pub first_examiner_type: ExaminerKind,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub second_examiner: Option<PersonRef>,
    #[serde(default)]
    pub second_examiner_type: ExaminerKind,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Lifecycle of an improvement exam. Values outside the closed set are kept
/// verbatim in `Invalid` so they surface as a display error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ImprovementStatus {
    Pending,
    InProgress,
    Completed,
    Invalid(String),
}

impl ImprovementStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ImprovementStatus::Pending => "pending",
            ImprovementStatus::InProgress => "in_progress",
            ImprovementStatus::Completed => "completed",
            ImprovementStatus::Invalid(raw) => raw,
        }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, ImprovementStatus::Invalid(_))
    }
}

impl From<String> for ImprovementStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "pending" => ImprovementStatus::Pending,
            "in_progress" => ImprovementStatus::InProgress,
            "completed" => ImprovementStatus::Completed,
            _ => ImprovementStatus::Invalid(raw),
        }
    }
}

impl From<ImprovementStatus> for String {
    fn from(status: ImprovementStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for ImprovementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImprovementStatus::Pending => write!(f, "Pending"),
            ImprovementStatus::InProgress => write!(f, "In progress"),
            ImprovementStatus::Completed => write!(f, "Completed"),
            ImprovementStatus::Invalid(raw) => write!(f, "Invalid status ({})", raw),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementExam {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub student: Option<PersonRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub course: Option<CourseRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub session: Option<NamedRef>,
    pub status: ImprovementStatus,
    #[serde(default)]
    pub mark: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// A graded course result, the input to exam monitoring and transcripts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResult {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub student: Option<PersonRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub course: Option<CourseRef>,
    #[serde(default, deserialize_with = "populated::deserialize")]
    pub session: Option<NamedRef>,
    pub mark: f64,
    /// Overrides the course credit when the backend records one per result.
    #[serde(default)]
    pub credit: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ExamResult {
    pub fn credit(&self) -> f64 {
        self.credit
            .or_else(|| self.course.as_ref().and_then(|c| c.credit))
            .unwrap_or(0.0)
    }
}

//=========================================================================================
// Create / Update Payloads
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub department: String,
    pub session: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherPayload {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub designation: String,
    pub department: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalTeacherPayload {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub designation: Option<String>,
    pub institution: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitteePayload {
    pub name: String,
    pub department: String,
    pub session: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chairman: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseAssignmentPayload {
    pub course: String,
    pub committee: String,
    pub semester: String,
    pub first_examiner: String,
    #[serde(default)]
    pub first_examiner_type: ExaminerKind,
    pub second_examiner: String,
    #[serde(default)]
    pub second_examiner_type: ExaminerKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementExamPayload {
    pub student: String,
    pub course: String,
    pub session: String,
    pub status: ImprovementStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mark: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamResultPayload {
    pub student: String,
    pub course: String,
    pub session: String,
    pub mark: f64,
}

//=========================================================================================
// Session Identity
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
}

/// The persisted credential plus the minimal identity read at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    pub user: UserIdentity,
}
