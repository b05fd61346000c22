//! crates/result_admin_core/src/screens.rs
//!
//! One `Screen` per management page of the admin front-end.

use crate::domain::{
    display_or_unspecified, optional_text, Committee, CommitteePayload, CourseAssignment,
    CourseAssignmentPayload, ExamResult, ExamResultPayload, ExaminerKind, ExternalTeacher,
    ExternalTeacherPayload, ImprovementExam, ImprovementExamPayload, PersonRef, Student,
    StudentPayload, Teacher, TeacherPayload, NOT_SPECIFIED,
};
use crate::filter::{Comparison, FieldValue, FilterField, Filterable};
use crate::grade::grade_for;
use crate::reference::ReferenceKind;
use crate::screen::{format_timestamp, DetailRow, Record, Screen};

fn text(value: &str) -> Option<FieldValue> {
    Some(FieldValue::Text(value.to_string()))
}

fn opt_text(value: Option<&String>) -> Option<FieldValue> {
    value.map(|v| FieldValue::Text(v.clone()))
}

fn name_of<T>(value: Option<&T>, name: impl Fn(&T) -> &String) -> String {
    display_or_unspecified(value, |v| name(v).clone())
}

//=========================================================================================
// Students
//=========================================================================================

impl Filterable for Student {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "registrationNumber" => opt_text(self.registration_number.as_ref()),
            "phone" => opt_text(self.phone.as_ref()),
            _ => None,
        }
    }
}

impl Record for Student {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct StudentScreen;

impl Screen for StudentScreen {
    type Record = Student;
    type Payload = StudentPayload;

    const TITLE: &'static str = "Students";
    const PATH: &'static str = "/students";
    const COLLECTION_KEY: &'static str = "students";
    const ITEM_KEY: &'static str = "student";
    const CREDENTIAL_KEY: Option<&'static str> = Some("initialPassword");
    const FILTERS: &'static [FilterField] = &[
        FilterField::client(
            "query",
            "Search",
            Comparison::Contains,
            &["name", "email", "registrationNumber"],
        ),
        FilterField::server("department", "Department"),
        FilterField::server("session", "Session"),
    ];
    const REFERENCES: &'static [ReferenceKind] =
        &[ReferenceKind::Departments, ReferenceKind::Sessions];
    const HEADERS: &'static [&'static str] =
        &["Registration", "Name", "Email", "Department", "Session"];

    fn cells(s: &Student) -> Vec<String> {
        vec![
            optional_text(s.registration_number.as_ref()),
            s.name.clone(),
            s.email.clone(),
            name_of(s.department.as_ref(), |d| &d.name),
            name_of(s.session.as_ref(), |d| &d.name),
        ]
    }

    fn detail(s: &Student) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Name", s.name.clone()),
            DetailRow::new("Registration number", optional_text(s.registration_number.as_ref())),
            DetailRow::new("Email", s.email.clone()),
            DetailRow::new("Phone", optional_text(s.phone.as_ref())),
            DetailRow::new("Department", name_of(s.department.as_ref(), |d| &d.name)),
            DetailRow::new("Session", name_of(s.session.as_ref(), |d| &d.name)),
            DetailRow::new("Created", format_timestamp(s.created_at.as_ref())),
            DetailRow::new("Updated", format_timestamp(s.updated_at.as_ref())),
        ]
    }
}

//=========================================================================================
// Teachers
//=========================================================================================

impl Filterable for Teacher {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "phone" => opt_text(self.phone.as_ref()),
            "designation" => opt_text(self.designation.as_ref()),
            _ => None,
        }
    }
}

impl Record for Teacher {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct TeacherScreen;

impl Screen for TeacherScreen {
    type Record = Teacher;
    type Payload = TeacherPayload;

    const TITLE: &'static str = "Teachers";
    const PATH: &'static str = "/teachers";
    const COLLECTION_KEY: &'static str = "teachers";
    const ITEM_KEY: &'static str = "teacher";
    const CREDENTIAL_KEY: Option<&'static str> = Some("initialPassword");
    const FILTERS: &'static [FilterField] = &[
        FilterField::client("query", "Search", Comparison::Contains, &["name", "email", "phone"]),
        FilterField::server("department", "Department"),
        FilterField::client("designation", "Designation", Comparison::Equals, &["designation"]),
    ];
    const REFERENCES: &'static [ReferenceKind] = &[ReferenceKind::Departments];
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Designation", "Department"];

    fn cells(t: &Teacher) -> Vec<String> {
        vec![
            t.name.clone(),
            t.email.clone(),
            optional_text(t.designation.as_ref()),
            name_of(t.department.as_ref(), |d| &d.name),
        ]
    }

    fn detail(t: &Teacher) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Name", t.name.clone()),
            DetailRow::new("Email", t.email.clone()),
            DetailRow::new("Phone", optional_text(t.phone.as_ref())),
            DetailRow::new("Designation", optional_text(t.designation.as_ref())),
            DetailRow::new("Department", name_of(t.department.as_ref(), |d| &d.name)),
            DetailRow::new("Created", format_timestamp(t.created_at.as_ref())),
            DetailRow::new("Updated", format_timestamp(t.updated_at.as_ref())),
        ]
    }
}

//=========================================================================================
// External Teachers
//=========================================================================================

impl Filterable for ExternalTeacher {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => text(&self.name),
            "email" => text(&self.email),
            "institution" => opt_text(self.institution.as_ref()),
            "designation" => opt_text(self.designation.as_ref()),
            _ => None,
        }
    }
}

impl Record for ExternalTeacher {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ExternalTeacherScreen;

impl Screen for ExternalTeacherScreen {
    type Record = ExternalTeacher;
    type Payload = ExternalTeacherPayload;

    const TITLE: &'static str = "External Teachers";
    const PATH: &'static str = "/external-teachers";
    const COLLECTION_KEY: &'static str = "externalTeachers";
    const ITEM_KEY: &'static str = "externalTeacher";
    const FILTERS: &'static [FilterField] = &[FilterField::client(
        "query",
        "Search",
        Comparison::Contains,
        &["name", "email", "institution"],
    )];
    const REFERENCES: &'static [ReferenceKind] = &[];
    const HEADERS: &'static [&'static str] = &["Name", "Email", "Designation", "Institution"];

    fn cells(t: &ExternalTeacher) -> Vec<String> {
        vec![
            t.name.clone(),
            t.email.clone(),
            optional_text(t.designation.as_ref()),
            optional_text(t.institution.as_ref()),
        ]
    }

    fn detail(t: &ExternalTeacher) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Name", t.name.clone()),
            DetailRow::new("Email", t.email.clone()),
            DetailRow::new("Phone", optional_text(t.phone.as_ref())),
            DetailRow::new("Designation", optional_text(t.designation.as_ref())),
            DetailRow::new("Institution", optional_text(t.institution.as_ref())),
            DetailRow::new("Created", format_timestamp(t.created_at.as_ref())),
        ]
    }
}

//=========================================================================================
// Exam Committees
//=========================================================================================

impl Filterable for Committee {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => text(&self.name),
            "chairman" => self.chairman.as_ref().and_then(|c| text(&c.name)),
            _ => None,
        }
    }
}

impl Record for Committee {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct CommitteeScreen;

impl Screen for CommitteeScreen {
    type Record = Committee;
    type Payload = CommitteePayload;

    const TITLE: &'static str = "Exam Committees";
    const PATH: &'static str = "/committees";
    const COLLECTION_KEY: &'static str = "committees";
    const ITEM_KEY: &'static str = "committee";
    const FILTERS: &'static [FilterField] = &[
        FilterField::client("query", "Search", Comparison::Contains, &["name", "chairman"]),
        FilterField::server("department", "Department"),
        FilterField::server("session", "Session"),
    ];
    const REFERENCES: &'static [ReferenceKind] = &[
        ReferenceKind::Departments,
        ReferenceKind::Sessions,
        ReferenceKind::Teachers,
    ];
    const HEADERS: &'static [&'static str] = &["Name", "Department", "Session", "Chairman"];

    fn cells(c: &Committee) -> Vec<String> {
        vec![
            c.name.clone(),
            name_of(c.department.as_ref(), |d| &d.name),
            name_of(c.session.as_ref(), |d| &d.name),
            name_of(c.chairman.as_ref(), |p| &p.name),
        ]
    }

    fn detail(c: &Committee) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Name", c.name.clone()),
            DetailRow::new("Department", name_of(c.department.as_ref(), |d| &d.name)),
            DetailRow::new("Session", name_of(c.session.as_ref(), |d| &d.name)),
            DetailRow::new("Chairman", name_of(c.chairman.as_ref(), |p| &p.name)),
            DetailRow::new("Description", optional_text(c.description.as_ref())),
            DetailRow::new("Created", format_timestamp(c.created_at.as_ref())),
        ]
    }
}

//=========================================================================================
// Course Assignments
//=========================================================================================

impl Filterable for CourseAssignment {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "courseCode" => self.course.as_ref().and_then(|c| text(&c.code)),
            "courseTitle" => self.course.as_ref().and_then(|c| text(&c.title)),
            "firstExaminer" => self.first_examiner.as_ref().and_then(|p| text(&p.name)),
            "secondExaminer" => self.second_examiner.as_ref().and_then(|p| text(&p.name)),
            _ => None,
        }
    }
}

impl Record for CourseAssignment {
    fn id(&self) -> &str {
        &self.id
    }
}

fn examiner(person: Option<&PersonRef>, kind: ExaminerKind) -> String {
    match person {
        Some(p) if !p.name.trim().is_empty() => format!("{} ({})", p.name, kind),
        _ => NOT_SPECIFIED.to_string(),
    }
}

pub struct CourseAssignmentScreen;

impl Screen for CourseAssignmentScreen {
    type Record = CourseAssignment;
    type Payload = CourseAssignmentPayload;

    const TITLE: &'static str = "Course Assignments";
    const PATH: &'static str = "/course-assignments";
    const COLLECTION_KEY: &'static str = "courseAssignments";
    const ITEM_KEY: &'static str = "courseAssignment";
    const FILTERS: &'static [FilterField] = &[
        FilterField::client(
            "query",
            "Search",
            Comparison::Contains,
            &["courseCode", "courseTitle", "firstExaminer", "secondExaminer"],
        ),
        FilterField::server("committee", "Committee"),
        FilterField::server("semester", "Semester"),
    ];
    const REFERENCES: &'static [ReferenceKind] = &[
        ReferenceKind::Committees,
        ReferenceKind::Courses,
        ReferenceKind::Semesters,
        ReferenceKind::Teachers,
        ReferenceKind::ExternalTeachers,
    ];
    const HEADERS: &'static [&'static str] =
        &["Course", "Committee", "Semester", "First examiner", "Second examiner"];

    fn cells(a: &CourseAssignment) -> Vec<String> {
        vec![
            display_or_unspecified(a.course.as_ref(), |c| c.label()),
            name_of(a.committee.as_ref(), |c| &c.name),
            name_of(a.semester.as_ref(), |s| &s.name),
            examiner(a.first_examiner.as_ref(), a.first_examiner_type),
            examiner(a.second_examiner.as_ref(), a.second_examiner_type),
        ]
    }

    fn detail(a: &CourseAssignment) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Course", display_or_unspecified(a.course.as_ref(), |c| c.label())),
            DetailRow::new(
                "Credit",
                display_or_unspecified(a.course.as_ref().and_then(|c| c.credit.as_ref()), |c| {
                    format!("{:.1}", c)
                }),
            ),
            DetailRow::new("Committee", name_of(a.committee.as_ref(), |c| &c.name)),
            DetailRow::new("Semester", name_of(a.semester.as_ref(), |s| &s.name)),
            DetailRow::new("First examiner", examiner(a.first_examiner.as_ref(), a.first_examiner_type)),
            DetailRow::new(
                "Second examiner",
                examiner(a.second_examiner.as_ref(), a.second_examiner_type),
            ),
            DetailRow::new("Created", format_timestamp(a.created_at.as_ref())),
        ]
    }
}

//=========================================================================================
// Improvement Exams
//=========================================================================================

impl Filterable for ImprovementExam {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "studentName" => self.student.as_ref().and_then(|s| text(&s.name)),
            "registrationNumber" => self
                .student
                .as_ref()
                .and_then(|s| opt_text(s.registration_number.as_ref())),
            "courseCode" => self.course.as_ref().and_then(|c| text(&c.code)),
            "mark" => self.mark.map(FieldValue::Number),
            _ => None,
        }
    }
}

impl Record for ImprovementExam {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ImprovementExamScreen;

impl Screen for ImprovementExamScreen {
    type Record = ImprovementExam;
    type Payload = ImprovementExamPayload;

    const TITLE: &'static str = "Improvement Exams";
    const PATH: &'static str = "/improvement-exams";
    const COLLECTION_KEY: &'static str = "improvementExams";
    const ITEM_KEY: &'static str = "improvementExam";
    const FILTERS: &'static [FilterField] = &[
        FilterField::client(
            "query",
            "Search",
            Comparison::Contains,
            &["studentName", "registrationNumber", "courseCode"],
        ),
        FilterField::server("status", "Status"),
        FilterField::server("session", "Session"),
        FilterField::client("minMark", "Minimum mark", Comparison::AtLeast, &["mark"]),
        FilterField::client("maxMark", "Maximum mark", Comparison::AtMost, &["mark"]),
    ];
    const REFERENCES: &'static [ReferenceKind] = &[
        ReferenceKind::Sessions,
        ReferenceKind::Courses,
        ReferenceKind::Students,
    ];
    const HEADERS: &'static [&'static str] =
        &["Student", "Course", "Session", "Status", "Mark", "Grade"];

    fn cells(e: &ImprovementExam) -> Vec<String> {
        vec![
            name_of(e.student.as_ref(), |s| &s.name),
            display_or_unspecified(e.course.as_ref(), |c| c.label()),
            name_of(e.session.as_ref(), |s| &s.name),
            e.status.to_string(),
            e.mark.map(|m| format!("{:.1}", m)).unwrap_or_else(|| "-".to_string()),
            e.mark.map(|m| grade_for(m).to_string()).unwrap_or_else(|| "-".to_string()),
        ]
    }

    fn detail(e: &ImprovementExam) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Student", name_of(e.student.as_ref(), |s| &s.name)),
            DetailRow::new(
                "Registration number",
                optional_text(e.student.as_ref().and_then(|s| s.registration_number.as_ref())),
            ),
            DetailRow::new("Course", display_or_unspecified(e.course.as_ref(), |c| c.label())),
            DetailRow::new("Session", name_of(e.session.as_ref(), |s| &s.name)),
            DetailRow::new("Status", e.status.to_string()),
            DetailRow::new(
                "Mark",
                e.mark.map(|m| format!("{:.1}", m)).unwrap_or_else(|| "-".to_string()),
            ),
            DetailRow::new("Created", format_timestamp(e.created_at.as_ref())),
            DetailRow::new("Updated", format_timestamp(e.updated_at.as_ref())),
        ]
    }
}

//=========================================================================================
// Exam Results (monitoring)
//=========================================================================================

impl Filterable for ExamResult {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "studentName" => self.student.as_ref().and_then(|s| text(&s.name)),
            "registrationNumber" => self
                .student
                .as_ref()
                .and_then(|s| opt_text(s.registration_number.as_ref())),
            "courseCode" => self.course.as_ref().and_then(|c| text(&c.code)),
            "mark" => Some(FieldValue::Number(self.mark)),
            _ => None,
        }
    }
}

impl Record for ExamResult {
    fn id(&self) -> &str {
        &self.id
    }
}

pub struct ExamResultScreen;

impl Screen for ExamResultScreen {
    type Record = ExamResult;
    type Payload = ExamResultPayload;

    const TITLE: &'static str = "Exam Results";
    const PATH: &'static str = "/results";
    const COLLECTION_KEY: &'static str = "results";
    const ITEM_KEY: &'static str = "result";
    const FILTERS: &'static [FilterField] = &[
        FilterField::client(
            "query",
            "Search",
            Comparison::Contains,
            &["studentName", "registrationNumber", "courseCode"],
        ),
        FilterField::server("session", "Session"),
        FilterField::server("course", "Course"),
        FilterField::server("student", "Student"),
    ];
    const REFERENCES: &'static [ReferenceKind] = &[ReferenceKind::Sessions, ReferenceKind::Courses];
    const HEADERS: &'static [&'static str] =
        &["Student", "Registration", "Course", "Mark", "Grade"];

    fn cells(r: &ExamResult) -> Vec<String> {
        vec![
            name_of(r.student.as_ref(), |s| &s.name),
            optional_text(r.student.as_ref().and_then(|s| s.registration_number.as_ref())),
            display_or_unspecified(r.course.as_ref(), |c| c.label()),
            format!("{:.1}", r.mark),
            grade_for(r.mark).to_string(),
        ]
    }

    fn detail(r: &ExamResult) -> Vec<DetailRow> {
        vec![
            DetailRow::new("Student", name_of(r.student.as_ref(), |s| &s.name)),
            DetailRow::new("Course", display_or_unspecified(r.course.as_ref(), |c| c.label())),
            DetailRow::new("Session", name_of(r.session.as_ref(), |s| &s.name)),
            DetailRow::new("Mark", format!("{:.1}", r.mark)),
            DetailRow::new("Grade", grade_for(r.mark).to_string()),
            DetailRow::new("Credit", format!("{:.1}", r.credit())),
        ]
    }
}
