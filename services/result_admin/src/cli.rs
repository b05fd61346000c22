//! services/result_admin/src/cli.rs
//!
//! CLI argument definitions using clap derive.

use clap::{Args, Parser, Subcommand, ValueEnum};
use result_admin_core::filter::FilterMapping;
use result_admin_core::ReferenceKind;

#[derive(Parser, Debug)]
#[command(name = "result-admin")]
#[command(author, version, about = "Administer students, staff, committees and exam results")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and keep the session for later commands
    Login {
        #[arg(long)]
        email: String,

        /// Prompted for when omitted
        #[arg(long, env = "RESULT_ADMIN_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session and forget the stored credential
    Logout,

    /// Show the signed-in administrator
    Whoami,

    /// List records of a screen, optionally filtered
    List {
        screen: ScreenName,

        #[command(flatten)]
        args: ListArgs,
    },

    /// Show every field of one record
    Show { screen: ScreenName, id: String },

    /// Create a record from a JSON payload
    Create {
        screen: ScreenName,

        /// Inline JSON, or @path to read it from a file
        #[arg(long)]
        data: String,
    },

    /// Replace a record's editable fields from a JSON payload
    Update {
        screen: ScreenName,
        id: String,

        /// Inline JSON, or @path to read it from a file
        #[arg(long)]
        data: String,
    },

    /// Delete a record after confirmation
    Delete {
        screen: ScreenName,
        id: String,

        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// List the selectable options of a reference collection
    Options { kind: ReferenceName },

    /// Grade transcript and weighted average for one student
    Transcript { student_id: String },

    /// Number of results per grade
    Distribution {
        #[arg(long)]
        session: Option<String>,

        #[arg(long)]
        course: Option<String>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct ListArgs {
    /// Free-text search
    #[arg(long, short = 'q')]
    pub query: Option<String>,

    /// Additional filter as key=value (repeatable)
    #[arg(long = "filter", value_parser = parse_key_val)]
    pub filters: Vec<(String, String)>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page: 5, 10, 25 or 50
    #[arg(long)]
    pub page_size: Option<usize>,
}

impl ListArgs {
    /// The filter mapping these arguments describe; empty when unfiltered.
    pub fn mapping(&self) -> FilterMapping {
        let mut mapping: FilterMapping = self.filters.iter().cloned().collect();
        if let Some(query) = &self.query {
            mapping.insert("query".to_string(), query.clone());
        }
        mapping
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.trim().is_empty() {
        return Err(format!("missing filter name in '{}'", s));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenName {
    Students,
    Teachers,
    ExternalTeachers,
    Committees,
    CourseAssignments,
    ImprovementExams,
    Results,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceName {
    Departments,
    Sessions,
    Courses,
    Semesters,
    Committees,
    Teachers,
    ExternalTeachers,
    Students,
}

impl From<ReferenceName> for ReferenceKind {
    fn from(name: ReferenceName) -> Self {
        match name {
            ReferenceName::Departments => ReferenceKind::Departments,
            ReferenceName::Sessions => ReferenceKind::Sessions,
            ReferenceName::Courses => ReferenceKind::Courses,
            ReferenceName::Semesters => ReferenceKind::Semesters,
            ReferenceName::Committees => ReferenceKind::Committees,
            ReferenceName::Teachers => ReferenceKind::Teachers,
            ReferenceName::ExternalTeachers => ReferenceKind::ExternalTeachers,
            ReferenceName::Students => ReferenceKind::Students,
        }
    }
}
