//! services/result_admin/src/render.rs
//!
//! Markdown rendering of workflow state for the terminal.

use result_admin_core::domain::UserIdentity;
use result_admin_core::reference::ReferenceItem;
use result_admin_core::report::Transcript;
use result_admin_core::screen::DetailRow;
use result_admin_core::{Grade, PaginatedTable, Screen, TableView};
use tabled::{builder::Builder, settings::Style};

pub fn table<S: Screen>(table: &PaginatedTable<S::Record>) -> String {
    let rows = match table.visible() {
        TableView::Empty => return format!("No {} found.\n", S::TITLE.to_lowercase()),
        TableView::Rows(rows) => rows,
    };

    let mut builder = Builder::default();
    builder.push_record(S::HEADERS.iter().copied());
    for record in rows {
        builder.push_record(S::cells(record));
    }

    let mut output = builder.build().with(Style::markdown()).to_string();
    output.push_str(&format!(
        "\n\n{} (page {} of {})\n",
        table.range_label(),
        table.page() + 1,
        table.page_count()
    ));
    output
}

pub fn detail(rows: &[DetailRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for row in rows {
        builder.push_record([row.label.to_string(), row.value.clone()]);
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

pub fn options(items: &[ReferenceItem]) -> String {
    if items.is_empty() {
        return "No options available.\n".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["Id", "Label"]);
    for item in items {
        builder.push_record([item.id.clone(), item.label.clone()]);
    }
    format!("{}\n", builder.build().with(Style::markdown()))
}

pub fn transcript(student: &str, transcript: &Transcript) -> String {
    if transcript.rows.is_empty() {
        return format!("No results recorded for {}.\n", student);
    }

    let mut output = format!("## Transcript: {}\n\n", student);
    let mut builder = Builder::default();
    builder.push_record(["Course", "Mark", "Grade", "Grade point", "Credit"]);
    for row in &transcript.rows {
        builder.push_record([
            row.course.clone(),
            format!("{:.1}", row.mark),
            row.grade.to_string(),
            format!("{:.2}", row.grade_point),
            format!("{:.1}", row.credit),
        ]);
    }
    output.push_str(&builder.build().with(Style::markdown()).to_string());
    output.push_str(&format!(
        "\n\nCGPA {} over {:.1} credits\n",
        transcript.average, transcript.average.total_credit
    ));
    output
}

pub fn distribution(counts: &[(Grade, usize)]) -> String {
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    if total == 0 {
        return "No results found.\n".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(["Grade", "Results", "Share"]);
    for (grade, n) in counts {
        builder.push_record([
            grade.to_string(),
            n.to_string(),
            format!("{:.1}%", *n as f64 * 100.0 / total as f64),
        ]);
    }
    format!("{}\n\nTotal: {}\n", builder.build().with(Style::markdown()), total)
}

pub fn identity(user: &UserIdentity) -> String {
    match &user.role {
        Some(role) => format!("{} <{}> ({})\n", user.name, user.email, role),
        None => format!("{} <{}>\n", user.name, user.email),
    }
}
