//! services/result_admin/src/commands.rs
//!
//! Runs one CLI command against a screen workflow and returns the text to
//! print. Every screen goes through the same generic `CrudWorkflow<S>`, so
//! list/show/create/update/delete behave identically across entities.

use result_admin_core::filter::FilterMapping;
use result_admin_core::report::{grade_distribution, transcript};
use result_admin_core::screens::{
    CommitteeScreen, CourseAssignmentScreen, ExamResultScreen, ExternalTeacherScreen,
    ImprovementExamScreen, StudentScreen, TeacherScreen,
};
use result_admin_core::{
    CrudWorkflow, PageSize, ReferenceCache, ReferenceKind, RemoteDataClient, Screen,
};
use std::sync::Arc;
use tracing::info;

use crate::cli::{ListArgs, ScreenName};
use crate::error::AdminError;
use crate::render;

/// What to do on a screen.
#[derive(Debug, Clone)]
pub enum ScreenAction {
    List(ListArgs),
    Show(String),
    Create(String),
    Update { id: String, data: String },
    Delete { id: String, yes: bool },
}

/// Asks the operator a yes/no question.
pub type Confirm<'a> = &'a (dyn Fn(&str) -> Result<bool, AdminError> + Send + Sync);

pub struct AdminContext {
    client: Arc<dyn RemoteDataClient>,
    cache: ReferenceCache,
    page_size: PageSize,
}

impl AdminContext {
    pub fn new(client: Arc<dyn RemoteDataClient>, page_size: PageSize) -> Self {
        Self {
            client,
            cache: ReferenceCache::new(),
            page_size,
        }
    }

    pub async fn run_screen(
        &self,
        screen: ScreenName,
        action: ScreenAction,
        confirm: Confirm<'_>,
    ) -> Result<String, AdminError> {
        match screen {
            ScreenName::Students => self.run::<StudentScreen>(action, confirm).await,
            ScreenName::Teachers => self.run::<TeacherScreen>(action, confirm).await,
            ScreenName::ExternalTeachers => self.run::<ExternalTeacherScreen>(action, confirm).await,
            ScreenName::Committees => self.run::<CommitteeScreen>(action, confirm).await,
            ScreenName::CourseAssignments => {
                self.run::<CourseAssignmentScreen>(action, confirm).await
            }
            ScreenName::ImprovementExams => self.run::<ImprovementExamScreen>(action, confirm).await,
            ScreenName::Results => self.run::<ExamResultScreen>(action, confirm).await,
        }
    }

    fn workflow<S: Screen>(&self) -> CrudWorkflow<S> {
        CrudWorkflow::with_page_size(self.client.clone(), self.cache.clone(), self.page_size)
    }

    async fn run<S: Screen>(
        &self,
        action: ScreenAction,
        confirm: Confirm<'_>,
    ) -> Result<String, AdminError> {
        let mut wf = self.workflow::<S>();
        match action {
            ScreenAction::List(args) => {
                wf.mount().await?;
                let mapping = args.mapping();
                if !mapping.is_empty() {
                    wf.search(&mapping).await?;
                }
                if let Some(size) = args.page_size {
                    wf.set_page_size(PageSize::try_from(size)?);
                }
                wf.set_page(args.page.saturating_sub(1));
                Ok(render::table::<S>(wf.table()))
            }
            ScreenAction::Show(id) => {
                wf.mount().await?;
                let record = wf.find(&id).cloned().ok_or_else(|| not_found::<S>(&id))?;
                Ok(render::detail(&wf.view_detail(&record)))
            }
            ScreenAction::Create(data) => {
                let payload: S::Payload = serde_json::from_str(&load_data(&data).await?)?;
                wf.open_create();
                let saved = wf.submit(&payload).await?;
                let label = saved
                    .as_ref()
                    .and_then(|r| S::cells(r).into_iter().next())
                    .unwrap_or_else(|| "record".to_string());

                let mut output = format!("Created {} in {}.\n", label, S::TITLE.to_lowercase());
                if let Some(credential) = wf.credential() {
                    output.push_str(&format!(
                        "Initial password for {}: {}\nShare it with the account holder now; it will not be shown again.\n",
                        credential.record_label(),
                        credential.secret()
                    ));
                }
                wf.acknowledge_credential();
                Ok(output)
            }
            ScreenAction::Update { id, data } => {
                let payload: S::Payload = serde_json::from_str(&load_data(&data).await?)?;
                wf.update(&id, &payload).await?;
                Ok(format!("Updated {} {}.\n", S::TITLE.to_lowercase(), id))
            }
            ScreenAction::Delete { id, yes } => {
                wf.mount().await?;
                let record = wf.find(&id).cloned().ok_or_else(|| not_found::<S>(&id))?;
                let label = S::cells(&record).into_iter().next().unwrap_or_else(|| id.clone());
                wf.request_delete(&record);

                if !yes && !confirm(&format!("Delete {} from {}?", label, S::TITLE.to_lowercase()))? {
                    wf.cancel_delete();
                    return Ok("Cancelled.\n".to_string());
                }
                wf.confirm_delete().await?;
                Ok(format!("Deleted {}.\n", label))
            }
        }
    }

    pub async fn options(&self, kind: ReferenceKind) -> Result<String, AdminError> {
        let items = self.cache.get_or_fetch(self.client.as_ref(), kind).await?;
        Ok(render::options(&items))
    }

    pub async fn transcript(&self, student_id: &str) -> Result<String, AdminError> {
        let mut wf = self.workflow::<ExamResultScreen>();
        let mapping = FilterMapping::from([("student".to_string(), student_id.to_string())]);
        wf.search(&mapping).await?;

        let results = wf.table().items();
        let student = results
            .iter()
            .find_map(|r| r.student.as_ref())
            .map(|s| match &s.registration_number {
                Some(reg) => format!("{} ({})", s.name, reg),
                None => s.name.clone(),
            })
            .unwrap_or_else(|| student_id.to_string());
        let report = transcript(results);
        info!("Transcript for {}: {} results", student_id, report.rows.len());
        Ok(render::transcript(&student, &report))
    }

    pub async fn distribution(
        &self,
        session: Option<String>,
        course: Option<String>,
    ) -> Result<String, AdminError> {
        let mut wf = self.workflow::<ExamResultScreen>();
        let mut mapping = FilterMapping::new();
        if let Some(session) = session {
            mapping.insert("session".to_string(), session);
        }
        if let Some(course) = course {
            mapping.insert("course".to_string(), course);
        }
        wf.search(&mapping).await?;
        Ok(render::distribution(&grade_distribution(wf.table().items())))
    }
}

fn not_found<S: Screen>(id: &str) -> AdminError {
    AdminError::NotFound {
        what: S::TITLE,
        id: id.to_string(),
    }
}

/// `--data` is inline JSON, or `@path` naming a file that holds it.
async fn load_data(data: &str) -> Result<String, AdminError> {
    match data.strip_prefix('@') {
        Some(path) => Ok(tokio::fs::read_to_string(path).await?),
        None => Ok(data.to_string()),
    }
}
