//! crates/result_admin_core/src/workflow.rs
//!
//! The CRUD workflow controller. Every management screen is one
//! `CrudWorkflow<S>`: it loads the entity collection together with the
//! screen's reference collections, keeps the filter bar and the paginated
//! table in sync with the backend, and drives the add/edit/view/delete
//! dialogs.
//!
//! Loads are split into `begin_*` (issue, bump the request generation) and
//! [`CrudWorkflow::apply`] (accept the response only if it is still the most
//! recently issued one), so overlapping requests can never let an older
//! response overwrite a newer one.

use futures::try_join;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::filter::{FilterError, FilterMapping, FilterState, SearchPlan};
use crate::ports::{
    extract_collection, extract_item, ApiRequest, PortError, PortResult, RemoteDataClient,
};
use crate::reference::{ReferenceCache, ReferenceItem, ReferenceKind, ReferenceSnapshot};
use crate::screen::{DetailRow, Record, Screen};
use crate::table::{PageSize, PaginatedTable, RowAction, TableView};

//=========================================================================================
// Workflow Error and State Types
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Port(#[from] PortError),
    #[error(transparent)]
    Filter(#[from] FilterError),
    /// The operation needs a dialog that is not open (e.g. confirming a
    /// delete that was never requested).
    #[error("no {0} dialog is open")]
    NoDialog(&'static str),
}

impl WorkflowError {
    pub fn user_message(&self) -> String {
        match self {
            WorkflowError::Port(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the table currently reflects; mutations re-run it.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveQuery {
    All,
    Filtered(FilterMapping),
}

/// A one-time secret (initial password) returned when an account-bearing
/// record is created. The secret is wiped when the value is dropped.
pub struct IssuedCredential {
    record_label: String,
    secret: String,
}

impl IssuedCredential {
    pub fn record_label(&self) -> &str {
        &self.record_label
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for IssuedCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedCredential")
            .field("record_label", &self.record_label)
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl Drop for IssuedCredential {
    fn drop(&mut self) {
        // Overwrite in place before the buffer is released.
        let len = self.secret.len();
        self.secret.clear();
        self.secret.extend(std::iter::repeat('\0').take(len));
        self.secret.clear();
    }
}

#[derive(Debug)]
pub enum Dialog<R> {
    Closed,
    Create,
    Edit(R),
    View(R),
    ConfirmDelete(R),
    /// Shown after a successful create that issued a credential; closes only
    /// on explicit acknowledgment.
    Credential(IssuedCredential),
}

impl<R> Dialog<R> {
    pub fn is_open(&self) -> bool {
        !matches!(self, Dialog::Closed)
    }
}

//=========================================================================================
// Pending Loads
//=========================================================================================

enum Source<R> {
    Remote,
    /// Client-side filtering over the last full fetch; no request needed.
    Memory(Vec<R>),
}

/// An issued fetch/search. Owns everything it needs, so it can be run while
/// the controller keeps handling other events.
pub struct PendingLoad<S: Screen> {
    generation: u64,
    query: ActiveQuery,
    plan: SearchPlan,
    source: Source<S::Record>,
    client: Arc<dyn RemoteDataClient>,
    cache: ReferenceCache,
    _screen: PhantomData<S>,
}

struct Loaded<R> {
    records: Vec<R>,
    visible: Vec<R>,
    server_params: Vec<(String, String)>,
    references: Option<ReferenceSnapshot>,
}

pub struct LoadOutcome<S: Screen> {
    generation: u64,
    query: ActiveQuery,
    result: PortResult<Loaded<S::Record>>,
}

impl<S: Screen> LoadOutcome<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Current,
    /// A newer request was issued after this one; the response was dropped.
    Stale,
}

impl<S: Screen> PendingLoad<S> {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub async fn run(self) -> LoadOutcome<S> {
        let PendingLoad {
            generation,
            query,
            plan,
            source,
            client,
            cache,
            ..
        } = self;

        let result = match source {
            Source::Memory(records) => {
                let visible = records.iter().filter(|r| plan.matches(*r)).cloned().collect();
                Ok(Loaded {
                    records,
                    visible,
                    server_params: plan.server_params.clone(),
                    references: None,
                })
            }
            Source::Remote => {
                let request = ApiRequest::get(S::PATH).with_query(plan.server_params.clone());
                let primary = async {
                    let body = client.send(request).await?;
                    extract_collection::<S::Record>(&body, S::COLLECTION_KEY)
                };
                let references = cache.snapshot(client.as_ref(), S::REFERENCES);
                try_join!(primary, references).map(|(records, references)| {
                    let visible = records.iter().filter(|r| plan.matches(*r)).cloned().collect();
                    Loaded {
                        records,
                        visible,
                        server_params: plan.server_params.clone(),
                        references: Some(references),
                    }
                })
            }
        };

        LoadOutcome {
            generation,
            query,
            result,
        }
    }
}

//=========================================================================================
// The Workflow Controller
//=========================================================================================

pub struct CrudWorkflow<S: Screen> {
    client: Arc<dyn RemoteDataClient>,
    cache: ReferenceCache,
    filter: FilterState,
    table: PaginatedTable<S::Record>,
    last_fetch: Vec<S::Record>,
    last_server_params: Option<Vec<(String, String)>>,
    references: ReferenceSnapshot,
    status: WorkflowStatus,
    error: Option<String>,
    dialog: Dialog<S::Record>,
    issued: u64,
    active: ActiveQuery,
    _screen: PhantomData<S>,
}

impl<S: Screen> CrudWorkflow<S> {
    pub fn new(client: Arc<dyn RemoteDataClient>, cache: ReferenceCache) -> Self {
        Self::with_page_size(client, cache, PageSize::default())
    }

    pub fn with_page_size(
        client: Arc<dyn RemoteDataClient>,
        cache: ReferenceCache,
        page_size: PageSize,
    ) -> Self {
        Self {
            client,
            cache,
            filter: FilterState::new(S::FILTERS),
            table: PaginatedTable::new(page_size),
            last_fetch: Vec::new(),
            last_server_params: None,
            references: ReferenceSnapshot::default(),
            status: WorkflowStatus::Idle,
            error: None,
            dialog: Dialog::Closed,
            issued: 0,
            active: ActiveQuery::All,
            _screen: PhantomData,
        }
    }

    //--- accessors ---------------------------------------------------------------------

    pub fn status(&self) -> WorkflowStatus {
        self.status
    }

    /// The current error banner, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn table(&self) -> &PaginatedTable<S::Record> {
        &self.table
    }

    pub fn visible(&self) -> TableView<'_, S::Record> {
        self.table.visible()
    }

    pub fn set_page(&mut self, page: usize) {
        self.table.set_page(page);
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.table.set_page_size(size);
    }

    pub fn dialog(&self) -> &Dialog<S::Record> {
        &self.dialog
    }

    pub fn references(&self) -> &ReferenceSnapshot {
        &self.references
    }

    pub fn options(&self, kind: ReferenceKind) -> &[ReferenceItem] {
        self.references.options(kind)
    }

    pub fn active_query(&self) -> &ActiveQuery {
        &self.active
    }

    pub fn credential(&self) -> Option<&IssuedCredential> {
        match &self.dialog {
            Dialog::Credential(c) => Some(c),
            _ => None,
        }
    }

    /// Looks a record up in the last loaded collection.
    pub fn find(&self, id: &str) -> Option<&S::Record> {
        self.last_fetch.iter().find(|r| r.id() == id)
    }

    //--- loading -----------------------------------------------------------------------

    /// Initial load: refreshes this screen's reference collections, then fetches.
    pub async fn mount(&mut self) -> PortResult<()> {
        self.cache.invalidate(S::REFERENCES).await;
        self.fetch_all().await
    }

    pub fn begin_fetch(&mut self) -> PendingLoad<S> {
        self.issue(ActiveQuery::All, SearchPlan::default(), true)
    }

    pub async fn fetch_all(&mut self) -> PortResult<()> {
        let pending = self.begin_fetch();
        let outcome = pending.run().await;
        self.apply(outcome).map(|_| ())
    }

    /// Issues a search for `mapping`. Server-side fields go out as query
    /// parameters; client-side fields filter the response (or the last full
    /// fetch, when the server-side constraints have not changed).
    pub fn begin_search(&mut self, mapping: &FilterMapping) -> Result<PendingLoad<S>, FilterError> {
        self.prepare_search(mapping, false)
    }

    pub async fn search(&mut self, mapping: &FilterMapping) -> Result<(), WorkflowError> {
        self.run_search(mapping, false).await
    }

    /// Searches with the filter bar's current values.
    pub async fn commit(&mut self) -> Result<(), WorkflowError> {
        let mapping = self.filter.values().clone();
        self.search(&mapping).await
    }

    pub fn update_filter(&mut self, name: &str, value: impl Into<String>) -> Result<(), FilterError> {
        self.filter.update(name, value)
    }

    /// Clears the filter bar and searches with the cleared mapping in one step.
    pub async fn reset_and_search(&mut self) -> Result<(), WorkflowError> {
        let defaults = self.filter.reset();
        self.search(&defaults).await
    }

    /// Accepts a finished load if it is still the most recently issued one.
    pub fn apply(&mut self, outcome: LoadOutcome<S>) -> PortResult<Applied> {
        if outcome.generation != self.issued {
            debug!(
                "Discarding stale {} response (generation {}, latest {})",
                S::TITLE,
                outcome.generation,
                self.issued
            );
            return Ok(Applied::Stale);
        }

        match outcome.result {
            Ok(loaded) => {
                info!(
                    "Loaded {} {} ({} shown)",
                    loaded.records.len(),
                    S::TITLE,
                    loaded.visible.len()
                );
                self.table.replace(loaded.visible);
                self.last_fetch = loaded.records;
                self.last_server_params = Some(loaded.server_params);
                if let Some(references) = loaded.references {
                    self.references = references;
                }
                self.active = outcome.query;
                self.status = WorkflowStatus::Ready;
                self.error = None;
                Ok(Applied::Current)
            }
            Err(e) => {
                error!("Failed to load {}: {:?}", S::TITLE, e);
                self.fail(&e.user_message());
                Err(e)
            }
        }
    }

    /// Re-runs whatever the table currently reflects, always against the backend.
    pub async fn refresh(&mut self) -> Result<(), WorkflowError> {
        match self.active.clone() {
            ActiveQuery::All => Ok(self.fetch_all().await?),
            ActiveQuery::Filtered(mapping) => self.run_search(&mapping, true).await,
        }
    }

    fn issue(&mut self, query: ActiveQuery, plan: SearchPlan, force_remote: bool) -> PendingLoad<S> {
        self.issued += 1;
        self.status = WorkflowStatus::Loading;

        let reuse = !force_remote
            && self.last_server_params.as_ref() == Some(&plan.server_params);
        let source = if reuse {
            debug!("Filtering {} in memory", S::TITLE);
            Source::Memory(self.last_fetch.clone())
        } else {
            Source::Remote
        };

        PendingLoad {
            generation: self.issued,
            query,
            plan,
            source,
            client: self.client.clone(),
            cache: self.cache.clone(),
            _screen: PhantomData,
        }
    }

    fn prepare_search(
        &mut self,
        mapping: &FilterMapping,
        force_remote: bool,
    ) -> Result<PendingLoad<S>, FilterError> {
        let plan = match SearchPlan::build(S::FILTERS, mapping) {
            Ok(plan) => plan,
            Err(e) => {
                warn!("Rejected {} filter: {}", S::TITLE, e);
                self.error = Some(e.to_string());
                return Err(e);
            }
        };
        self.filter.replace(mapping)?;

        if plan.is_unconstrained() {
            return Ok(self.issue(ActiveQuery::All, plan, true));
        }
        let query = ActiveQuery::Filtered(self.filter.values().clone());
        Ok(self.issue(query, plan, force_remote))
    }

    async fn run_search(&mut self, mapping: &FilterMapping, force_remote: bool) -> Result<(), WorkflowError> {
        let pending = self.prepare_search(mapping, force_remote)?;
        let outcome = pending.run().await;
        self.apply(outcome)?;
        Ok(())
    }

    fn fail(&mut self, message: &str) {
        self.status = WorkflowStatus::Error;
        self.error = Some(message.to_string());
    }

    //--- dialogs -----------------------------------------------------------------------

    pub fn open_create(&mut self) {
        self.error = None;
        self.dialog = Dialog::Create;
    }

    /// Routes a row action. Delete only opens the confirmation step.
    pub fn on_row_action(&mut self, action: RowAction, record: &S::Record) {
        self.dialog = match action {
            RowAction::View => Dialog::View(record.clone()),
            RowAction::Edit => Dialog::Edit(record.clone()),
            RowAction::Delete => Dialog::ConfirmDelete(record.clone()),
        };
    }

    /// Opens the read-only view and returns its rows.
    pub fn view_detail(&mut self, record: &S::Record) -> Vec<DetailRow> {
        self.on_row_action(RowAction::View, record);
        S::detail(record)
    }

    /// Closes any dialog; a displayed credential is dropped with it.
    pub fn close_dialog(&mut self) {
        self.dialog = Dialog::Closed;
    }

    pub fn acknowledge_credential(&mut self) {
        if matches!(self.dialog, Dialog::Credential(_)) {
            info!("Initial credential acknowledged; clearing it");
            self.dialog = Dialog::Closed;
        }
    }

    //--- mutations ---------------------------------------------------------------------

    /// Submits the open create or edit form.
    pub async fn submit(&mut self, payload: &S::Payload) -> Result<Option<S::Record>, WorkflowError> {
        let target = match &self.dialog {
            Dialog::Create => None,
            Dialog::Edit(record) => Some(record.id().to_string()),
            _ => return Err(WorkflowError::NoDialog("create/edit")),
        };
        let saved = match target {
            None => self.create(payload).await?,
            Some(id) => self.update(&id, payload).await?,
        };
        Ok(saved)
    }

    pub async fn create(&mut self, payload: &S::Payload) -> PortResult<Option<S::Record>> {
        let body = self.encode(payload)?;
        let response = self.mutate(ApiRequest::post(S::PATH, body), "create").await?;
        let record = Self::saved_record(&response);

        let credential = S::CREDENTIAL_KEY
            .and_then(|key| response.get(key))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(|secret| IssuedCredential {
                record_label: record
                    .as_ref()
                    .and_then(|r| S::cells(r).first().cloned())
                    .unwrap_or_default(),
                secret: secret.to_string(),
            });

        self.after_save().await;
        self.dialog = match credential {
            Some(c) => Dialog::Credential(c),
            None => Dialog::Closed,
        };
        Ok(record)
    }

    pub async fn update(&mut self, id: &str, payload: &S::Payload) -> PortResult<Option<S::Record>> {
        let body = self.encode(payload)?;
        let path = format!("{}/{}", S::PATH, id);
        let response = self.mutate(ApiRequest::put(path, body), "update").await?;
        let record = Self::saved_record(&response);
        self.after_save().await;
        self.dialog = Dialog::Closed;
        Ok(record)
    }

    /// First step of a delete: asks for confirmation, issues nothing.
    pub fn request_delete(&mut self, record: &S::Record) {
        self.on_row_action(RowAction::Delete, record);
    }

    pub fn cancel_delete(&mut self) {
        if matches!(self.dialog, Dialog::ConfirmDelete(_)) {
            self.dialog = Dialog::Closed;
        }
    }

    /// Second step of a delete: removes the confirmed record and refreshes.
    pub async fn confirm_delete(&mut self) -> Result<(), WorkflowError> {
        let id = match &self.dialog {
            Dialog::ConfirmDelete(record) => record.id().to_string(),
            _ => return Err(WorkflowError::NoDialog("delete confirmation")),
        };
        self.dialog = Dialog::Closed;

        let path = format!("{}/{}", S::PATH, id);
        self.mutate(ApiRequest::delete(path), "delete").await?;
        self.after_save().await;
        Ok(())
    }

    fn encode(&mut self, payload: &S::Payload) -> PortResult<Value> {
        serde_json::to_value(payload).map_err(|e| {
            let err = PortError::Decode(e.to_string());
            self.fail(&err.user_message());
            err
        })
    }

    async fn mutate(&mut self, request: ApiRequest, verb: &str) -> PortResult<Value> {
        self.status = WorkflowStatus::Loading;
        self.error = None;
        match self.client.send(request).await {
            Ok(body) => {
                info!("{} {} succeeded", S::TITLE, verb);
                Ok(body)
            }
            Err(e) => {
                error!("Failed to {} {}: {:?}", verb, S::TITLE, e);
                self.fail(&e.user_message());
                Err(e)
            }
        }
    }

    fn saved_record(response: &Value) -> Option<S::Record> {
        response.get(S::ITEM_KEY)?;
        match extract_item(response, S::ITEM_KEY) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Saved {} but could not read it back: {}", S::TITLE, e);
                None
            }
        }
    }

    /// The table is never patched locally; it is reloaded from the backend.
    async fn after_save(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!("Refresh after saving {} failed: {:?}", S::TITLE, e);
        }
    }
}
