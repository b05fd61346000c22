pub mod auth;
pub mod domain;
pub mod filter;
pub mod grade;
pub mod ports;
pub mod reference;
pub mod report;
pub mod screen;
pub mod screens;
pub mod table;
pub mod workflow;

pub use auth::AuthContext;
pub use filter::{FilterError, FilterMapping, FilterState};
pub use grade::{average_grade_point, grade_for, grade_point_for, Grade};
pub use ports::{ApiRequest, Method, PortError, PortResult, RemoteDataClient, SessionStore};
pub use reference::{ReferenceCache, ReferenceKind};
pub use screen::{Record, Screen};
pub use table::{PageSize, PaginatedTable, RowAction, TableView};
pub use workflow::{CrudWorkflow, Dialog, WorkflowError, WorkflowStatus};
