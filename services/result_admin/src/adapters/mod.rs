pub mod http;
pub mod session_file;

pub use http::HttpDataClient;
pub use session_file::FileSessionStore;
