//! CLI command handlers, one per file.

mod check;
mod status;
mod submit;

pub use check::run_check;
pub use status::run_status;
pub use submit::{run_submit, SubmitRequest};
