mod error;
mod execute;
mod io;
mod report;
mod spec;

#[cfg(test)]
mod tests;

pub use error::{Result, WorkflowError};
pub use execute::{rasterize_plan, run_view};
pub use io::{load_spec, save_report};
pub use report::ViewReport;
pub use spec::{SpecToggles, ViewSpec};
