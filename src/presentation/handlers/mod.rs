mod download;
mod error;
mod health;
mod jobs;
mod metrics;
mod transcribe;

pub use download::download_handler;
pub use error::{ApiError, ErrorResponse};
pub use health::{health_handler, root_handler};
pub use jobs::{delete_job_handler, job_status_handler, list_jobs_handler};
pub use metrics::metrics_handler;
pub use transcribe::{sanitize_filename, transcribe_handler};
