pub mod commands;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod storage;

pub use error::{AppError, AppResult};

/// Loads `.env` from the working directory and its parents. Values already
/// in the environment take precedence.
pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename("../.env");
    let _ = dotenvy::from_filename("../../.env");
}
