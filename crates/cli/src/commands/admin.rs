//! Admin role management.
//!
//! Role changes happen only here. The account must already exist (register
//! through the normal flow first), and the change takes effect on the user's
//! next request because the server re-reads the role per request.

use secrecy::SecretString;
use thiserror::Error;

use loomline_core::{Email, Role};
use loomline_server::db::users::UserRepository;
use loomline_server::db::{self, RepositoryError};

/// Errors that can occur during role changes.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No account with that email.
    #[error("No account with email: {0}")]
    NoSuchUser(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Database connection error.
    #[error("Connection error: {0}")]
    Connection(#[from] sqlx::Error),
}

/// Set an account's role by email.
pub async fn set_role(email: &str, role: Role) -> Result<(), AdminError> {
    dotenvy::dotenv().ok();

    let email = Email::parse(email).map_err(|e| AdminError::InvalidEmail(e.to_string()))?;

    let database_url = std::env::var("DATABASE_URL")
        .map(SecretString::from)
        .map_err(|_| AdminError::MissingEnvVar("DATABASE_URL"))?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&database_url).await?;

    let user = UserRepository::new(&pool)
        .set_role(&email, role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::NoSuchUser(email.to_string()),
            other => AdminError::Database(other),
        })?;

    tracing::info!("{} is now role '{}'", user.email, user.role);
    Ok(())
}
