use crate::config::AppConfig;
use axum::extract::FromRef;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;
use trailhub_database::Database;
use trailhub_mailer::Mailer;

#[derive(Debug, thiserror::Error)]
pub enum AppStateError {
    #[error("State validation error: {message}")]
    Validation { message: Cow<'static, str> },
}

#[derive(Debug)]
pub struct AppStateInner {
    pub config: AppConfig,
    pub database: Database,
    pub mailer: Mailer,
}

/// Shared application state handed to every feature router.
#[derive(Debug, Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

impl AppState {
    #[must_use]
    pub fn builder() -> AppStateBuilder {
        AppStateBuilder::default()
    }
}

impl Deref for AppState {
    type Target = AppStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(state: &AppState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<AppState> for Database {
    fn from_ref(state: &AppState) -> Self {
        state.inner.database.clone()
    }
}

impl FromRef<AppState> for Mailer {
    fn from_ref(state: &AppState) -> Self {
        state.inner.mailer.clone()
    }
}

#[derive(Debug, Default)]
pub struct AppStateBuilder {
    config: Option<AppConfig>,
    database: Option<Database>,
    mailer: Option<Mailer>,
}

impl AppStateBuilder {
    #[must_use]
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn db(mut self, database: Database) -> Self {
        self.database = Some(database);
        self
    }

    #[must_use]
    pub fn mailer(mut self, mailer: Mailer) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Finalizes the state.
    ///
    /// # Errors
    /// Returns an error if the configuration or the database handle is missing.
    pub fn build(self) -> Result<AppState, AppStateError> {
        let config = self.config.ok_or(AppStateError::Validation {
            message: "AppConfig not provided".into(),
        })?;
        let database = self.database.ok_or(AppStateError::Validation {
            message: "Database not provided".into(),
        })?;
        let mailer = self.mailer.unwrap_or_else(|| Mailer::new(config.mail.clone()));

        Ok(AppState { inner: Arc::new(AppStateInner { config, database, mailer }) })
    }
}
