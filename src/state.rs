use crate::auth::password::PasswordHasher;
use crate::auth::repo::{CredentialStore, PgCredentialStore};
use crate::config::AppConfig;
use crate::db;
use std::sync::Arc;

/// Everything a handler needs, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CredentialStore>,
    pub hasher: PasswordHasher,
}

impl AppState {
    pub async fn init(config: &AppConfig) -> anyhow::Result<Self> {
        let pool = db::connect(config).await?;
        db::migrate(&pool).await;

        let store = Arc::new(PgCredentialStore::new(pool)) as Arc<dyn CredentialStore>;
        let hasher = PasswordHasher::new(&config.hasher)?;

        Ok(Self::from_parts(store, hasher))
    }

    pub fn from_parts(store: Arc<dyn CredentialStore>, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    #[cfg(test)]
    pub fn fake(store: Arc<dyn CredentialStore>) -> Self {
        Self::from_parts(store, PasswordHasher::fast())
    }
}
