//! In-process credential store used by the flow and router tests.

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use uuid::Uuid;

use crate::auth::repo::{CredentialStore, StoreError};
use crate::auth::repo_types::{NewUser, Role, UserRecord};

#[derive(Default)]
pub struct MemoryCredentialStore {
    rows: Mutex<Vec<UserRecord>>,
    offline: AtomicBool,
    national_id_lookups: AtomicUsize,
    account_name_lookups: AtomicUsize,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call fail as if the database were down.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Adds a pre-provisioned row (admins, couriers) the way an operator would.
    pub fn provision(&self, account_name: &str, role: Role, password_hash: String) -> Uuid {
        let id = Uuid::new_v4();
        let mut rows = self.rows.lock().expect("store mutex poisoned");
        rows.push(UserRecord {
            id,
            national_id: None,
            first_name: "Staff".into(),
            last_name: account_name.into(),
            email: format!("{account_name}@delivery.local"),
            account_name: Some(account_name.into()),
            password_hash,
            role,
        });
        id
    }

    pub fn rows(&self) -> Vec<UserRecord> {
        self.rows.lock().expect("store mutex poisoned").clone()
    }

    /// (national id lookups, account name lookups) performed so far.
    pub fn lookups(&self) -> (usize, usize) {
        (
            self.national_id_lookups.load(Ordering::SeqCst),
            self.account_name_lookups.load(Ordering::SeqCst),
        )
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Connection(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn insert_user(&self, user: &NewUser) -> Result<(), StoreError> {
        self.check_online()?;
        let blank = user.blank_fields();
        if !blank.is_empty() {
            return Err(StoreError::Validation(format!(
                "missing fields: {}",
                blank.join(", ")
            )));
        }

        let mut rows = self.rows.lock().expect("store mutex poisoned");
        if rows
            .iter()
            .any(|r| r.national_id.as_deref() == Some(user.national_id.as_str()))
        {
            return Err(StoreError::DuplicateKey { field: "cedula" });
        }
        if rows.iter().any(|r| r.email == user.email) {
            return Err(StoreError::DuplicateKey { field: "email" });
        }

        rows.push(UserRecord {
            id: Uuid::new_v4(),
            national_id: Some(user.national_id.clone()),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            account_name: None,
            password_hash: user.password_hash.clone(),
            role: Role::Client,
        });
        Ok(())
    }

    async fn find_by_national_id(&self, id: &str) -> Result<Option<UserRecord>, StoreError> {
        self.national_id_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let rows = self.rows.lock().expect("store mutex poisoned");
        Ok(rows
            .iter()
            .find(|r| r.national_id.as_deref() == Some(id))
            .cloned())
    }

    async fn find_by_account_name(&self, name: &str) -> Result<Option<UserRecord>, StoreError> {
        self.account_name_lookups.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        let rows = self.rows.lock().expect("store mutex poisoned");
        Ok(rows
            .iter()
            .find(|r| r.account_name.as_deref() == Some(name))
            .cloned())
    }
}
