//! `localStorage` persistence for the order form and the reseller flag.
use crate::dom;
use thiserror::Error;
use topup_core::{FormStore, PersistedForm, Session};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("localStorage is unavailable")]
    Unavailable,
    #[error("localStorage rejected the operation: {0}")]
    Rejected(String),
    #[error("saved form is not valid json: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Order form persisted under a single `localStorage` key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFormStore {
    key: String,
}

impl LocalFormStore {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl FormStore for LocalFormStore {
    type Error = StorageError;

    fn load_form(&self) -> Result<Option<PersistedForm>, Self::Error> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        let raw = storage
            .get_item(&self.key)
            .map_err(|err| StorageError::Rejected(dom::js_error_message(&err)))?;
        raw.map(|json| serde_json::from_str(&json))
            .transpose()
            .map_err(StorageError::from)
    }

    fn save_form(&self, form: &PersistedForm) -> Result<(), Self::Error> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        let json = serde_json::to_string(form)?;
        storage
            .set_item(&self.key, &json)
            .map_err(|err| StorageError::Rejected(dom::js_error_message(&err)))
    }

    fn clear_form(&self) -> Result<(), Self::Error> {
        let storage = dom::local_storage().ok_or(StorageError::Unavailable)?;
        storage
            .remove_item(&self.key)
            .map_err(|err| StorageError::Rejected(dom::js_error_message(&err)))
    }
}

/// Read the reseller flag once, at startup.
#[must_use]
pub fn load_session(flag_key: &str) -> Session {
    let raw = dom::local_storage().and_then(|storage| storage.get_item(flag_key).ok().flatten());
    Session::from_flag(raw.as_deref())
}
