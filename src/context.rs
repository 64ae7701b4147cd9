//! Application context
//!
//! Owns the paths, settings, active user and storage for the lifetime of the
//! process. Front ends create one at start and pass it to every command.

use chrono::{Local, NaiveDate};

use crate::audit::EntityType;
use crate::config::{LedgerPaths, Settings, Theme};
use crate::error::LedgerResult;
use crate::models::UserId;
use crate::storage::Storage;

pub struct AppContext {
    settings: Settings,
    user_id: UserId,
    storage: Storage,
}

impl AppContext {
    /// Open the ledger under `paths`, loading settings and both collections.
    /// A user identity is created and saved on first use.
    pub fn open(paths: LedgerPaths) -> LedgerResult<Self> {
        let mut settings = Settings::load_or_create(&paths)?;
        let had_user = settings.active_user.is_some();
        let user_id = settings.ensure_active_user();
        if !had_user {
            settings.save(&paths)?;
        }

        let storage = Storage::new(paths)?;
        if let Err(e) = storage.load_all() {
            storage.log_failure(Some(user_id), EntityType::Transaction, "load", &e);
            return Err(e);
        }

        Ok(Self {
            settings,
            user_id,
            storage,
        })
    }

    /// Open using the data directory from the environment or platform
    pub fn from_env() -> LedgerResult<Self> {
        Self::open(LedgerPaths::new()?)
    }

    pub fn paths(&self) -> &LedgerPaths {
        self.storage.paths()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Local calendar date
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Set the theme, or toggle it when `theme` is `None`
    pub fn set_theme(&mut self, theme: Option<Theme>) -> LedgerResult<Theme> {
        let theme = theme.unwrap_or_else(|| self.settings.theme.toggled());
        self.settings.theme = theme;
        self.settings.save(self.storage.paths())?;
        Ok(theme)
    }

    /// Switch to another user's records
    pub fn set_active_user(&mut self, user_id: UserId) -> LedgerResult<()> {
        self.settings.active_user = Some(user_id);
        self.settings.save(self.storage.paths())?;
        self.user_id = user_id;
        Ok(())
    }
}
