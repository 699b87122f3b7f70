use std::sync::{Arc, RwLock};

use crate::config::SiteConfig;
use crate::dto::admin_dto::{SiteSettings, UpdateSiteSettingsRequest};
use crate::error::{Error, Result};

/// Site-wide settings editable from the admin console. Seeded from config
/// and held in memory, so edits last until the process restarts.
#[derive(Clone)]
pub struct SettingsService {
    current: Arc<RwLock<SiteSettings>>,
}

impl SettingsService {
    pub fn new(site: &SiteConfig) -> Self {
        Self {
            current: Arc::new(RwLock::new(SiteSettings {
                site_title: site.title.clone(),
                site_description: site.description.clone(),
                admin_email: site.admin_email.clone(),
                allow_registration: site.allow_registration,
            })),
        }
    }

    pub fn get(&self) -> Result<SiteSettings> {
        let guard = self
            .current
            .read()
            .map_err(|_| Error::Internal("settings lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    /// Applies only the fields present in the request and returns the full settings.
    pub fn update(&self, payload: UpdateSiteSettingsRequest) -> Result<SiteSettings> {
        let mut guard = self
            .current
            .write()
            .map_err(|_| Error::Internal("settings lock poisoned".to_string()))?;
        if let Some(title) = payload.site_title {
            guard.site_title = title;
        }
        if let Some(description) = payload.site_description {
            guard.site_description = description;
        }
        if let Some(email) = payload.admin_email {
            guard.admin_email = email;
        }
        if let Some(allow) = payload.allow_registration {
            guard.allow_registration = allow;
        }
        tracing::info!(allow_registration = guard.allow_registration, "site settings updated");
        Ok(guard.clone())
    }

    pub fn registration_open(&self) -> Result<bool> {
        Ok(self.get()?.allow_registration)
    }
}
