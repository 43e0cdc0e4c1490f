//! Application session: the signed-in user, the menu and the shared page
//! source, handed explicitly to every view that needs them.

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::info;

use crate::config::Config;
use crate::pager::{ListView, PagerSettings};
use crate::source::{HttpPageSource, PageSource};

/// The user the session runs as
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentUser {
    pub name: String,
}

impl CurrentUser {
    pub fn anonymous() -> Self {
        Self {
            name: "guest".to_string(),
        }
    }
}

/// A navigation entry offered to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MenuEntry {
    pub label: String,
    pub path: String,
}

pub struct AppSession {
    config: Config,
    source: Arc<dyn PageSource>,
    user: CurrentUser,
    menus: Vec<MenuEntry>,
}

impl AppSession {
    /// Start a session against the board API described by `config`
    pub fn start(config: Config) -> Result<Self> {
        config.validate()?;
        let source = HttpPageSource::new(&config)?;
        Ok(Self::with_source(config, Arc::new(source)))
    }

    /// Start a session over an existing source
    pub fn with_source(config: Config, source: Arc<dyn PageSource>) -> Self {
        let user = config
            .user_name
            .clone()
            .map(|name| CurrentUser { name })
            .unwrap_or_else(CurrentUser::anonymous);

        let menus = vec![MenuEntry {
            label: "Posts".to_string(),
            path: config.list_path.clone(),
        }];

        info!("Session started for {} using {} source", user.name, source.name());
        Self {
            config,
            source,
            user,
            menus,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn user(&self) -> &CurrentUser {
        &self.user
    }

    pub fn menus(&self) -> &[MenuEntry] {
        &self.menus
    }

    pub fn source(&self) -> Arc<dyn PageSource> {
        Arc::clone(&self.source)
    }

    /// Activate a fresh list view. Each call starts from an empty cache.
    pub async fn open_list_view(&self) -> ListView {
        ListView::activate(self.source(), PagerSettings::from_config(&self.config)).await
    }

    /// Activate a fresh list view whose first page is fetched at `page_size`
    /// instead of the configured default.
    pub async fn open_list_view_with_page_size(&self, page_size: usize) -> ListView {
        let settings = PagerSettings {
            default_page_size: page_size,
            ..PagerSettings::from_config(&self.config)
        };
        ListView::activate(self.source(), settings).await
    }

    pub fn shutdown(self) {
        info!("Session for {} ended", self.user.name);
    }
}
