//! Shared application state

use std::sync::Arc;

use folio_engine::Site;

#[derive(Clone)]
pub struct AppState {
    site: Arc<Site>,
}

impl AppState {
    pub fn new(site: Site) -> Self {
        Self {
            site: Arc::new(site),
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }
}
