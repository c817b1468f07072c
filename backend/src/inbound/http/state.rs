//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on the auth service
//! and the page renderer, so tests can wire in-memory collaborators.

use std::sync::Arc;

use crate::domain::AuthService;

use super::pages::PageRenderer;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<AuthService>,
    pub pages: Arc<dyn PageRenderer>,
}

impl HttpState {
    pub fn new(auth: Arc<AuthService>, pages: Arc<dyn PageRenderer>) -> Self {
        Self { auth, pages }
    }
}
