use std::sync::Arc;

use crate::wizard::FormSession;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one form being filled in. A single user per process.
    pub session: Arc<FormSession>,
}
