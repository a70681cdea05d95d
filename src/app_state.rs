use std::sync::Arc;

use crate::gate::PermissionGate;
use crate::store::ReviewStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReviewStore>,
    pub gate: Arc<dyn PermissionGate>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReviewStore>, gate: Arc<dyn PermissionGate>) -> Self {
        Self { store, gate }
    }
}
