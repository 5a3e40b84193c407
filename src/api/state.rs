use std::sync::Arc;

use crate::observability::Metrics;
use crate::queue::Inbox;

#[derive(Clone)]
pub struct AppState {
    pub inbox: Inbox,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(inbox: Inbox, metrics: Arc<Metrics>) -> Self {
        Self { inbox, metrics }
    }
}
