use std::sync::Arc;

use crate::chat::ChatHub;
use crate::config::Config;
use crate::market::MarketDesk;
use crate::recruit::RecruitDesk;

/// Shared application state injected into all route handlers via Axum extractors.
/// One desk per pipeline; the pipelines share no components.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub market: Arc<MarketDesk>,
    pub recruit: Arc<RecruitDesk>,
    pub chat: Arc<ChatHub>,
}
