use crate::config::Config;
use crate::conversation::Conversation;
use crate::core::error::ChatError;
use crate::display;
use crate::orchestrator::Orchestrator;
use crate::web::routes::{self, AppState, WebSession};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Local chat page backed by a single shared conversation
pub struct WebServer {
    bind_addr: SocketAddr,
    state: AppState,
}

impl WebServer {
    pub fn new(config: &Config, orchestrator: Arc<Orchestrator>) -> Self {
        Self {
            bind_addr: config.web.bind,
            state: AppState {
                orchestrator,
                session: Arc::new(Mutex::new(WebSession::new(Conversation::new(
                    config.history_limit,
                )))),
                reply_delay: config.reply_delay(),
            },
        }
    }

    pub async fn start(self) -> Result<(), ChatError> {
        let app = routes::create_router(self.state);

        let listener = tokio::net::TcpListener::bind(&self.bind_addr).await?;
        display::display_web_banner(&self.bind_addr);
        log::info!("listening on http://{}", self.bind_addr);

        axum::serve(listener, app).await?;
        Ok(())
    }
}
