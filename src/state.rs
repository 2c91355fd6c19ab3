use crate::api::ApiClient;
use crate::resources::ResourceContext;
use reqwest::Client;

#[derive(Clone)]
pub struct AppState {
    pub api_base: String,
    pub http: Client,
}

impl AppState {
    pub fn new(api_base: String) -> Self {
        Self {
            api_base,
            http: Client::new(),
        }
    }

    /// Client bound to the resources of one page, sharing the connection pool.
    pub fn api_for(&self, resources: ResourceContext, cookie: Option<String>) -> ApiClient {
        ApiClient::with_client(self.http.clone(), self.api_base.clone(), resources)
            .with_session_cookie(cookie)
    }
}
