use crate::errors::ClientError;
use crate::models::{ApiReply, GeneralStats, MessageResponse, Role, StatGroup, StatGroups, UserStats};
use crate::resources::ResourceContext;
use axum::http::StatusCode;
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Calls the backend endpoints that belong to one page's resources.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    origin: String,
    resources: ResourceContext,
    session_cookie: Option<String>,
}

impl ApiClient {
    pub fn new(origin: impl Into<String>, resources: ResourceContext) -> Self {
        Self::with_client(Client::new(), origin, resources)
    }

    pub fn with_client(http: Client, origin: impl Into<String>, resources: ResourceContext) -> Self {
        Self {
            http,
            origin: origin.into().trim_end_matches('/').to_string(),
            resources,
            session_cookie: None,
        }
    }

    /// Forwards the visitor's `Cookie` header on every request.
    pub fn with_session_cookie(mut self, cookie: Option<String>) -> Self {
        self.session_cookie = cookie;
        self
    }

    pub fn resources(&self) -> &ResourceContext {
        &self.resources
    }

    pub async fn tasks_per_team(&self) -> Result<Vec<StatGroup>, ClientError> {
        self.get_stat_groups("tareas_equipo").await
    }

    pub async fn members_per_team(&self) -> Result<Vec<StatGroup>, ClientError> {
        self.get_stat_groups("miembros_equipo").await
    }

    pub async fn tasks_per_state(&self) -> Result<Vec<StatGroup>, ClientError> {
        self.get_stat_groups("estado_tareas").await
    }

    pub async fn general_stats(&self) -> Result<GeneralStats, ClientError> {
        self.get_project_json("gral_stats").await
    }

    pub async fn user_stats(&self) -> Result<UserStats, ClientError> {
        self.get_project_json("user_stats").await
    }

    pub async fn project_roles(&self) -> Result<Vec<Role>, ClientError> {
        self.get_json("/api/proyecto/roles").await
    }

    pub async fn add_participant(&self, identifier: &str, role: &str) -> Result<ApiReply, ClientError> {
        let form = Form::new()
            .text("participant_identif", identifier.to_string())
            .text("role", role.to_string());
        self.post_participant("agregar", form).await
    }

    pub async fn update_participant(&self, identifier: &str, role: &str) -> Result<ApiReply, ClientError> {
        let form = Form::new()
            .text("participant_identif", identifier.to_string())
            .text("role", role.to_string());
        self.post_participant("modificar", form).await
    }

    pub async fn remove_participant(&self, identifier: &str) -> Result<ApiReply, ClientError> {
        let form = Form::new().text("participant_identif", identifier.to_string());
        self.post_participant("remover", form).await
    }

    pub async fn delete_project(&self, project_id: &str) -> Result<ApiReply, ClientError> {
        let path = format!("{}/proyecto/{project_id}/eliminar", self.resources.user_api_base()?);
        self.post_form(&path, None).await
    }

    pub async fn delete_account(&self, password: &str, confirmation: &str) -> Result<ApiReply, ClientError> {
        let path = format!("{}/eliminar", self.resources.user_api_base()?);
        let form = Form::new()
            .text("contrasena_1", password.to_string())
            .text("contrasena_2", confirmation.to_string());
        self.post_form(&path, Some(form)).await
    }

    async fn post_participant(&self, action: &str, form: Form) -> Result<ApiReply, ClientError> {
        let path = format!("{}/integrante/{action}", self.resources.project_api_base()?);
        self.post_form(&path, Some(form)).await
    }

    async fn get_stat_groups(&self, leaf: &str) -> Result<Vec<StatGroup>, ClientError> {
        let groups: StatGroups = self.get_project_json(leaf).await?;
        Ok(groups.into())
    }

    async fn get_project_json<T: DeserializeOwned>(&self, leaf: &str) -> Result<T, ClientError> {
        let path = format!("{}/{leaf}", self.resources.project_api_base()?);
        self.get_json(&path).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        debug!(%path, "GET");
        let response = self.send(self.http.get(self.url(path))).await?;
        let status = response.status();
        if !status.is_success() {
            let messages = read_messages(response, status).await;
            warn!(%path, %status, "read request rejected");
            return Err(ClientError::api(status, messages.join("; ")));
        }
        response.json::<T>().await.map_err(ClientError::decode)
    }

    async fn post_form(&self, path: &str, form: Option<Form>) -> Result<ApiReply, ClientError> {
        debug!(%path, "POST");
        let mut request = self.http.post(self.url(path));
        if let Some(form) = form {
            request = request.multipart(form);
        }
        let response = self.send(request).await?;
        let status = response.status();
        let messages = read_messages(response, status).await;
        if !status.is_success() {
            warn!(%path, %status, "write request rejected");
        }
        Ok(ApiReply { status, messages })
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = match &self.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie),
            None => request,
        };
        Ok(request.send().await?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.origin)
    }
}

/// Messages from a `{message}` body; bodies of any other shape fall back to
/// the status reason.
async fn read_messages(response: Response, status: StatusCode) -> Vec<String> {
    match response.json::<MessageResponse>().await {
        Ok(body) => body.into_messages(),
        Err(_) => vec![status.canonical_reason().unwrap_or("error").to_string()],
    }
}

