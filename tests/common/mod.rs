#![allow(dead_code)]

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use project_dashboard::confirm::Dialogs;
use project_dashboard::{ApiClient, ResourceContext};
use serde_json::{json, Value};
use std::sync::{mpsc, Arc, Mutex};

pub const USER: &str = "ana";
pub const PROJECT: &str = "7";
/// Project whose team aggregates answer 404.
pub const PROJECT_WITHOUT_TEAMS: &str = "8";
/// Project whose team aggregates hold one row, sent as a bare object.
pub const PROJECT_WITH_ONE_TEAM: &str = "9";

const KNOWN_USERS: [&str; 5] = ["ana", "bruno", "alice", "carla", "zoe"];
const ROLES: [(i64, &str); 3] = [(1, "Líder"), (2, "Editor"), (3, "Lector")];

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub path: String,
    pub fields: Vec<(String, String)>,
}

/// In-memory stand-in for the project api.
#[derive(Clone)]
pub struct Backend {
    pub origin: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
    participants: Arc<Mutex<Vec<(String, i64)>>>,
}

impl Backend {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn posts(&self) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path.starts_with("POST "))
            .collect()
    }

    pub fn participant_role(&self, username: &str) -> Option<i64> {
        self.participants
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == username)
            .map(|(_, role)| *role)
    }

    pub fn client(&self) -> ApiClient {
        ApiClient::new(
            self.origin.clone(),
            ResourceContext::from_url(&format!("/usuario/{USER}/proyecto/{PROJECT}/integrantes")),
        )
    }

    fn record(&self, path: String, fields: Vec<(String, String)>) {
        self.requests.lock().unwrap().push(Recorded { path, fields });
    }
}

/// Starts the mock api on its own thread so it outlives any test runtime.
pub fn spawn_backend() -> Backend {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build backend runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind backend");
            let origin = format!("http://{}", listener.local_addr().unwrap());
            let backend = Backend {
                origin,
                requests: Arc::default(),
                participants: Arc::new(Mutex::new(vec![
                    ("ana".to_string(), 1),
                    ("bruno".to_string(), 2),
                ])),
            };
            tx.send(backend.clone()).unwrap();
            axum::serve(listener, backend_router(backend)).await.unwrap();
        });
    });
    rx.recv().expect("backend did not start")
}

fn backend_router(backend: Backend) -> Router {
    let base = "/api/usuario/:usuario/proyecto/:proyecto";
    Router::new()
        .route(&format!("{base}/tareas_equipo"), get(tasks_per_team))
        .route(&format!("{base}/miembros_equipo"), get(members_per_team))
        .route(&format!("{base}/estado_tareas"), get(tasks_per_state))
        .route(&format!("{base}/gral_stats"), get(general_stats))
        .route(&format!("{base}/user_stats"), get(user_stats))
        .route(&format!("{base}/integrante/agregar"), post(add_participant))
        .route(&format!("{base}/integrante/modificar"), post(update_participant))
        .route(&format!("{base}/integrante/remover"), post(remove_participant))
        .route(&format!("{base}/eliminar"), post(delete_project))
        .route("/api/usuario/:usuario/eliminar", post(delete_account))
        .route("/api/proyecto/roles", get(roles))
        .with_state(backend)
}

type Reply = (StatusCode, Json<Value>);

fn not_found() -> Reply {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"message": "El recurso solicitado no fue encontrado"})),
    )
}

fn read(backend: &Backend, project: &str, leaf: &str, body: Value) -> Reply {
    backend.record(format!("GET {leaf}"), Vec::new());
    if ![PROJECT, PROJECT_WITHOUT_TEAMS, PROJECT_WITH_ONE_TEAM].contains(&project) {
        return not_found();
    }
    (StatusCode::OK, Json(body))
}

fn read_teams(backend: &Backend, project: &str, leaf: &str, body: Value) -> Reply {
    match project {
        PROJECT_WITHOUT_TEAMS => {
            backend.record(format!("GET {leaf}"), Vec::new());
            not_found()
        }
        PROJECT_WITH_ONE_TEAM => {
            let first = body.get(0).cloned().unwrap_or(Value::Null);
            read(backend, project, leaf, first)
        }
        _ => read(backend, project, leaf, body),
    }
}

async fn tasks_per_team(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    let body = json!([{"id": 1, "nombre": "A", "total": 10}, {"id": 2, "nombre": "B", "total": 23}]);
    read_teams(&backend, &project, "tareas_equipo", body)
}

async fn members_per_team(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    let body = json!([{"id": 1, "nombre": "A", "total": 3}, {"id": 2, "nombre": "B", "total": 4}]);
    read_teams(&backend, &project, "miembros_equipo", body)
}

async fn tasks_per_state(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    let body = json!([
        {"id": 1, "nombre": "Pendiente", "total": 3},
        {"id": 2, "nombre": "Completada", "total": 5},
        {"id": 3, "nombre": "Atrasada", "total": 2}
    ]);
    read(&backend, &project, "estado_tareas", body)
}

async fn general_stats(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    let body = json!({"total_equipos": 4, "total_tareas": 10, "total_integrantes": 6});
    read(&backend, &project, "gral_stats", body)
}

async fn user_stats(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    let body = json!({
        "total_equipos": 2,
        "total_tareas": 4,
        "por_estado": [{"nombre": "Completada", "total": 1}, {"nombre": "Pendiente", "total": 3}]
    });
    read(&backend, &project, "user_stats", body)
}

async fn roles(State(backend): State<Backend>) -> Json<Value> {
    backend.record("GET roles".to_string(), Vec::new());
    let roles: Vec<Value> = ROLES
        .iter()
        .map(|(id, name)| json!({"id": id, "nombre": name}))
        .collect();
    Json(Value::Array(roles))
}

async fn form_fields(mut multipart: Multipart) -> Vec<(String, String)> {
    let mut fields = Vec::new();
    while let Ok(Some(field)) = multipart.next_field().await {
        let name = field.name().unwrap_or_default().to_string();
        let value = field.text().await.unwrap_or_default();
        fields.push((name, value));
    }
    fields
}

fn field<'a>(fields: &'a [(String, String)], name: &str) -> &'a str {
    fields
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
        .unwrap_or("")
}

fn role_errors(role: &str) -> Option<String> {
    match role.parse::<i64>() {
        Err(_) => Some("El rol seleccionado es inválido".to_string()),
        Ok(id) if !ROLES.iter().any(|(known, _)| *known == id) => {
            Some("El rol seleccionado no existe".to_string())
        }
        Ok(_) => None,
    }
}

fn role_name(id: i64) -> &'static str {
    ROLES
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| *name)
        .unwrap_or("")
}

async fn add_participant(State(backend): State<Backend>, multipart: Multipart) -> Reply {
    let fields = form_fields(multipart).await;
    backend.record("POST agregar".to_string(), fields.clone());
    let username = field(&fields, "participant_identif");
    let role = field(&fields, "role");

    let mut errors = Vec::new();
    if !KNOWN_USERS.contains(&username) {
        errors.push("El usuario indicado no fue encontrado".to_string());
    } else if backend.participant_role(username).is_some() {
        errors.push("Este usuario ya participa en el proyecto".to_string());
    }
    errors.extend(role_errors(role));
    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": errors})));
    }

    let role_id = role.parse::<i64>().unwrap_or_default();
    backend
        .participants
        .lock()
        .unwrap()
        .push((username.to_string(), role_id));
    (StatusCode::OK, Json(json!({"message": "OK"})))
}

async fn update_participant(State(backend): State<Backend>, multipart: Multipart) -> Reply {
    let fields = form_fields(multipart).await;
    backend.record("POST modificar".to_string(), fields.clone());
    let username = field(&fields, "participant_identif");
    let role = field(&fields, "role");

    let mut errors = Vec::new();
    if backend.participant_role(username).is_none() {
        errors.push("El usuario a modificar no participa del proyecto".to_string());
    }
    errors.extend(role_errors(role));
    if !errors.is_empty() {
        return (StatusCode::BAD_REQUEST, Json(json!({"message": errors})));
    }

    let role_id = role.parse::<i64>().unwrap_or_default();
    for entry in backend.participants.lock().unwrap().iter_mut() {
        if entry.0 == username {
            entry.1 = role_id;
        }
    }
    let message = format!(
        "El participante {username} ha sido establecido como {} con exito",
        role_name(role_id)
    );
    (StatusCode::OK, Json(json!({"message": message})))
}

async fn remove_participant(State(backend): State<Backend>, multipart: Multipart) -> Reply {
    let fields = form_fields(multipart).await;
    backend.record("POST remover".to_string(), fields.clone());
    let username = field(&fields, "participant_identif");

    if !KNOWN_USERS.contains(&username) {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"message": "El usuario indicado no fue encontrado"})),
        );
    }
    if backend.participant_role(username).is_none() {
        return (
            StatusCode::CONFLICT,
            Json(json!({"message": "El usuario a remover no participa del proyecto"})),
        );
    }
    backend
        .participants
        .lock()
        .unwrap()
        .retain(|(name, _)| name != username);
    let message = format!("El participante {username} ha sido removido con exito");
    (StatusCode::OK, Json(json!({"message": message})))
}

async fn delete_project(State(backend): State<Backend>, Path((_, project)): Path<(String, String)>) -> Reply {
    backend.record(format!("POST eliminar proyecto {project}"), Vec::new());
    if project != PROJECT {
        return not_found();
    }
    (StatusCode::OK, Json(json!({"message": "Eliminado exitosamente"})))
}

async fn delete_account(
    State(backend): State<Backend>,
    Path(user): Path<String>,
    multipart: Multipart,
) -> Reply {
    let fields = form_fields(multipart).await;
    backend.record(format!("POST eliminar usuario {user}"), fields.clone());
    if field(&fields, "contrasena_1") != "secreto" {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"message": "No tienes acceso al recurso autorizado"})),
        );
    }
    (StatusCode::OK, Json(json!({"message": "Eliminado exitosamente"})))
}

/// Dialogs answering from a script and remembering what was shown.
#[derive(Debug, Default)]
pub struct ScriptedDialogs {
    pub confirm_answer: bool,
    pub prompt_answer: Option<String>,
    pub confirms: Vec<String>,
    pub prompts: Vec<String>,
    pub alerts: Vec<String>,
    pub navigations: Vec<String>,
}

impl ScriptedDialogs {
    pub fn answering(confirm_answer: bool, prompt_answer: Option<&str>) -> Self {
        Self {
            confirm_answer,
            prompt_answer: prompt_answer.map(str::to_string),
            ..Self::default()
        }
    }
}

impl Dialogs for ScriptedDialogs {
    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answer
    }

    fn prompt(&mut self, message: &str) -> Option<String> {
        self.prompts.push(message.to_string());
        self.prompt_answer.clone()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn navigate(&mut self, location: &str) {
        self.navigations.push(location.to_string());
    }
}
