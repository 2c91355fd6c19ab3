use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One aggregate row from the statistics api.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(rename = "nombre")]
    pub name: String,
    pub total: u64,
}

impl StatGroup {
    pub fn new(name: impl Into<String>, total: u64) -> Self {
        Self {
            id: None,
            name: name.into(),
            total,
        }
    }
}

/// Aggregate endpoints send a bare object instead of a list when there is a
/// single row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum StatGroups {
    One(StatGroup),
    Many(Vec<StatGroup>),
}

impl From<StatGroups> for Vec<StatGroup> {
    fn from(groups: StatGroups) -> Self {
        match groups {
            StatGroups::One(group) => vec![group],
            StatGroups::Many(groups) => groups,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
}

/// Flat object of named project counts, kept in server order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GeneralStats {
    pub fields: Map<String, Value>,
}

impl GeneralStats {
    pub fn count(&self, key: &str) -> f64 {
        number_field(&self.fields, key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    #[serde(rename = "por_estado", default)]
    pub per_state: Vec<StatGroup>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl UserStats {
    pub fn total_tasks(&self) -> f64 {
        number_field(&self.fields, "total_tareas")
    }
}

fn number_field(fields: &Map<String, Value>, key: &str) -> f64 {
    fields.get(key).and_then(Value::as_f64).unwrap_or(f64::NAN)
}

/// The `message` field of write responses: one string or a list of them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    One(String),
    Many(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: MessageBody,
}

impl MessageResponse {
    pub fn into_messages(self) -> Vec<String> {
        match self.message {
            MessageBody::One(message) => vec![message],
            MessageBody::Many(messages) => messages,
        }
    }
}

/// Outcome of a write request, handed back so callers branch on the status.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiReply {
    pub status: StatusCode,
    pub messages: Vec<String>,
}

impl ApiReply {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK
    }
}
