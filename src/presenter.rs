use crate::api::ApiClient;
use crate::dom::Document;
use crate::errors::ClientError;
use crate::models::{GeneralStats, StatGroup, UserStats};
use serde_json::Value;

pub const GENERAL_STATS_ID: &str = "gral_stats";
pub const GENERAL_AVERAGES_ID: &str = "gral_stats_averages";
pub const USER_STATS_ID: &str = "user_stats";
pub const USER_TASK_STATS_ID: &str = "user_task_stats";

/// Task states the derived percentages look for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStateKind {
    Completed,
    Late,
}

impl TaskStateKind {
    pub fn api_name(self) -> &'static str {
        match self {
            TaskStateKind::Completed => "Completada",
            TaskStateKind::Late => "Atrasada",
        }
    }

    /// Total of the matching group, 0 when the state is absent.
    pub fn total_in(self, groups: &[StatGroup]) -> u64 {
        groups
            .iter()
            .find(|group| group.name == self.api_name())
            .map(|group| group.total)
            .unwrap_or(0)
    }
}

/// Formats a derived value; non-finite results (division by zero, missing
/// counts) become `"0"`.
pub fn guard_number(value: f64) -> String {
    if value.is_finite() {
        value.to_string()
    } else {
        "0".to_string()
    }
}

pub fn percentage(part: f64, whole: f64) -> String {
    format!("{}%", guard_number(part * 100.0 / whole))
}

/// `total_tareas` -> `Total tareas`.
pub fn humanize_key(key: &str) -> String {
    let mut chars = key.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    capitalized.replace('_', " ")
}

pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Averages and percentages shown under the general stats.
pub fn derive_general(stats: &GeneralStats, per_state: &[StatGroup]) -> Vec<(String, String)> {
    let total_tasks = stats.count("total_tareas");
    let completed = TaskStateKind::Completed.total_in(per_state) as f64;
    let late = TaskStateKind::Late.total_in(per_state) as f64;

    vec![
        (
            "promedio_tareas_equipo".to_string(),
            guard_number(total_tasks / stats.count("total_equipos")),
        ),
        (
            "porcentaje_tareas_completadas".to_string(),
            percentage(completed, total_tasks),
        ),
        (
            "porcentaje_tareas_atrasadas".to_string(),
            percentage(late, total_tasks),
        ),
    ]
}

/// Flat user fields followed by the completion percentage.
pub fn derive_user(stats: &UserStats) -> Vec<(String, String)> {
    let completed = TaskStateKind::Completed.total_in(&stats.per_state) as f64;
    let mut pairs: Vec<(String, String)> = stats
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect();
    pairs.push((
        "porcentaje_tareas_completadas".to_string(),
        percentage(completed, stats.total_tasks()),
    ));
    pairs
}

/// Appends one `<p class="col">Label: value</p>` per pair to `container_id`.
pub fn render_pairs(
    doc: &mut Document,
    container_id: &str,
    pairs: &[(String, String)],
) -> Result<(), ClientError> {
    let container = doc.require_element(container_id)?;
    for (key, value) in pairs {
        let paragraph = doc.append_new(container, "p", None);
        doc.set_attribute(paragraph, "class", "col");
        doc.set_text(paragraph, &format!("{}: {value}", humanize_key(key)));
    }
    Ok(())
}

pub async fn show_project_stats(doc: &mut Document, api: &ApiClient) -> Result<(), ClientError> {
    let stats = api.general_stats().await?;
    let per_state = api.tasks_per_state().await?;

    let pairs: Vec<(String, String)> = stats
        .fields
        .iter()
        .map(|(key, value)| (key.clone(), display_value(value)))
        .collect();
    render_pairs(doc, GENERAL_STATS_ID, &pairs)?;
    render_pairs(doc, GENERAL_AVERAGES_ID, &derive_general(&stats, &per_state))
}

pub async fn show_user_stats(doc: &mut Document, api: &ApiClient) -> Result<(), ClientError> {
    let stats = api.user_stats().await?;
    render_pairs(doc, USER_STATS_ID, &derive_user(&stats))?;

    let per_state: Vec<(String, String)> = stats
        .per_state
        .iter()
        .map(|group| (group.name.clone(), group.total.to_string()))
        .collect();
    render_pairs(doc, USER_TASK_STATS_ID, &per_state)
}
