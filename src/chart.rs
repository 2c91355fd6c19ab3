use crate::api::ApiClient;
use crate::dom::Document;
use crate::errors::ClientError;
use crate::models::StatGroup;
use serde::Serialize;
use tracing::debug;

pub const CHART_CONTAINER_ID: &str = "chart-container";
pub const CANVAS_ID: &str = "barchart";

/// The three charts a statistics page can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    MembersPerTeam,
    TasksPerTeam,
    TasksPerState,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [
        ChartKind::MembersPerTeam,
        ChartKind::TasksPerTeam,
        ChartKind::TasksPerState,
    ];

    /// Endpoint leaf, also used as the url slug of the chart route.
    pub fn slug(self) -> &'static str {
        match self {
            ChartKind::MembersPerTeam => "miembros_equipo",
            ChartKind::TasksPerTeam => "tareas_equipo",
            ChartKind::TasksPerState => "estado_tareas",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.slug() == slug)
    }

    pub fn button_id(self) -> &'static str {
        match self {
            ChartKind::MembersPerTeam => "mpt-btn",
            ChartKind::TasksPerTeam => "tpt-btn",
            ChartKind::TasksPerState => "tps-btn",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChartKind::MembersPerTeam => "Total de miembros por equipo",
            ChartKind::TasksPerTeam => "Total de tareas por equipo",
            ChartKind::TasksPerState => "Total de tareas por estado",
        }
    }

    pub async fn fetch(self, api: &ApiClient) -> Result<Vec<StatGroup>, ClientError> {
        match self {
            ChartKind::MembersPerTeam => api.members_per_team().await,
            ChartKind::TasksPerTeam => api.tasks_per_team().await,
            ChartKind::TasksPerState => api.tasks_per_state().await,
        }
    }
}

/// Bar chart configuration in the shape Chart.js expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartConfig {
    #[serde(rename = "type")]
    pub chart_type: &'static str,
    pub data: ChartData,
    pub options: ChartOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub border_width: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartOptions {
    pub scales: Scales,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scales {
    pub y: YAxis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YAxis {
    pub begin_at_zero: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<u64>,
    pub ticks: Ticks,
}

/// `precision: 0` keeps only integer tick labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ticks {
    pub precision: u8,
}

/// Smallest multiple of 5 at or above the largest total. `None` without data,
/// leaving the axis to the chart library.
pub fn y_axis_max(data: &[StatGroup]) -> Option<u64> {
    data.iter()
        .map(|group| group.total)
        .max()
        .map(|max| max.div_ceil(5) * 5)
}

pub fn build_chart(label: &str, data: &[StatGroup]) -> ChartConfig {
    ChartConfig {
        chart_type: "bar",
        data: ChartData {
            labels: data.iter().map(|group| group.name.clone()).collect(),
            datasets: vec![Dataset {
                label: label.to_string(),
                data: data.iter().map(|group| group.total).collect(),
                border_width: 3,
            }],
        },
        options: ChartOptions {
            scales: Scales {
                y: YAxis {
                    begin_at_zero: true,
                    max: y_axis_max(data),
                    ticks: Ticks { precision: 0 },
                },
            },
        },
    }
}

/// Replaces `#barchart` inside the chart container with a fresh canvas
/// carrying the configuration in `data-chart`, then scrolls to it.
pub fn render_chart(
    doc: &mut Document,
    label: &str,
    data: &[StatGroup],
) -> Result<ChartConfig, ClientError> {
    let container = doc.require_element(CHART_CONTAINER_ID)?;
    if let Some(previous) = doc.find_by_id(container, CANVAS_ID) {
        doc.remove(previous);
    }

    let config = build_chart(label, data);
    let payload = serde_json::to_string(&config).map_err(ClientError::internal)?;
    let canvas = doc.append_new(container, "canvas", Some(CANVAS_ID));
    doc.set_attribute(canvas, "data-chart", &payload);
    doc.scroll_into_view(canvas);
    debug!(label, groups = data.len(), "chart mounted");

    Ok(config)
}

/// Fetches the groups behind `kind` and mounts its chart.
pub async fn show_chart(
    doc: &mut Document,
    api: &ApiClient,
    kind: ChartKind,
) -> Result<ChartConfig, ClientError> {
    let data = kind.fetch(api).await?;
    render_chart(doc, kind.label(), &data)
}
