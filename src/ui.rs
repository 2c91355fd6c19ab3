use crate::chart::{ChartKind, CHART_CONTAINER_ID};
use crate::dom::{self, Document};
use crate::presenter::{GENERAL_AVERAGES_ID, GENERAL_STATS_ID, USER_STATS_ID, USER_TASK_STATS_ID};

/// Page skeleton the statistics presenters and chart renderer fill in.
pub fn statistics_document() -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    let app = doc.append_new(body, "main", None);
    doc.set_attribute(app, "class", "app");

    let header = doc.append_new(app, "header", None);
    let title = doc.append_new(header, "h1", None);
    doc.set_text(title, "Estadísticas del proyecto");

    let charts = doc.append_new(app, "section", None);
    doc.set_attribute(charts, "class", "chart-area");
    let tabs = doc.append_new(charts, "div", None);
    doc.set_attribute(tabs, "class", "tabs");
    for kind in ChartKind::ALL {
        let button = doc.append_new(tabs, "button", Some(kind.button_id()));
        doc.set_attribute(button, "class", "tab");
        doc.set_attribute(button, "data-chart-kind", kind.slug());
        doc.set_text(button, kind.label());
    }
    let container = doc.append_new(charts, "div", Some(CHART_CONTAINER_ID));
    doc.set_attribute(container, "class", "chart-card");

    for (heading, id) in [
        ("Proyecto", GENERAL_STATS_ID),
        ("Promedios", GENERAL_AVERAGES_ID),
        ("Tus estadísticas", USER_STATS_ID),
        ("Tus tareas por estado", USER_TASK_STATS_ID),
    ] {
        let section = doc.append_new(app, "section", None);
        doc.set_attribute(section, "class", "panel");
        let h2 = doc.append_new(section, "h2", None);
        doc.set_text(h2, heading);
        let stats = doc.append_new(section, "div", Some(id));
        doc.set_attribute(stats, "class", "row");
    }

    doc
}

pub fn render_statistics_page(doc: &Document, page_path: &str) -> String {
    STATISTICS_HTML
        .replace("{{PAGE_PATH}}", &dom::escape(page_path.trim_end_matches('/')))
        .replace("{{BODY}}", &doc.inner_html(doc.body()))
}

const STATISTICS_HTML: &str = r#"<!DOCTYPE html>
<html lang="es">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Estadísticas del proyecto</title>
  <script src="https://cdn.jsdelivr.net/npm/chart.js"></script>
  <style>
    :root {
      --bg-1: #f8f3e6;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      border-radius: 28px;
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    .tabs {
      display: flex;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      border: none;
      border-radius: 999px;
      padding: 8px 14px;
      font-weight: 600;
      cursor: pointer;
      background: transparent;
      color: var(--accent-2);
    }

    .chart-card {
      background: white;
      border-radius: 18px;
      padding: 18px;
    }

    .panel .row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(180px, 1fr));
      gap: 8px;
    }
  </style>
</head>
<body data-page="{{PAGE_PATH}}">
  {{BODY}}
  <script>
    const pagePath = document.body.dataset.page;
    const container = document.getElementById('chart-container');

    const mount = (config) => {
      const previous = document.getElementById('barchart');
      if (previous) {
        previous.remove();
      }
      const canvas = document.createElement('canvas');
      canvas.id = 'barchart';
      container.appendChild(canvas);
      new Chart(canvas, config);
      canvas.scrollIntoView({ behavior: 'smooth' });
    };

    const initial = document.getElementById('barchart');
    if (initial && initial.dataset.chart) {
      new Chart(initial, JSON.parse(initial.dataset.chart));
    }

    document.querySelectorAll('[data-chart-kind]').forEach((button) => {
      button.addEventListener('click', async () => {
        const response = await fetch(`${pagePath}/grafico/${button.dataset.chartKind}`);
        if (response.ok) {
          mount(await response.json());
        }
      });
    });
  </script>
</body>
</html>
"#;
