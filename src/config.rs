use std::env;

const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
const DEFAULT_PORT: u16 = 8080;

/// Origin of the backend api the dashboard reads from.
pub fn resolve_api_base() -> String {
    match env::var("API_BASE_URL") {
        Ok(value) if !value.trim().is_empty() => value.trim().trim_end_matches('/').to_string(),
        _ => DEFAULT_API_BASE.to_string(),
    }
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}
