use axum::http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub struct ClientError {
    pub status: StatusCode,
    pub message: String,
}

impl ClientError {
    pub fn api(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn transport(err: reqwest::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: err.to_string(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }

    pub fn decode(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: format!("unexpected response body: {err}"),
        }
    }

    pub fn missing_resource(kind: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: format!("url has no '{kind}' segment"),
        }
    }

    pub fn missing_element(id: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("document has no element '{id}'"),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message, self.status)
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::transport(err)
    }
}

impl axum::response::IntoResponse for ClientError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
