use axum::http::StatusCode;

use crate::error::DialogueError;

pub type ApiResult<T> = Result<T, (StatusCode, String)>;

pub fn bad_request(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, msg.into())
}

pub fn not_found(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, msg.into())
}

pub fn internal_error(msg: impl Into<String>) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, msg.into())
}

/// Maps orchestrator failures onto status codes: the surfaced request
/// error kinds become 400s, anything else a 500.
pub fn turn_error(err: DialogueError) -> (StatusCode, String) {
    if err.is_request_error() {
        bad_request(err.to_string())
    } else {
        internal_error(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_errors_map_to_bad_request() {
        let (status, _) = turn_error(DialogueError::MissingHistory);
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _) = turn_error(DialogueError::InvalidMode("spectator".into()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn other_errors_map_to_internal() {
        let (status, _) = turn_error(DialogueError::InvalidCatalog("broken".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
