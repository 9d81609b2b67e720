//! Error types for kibana-exporter
//!
//! This module defines the error types used throughout the application.

use thiserror::Error;

/// 응답 본문 스니펫 최대 길이 (바이트)
pub const MAX_BODY_SNIPPET: usize = 1024;

/// Kibana status 클라이언트 에러 타입
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP 클라이언트 초기화 실패
    #[error("Failed to initialize HTTP client: {0}")]
    Init(#[source] reqwest::Error),

    /// 네트워크 에러 (연결 실패, 타임아웃, 전송 에러)
    #[error("Request to Kibana failed: {0}")]
    Network(#[source] reqwest::Error),

    /// 200 이외의 HTTP 상태 코드
    #[error("Unexpected status {status} from Kibana{}", body_suffix(.body))]
    UnexpectedStatus { status: u16, body: String },

    /// 응답 본문 JSON 디코딩 실패
    #[error("Failed to decode Kibana status: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ClientError {
    /// 타임아웃으로 인한 에러인지 확인
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Network(e) if e.is_timeout())
    }

    /// HTTP 상태 코드 추출
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ClientError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Build an `UnexpectedStatus` error, truncating the body to a snippet
    pub fn unexpected_status(status: u16, body: &str) -> Self {
        ClientError::UnexpectedStatus {
            status,
            body: snippet(body, MAX_BODY_SNIPPET).to_string(),
        }
    }
}

fn body_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

/// Truncate `s` to at most `max` bytes without splitting a character
fn snippet(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
