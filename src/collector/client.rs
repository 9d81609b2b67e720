//! Kibana HTTP 클라이언트
//!
//! Connection pooling과 타임아웃을 지원하는 비동기 HTTP 클라이언트입니다.
//! 호출당 요청은 정확히 한 번이며 재시도하지 않습니다.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder, Response, StatusCode};
use tracing::{debug, instrument};

use super::status::{parse_status, StatusDocument};
use super::StatusSource;
use crate::config::KibanaConfig;
use crate::error::{ClientError, ClientResult, MAX_BODY_SNIPPET};

/// Kibana status API 경로
pub const STATUS_PATH: &str = "/api/status";

/// Kibana HTTP 클라이언트
///
/// 내부 `reqwest::Client`는 동시 사용이 안전하므로 수집과 readiness 체크가
/// 하나의 인스턴스를 공유합니다.
#[derive(Clone)]
pub struct KibanaClient {
    client: Client,
    status_url: String,
    auth: Option<(String, Option<String>)>,
}

impl std::fmt::Debug for KibanaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KibanaClient")
            .field("status_url", &self.status_url)
            .field("auth", &self.auth.as_ref().map(|(user, _)| user))
            .finish()
    }
}

impl KibanaClient {
    /// 새 클라이언트 생성
    ///
    /// # Arguments
    /// * `base_url` - Kibana URL (예: "http://localhost:5601")
    /// * `timeout_ms` - 요청 전체에 적용되는 타임아웃 (밀리초)
    /// * `insecure_skip_verify` - TLS 인증서 검증 생략 여부
    ///
    /// # Example
    /// ```ignore
    /// let client = KibanaClient::new("http://localhost:5601", 10_000, false)?;
    /// ```
    pub fn new(base_url: &str, timeout_ms: u64, insecure_skip_verify: bool) -> ClientResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Duration::from_secs(30))
            .danger_accept_invalid_certs(insecure_skip_verify)
            .build()
            .map_err(ClientError::Init)?;

        Ok(Self {
            client,
            status_url: format!("{}{}", base_url.trim_end_matches('/'), STATUS_PATH),
            auth: None,
        })
    }

    /// 설정으로부터 클라이언트 생성 (username이 있으면 Basic Auth 적용)
    pub fn from_config(config: &KibanaConfig) -> ClientResult<Self> {
        let client = Self::new(&config.url, config.timeout_ms, config.insecure_skip_verify)?;
        Ok(match config.username.as_deref() {
            Some(username) if !username.is_empty() => {
                client.with_auth(username, config.password.as_deref())
            }
            _ => client,
        })
    }

    /// Basic Auth 설정
    pub fn with_auth(mut self, username: &str, password: Option<&str>) -> Self {
        self.auth = Some((username.to_string(), password.map(str::to_string)));
        self
    }

    /// 요청 대상 URL
    pub fn status_url(&self) -> &str {
        &self.status_url
    }

    fn request(&self) -> RequestBuilder {
        let mut req = self.client.get(&self.status_url).header("kbn-xsrf", "true");

        if let Some((username, password)) = &self.auth {
            req = req.basic_auth(username, password.as_ref());
        }

        req
    }

    /// `/api/status` 조회 후 `StatusDocument`로 디코딩
    #[instrument(skip(self), fields(url = %self.status_url))]
    pub async fn fetch_status(&self) -> ClientResult<StatusDocument> {
        debug!("Scraping Kibana");

        let response = self.request().send().await.map_err(ClientError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = read_body_snippet(response).await;
            return Err(ClientError::unexpected_status(status.as_u16(), &body));
        }

        let body = response.bytes().await.map_err(ClientError::Network)?;

        parse_status(&body)
    }

    /// 응답 본문 없이 200 응답 여부만 확인
    #[instrument(skip(self), fields(url = %self.status_url))]
    pub async fn check_health(&self) -> ClientResult<()> {
        let response = self.request().send().await.map_err(ClientError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ClientError::unexpected_status(status.as_u16(), ""));
        }

        Ok(())
    }
}

/// 에러 응답 본문을 최대 `MAX_BODY_SNIPPET` 바이트까지만 읽음 (읽기 실패 시 빈 문자열)
async fn read_body_snippet(mut response: Response) -> String {
    let mut buf = Vec::with_capacity(MAX_BODY_SNIPPET);

    while buf.len() < MAX_BODY_SNIPPET {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let take = chunk.len().min(MAX_BODY_SNIPPET - buf.len());
                buf.extend_from_slice(&chunk[..take]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(error = %e, "Failed to read error response body");
                return String::new();
            }
        }
    }

    // 잘린 멀티바이트 문자는 버림
    let end = match std::str::from_utf8(&buf) {
        Err(e) if e.error_len().is_none() => e.valid_up_to(),
        _ => buf.len(),
    };
    String::from_utf8_lossy(&buf[..end]).into_owned()
}

#[async_trait]
impl StatusSource for KibanaClient {
    async fn fetch_status(&self) -> ClientResult<StatusDocument> {
        KibanaClient::fetch_status(self).await
    }

    async fn check_health(&self) -> ClientResult<()> {
        KibanaClient::check_health(self).await
    }
}
