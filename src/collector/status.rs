//! Kibana `/api/status` 응답 타입
//!
//! 모든 메트릭 필드는 `Option`입니다. 필드가 없거나 `null`이면 `None`이 되며,
//! 해당 시리즈는 이번 수집 주기에서 생략됩니다 (0으로 채우지 않음).
//! 알 수 없는 필드는 무시됩니다.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

use crate::error::{ClientError, ClientResult};

/// `/api/status` 응답 문서
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusDocument {
    /// Kibana 인스턴스 이름
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Kibana 인스턴스 UUID
    #[serde(deserialize_with = "null_as_default")]
    pub uuid: String,
    /// 버전 정보
    #[serde(deserialize_with = "null_as_default")]
    pub version: VersionInfo,
    /// 전체 및 서브시스템 상태
    #[serde(deserialize_with = "null_as_default")]
    pub status: StatusInfo,
    /// 성능 메트릭
    #[serde(deserialize_with = "null_as_default")]
    pub metrics: MetricsInfo,
}

/// 버전 정보
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub build_hash: String,
    pub build_number: Option<u64>,
    pub build_snapshot: Option<bool>,
}

/// 전체 상태 + 서브시스템별 상태
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StatusInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub overall: LevelSummary,
    /// 코어 서브시스템 (예: "elasticsearch", "savedObjects")
    ///
    /// 값이 `null`인 항목은 `None`으로 보존됩니다.
    #[serde(deserialize_with = "null_as_default")]
    pub core: BTreeMap<String, Option<LevelSummary>>,
    #[serde(deserialize_with = "null_as_default")]
    pub plugins: BTreeMap<String, Option<LevelSummary>>,
}

/// 상태 레벨과 요약
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LevelSummary {
    #[serde(deserialize_with = "null_as_default")]
    pub level: String,
    #[serde(deserialize_with = "null_as_default")]
    pub summary: String,
}

impl StatusInfo {
    /// 이름으로 코어 서브시스템 조회 (`null` 항목은 없는 것으로 취급)
    pub fn core_service(&self, name: &str) -> Option<&LevelSummary> {
        self.core.get(name).and_then(Option::as_ref)
    }
}

/// 성능 메트릭
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MetricsInfo {
    pub collected_at: Option<String>,
    pub concurrent_connections: Option<f64>,
    pub process: Option<ProcessMetrics>,
    pub os: Option<OsMetrics>,
    pub requests: Option<RequestMetrics>,
    pub response_times: Option<ResponseTimeMetrics>,
}

/// 프로세스 메트릭
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcessMetrics {
    pub memory: Option<MemoryMetrics>,
    /// 이벤트 루프 지연 (밀리초)
    pub event_loop_delay: Option<f64>,
    /// 프로세스 가동 시간 (밀리초)
    #[serde(rename = "uptime_in_millis")]
    pub uptime_ms: Option<f64>,
}

/// 프로세스 메모리
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryMetrics {
    pub heap: Option<HeapMetrics>,
    #[serde(rename = "resident_set_size_in_bytes")]
    pub resident_set_bytes: Option<f64>,
}

/// 힙 메모리 (객체가 존재하면 세 값 모두 내보냄)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HeapMetrics {
    #[serde(rename = "total_in_bytes", deserialize_with = "null_as_default")]
    pub total_bytes: f64,
    #[serde(rename = "used_in_bytes", deserialize_with = "null_as_default")]
    pub used_bytes: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub size_limit: f64,
}

/// OS 메트릭
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsMetrics {
    pub cpu: Option<CpuMetrics>,
    pub load: Option<LoadMetrics>,
    pub memory: Option<OsMemoryMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuMetrics {
    pub cgroup: Option<CgroupCpu>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CgroupCpu {
    pub cpu_percent: Option<f64>,
}

/// 시스템 load average
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoadMetrics {
    #[serde(rename = "1m")]
    pub load_1m: Option<f64>,
    #[serde(rename = "5m")]
    pub load_5m: Option<f64>,
    #[serde(rename = "15m")]
    pub load_15m: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OsMemoryMetrics {
    #[serde(rename = "total_in_bytes")]
    pub total_bytes: Option<f64>,
    #[serde(rename = "free_in_bytes")]
    pub free_bytes: Option<f64>,
    #[serde(rename = "used_in_bytes")]
    pub used_bytes: Option<f64>,
}

/// HTTP 요청 메트릭
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequestMetrics {
    pub total: Option<f64>,
    pub disconnects: Option<f64>,
    /// HTTP 상태 코드별 요청 수 (키: "200", "404", ...)
    ///
    /// 값이 `null`인 코드는 `None`으로 보존되며 내보내지 않습니다.
    pub status_codes: Option<BTreeMap<String, Option<f64>>>,
}

/// 응답 시간 통계 (밀리초)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResponseTimeMetrics {
    #[serde(rename = "avg_in_millis")]
    pub avg_ms: Option<f64>,
    #[serde(rename = "max_in_millis")]
    pub max_ms: Option<f64>,
}

/// `null`을 필드 부재와 동일하게 기본값으로 디코딩
///
/// `#[serde(default)]`는 키가 없을 때만 적용되므로, `Option`이 아닌 필드는
/// 이 함수를 거쳐야 `null`을 허용합니다.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// 응답 본문을 `StatusDocument`로 파싱
pub fn parse_status(body: &[u8]) -> ClientResult<StatusDocument> {
    serde_json::from_slice(body).map_err(ClientError::Decode)
}
