//! Kibana 상태 메트릭 수집 모듈
//!
//! Kibana `/api/status` 엔드포인트를 조회하여 메트릭 샘플을 생성합니다.
//! 수집은 스크레이프 요청마다 한 번 실행되며 (백그라운드 폴링 없음),
//! 동시에 들어온 요청은 직렬화됩니다.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use kibana_exporter::collector::{KibanaClient, KibanaCollector};
//!
//! let client = KibanaClient::new("http://localhost:5601", 10_000, false)?;
//! let collector = KibanaCollector::new(Arc::new(client));
//! let samples = collector.collect().await;
//! ```

mod client;
mod status;

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, error};

pub use client::{KibanaClient, STATUS_PATH};
pub use status::{
    parse_status, CgroupCpu, CpuMetrics, HeapMetrics, LevelSummary, LoadMetrics, MemoryMetrics,
    MetricsInfo, OsMemoryMetrics, OsMetrics, ProcessMetrics, RequestMetrics, ResponseTimeMetrics,
    StatusDocument, StatusInfo, VersionInfo,
};

use crate::error::ClientResult;
use crate::transformer::{translate, Catalog, MetricDescriptor, Sample};

/// Kibana 상태 조회 추상화
///
/// `KibanaClient`가 기본 구현이며, 테스트에서는 가짜 구현으로 대체합니다.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// 상태 문서 조회 (요청 1회, 재시도 없음)
    async fn fetch_status(&self) -> ClientResult<StatusDocument>;

    /// 200 응답 여부만 확인
    async fn check_health(&self) -> ClientResult<()>;
}

/// Kibana 메트릭 Collector
///
/// 디스크립터 카탈로그와 수집 구간을 보호하는 뮤텍스를 소유합니다.
/// 상태 문서나 샘플은 수집 1회가 끝나면 보관하지 않습니다.
pub struct KibanaCollector {
    source: Arc<dyn StatusSource>,
    catalog: Catalog,
    lock: Arc<Mutex<()>>,
}

impl KibanaCollector {
    /// 새 Collector 생성
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self {
            source,
            catalog: Catalog::new(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// 전체 디스크립터 카탈로그
    pub fn describe(&self) -> Vec<&MetricDescriptor> {
        self.catalog.descriptors()
    }

    /// 수집 1회 실행
    ///
    /// 실패해도 에러를 반환하지 않습니다. 실패 시 `scrape_duration_seconds`,
    /// `up=0`, `scrape_success=0` 세 개의 샘플만 반환합니다.
    pub async fn collect(&self) -> Vec<Sample<'_>> {
        let guard = self.lock.clone().lock_owned().await;

        let start = Instant::now();

        // 조회는 별도 태스크에서 실행하며 태스크가 락 가드를 소유합니다.
        // 스크레이프 요청이 중간에 끊겨도 업스트림 요청은 타임아웃 또는 응답까지
        // 계속되고, 그동안 락은 해제되지 않습니다.
        let source = Arc::clone(&self.source);
        let task = tokio::spawn(async move {
            let result = source.fetch_status().await;
            (result, guard)
        });

        let joined = task.await;
        let duration = start.elapsed().as_secs_f64();

        let mut samples = Vec::with_capacity(32);
        samples.push(Sample::new(&self.catalog.scrape_duration, duration));

        // 변환이 끝날 때까지 가드를 유지
        let (status, _guard) = match joined {
            Ok((Ok(status), guard)) => (status, guard),
            Ok((Err(e), _)) => {
                error!(error = %e, timeout = e.is_timeout(), "Failed to scrape Kibana");
                return self.failed(samples);
            }
            Err(e) => {
                error!(error = %e, "Kibana fetch task failed");
                return self.failed(samples);
            }
        };

        samples.push(Sample::new(&self.catalog.up, 1.0));
        samples.push(Sample::new(&self.catalog.scrape_success, 1.0));

        debug!(
            kibana_name = %status.name,
            version = %status.version.number,
            overall = %status.status.overall.level,
            collected_at = ?status.metrics.collected_at,
            "Kibana status fetched"
        );

        translate(&self.catalog, &status, &mut samples);

        debug!(
            duration_ms = (duration * 1000.0) as u64,
            samples = samples.len(),
            "Collection complete"
        );

        samples
    }

    fn failed<'a>(&'a self, mut samples: Vec<Sample<'a>>) -> Vec<Sample<'a>> {
        samples.push(Sample::new(&self.catalog.up, 0.0));
        samples.push(Sample::new(&self.catalog.scrape_success, 0.0));
        samples
    }

    /// Readiness 체크 (수집 락을 잡지 않음)
    pub async fn check_health(&self) -> ClientResult<()> {
        self.source.check_health().await
    }
}
