use crate::adapters::http::{browser_headers, merge_headers};
use crate::core::mapper::{map_events, parse_response};
use crate::core::pool::WorkerPool;
use crate::core::selector::select_top_leagues;
use crate::domain::model::{flatten_events, Event, SportHarvest, SportOutcome};
use crate::domain::ports::{ConfigProvider, Fetcher};
use crate::utils::error::{HarvestError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// 單一運動 pipeline 的階段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Selecting,
    Mapping,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetching => "fetching",
            Stage::Selecting => "selecting",
            Stage::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

struct SportTask<F: Fetcher> {
    sport: String,
    url: String,
    headers: Arc<Vec<(String, String)>>,
    top_leagues: usize,
    fetcher: Arc<F>,
}

impl<F: Fetcher> SportTask<F> {
    async fn run(self) -> SportOutcome {
        tracing::info!("⚙️ Processing {}...", self.sport);

        match self.execute().await {
            Ok(events) if events.is_empty() => {
                tracing::info!("📭 Found 0 matches for {}", self.sport);
                SportOutcome::Empty
            }
            Ok(events) => {
                tracing::info!("✅ Found {} matches for {}", events.len(), self.sport);
                SportOutcome::Found(events)
            }
            Err((stage, e)) => {
                tracing::warn!(
                    "❌ Error processing {} while {}: {} (Category: {:?})",
                    self.sport,
                    stage,
                    e,
                    e.category()
                );
                SportOutcome::Failed(format!("{}: {}", stage, e))
            }
        }
    }

    async fn execute(&self) -> std::result::Result<Vec<Event>, (Stage, HarvestError)> {
        tracing::debug!("{}: {}", self.sport, Stage::Fetching);
        let body = self
            .fetcher
            .fetch(&self.url, &self.headers)
            .await
            .map_err(|e| (Stage::Fetching, e))?;

        tracing::debug!("{}: {}", self.sport, Stage::Selecting);
        let records = parse_response(&self.sport, &body).map_err(|e| (Stage::Selecting, e))?;
        let leagues = select_top_leagues(&records, self.top_leagues);
        if leagues.is_empty() {
            tracing::info!("No top leagues found for {}", self.sport);
            return Ok(Vec::new());
        }
        tracing::debug!("{}: top leagues {:?}", self.sport, leagues);

        tracing::debug!("{}: {}", self.sport, Stage::Mapping);
        Ok(map_events(&self.sport, &records, &leagues))
    }
}

/// 對每個運動項目並行抓取、挑選聯賽、轉換事件，並依輸入順序合併結果。
///
/// 工作池與 Fetcher（及其 HTTP 連線池）由呼叫端建立並注入，可跨多次收割重用；
/// 關閉工作池後 `harvest` 會回傳 [`HarvestError::PoolUnavailable`]。
pub struct Harvester<F: Fetcher + 'static, C: ConfigProvider> {
    fetcher: Arc<F>,
    pool: Arc<WorkerPool>,
    config: C,
    headers: Arc<Vec<(String, String)>>,
}

impl<F: Fetcher + 'static, C: ConfigProvider> Harvester<F, C> {
    pub fn new(fetcher: Arc<F>, pool: Arc<WorkerPool>, config: C) -> Self {
        let headers = merge_headers(browser_headers(config.origin()), config.extra_headers());
        Self {
            fetcher,
            pool,
            config,
            headers: Arc::new(headers),
        }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// 收割所有設定的運動項目，回傳合併後的事件清單
    pub async fn harvest(&self) -> Result<Vec<Event>> {
        Ok(flatten_events(self.harvest_by_sport().await?))
    }

    pub async fn harvest_by_sport(&self) -> Result<Vec<SportHarvest>> {
        self.harvest_sports(self.config.sports()).await
    }

    /// 結果順序與 `sports` 相同，與任務完成順序無關
    pub async fn harvest_sports(&self, sports: &[String]) -> Result<Vec<SportHarvest>> {
        tracing::info!(
            "🚀 Starting harvest of {} sports with {} workers",
            sports.len(),
            self.pool.size()
        );

        // 先確認工作池可用，避免只送出部分任務
        if !self.pool.is_accepting() {
            return Err(HarvestError::PoolUnavailable);
        }

        let mut handles: Vec<(String, JoinHandle<Result<SportOutcome>>)> = Vec::with_capacity(sports.len());
        for sport in sports {
            let task = SportTask {
                sport: sport.clone(),
                url: self.config.endpoint_for(sport),
                headers: Arc::clone(&self.headers),
                top_leagues: self.config.top_league_limit(),
                fetcher: Arc::clone(&self.fetcher),
            };
            tracing::debug!("📡 Fetching matches for {} from {}", sport, task.url);
            match self.pool.submit(task.run()) {
                Ok(handle) => handles.push((sport.clone(), handle)),
                Err(e) => {
                    for (_, handle) in &handles {
                        handle.abort();
                    }
                    return Err(e);
                }
            }
        }

        let mut harvests = Vec::with_capacity(handles.len());
        for (sport, handle) in handles {
            let outcome = match handle.await {
                Ok(Ok(outcome)) => outcome,
                Ok(Err(e)) => {
                    tracing::warn!("❌ Task for {} was not scheduled: {}", sport, e);
                    SportOutcome::Failed(e.to_string())
                }
                Err(e) => {
                    tracing::warn!("❌ Task for {} did not complete: {}", sport, e);
                    SportOutcome::Failed(format!("task aborted: {}", e))
                }
            };
            harvests.push(SportHarvest { sport, outcome });
        }

        let total: usize = harvests.iter().map(|h| h.outcome.events().len()).sum();
        let failed = harvests.iter().filter(|h| h.outcome.is_failed()).count();
        tracing::info!(
            "🏁 Harvest finished: {} events from {} sports ({} failed)",
            total,
            harvests.len(),
            failed
        );

        Ok(harvests)
    }
}
