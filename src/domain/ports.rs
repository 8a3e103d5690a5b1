use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// 單次 HTTP 取得，回傳已解壓縮的文字內容
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<String>;
}

pub trait ConfigProvider: Send + Sync {
    /// 含 `{sport}` 佔位符的端點模板
    fn endpoint_template(&self) -> &str;
    fn origin(&self) -> &str;
    fn extra_headers(&self) -> Vec<(String, String)>;
    fn sports(&self) -> &[String];
    fn top_league_limit(&self) -> usize;
    fn workers(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn shutdown_grace(&self) -> Duration;

    fn endpoint_for(&self, sport: &str) -> String {
        self.endpoint_template().replace(crate::SPORT_PLACEHOLDER, sport)
    }
}
