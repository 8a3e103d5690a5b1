use crate::domain::ports::Fetcher;
use crate::utils::error::{HarvestError, Result};
use async_trait::async_trait;
use flate2::read::{DeflateDecoder, GzDecoder, ZlibDecoder};
use reqwest::header::CONTENT_ENCODING;
use reqwest::Client;
use std::io::Read;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (HTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const SEC_CH_UA: &str = "\"Not_A Brand\";v=\"8\", \"Chromium\";v=\"120\", \"Google Chrome\";v=\"120\"";

/// 以 reqwest 實作的 Fetcher；client 內含連線池，整個行程共用一個
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// 連線與整體請求都受 `timeout` 限制
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str, headers: &[(String, String)]) -> Result<String> {
        let mut request = self.client.get(url);
        for (key, value) in headers {
            request = request.header(key.as_str(), value.as_str());
        }

        tracing::debug!("📡 GET {}", url);
        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            return Err(HarvestError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let encoding = response
            .headers()
            .get(CONTENT_ENCODING)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim().to_ascii_lowercase());

        let body = response.bytes().await?;
        tracing::debug!(
            "Received {} bytes (encoding: {})",
            body.len(),
            encoding.as_deref().unwrap_or("identity")
        );

        let decoded = decode_body(encoding.as_deref(), &body)?;
        String::from_utf8(decoded).map_err(|e| HarvestError::DecompressionError {
            encoding: "utf-8".to_string(),
            message: e.to_string(),
        })
    }
}

/// 依 Content-Encoding 解壓縮；其他編碼原樣傳回
pub fn decode_body(encoding: Option<&str>, body: &[u8]) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    let outcome = match encoding {
        Some("gzip") | Some("x-gzip") => GzDecoder::new(body).read_to_end(&mut decoded),
        // deflate 可能帶 zlib 標頭，也可能是原始串流
        Some("deflate") => ZlibDecoder::new(body)
            .read_to_end(&mut decoded)
            .or_else(|_| {
                decoded.clear();
                DeflateDecoder::new(body).read_to_end(&mut decoded)
            }),
        _ => return Ok(body.to_vec()),
    };

    outcome.map_err(|e| HarvestError::DecompressionError {
        encoding: encoding.unwrap_or_default().to_string(),
        message: e.to_string(),
    })?;
    Ok(decoded)
}

/// 上游要求的瀏覽器指紋標頭，Referer/Origin 取自站點來源
pub fn browser_headers(origin: &str) -> Vec<(String, String)> {
    let origin = origin.trim_end_matches('/');
    [
        ("User-Agent", USER_AGENT.to_string()),
        ("Accept", "application/json, text/plain, */*".to_string()),
        ("Accept-Language", "en-US,en;q=0.9".to_string()),
        ("Accept-Encoding", "gzip, deflate".to_string()),
        ("Referer", format!("{}/", origin)),
        ("Origin", origin.to_string()),
        ("Connection", "keep-alive".to_string()),
        ("sec-ch-ua", SEC_CH_UA.to_string()),
        ("sec-ch-ua-mobile", "?0".to_string()),
        ("sec-ch-ua-platform", "\"Windows\"".to_string()),
        ("Sec-Fetch-Dest", "empty".to_string()),
        ("Sec-Fetch-Mode", "cors".to_string()),
        ("Sec-Fetch-Site", "same-origin".to_string()),
        ("X-Requested-With", "XMLHttpRequest".to_string()),
        ("Authorization", "Bearer null".to_string()),
        ("Cache-Control", "no-cache".to_string()),
        ("Pragma", "no-cache".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

/// 合併額外標頭；名稱相同（不分大小寫）時覆寫原值
pub fn merge_headers(
    mut base: Vec<(String, String)>,
    extra: Vec<(String, String)>,
) -> Vec<(String, String)> {
    for (key, value) in extra {
        match base.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(existing) => existing.1 = value,
            None => base.push((key, value)),
        }
    }
    base
}
