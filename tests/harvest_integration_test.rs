use anyhow::Result;
use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::Compression;
use httpmock::prelude::*;
use odds_harvester::adapters::http::browser_headers;
use odds_harvester::domain::ports::Fetcher;
use odds_harvester::{HarvestConfig, HarvestError, Harvester, HttpFetcher, SportOutcome, WorkerPool};
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

const PATH: &str = "/api-2/betline/changes/all";

fn config_for(server: &MockServer, sports: &[&str]) -> HarvestConfig {
    let mut config = HarvestConfig::default();
    config.source.endpoint = format!(
        "{}{}?ctag=en-US&sport={{sport}}&hideClosed=true&flags=reg,urlv2,mm2,rrc,nodup",
        server.base_url(),
        PATH
    );
    config.source.origin = server.base_url();
    config.harvest.sports = sports.iter().map(|s| s.to_string()).collect();
    config
}

fn harvester(config: HarvestConfig, timeout: Duration) -> Result<Harvester<HttpFetcher, HarvestConfig>> {
    let fetcher = Arc::new(HttpFetcher::new(timeout)?);
    let pool = Arc::new(WorkerPool::new(3));
    Ok(Harvester::new(fetcher, pool, config))
}

fn football_payload() -> serde_json::Value {
    serde_json::json!({
        "enabled": true,
        "data": [
            {
                "id": 1970324842418380_u64,
                "name": "Arsenal - Chelsea",
                "kickoff": 1700000000000_i64,
                "league": {"id": 1970324836974595_u64, "name": "Premier League", "top": true},
                "markets": [
                    {"name": "Match Result", "runners": [
                        {"id": 1, "name": "1", "price": 2.1},
                        {"id": 2, "name": "X", "price": 3.4},
                        {"id": 3, "name": "2", "price": 3.05}
                    ]},
                    {"name": "Next Goal", "runners": null}
                ]
            },
            {
                "id": 1970324842418381_u64,
                "name": "Leeds - Hull",
                "kickoff": 1700003600000_i64,
                "league": {"id": 1970324836974600_u64, "name": "Championship", "top": false},
                "markets": []
            },
            {
                "id": 1970324842418382_u64,
                "name": "Real Madrid - Barcelona",
                "kickoff": 1700007200000_i64,
                "league": {"id": 1970324836974596_u64, "name": "La Liga", "top": true},
                "markets": [
                    {"name": "Total", "runners": [
                        {"id": 4, "name": "Over 2.5", "price": 1.8},
                        {"id": 5, "name": "Under 2.5"}
                    ]}
                ]
            },
            {
                "id": 1970324842418383_u64,
                "name": "Everton - Fulham",
                "kickoff": 1700010800000_i64,
                "league": {"id": 1970324836974595_u64, "name": "Premier League", "top": true},
                "markets": []
            }
        ]
    })
}

fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

#[tokio::test]
async fn test_football_succeeds_while_tennis_fails() -> Result<()> {
    let server = MockServer::start();

    let football_mock = server.mock(|when, then| {
        when.method(GET)
            .path(PATH)
            .query_param("sport", "football")
            .query_param("hideClosed", "true");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(football_payload());
    });
    let tennis_mock = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "tennis");
        then.status(500);
    });

    let harvester = harvester(config_for(&server, &["football", "tennis"]), Duration::from_secs(5))?;
    let events = harvester.harvest().await?;

    football_mock.assert();
    tennis_mock.assert();

    assert_eq!(events.len(), 2);
    assert_eq!(events[0].name, "Arsenal - Chelsea");
    assert_eq!(events[0].league, "Premier League");
    assert_eq!(events[0].start_time, "2023-11-14 22:13:20");
    assert_eq!(events[0].markets.len(), 1);
    assert_eq!(events[0].markets[0].outcomes.len(), 3);

    assert_eq!(events[1].name, "Real Madrid - Barcelona");
    assert_eq!(events[1].markets[0].outcomes.len(), 1);
    assert!(events.iter().all(|e| e.sport == "football"));
    Ok(())
}

#[tokio::test]
async fn test_gzip_response_is_decoded() -> Result<()> {
    let server = MockServer::start();
    let body = gzip(football_payload().to_string().as_bytes());

    let hockey_mock = server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "hockey");
        then.status(200)
            .header("Content-Type", "application/json")
            .header("Content-Encoding", "gzip")
            .body(body);
    });

    let harvester = harvester(config_for(&server, &["hockey"]), Duration::from_secs(5))?;
    let harvests = harvester.harvest_by_sport().await?;

    hockey_mock.assert();
    assert_eq!(harvests.len(), 1);
    assert_eq!(harvests[0].outcome.events().len(), 2);
    assert_eq!(harvests[0].outcome.events()[0].sport, "hockey");
    Ok(())
}

#[tokio::test]
async fn test_missing_data_field_yields_failed_sport() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "basketball");
        then.status(200).json_body(serde_json::json!({"error": "maintenance"}));
    });
    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "football");
        then.status(200).json_body(football_payload());
    });

    let harvester = harvester(
        config_for(&server, &["basketball", "football"]),
        Duration::from_secs(5),
    )?;
    let harvests = harvester.harvest_by_sport().await?;

    assert!(harvests[0].outcome.is_failed());
    assert!(matches!(harvests[1].outcome, SportOutcome::Found(ref events) if events.len() == 2));
    Ok(())
}

#[tokio::test]
async fn test_no_top_leagues_is_empty_not_failed() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "tennis");
        then.status(200).json_body(serde_json::json!({
            "data": [
                {"id": 1, "name": "A - B", "kickoff": 1700000000000_i64,
                 "league": {"id": 5, "name": "ITF", "top": false}}
            ]
        }));
    });

    let harvester = harvester(config_for(&server, &["tennis"]), Duration::from_secs(5))?;
    let harvests = harvester.harvest_by_sport().await?;

    assert_eq!(harvests[0].outcome, SportOutcome::Empty);
    Ok(())
}

#[tokio::test]
async fn test_slow_upstream_times_out_per_sport() -> Result<()> {
    let server = MockServer::start();

    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "football");
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(football_payload());
    });
    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "tennis");
        then.status(200).json_body(football_payload());
    });

    let harvester = harvester(
        config_for(&server, &["football", "tennis"]),
        Duration::from_millis(500),
    )?;
    let harvests = harvester.harvest_by_sport().await?;

    assert!(harvests[0].outcome.is_failed());
    assert_eq!(harvests[1].outcome.events().len(), 2);
    assert!(harvests[1].outcome.events().iter().all(|e| e.sport == "tennis"));
    Ok(())
}

#[tokio::test]
async fn test_fetcher_reports_status_errors() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/missing");
        then.status(404);
    });

    let fetcher = HttpFetcher::new(Duration::from_secs(5))?;
    let err = fetcher
        .fetch(&server.url("/missing"), &browser_headers(&server.base_url()))
        .await
        .unwrap_err();

    assert!(matches!(err, HarvestError::HttpStatusError { status: 404, .. }));
    assert!(err.is_transport());
    Ok(())
}

#[tokio::test]
async fn test_fetcher_sends_browser_fingerprint_headers() -> Result<()> {
    let server = MockServer::start();
    let origin = server.base_url();
    let user_agent = browser_headers(&origin)
        .into_iter()
        .find(|(k, _)| k == "User-Agent")
        .map(|(_, v)| v)
        .unwrap();

    let fingerprint_mock = server.mock(|when, then| {
        when.method(GET)
            .path(PATH)
            .query_param("sport", "football")
            .header("User-Agent", user_agent.as_str())
            .header("Referer", format!("{}/", origin))
            .header("Origin", origin.as_str())
            .header("X-Requested-With", "XMLHttpRequest")
            .header("Accept-Encoding", "gzip, deflate")
            .header("Authorization", "Bearer null");
        then.status(200).json_body(football_payload());
    });

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(5))
        .build()?;
    let fetcher = Arc::new(HttpFetcher::with_client(client));
    let pool = Arc::new(WorkerPool::new(1));
    let harvester = Harvester::new(fetcher, pool, config_for(&server, &["football"]));

    let events = harvester.harvest().await?;

    fingerprint_mock.assert();
    assert_eq!(events.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetcher_decodes_raw_deflate_body() -> Result<()> {
    let server = MockServer::start();
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(football_payload().to_string().as_bytes())?;
    let body = encoder.finish()?;

    server.mock(|when, then| {
        when.method(GET).path(PATH).query_param("sport", "tennis");
        then.status(200)
            .header("Content-Encoding", "deflate")
            .body(body);
    });

    let harvester = harvester(config_for(&server, &["tennis"]), Duration::from_secs(5))?;
    let harvests = harvester.harvest_by_sport().await?;

    assert_eq!(harvests[0].outcome.events().len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_fetcher_passes_plain_body_through() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/plain");
        then.status(200).body("{\"data\":[]}");
    });

    let fetcher = HttpFetcher::new(Duration::from_secs(5))?;
    let body = fetcher.fetch(&server.url("/plain"), &[]).await?;

    assert_eq!(body, "{\"data\":[]}");
    Ok(())
}

#[tokio::test]
async fn test_shutdown_pool_rejects_harvest() -> Result<()> {
    let server = MockServer::start();
    let config = config_for(&server, &["football"]);

    let fetcher = Arc::new(HttpFetcher::new(Duration::from_secs(5))?);
    let pool = Arc::new(WorkerPool::new(3));
    let harvester = Harvester::new(fetcher, Arc::clone(&pool), config);

    assert!(pool.shutdown(Duration::from_secs(1)).await);
    assert!(matches!(harvester.harvest().await, Err(HarvestError::PoolUnavailable)));
    Ok(())
}
