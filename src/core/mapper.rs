use crate::core::selector::{json_text, league_id};
use crate::domain::model::{Event, Market, Outcome};
use crate::utils::error::{HarvestError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn missing(item: &str, field: &str) -> HarvestError {
    HarvestError::ItemParseError {
        item: item.to_string(),
        reason: format!("missing or invalid field '{}'", field),
    }
}

fn malformed(sport: &str, reason: &str) -> HarvestError {
    HarvestError::MalformedResponseError {
        sport: sport.to_string(),
        reason: reason.to_string(),
    }
}

/// 解析上游回應，取出頂層 `data` 陣列
pub fn parse_response(sport: &str, body: &str) -> Result<Vec<Value>> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| malformed(sport, &format!("invalid JSON: {}", e)))?;

    match value {
        Value::Object(mut root) => match root.remove("data") {
            Some(Value::Array(records)) => Ok(records),
            Some(_) => Err(malformed(sport, "'data' field is not an array")),
            None => Err(malformed(sport, "no 'data' field in response")),
        },
        _ => Err(malformed(sport, "top-level value is not an object")),
    }
}

/// epoch 毫秒轉 UTC 字串，與行程時區無關
pub fn format_kickoff(millis: i64) -> Result<String> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|dt| dt.format(START_TIME_FORMAT).to_string())
        .ok_or_else(|| HarvestError::ItemParseError {
            item: "event".to_string(),
            reason: format!("kickoff {} is out of range", millis),
        })
}

fn as_millis(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_price(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn required_str<'a>(node: &'a Value, item: &str, field: &str) -> Result<&'a str> {
    node.get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| missing(item, field))
}

pub fn map_outcome(node: &Value) -> Result<Outcome> {
    let id = node
        .get("id")
        .and_then(json_text)
        .ok_or_else(|| missing("outcome", "id"))?;
    let name = required_str(node, "outcome", "name")?;
    let price = node
        .get("price")
        .and_then(as_price)
        .ok_or_else(|| missing("outcome", "price"))?;

    Ok(Outcome {
        id,
        name: name.to_string(),
        price,
    })
}

/// `runners` 缺少或為空時回傳 `Ok(None)`，單一 runner 解析失敗只丟掉該 outcome
pub fn map_market(node: &Value) -> Result<Option<Market>> {
    let runners = match node.get("runners") {
        Some(Value::Array(runners)) if !runners.is_empty() => runners,
        _ => return Ok(None),
    };
    let name = required_str(node, "market", "name")?;

    let mut outcomes = Vec::with_capacity(runners.len());
    for runner in runners {
        match map_outcome(runner) {
            Ok(outcome) => outcomes.push(outcome),
            Err(e) => tracing::warn!("⚠️ Error parsing outcome in market '{}': {}", name, e),
        }
    }

    Ok(Some(Market {
        name: name.to_string(),
        outcomes,
    }))
}

pub fn map_markets(node: Option<&Value>) -> Vec<Market> {
    let Some(Value::Array(nodes)) = node else {
        return Vec::new();
    };

    let mut markets = Vec::with_capacity(nodes.len());
    for market in nodes {
        match map_market(market) {
            Ok(Some(market)) => markets.push(market),
            Ok(None) => {}
            Err(e) => tracing::warn!("⚠️ Error parsing market: {}", e),
        }
    }
    markets
}

/// 必要欄位（id、name、kickoff、league.name）任一缺少就整筆丟棄
pub fn map_event(sport: &str, record: &Value) -> Result<Event> {
    let id = record
        .get("id")
        .and_then(json_text)
        .ok_or_else(|| missing("event", "id"))?;
    let name = required_str(record, "event", "name")?;
    let kickoff = record
        .get("kickoff")
        .and_then(as_millis)
        .ok_or_else(|| missing("event", "kickoff"))?;
    let start_time = format_kickoff(kickoff)?;
    let league = record
        .get("league")
        .and_then(|league| league.get("name"))
        .and_then(Value::as_str)
        .ok_or_else(|| missing("event", "league.name"))?;

    Ok(Event {
        id,
        name: name.to_string(),
        start_time,
        league: league.to_string(),
        sport: sport.to_string(),
        markets: map_markets(record.get("markets")),
    })
}

/// 每個選中的聯賽只取第一筆對應紀錄
pub fn map_events(sport: &str, records: &[Value], league_ids: &[String]) -> Vec<Event> {
    let mut events = Vec::with_capacity(league_ids.len());

    for league in league_ids {
        let Some(record) = records
            .iter()
            .find(|record| league_id(record).as_deref() == Some(league.as_str()))
        else {
            continue;
        };

        match map_event(sport, record) {
            Ok(event) => {
                tracing::debug!(
                    "{}: mapped event {} with {} markets",
                    sport,
                    event.id,
                    event.markets.len()
                );
                events.push(event);
            }
            Err(e) => tracing::warn!("⚠️ Error parsing match in {} league {}: {}", sport, league, e),
        }
    }

    events
}
