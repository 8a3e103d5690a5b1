use crate::domain::model::Event;
use crate::utils::error::{HarvestError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 依運動 → 聯賽/賽事 → 盤口 → 結果 的巢狀輸出
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Serialize, Clone, Copy)]
struct CsvRow<'a> {
    sport: &'a str,
    league: &'a str,
    event_id: &'a str,
    event_name: &'a str,
    start_time: &'a str,
    market: &'a str,
    outcome_id: &'a str,
    outcome_name: &'a str,
    price: Option<f64>,
}

pub fn render(events: &[Event], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(events)),
        OutputFormat::Json => render_json(events),
        OutputFormat::Csv => render_csv(events),
    }
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn render_text(events: &[Event]) -> String {
    let mut out = String::new();
    for event in events {
        // 寫入 String 不會失敗
        let _ = writeln!(out);
        let _ = writeln!(out, "{}, {}", capitalize(&event.sport), event.league);
        let _ = writeln!(out, "\t{}, {} UTC, {}", event.name, event.start_time, event.id);
        for market in &event.markets {
            let _ = writeln!(out, "\t\t{}", market.name);
            for outcome in &market.outcomes {
                let _ = writeln!(out, "\t\t\t{}, {}, {}", outcome.name, outcome.price, outcome.id);
            }
        }
    }
    out
}

pub fn render_json(events: &[Event]) -> Result<String> {
    Ok(serde_json::to_string_pretty(events)?)
}

/// 每個 outcome 一列；沒有任何 outcome 的賽事仍輸出一列空白盤口
pub fn render_csv(events: &[Event]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for event in events {
        let base = CsvRow {
            sport: &event.sport,
            league: &event.league,
            event_id: &event.id,
            event_name: &event.name,
            start_time: &event.start_time,
            market: "",
            outcome_id: "",
            outcome_name: "",
            price: None,
        };

        let mut wrote = false;
        for market in &event.markets {
            for outcome in &market.outcomes {
                writer.serialize(CsvRow {
                    market: &market.name,
                    outcome_id: &outcome.id,
                    outcome_name: &outcome.name,
                    price: Some(outcome.price),
                    ..base
                })?;
                wrote = true;
            }
        }
        if !wrote {
            writer.serialize(base)?;
        }
    }

    let bytes = writer.into_inner().map_err(|e| HarvestError::IoError(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
