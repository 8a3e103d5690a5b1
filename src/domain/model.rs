use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    pub id: String,
    pub name: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub name: String,
    pub outcomes: Vec<Outcome>,
}

/// 單一賽事；`start_time` 一律為 UTC `YYYY-MM-DD HH:MM:SS`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub name: String,
    pub start_time: String,
    pub league: String,
    pub sport: String,
    pub markets: Vec<Market>,
}

/// 單一運動項目的收割結果
#[derive(Debug, Clone, PartialEq)]
pub enum SportOutcome {
    Found(Vec<Event>),
    /// 沒有任何 top 聯賽，或選到的聯賽都無法解析
    Empty,
    Failed(String),
}

impl SportOutcome {
    pub fn events(&self) -> &[Event] {
        match self {
            SportOutcome::Found(events) => events,
            SportOutcome::Empty | SportOutcome::Failed(_) => &[],
        }
    }

    pub fn into_events(self) -> Vec<Event> {
        match self {
            SportOutcome::Found(events) => events,
            SportOutcome::Empty | SportOutcome::Failed(_) => Vec::new(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SportOutcome::Failed(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SportHarvest {
    pub sport: String,
    pub outcome: SportOutcome,
}

impl SportHarvest {
    pub fn summary(&self) -> String {
        match &self.outcome {
            SportOutcome::Found(events) => format!("{}: found {} events", self.sport, events.len()),
            SportOutcome::Empty => format!("{}: no top-league events", self.sport),
            SportOutcome::Failed(reason) => format!("{}: failed ({})", self.sport, reason),
        }
    }
}

/// 扁平化為單一清單，保留輸入的運動順序
pub fn flatten_events(harvests: Vec<SportHarvest>) -> Vec<Event> {
    harvests
        .into_iter()
        .flat_map(|harvest| harvest.outcome.into_events())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(id: &str, sport: &str) -> Event {
        Event {
            id: id.to_string(),
            name: format!("Match {}", id),
            start_time: "2023-11-14 22:13:20".to_string(),
            league: "Premier League".to_string(),
            sport: sport.to_string(),
            markets: vec![],
        }
    }

    #[test]
    fn test_flatten_preserves_sport_order_and_skips_failures() {
        let harvests = vec![
            SportHarvest {
                sport: "football".to_string(),
                outcome: SportOutcome::Found(vec![event("1", "football"), event("2", "football")]),
            },
            SportHarvest {
                sport: "tennis".to_string(),
                outcome: SportOutcome::Failed("HTTP 500".to_string()),
            },
            SportHarvest {
                sport: "hockey".to_string(),
                outcome: SportOutcome::Found(vec![event("3", "hockey")]),
            },
        ];

        let ids: Vec<String> = flatten_events(harvests).into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_event_serializes_with_camel_case_start_time() {
        let json = serde_json::to_value(event("42", "tennis")).unwrap();
        assert_eq!(json["startTime"], "2023-11-14 22:13:20");
        assert_eq!(json["sport"], "tennis");
        assert!(json["markets"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_summary_lines() {
        let failed = SportHarvest {
            sport: "tennis".to_string(),
            outcome: SportOutcome::Failed("timeout".to_string()),
        };
        assert_eq!(failed.summary(), "tennis: failed (timeout)");
        assert!(failed.outcome.is_failed());
        assert!(failed.outcome.events().is_empty());
    }
}
