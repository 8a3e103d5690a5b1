use serde_json::Value;

pub const DEFAULT_TOP_LEAGUES: usize = 2;

/// 字串或數字形式的 id 統一轉成文字
pub(crate) fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 紀錄所屬聯賽的 id（文字形式）
pub fn league_id(record: &Value) -> Option<String> {
    record.get("league")?.get("id").and_then(json_text)
}

fn is_top(league: &Value) -> bool {
    match league.get("top") {
        Some(Value::Bool(top)) => *top,
        Some(Value::String(top)) => top.eq_ignore_ascii_case("true"),
        Some(Value::Number(top)) => top.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

/// 依出現順序挑出最多 `limit` 個不重複的 top 聯賽 id。
///
/// 缺少 `league`、`top` 或 `id` 的紀錄直接略過；找不到任何 top 聯賽時回傳空清單。
pub fn select_top_leagues(records: &[Value], limit: usize) -> Vec<String> {
    let mut selected: Vec<String> = Vec::with_capacity(limit);
    if limit == 0 {
        return selected;
    }

    for record in records {
        let Some(league) = record.get("league") else {
            continue;
        };
        if !is_top(league) {
            continue;
        }
        let Some(id) = league.get("id").and_then(json_text) else {
            continue;
        };

        if !selected.contains(&id) {
            selected.push(id);
            if selected.len() >= limit {
                break;
            }
        }
    }

    selected
}
