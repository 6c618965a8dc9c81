use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One page of a paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }

    pub fn controls(&self, page: u32) -> PageControls {
        PageControls {
            page,
            next_enabled: self.has_next(),
            previous_enabled: self.has_previous(),
        }
    }
}

/// Which pager buttons are usable for the page being shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageControls {
    pub page: u32,
    pub next_enabled: bool,
    pub previous_enabled: bool,
}

impl PageControls {
    pub fn next_page(&self) -> Option<u32> {
        self.next_enabled.then(|| self.page + 1)
    }

    pub fn previous_page(&self) -> Option<u32> {
        if self.previous_enabled && self.page > 1 {
            Some(self.page - 1)
        } else {
            None
        }
    }
}

/// Reference data endpoints answer either with a page or a bare array
/// depending on server pagination settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Paged(Page<T>),
    Plain(Vec<T>),
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Paged(page) => page.results,
            Listing::Plain(items) => items,
        }
    }
}

/// Pull a human-readable message out of an error body.
///
/// Checks `detail`, `message` and `error` first; otherwise every string found
/// in the object's values (field error lists included) is joined with spaces.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;

    match &value {
        Value::String(s) if !s.trim().is_empty() => return Some(s.clone()),
        Value::Object(map) => {
            for key in ["detail", "message", "error"] {
                if let Some(Value::String(s)) = map.get(key) {
                    return Some(s.clone());
                }
            }
        }
        _ => {}
    }

    let mut parts = Vec::new();
    collect_strings(&value, &mut parts);
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" "))
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}
