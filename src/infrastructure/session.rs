//! Session persistence: browser JSON and the `hicUrl=...&state=...` query
//! string used for shareable links.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::application::HicBrowser;
use crate::domain::errors::ViewStateParseError;
use crate::view_state::ViewState;

const URL_SHORTCUTS: [(&str, &str); 5] = [
    ("*s3e/", "https://hicfiles.s3.amazonaws.com/external/"),
    ("*s3/", "https://hicfiles.s3.amazonaws.com/"),
    ("*s3e_/", "http://hicfiles.s3.amazonaws.com/external/"),
    ("*s3_/", "http://hicfiles.s3.amazonaws.com/"),
    ("*enc/", "https://www.encodeproject.org/files/"),
];

/// Everything needed to reopen a browser where it was.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowserSession {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub state: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_gene: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nvi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control_nvi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cycle: Option<bool>,
}

impl BrowserSession {
    /// `None` unless the loaded dataset has a URL to reopen.
    pub fn capture(browser: &HicBrowser) -> Option<Self> {
        let dataset = browser.dataset()?;
        let url = dataset.url()?.to_string();
        let control = browser.control_dataset();

        Some(Self {
            url,
            name: non_empty(dataset.name()),
            state: browser.state().to_string(),
            selected_gene: browser.selected_gene(),
            nvi: dataset.nvi().map(str::to_string),
            control_url: control.as_ref().and_then(|c| c.url().map(str::to_string)),
            control_name: control.as_ref().and_then(|c| non_empty(c.name())),
            display_mode: control.as_ref().map(|_| browser.display_mode().to_string()),
            control_nvi: control.as_ref().and_then(|c| c.nvi().map(str::to_string)),
            cycle: (control.is_some() && browser.is_display_mode_cycling()).then_some(true),
        })
    }

    pub fn view_state(&self) -> Result<ViewState, ViewStateParseError> {
        self.state.parse()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_query_string(&self) -> String {
        let mut params = vec![param("hicUrl", &self.url)];
        if let Some(name) = &self.name {
            params.push(param("name", name));
        }
        params.push(param("state", &self.state));
        if let Some(gene) = &self.selected_gene {
            params.push(param("selectedGene", gene));
        }
        if let Some(nvi) = &self.nvi {
            params.push(param("nvi", nvi));
        }
        if let Some(control_url) = &self.control_url {
            params.push(param("controlUrl", control_url));
            if let Some(control_name) = &self.control_name {
                params.push(param("controlName", control_name));
            }
            if let Some(display_mode) = &self.display_mode {
                params.push(param("displayMode", display_mode));
            }
            if let Some(control_nvi) = &self.control_nvi {
                params.push(param("controlNvi", control_nvi));
            }
            if self.cycle == Some(true) {
                params.push(param("cycle", "true"));
            }
        }
        params.join("&")
    }

    /// Rebuild a session from parsed query parameters; `hicUrl` is required.
    pub fn from_query(query: &HashMap<String, String>) -> Option<Self> {
        let decoded = |key: &str| query.get(key).map(|value| param_decode(value));

        Some(Self {
            url: expand_url_shortcut(&decoded("hicUrl")?),
            name: decoded("name"),
            state: decoded("state").unwrap_or_else(|| ViewState::default().to_string()),
            selected_gene: decoded("selectedGene"),
            nvi: decoded("nvi"),
            control_url: decoded("controlUrl").map(|url| expand_url_shortcut(&url)),
            control_name: decoded("controlName"),
            display_mode: decoded("displayMode"),
            control_nvi: decoded("controlNvi"),
            cycle: decoded("cycle").map(|cycle| cycle == "true"),
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn param(key: &str, value: &str) -> String {
    format!("{}={}", key, param_encode(value))
}

/// Minimal encoding for a query value: only characters that would break the
/// query string are escaped.
pub fn param_encode(value: &str) -> String {
    value
        .replace('&', "%26")
        .replace(' ', "+")
        .replace('#', "%23")
        .replace('?', "%3F")
        .replace('=', "%3D")
}

pub fn param_decode(value: &str) -> String {
    value
        .replace("%26", "&")
        .replace("%20", " ")
        .replace('+', " ")
        .replace("%7C", "|")
        .replace("%23", "#")
        .replace("%3F", "?")
        .replace("%3D", "=")
}

/// Expand `*s3/`-style prefixes to full URLs.
pub fn expand_url_shortcut(url: &str) -> String {
    for (prefix, expansion) in URL_SHORTCUTS {
        if let Some(rest) = url.strip_prefix(prefix) {
            return format!("{}{}", expansion, rest);
        }
    }
    url.to_string()
}

/// Key/value pairs of a URI's query, ignoring the fragment. A `?` that
/// appears after the first `=` is treated as part of a value.
pub fn extract_query(uri: &str) -> HashMap<String, String> {
    let end = uri.rfind('#').unwrap_or(uri.len());
    let start = match (uri.find('?'), uri.find('=')) {
        (Some(question), Some(equals)) if question > equals => 0,
        (Some(question), _) => question + 1,
        (None, _) => 0,
    };

    let mut query = HashMap::new();
    if start >= end {
        return query;
    }
    for pair in uri[start..end].split('&') {
        if let Some((key, value)) = pair.split_once('=') {
            query.insert(key.to_string(), value.to_string());
        }
    }
    query
}
