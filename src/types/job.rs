// src/types/job.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::types::response::ListPayload;

/// A job posting. The backend owns the schema; fields the client does not render
/// are kept in `extra` so the record passes through unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Job {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub organization_logo: Option<String>,
    #[serde(default)]
    pub organization_industry: Option<String>,
    #[serde(default)]
    pub organization_headquarters: Option<String>,
    #[serde(default)]
    pub organization_description: Option<String>,
    #[serde(default)]
    pub address_locality: Option<String>,
    #[serde(default)]
    pub address_country: Option<String>,
    #[serde(default)]
    pub remote_derived: Option<bool>,
    #[serde(default, deserialize_with = "string_or_list")]
    pub employment_type: Option<String>,
    #[serde(default)]
    pub seniority: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub date_posted: Option<String>,
    #[serde(default)]
    pub date_validthrough: Option<String>,
    #[serde(default)]
    pub direct_apply: Option<bool>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub source_domain: Option<String>,
    #[serde(default)]
    pub external_apply_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// External link to apply through, preferring the dedicated apply URL.
    pub fn apply_url(&self) -> Option<&str> {
        [&self.external_apply_url, &self.url]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|u| !u.is_empty())
    }

    /// Where the posting was scraped from, for the card footer.
    pub fn source_label(&self) -> &str {
        [&self.source_domain, &self.source]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("Unknown")
    }

    pub fn location_label(&self) -> String {
        match (
            self.address_locality.as_deref(),
            self.address_country.as_deref(),
        ) {
            (Some(city), Some(country)) => format!("{}, {}", city, country),
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => String::new(),
        }
    }
}

/// Employment type arrives either as a string (sometimes a stringified JSON array)
/// or as a real array; both collapse into one comma-joined string.
fn string_or_list<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(other) => Some(other.to_string()),
    })
}

/// One page of the filtered listing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobPage {
    pub items: Vec<Job>,
    pub total: u64,
    pub total_pages: u32,
}

impl From<ListPayload<Job>> for JobPage {
    fn from(payload: ListPayload<Job>) -> Self {
        let pagination = payload.pagination.clone().unwrap_or_default();
        Self {
            total: pagination.total.unwrap_or(0),
            total_pages: pagination.total_pages.unwrap_or(0),
            items: payload.items(),
        }
    }
}

/// Distinct organization with its number of open postings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub organization: String,
    #[serde(default, deserialize_with = "count_from_number_or_string")]
    pub job_count: u64,
}

/// Counts may come back as JSON numbers or as numeric strings (`"4"`).
fn count_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(0),
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .ok_or_else(|| serde::de::Error::custom(format!("invalid job_count: {}", n))),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid job_count: {:?}", s))),
        Some(other) => Err(serde::de::Error::custom(format!(
            "invalid job_count: {}",
            other
        ))),
    }
}
