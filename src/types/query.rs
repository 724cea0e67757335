// src/types/query.rs
use std::fmt;
use std::str::FromStr;

/// Filter inputs of the listing view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Search,
    Location,
    Organization,
    EmploymentType,
    Remote,
}

impl FilterField {
    pub fn param(self) -> &'static str {
        match self {
            FilterField::Search => "search",
            FilterField::Location => "location",
            FilterField::Organization => "organization",
            FilterField::EmploymentType => "employment_type",
            FilterField::Remote => "remote",
        }
    }

    /// Typed-into fields; changes to these are debounced before fetching.
    pub fn is_free_text(self) -> bool {
        matches!(self, FilterField::Search | FilterField::Location)
    }
}

/// Work-location mode filter; `Any` leaves the parameter out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemoteFilter {
    #[default]
    Any,
    Remote,
    OnSite,
}

impl RemoteFilter {
    pub fn as_param(self) -> &'static str {
        match self {
            RemoteFilter::Any => "",
            RemoteFilter::Remote => "true",
            RemoteFilter::OnSite => "false",
        }
    }
}

impl FromStr for RemoteFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "any" | "all" => Ok(RemoteFilter::Any),
            "true" | "remote" => Ok(RemoteFilter::Remote),
            "false" | "onsite" | "on-site" => Ok(RemoteFilter::OnSite),
            other => Err(format!("unknown remote filter: {}", other)),
        }
    }
}

impl fmt::Display for RemoteFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemoteFilter::Any => "any",
            RemoteFilter::Remote => "remote",
            RemoteFilter::OnSite => "on-site",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub search: String,
    pub location: String,
    pub organization: String,
    pub employment_type: String,
    pub remote: String,
}

impl Filters {
    pub fn get(&self, field: FilterField) -> &str {
        match field {
            FilterField::Search => &self.search,
            FilterField::Location => &self.location,
            FilterField::Organization => &self.organization,
            FilterField::EmploymentType => &self.employment_type,
            FilterField::Remote => &self.remote,
        }
    }

    pub fn set(&mut self, field: FilterField, value: String) {
        let slot = match field {
            FilterField::Search => &mut self.search,
            FilterField::Location => &mut self.location,
            FilterField::Organization => &mut self.organization,
            FilterField::EmploymentType => &mut self.employment_type,
            FilterField::Remote => &mut self.remote,
        };
        *slot = value;
    }
}

const FILTER_ORDER: [FilterField; 5] = [
    FilterField::Search,
    FilterField::Location,
    FilterField::Organization,
    FilterField::EmploymentType,
    FilterField::Remote,
];

/// Page, page size and filters of one listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub page: u32,
    pub limit: u32,
    pub filters: Filters,
}

impl ListingQuery {
    pub fn new(limit: u32) -> Self {
        Self {
            page: 1,
            limit: limit.max(1),
            filters: Filters::default(),
        }
    }

    /// Query parameters in wire order; empty filters are left out.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        for field in FILTER_ORDER {
            let value = self.filters.get(field);
            if !value.is_empty() {
                pairs.push((field.param(), value.to_string()));
            }
        }
        pairs
    }

    /// Encoded form of `query_pairs`, as sent after `?`.
    pub fn query_string(&self) -> String {
        reqwest::Url::parse_with_params("http://localhost/", self.query_pairs())
            .ok()
            .and_then(|url| url.query().map(str::to_string))
            .unwrap_or_default()
    }
}
