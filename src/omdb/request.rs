use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors raised while building a lookup request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// The identifying parameter (title, id or search text) was blank
    #[error("{0} must not be empty")]
    MissingIdentifier(&'static str),
    /// Unknown media type
    #[error("unknown media type: {0} (expected movie, series or episode)")]
    UnknownMediaType(String),
}

/// The kind of media OMDb can filter a search by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Movie,
    Series,
    Episode,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Series => "series",
            MediaType::Episode => "episode",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "series" => Ok(MediaType::Series),
            "episode" => Ok(MediaType::Episode),
            other => Err(RequestError::UnknownMediaType(other.to_string())),
        }
    }
}

/// Query parameters for a single OMDb lookup.
///
/// A request always carries exactly one identifying parameter (`t`, `i` or
/// `s`), which is why the only way to build one is through [`by_title`],
/// [`by_id`] or [`search`]. Optional refinements keep insertion order.
///
/// [`by_title`]: LookupRequest::by_title
/// [`by_id`]: LookupRequest::by_id
/// [`search`]: LookupRequest::search
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    params: Vec<(&'static str, String)>,
}

impl LookupRequest {
    /// Exact title lookup (`t`).
    pub fn by_title(title: &str) -> Result<Self, RequestError> {
        Self::identified("t", "title", title)
    }

    /// IMDb id lookup (`i`), e.g. `tt0111161`.
    pub fn by_id(imdb_id: &str) -> Result<Self, RequestError> {
        Self::identified("i", "imdb_id", imdb_id)
    }

    /// Free-text search (`s`), returns a page of partial records.
    pub fn search(query: &str) -> Result<Self, RequestError> {
        Self::identified("s", "query", query)
    }

    fn identified(key: &'static str, label: &'static str, value: &str) -> Result<Self, RequestError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(RequestError::MissingIdentifier(label));
        }
        Ok(Self {
            params: vec![(key, value.to_string())],
        })
    }

    /// Narrows the lookup to a release year. Blank years are ignored.
    pub fn with_year(self, year: Option<&str>) -> Self {
        match year.map(str::trim).filter(|y| !y.is_empty()) {
            Some(year) => self.with_param("y", year.to_string()),
            None => self,
        }
    }

    /// Narrows a search to one media type.
    pub fn with_media_type(self, media_type: MediaType) -> Self {
        self.with_param("type", media_type.as_str().to_string())
    }

    fn with_param(mut self, key: &'static str, value: String) -> Self {
        match self.params.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.params.push((key, value)),
        }
        self
    }

    /// Returns the value of a parameter, if set.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over the parameters in insertion order.
    pub fn params(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.params.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Builds the full query string pairs, credential first.
    pub fn to_query(&self, api_key: &str) -> Vec<(String, String)> {
        std::iter::once(("apikey".to_string(), api_key.to_string()))
            .chain(self.params().map(|(k, v)| (k.to_string(), v.to_string())))
            .collect()
    }
}
