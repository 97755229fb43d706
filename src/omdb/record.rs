use serde_json::{Map, Value};

/// Placeholder rendered for any absent field.
pub const NOT_AVAILABLE: &str = "N/A";

/// Named fields of an OMDb movie payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Title,
    Year,
    Rated,
    Released,
    Runtime,
    Genre,
    Director,
    Actors,
    Plot,
    Language,
    Country,
    Awards,
    ImdbRating,
    ImdbVotes,
    ImdbId,
    Type,
}

impl Field {
    /// The JSON key OMDb uses for this field.
    pub fn key(&self) -> &'static str {
        match self {
            Field::Title => "Title",
            Field::Year => "Year",
            Field::Rated => "Rated",
            Field::Released => "Released",
            Field::Runtime => "Runtime",
            Field::Genre => "Genre",
            Field::Director => "Director",
            Field::Actors => "Actors",
            Field::Plot => "Plot",
            Field::Language => "Language",
            Field::Country => "Country",
            Field::Awards => "Awards",
            Field::ImdbRating => "imdbRating",
            Field::ImdbVotes => "imdbVotes",
            Field::ImdbId => "imdbID",
            Field::Type => "Type",
        }
    }
}

/// A movie as returned by a successful lookup.
///
/// Every accessor tolerates absence: missing or non-string values read as
/// [`NOT_AVAILABLE`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MovieRecord {
    fields: Map<String, Value>,
}

impl MovieRecord {
    /// Wraps a JSON payload. Returns `None` when the payload is not an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self { fields }),
            _ => None,
        }
    }

    /// Builds a record from known fields.
    pub fn from_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (Field, S)>,
        S: Into<String>,
    {
        let fields = fields
            .into_iter()
            .map(|(field, value)| (field.key().to_string(), Value::String(value.into())))
            .collect();
        Self { fields }
    }

    /// Reads a field, falling back to `"N/A"`.
    pub fn get(&self, field: Field) -> &str {
        self.raw(field.key()).unwrap_or(NOT_AVAILABLE)
    }

    /// Reads an arbitrary string value by its JSON key.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    pub fn title(&self) -> &str {
        self.get(Field::Title)
    }

    /// Interprets this record as a search response envelope.
    pub fn search_page(&self) -> SearchPage {
        let results = self
            .fields
            .get("Search")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| MovieRecord::from_value(item.clone()))
                    .collect()
            })
            .unwrap_or_default();

        SearchPage {
            results,
            total_results: self.raw("totalResults").map(str::to_string),
        }
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchPage {
    /// Partial records in the order OMDb returned them
    pub results: Vec<MovieRecord>,
    /// The total number of matches OMDb reports across all pages
    pub total_results: Option<String>,
}

impl SearchPage {
    /// True when the page carries no usable results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty() || self.total_results.as_deref() == Some("0")
    }

    /// Reported total, or the page length when OMDb omitted it.
    pub fn total_display(&self) -> String {
        self.total_results
            .clone()
            .unwrap_or_else(|| self.results.len().to_string())
    }
}
