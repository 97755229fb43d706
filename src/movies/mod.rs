//! Movie lookup tools exposed to the agent.
//!
//! Every tool shares one [`MovieContext`] built at startup: the OMDb client
//! plus the optional local dataset. Tools only ever return text; lookup
//! failures, missing data and a missing dataset all end up as readable
//! messages.

mod local;
mod remote;

use schemars::r#gen::SchemaGenerator;
use schemars::schema::{InstanceType, Schema, SchemaObject};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::catalog::{CatalogError, CatalogMovie, MovieCatalog};
use crate::omdb::{FetchError, LookupOutcome, LookupRequest, MovieRecord, OmdbClient, RequestError};
use crate::tool::{ToolError, ToolRegistry};

pub use local::{ActorTool, DirectorTool, GenreTopTool, RatingTool};
pub use remote::{CompareTool, IdLookupTool, SearchListTool, TitleLookupTool, YearTypeSearchTool};

/// Returned by every dataset-backed tool when the dataset failed to load.
pub const DATASET_UNAVAILABLE: &str = "Локальный датасет IMDb Top 1000 недоступен.";

/// Shared, read-only state handed to every movie tool.
#[derive(Debug, Clone)]
pub struct MovieContext {
    omdb: OmdbClient,
    catalog: Option<Arc<MovieCatalog>>,
}

/// Where a title lookup ended up.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// OMDb knows the movie
    Remote(MovieRecord),
    /// OMDb did not deliver, the local dataset did
    Local(CatalogMovie),
    /// Neither source has it; carries the OMDb failure, if there was one
    Missing(Option<FetchError>),
}

impl Resolution {
    /// The resolved movie in OMDb shape, whichever source it came from.
    pub fn into_record(self) -> Result<MovieRecord, Option<FetchError>> {
        match self {
            Resolution::Remote(record) => Ok(record),
            Resolution::Local(movie) => Ok(movie.to_record()),
            Resolution::Missing(failure) => Err(failure),
        }
    }
}

impl MovieContext {
    pub fn new(omdb: OmdbClient, catalog: Option<Arc<MovieCatalog>>) -> Self {
        Self { omdb, catalog }
    }

    /// Builds the context from a dataset load attempt.
    ///
    /// A failed load is logged and leaves the dataset tools in degraded mode.
    pub fn with_dataset(omdb: OmdbClient, dataset: Result<MovieCatalog, CatalogError>) -> Self {
        let catalog = match dataset {
            Ok(catalog) => Some(Arc::new(catalog)),
            Err(error) => {
                warn!(%error, "Movie dataset unavailable, dataset tools will report it");
                None
            }
        };
        Self::new(omdb, catalog)
    }

    pub fn omdb(&self) -> &OmdbClient {
        &self.omdb
    }

    pub fn catalog(&self) -> Option<&MovieCatalog> {
        self.catalog.as_deref()
    }

    /// Looks a title up on OMDb, then in the dataset if OMDb did not deliver.
    ///
    /// The dataset is consulted on `NotFound` and on `Failed`; only title
    /// requests have a dataset fallback.
    pub async fn resolve(&self, request: &LookupRequest) -> Resolution {
        let failure = match self.omdb.fetch(request).await {
            LookupOutcome::Found(record) => return Resolution::Remote(record),
            LookupOutcome::NotFound => None,
            LookupOutcome::Failed(error) => Some(error),
        };

        let fallback = request
            .get("t")
            .zip(self.catalog())
            .and_then(|(title, catalog)| catalog.find_by_title(title));

        match fallback {
            Some(movie) => {
                debug!(title = %movie.title, "Resolved from the local dataset");
                Resolution::Local(movie.clone())
            }
            None => Resolution::Missing(failure),
        }
    }
}

/// Registers every movie tool, sharing one context.
pub fn build_registry(context: Arc<MovieContext>) -> ToolRegistry {
    ToolRegistry::new()
        .with(Arc::new(TitleLookupTool::new(context.clone())))
        .with(Arc::new(SearchListTool::new(context.clone())))
        .with(Arc::new(CompareTool::new(context.clone())))
        .with(Arc::new(IdLookupTool::new(context.clone())))
        .with(Arc::new(YearTypeSearchTool::new(context.clone())))
        .with(Arc::new(GenreTopTool::new(context.clone())))
        .with(Arc::new(DirectorTool::new(context.clone())))
        .with(Arc::new(ActorTool::new(context.clone())))
        .with(Arc::new(RatingTool::new(context)))
}

impl From<RequestError> for ToolError {
    fn from(error: RequestError) -> Self {
        ToolError::InvalidArguments(error.to_string())
    }
}

/// Rejects blank text arguments, which would otherwise match everything.
fn required_text<'a>(name: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ToolError::InvalidArguments(format!("{} must not be empty", name)));
    }
    Ok(value)
}

/// Schema of a year argument: the model may send it as text or as a number.
struct YearSchema;

impl JsonSchema for YearSchema {
    fn is_referenceable() -> bool {
        false
    }

    fn schema_name() -> String {
        "Year".to_string()
    }

    fn json_schema(_: &mut SchemaGenerator) -> Schema {
        SchemaObject {
            instance_type: Some(vec![InstanceType::String, InstanceType::Integer].into()),
            ..Default::default()
        }
        .into()
    }
}

/// Years arrive as `"1999"` or `1999` depending on the model.
fn lenient_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Year {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Year>::deserialize(deserializer)?.map(|year| match year {
        Year::Text(text) => text,
        Year::Number(number) => number.to_string(),
    }))
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::omdb::transport::{MockMovieTransport, TransportError};
    use crate::omdb::ErrorKind;
    use serde_json::json;

    #[tokio::test]
    async fn test_resolve_prefers_remote() {
        let mut transport = MockMovieTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!({"Response": "True", "Title": "Heat", "Year": "1995"})));

        let resolution = context(transport)
            .resolve(&LookupRequest::by_title("Heat").unwrap())
            .await;

        assert!(matches!(resolution, Resolution::Remote(record) if record.title() == "Heat"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_not_found() {
        let mut transport = MockMovieTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!({"Response": "False", "Error": "Movie not found!"})));

        let resolution = context(transport)
            .resolve(&LookupRequest::by_title("godfather").unwrap())
            .await;

        assert!(matches!(resolution, Resolution::Local(movie) if movie.title == "The Godfather"));
    }

    #[tokio::test]
    async fn test_resolve_falls_back_on_failure_and_keeps_error() {
        let mut transport = MockMovieTransport::new();
        transport
            .expect_get()
            .times(2)
            .returning(|_| Err(TransportError::Timeout));

        let ctx = context(transport);
        let resolution = ctx.resolve(&LookupRequest::by_title("Nonexistent").unwrap()).await;

        match resolution {
            Resolution::Missing(Some(error)) => assert_eq!(error.kind, ErrorKind::Timeout),
            other => panic!("expected Missing with error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_id_requests_have_no_fallback() {
        let mut transport = MockMovieTransport::new();
        transport
            .expect_get()
            .times(1)
            .returning(|_| Ok(json!({"Response": "False", "Error": "Incorrect IMDb ID."})));

        let resolution = context(transport)
            .resolve(&LookupRequest::by_id("tt0000000").unwrap())
            .await;

        assert!(matches!(resolution, Resolution::Missing(Some(_))));
    }

    #[test]
    fn test_failed_dataset_load_degrades() {
        let ctx = context_without_dataset(unused_transport());
        assert!(ctx.catalog().is_none());
    }

    #[test]
    fn test_registry_exposes_all_tools() {
        let registry = build_registry(context(unused_transport()));
        assert_eq!(
            registry.names(),
            vec![
                "search_movie_by_title",
                "search_movies_list",
                "compare_two_movies",
                "get_movie_by_id",
                "search_movies_by_year_and_type",
                "get_top_movies_by_genre",
                "get_movies_by_director",
                "get_movies_by_actor",
                "get_movies_by_rating",
            ]
        );
        for definition in registry.to_tool_definitions() {
            assert_eq!(definition.input_schema["type"], "object", "{}", definition.name);
            assert!(!definition.description.is_empty());
        }
    }

    #[test]
    fn test_year_schema_admits_text_and_numbers() {
        let registry = build_registry(context(unused_transport()));
        for name in ["search_movie_by_title", "search_movies_list", "search_movies_by_year_and_type"] {
            let schema = registry.get(name).unwrap().parameters_schema();
            let types = schema["properties"]["year"]["type"].as_array().cloned().unwrap_or_default();
            assert!(types.contains(&json!("string")), "{}: {}", name, schema);
            assert!(types.contains(&json!("integer")), "{}: {}", name, schema);
        }

        let year_type = registry.get("search_movies_by_year_and_type").unwrap().parameters_schema();
        assert!(year_type["required"].as_array().unwrap().contains(&json!("year")));
    }

    #[test]
    fn test_lenient_year_accepts_numbers() {
        #[derive(Deserialize)]
        struct Args {
            #[serde(default, deserialize_with = "lenient_year")]
            year: Option<String>,
        }

        let numeric: Args = serde_json::from_value(json!({"year": 1999})).unwrap();
        assert_eq!(numeric.year.as_deref(), Some("1999"));
        let missing: Args = serde_json::from_value(json!({})).unwrap();
        assert!(missing.year.is_none());
        assert!(required_text("title", "  ").is_err());
    }
}
