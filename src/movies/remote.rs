use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{lenient_year, required_text, MovieContext, Resolution, YearSchema};
use crate::format::{format_catalog_movie, format_comparison, format_search_list, format_single};
use crate::omdb::{FetchError, LookupOutcome, LookupRequest, MediaType};
use crate::tool::{argument_schema, parse_arguments, Tool, ToolError, ToolResult};

/// Exact title lookup with dataset fallback.
pub struct TitleLookupTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `search_movie_by_title`.
#[derive(Debug, Deserialize, JsonSchema)]
struct TitleArgs {
    /// Название фильма (точное или близкое к точному)
    title: String,
    /// Год выпуска фильма (опционально, для уточнения поиска)
    #[serde(default, deserialize_with = "lenient_year")]
    #[schemars(with = "Option<YearSchema>")]
    year: Option<String>,
}

impl TitleLookupTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for TitleLookupTool {
    fn name(&self) -> &str {
        "search_movie_by_title"
    }

    fn description(&self) -> &str {
        "Поиск подробной информации о фильме по точному названию. \
         Сначала ищет через OMDB API, если не найдено - проверяет локальный датасет IMDb Top 1000."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<TitleArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: TitleArgs = parse_arguments(args)?;
        let request = LookupRequest::by_title(&args.title)?.with_year(args.year.as_deref());

        let text = match self.ctx.resolve(&request).await {
            Resolution::Remote(record) => format_single(&record),
            Resolution::Local(movie) => format_catalog_movie(&movie),
            Resolution::Missing(Some(error)) => {
                return Ok(ToolResult::error(format!("Ошибка при поиске фильма: {}", error)));
            }
            Resolution::Missing(None) => format!(
                "Фильм '{}' не найден ни в OMDB API, ни в локальном датасете IMDb Top 1000. \
                 Попробуйте использовать search_movies_list для поиска по частичному совпадению.",
                args.title.trim()
            ),
        };
        Ok(ToolResult::ok(text))
    }
}

/// Partial-title search returning a numbered list.
pub struct SearchListTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `search_movies_list`.
#[derive(Debug, Deserialize, JsonSchema)]
struct SearchArgs {
    /// Поисковый запрос (часть названия фильма)
    query: String,
    /// Год выпуска (опционально)
    #[serde(default, deserialize_with = "lenient_year")]
    #[schemars(with = "Option<YearSchema>")]
    year: Option<String>,
}

impl SearchListTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for SearchListTool {
    fn name(&self) -> &str {
        "search_movies_list"
    }

    fn description(&self) -> &str {
        "Поиск списка фильмов по частичному совпадению названия. \
         Возвращает до 10 фильмов с годом и типом."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<SearchArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: SearchArgs = parse_arguments(args)?;
        let request = LookupRequest::search(&args.query)?.with_year(args.year.as_deref());
        let query = args.query.trim();
        let not_found = format!("Фильмы по запросу '{}' не найдены.", query);

        let page = match self.ctx.omdb().fetch(&request).await {
            LookupOutcome::Found(record) => record.search_page(),
            LookupOutcome::NotFound => return Ok(ToolResult::ok(not_found)),
            LookupOutcome::Failed(error) => {
                return Ok(ToolResult::error(format!("Ошибка при поиске фильмов: {}", error)));
            }
        };
        if page.is_empty() {
            return Ok(ToolResult::ok(not_found));
        }

        let heading = format!(
            "Найдено {} фильмов по запросу '{}':",
            page.total_display(),
            query
        );
        let mut text = format_search_list(&heading, &page.results, true);
        text.push_str(
            "\nИспользуйте search_movie_by_title с точным названием для получения подробной информации.",
        );
        Ok(ToolResult::ok(text))
    }
}

/// Side-by-side comparison of two titles.
pub struct CompareTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `compare_two_movies`.
#[derive(Debug, Deserialize, JsonSchema)]
struct CompareArgs {
    /// Название первого фильма
    title1: String,
    /// Название второго фильма
    title2: String,
}

impl CompareTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for CompareTool {
    fn name(&self) -> &str {
        "compare_two_movies"
    }

    fn description(&self) -> &str {
        "Сравнение двух фильмов по различным параметрам: год, жанр, режиссер, \
         рейтинг, длительность, актеры, награды."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<CompareArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: CompareArgs = parse_arguments(args)?;
        let first_request = LookupRequest::by_title(&args.title1)?;
        let second_request = LookupRequest::by_title(&args.title2)?;

        let first = match self.ctx.resolve(&first_request).await.into_record() {
            Ok(record) => record,
            Err(failure) => return Ok(missing_for_comparison("Первый", &args.title1, failure)),
        };
        let second = match self.ctx.resolve(&second_request).await.into_record() {
            Ok(record) => record,
            Err(failure) => return Ok(missing_for_comparison("Второй", &args.title2, failure)),
        };

        Ok(ToolResult::ok(format_comparison(&first, &second)))
    }
}

fn missing_for_comparison(
    position: &str,
    title: &str,
    failure: Option<FetchError>,
) -> ToolResult {
    match failure {
        Some(error) => ToolResult::error(format!("Ошибка при сравнении фильмов: {}", error)),
        None => ToolResult::ok(format!("{} фильм '{}' не найден.", position, title.trim())),
    }
}

/// Lookup by IMDb id.
pub struct IdLookupTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `get_movie_by_id`.
#[derive(Debug, Deserialize, JsonSchema)]
struct IdArgs {
    /// IMDb идентификатор фильма (например, tt0111161)
    imdb_id: String,
}

impl IdLookupTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for IdLookupTool {
    fn name(&self) -> &str {
        "get_movie_by_id"
    }

    fn description(&self) -> &str {
        "Получить информацию о фильме по IMDb ID."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<IdArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: IdArgs = parse_arguments(args)?;
        let request = LookupRequest::by_id(&args.imdb_id)?;

        let result = match self.ctx.omdb().fetch(&request).await {
            LookupOutcome::Found(record) => ToolResult::ok(format_single(&record)),
            LookupOutcome::NotFound => {
                ToolResult::ok(format!("Фильм с ID '{}' не найден.", args.imdb_id.trim()))
            }
            LookupOutcome::Failed(error) => ToolResult::error(format!(
                "Ошибка при получении информации о фильме: {}",
                error
            )),
        };
        Ok(result)
    }
}

/// Search narrowed by year and media type.
pub struct YearTypeSearchTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `search_movies_by_year_and_type`.
#[derive(Debug, Deserialize, JsonSchema)]
struct YearTypeArgs {
    /// Поисковый запрос (часть названия)
    query: String,
    /// Год выпуска
    #[serde(deserialize_with = "lenient_year")]
    #[schemars(with = "YearSchema")]
    year: Option<String>,
    /// Тип медиа (movie, series, episode)
    #[serde(default)]
    movie_type: MediaType,
}

impl YearTypeSearchTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for YearTypeSearchTool {
    fn name(&self) -> &str {
        "search_movies_by_year_and_type"
    }

    fn description(&self) -> &str {
        "Поиск фильмов по названию, году и типу (movie, series, episode)."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<YearTypeArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let args: YearTypeArgs = parse_arguments(args)?;
        let year = required_text("year", args.year.as_deref().unwrap_or_default())?;
        let request = LookupRequest::search(&args.query)?
            .with_year(Some(year))
            .with_media_type(args.movie_type);
        let query = args.query.trim();

        let page = match self.ctx.omdb().fetch(&request).await {
            LookupOutcome::Found(record) => record.search_page(),
            LookupOutcome::NotFound => {
                return Ok(ToolResult::ok(format!(
                    "Фильмы по запросу '{}' ({}, {}) не найдены.",
                    query, year, args.movie_type
                )));
            }
            LookupOutcome::Failed(error) => {
                return Ok(ToolResult::error(format!("Ошибка при поиске: {}", error)));
            }
        };
        if page.is_empty() {
            return Ok(ToolResult::ok(format!(
                "Фильмы по запросу '{}' ({}, {}) не найдены.",
                query, year, args.movie_type
            )));
        }

        let heading = format!(
            "Найдено {} фильмов ({}, {}):",
            page.total_display(),
            year,
            args.movie_type
        );
        Ok(ToolResult::ok(format_search_list(&heading, &page.results, false)))
    }
}
