use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

use super::{required_text, MovieContext, DATASET_UNAVAILABLE};
use crate::catalog::{rating_display, top_rated, CatalogMovie, MovieCatalog};
use crate::format::format_catalog_line;
use crate::tool::{argument_schema, parse_arguments, Tool, ToolError, ToolResult};

fn catalog_or_unavailable(ctx: &MovieContext) -> Result<&MovieCatalog, ToolResult> {
    ctx.catalog()
        .ok_or_else(|| ToolResult::error(DATASET_UNAVAILABLE))
}

fn catalog_lines(movies: &[&CatalogMovie]) -> String {
    movies
        .iter()
        .map(|movie| format_catalog_line(movie))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Highest-rated dataset movies of one genre.
pub struct GenreTopTool {
    ctx: Arc<MovieContext>,
}

fn default_genre_limit() -> usize {
    5
}

/// Arguments of `get_top_movies_by_genre`.
#[derive(Debug, Deserialize, JsonSchema)]
struct GenreArgs {
    /// Жанр фильма (например, Action, Drama, Comedy)
    genre: String,
    /// Количество фильмов (по умолчанию 5)
    #[serde(default = "default_genre_limit")]
    limit: usize,
}

impl GenreTopTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for GenreTopTool {
    fn name(&self) -> &str {
        "get_top_movies_by_genre"
    }

    fn description(&self) -> &str {
        "Получить топ фильмов по жанру из локального датасета IMDb Top 1000."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<GenreArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let catalog = match catalog_or_unavailable(&self.ctx) {
            Ok(catalog) => catalog,
            Err(unavailable) => return Ok(unavailable),
        };
        let args: GenreArgs = parse_arguments(args)?;
        let genre = required_text("genre", &args.genre)?;

        let matches = catalog.by_genre(genre);
        if matches.is_empty() {
            return Ok(ToolResult::ok(format!(
                "Фильмы жанра '{}' не найдены в датасете.",
                genre
            )));
        }

        let mut text = format!(
            "Топ-{} фильмов жанра {} (из IMDb Top 1000):\n\n",
            args.limit, genre
        );
        for movie in top_rated(matches, args.limit) {
            text.push_str(&format_catalog_line(movie));
            text.push('\n');
        }
        Ok(ToolResult::ok(text))
    }
}

/// Every dataset movie by a director.
pub struct DirectorTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `get_movies_by_director`.
#[derive(Debug, Deserialize, JsonSchema)]
struct DirectorArgs {
    /// Имя режиссера (полное или частичное)
    director: String,
}

impl DirectorTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for DirectorTool {
    fn name(&self) -> &str {
        "get_movies_by_director"
    }

    fn description(&self) -> &str {
        "Найти все фильмы режиссера из локального датасета IMDb Top 1000."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<DirectorArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let catalog = match catalog_or_unavailable(&self.ctx) {
            Ok(catalog) => catalog,
            Err(unavailable) => return Ok(unavailable),
        };
        let args: DirectorArgs = parse_arguments(args)?;
        let director = required_text("director", &args.director)?;

        let movies = catalog.by_director(director);
        let text = if movies.is_empty() {
            format!(
                "Фильмы режиссера '{}' не найдены в датасете IMDb Top 1000.",
                director
            )
        } else {
            format!(
                "Фильмы режиссера {} (из IMDb Top 1000):\n\n{}",
                director,
                catalog_lines(&movies)
            )
        };
        Ok(ToolResult::ok(text))
    }
}

/// Every dataset movie starring an actor.
pub struct ActorTool {
    ctx: Arc<MovieContext>,
}

/// Arguments of `get_movies_by_actor`.
#[derive(Debug, Deserialize, JsonSchema)]
struct ActorArgs {
    /// Имя актера (полное или частичное)
    actor: String,
}

impl ActorTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for ActorTool {
    fn name(&self) -> &str {
        "get_movies_by_actor"
    }

    fn description(&self) -> &str {
        "Найти фильмы с участием актера из локального датасета IMDb Top 1000."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<ActorArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let catalog = match catalog_or_unavailable(&self.ctx) {
            Ok(catalog) => catalog,
            Err(unavailable) => return Ok(unavailable),
        };
        let args: ActorArgs = parse_arguments(args)?;
        let actor = required_text("actor", &args.actor)?;

        let movies = catalog.by_actor(actor);
        let text = if movies.is_empty() {
            format!(
                "Фильмы с актером '{}' не найдены в датасете IMDb Top 1000.",
                actor
            )
        } else {
            format!(
                "Фильмы с {} (из IMDb Top 1000):\n\n{}",
                actor,
                catalog_lines(&movies)
            )
        };
        Ok(ToolResult::ok(text))
    }
}

/// Dataset movies above a rating threshold.
pub struct RatingTool {
    ctx: Arc<MovieContext>,
}

fn default_min_rating() -> f64 {
    8.0
}

fn default_rating_limit() -> usize {
    10
}

/// Arguments of `get_movies_by_rating`.
#[derive(Debug, Deserialize, JsonSchema)]
struct RatingArgs {
    /// Минимальный рейтинг IMDb (по умолчанию 8.0)
    #[serde(default = "default_min_rating")]
    min_rating: f64,
    /// Опциональный жанр для фильтрации
    #[serde(default)]
    genre: Option<String>,
    /// Максимальное количество фильмов (по умолчанию 10)
    #[serde(default = "default_rating_limit")]
    limit: usize,
}

impl RatingTool {
    pub fn new(ctx: Arc<MovieContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for RatingTool {
    fn name(&self) -> &str {
        "get_movies_by_rating"
    }

    fn description(&self) -> &str {
        "Найти фильмы по минимальному рейтингу из локального датасета IMDb Top 1000, \
         опционально с фильтром по жанру."
    }

    fn parameters_schema(&self) -> Value {
        argument_schema::<RatingArgs>()
    }

    async fn execute(&self, args: Value) -> Result<ToolResult, ToolError> {
        let catalog = match catalog_or_unavailable(&self.ctx) {
            Ok(catalog) => catalog,
            Err(unavailable) => return Ok(unavailable),
        };
        let args: RatingArgs = parse_arguments(args)?;
        let genre = args
            .genre
            .as_deref()
            .map(str::trim)
            .filter(|genre| !genre.is_empty());
        let min_rating = rating_display(args.min_rating);

        let matches = catalog.rated_at_least(args.min_rating, genre);
        if matches.is_empty() {
            let genre_text = genre.map(|g| format!(" жанра {}", g)).unwrap_or_default();
            return Ok(ToolResult::ok(format!(
                "Фильмы{} с рейтингом ≥ {} не найдены в датасете.",
                genre_text, min_rating
            )));
        }

        let genre_text = genre.map(|g| format!(" ({})", g)).unwrap_or_default();
        let mut text = format!(
            "Фильмы{} с рейтингом ≥ {} (из IMDb Top 1000):\n\n",
            genre_text, min_rating
        );
        for movie in top_rated(matches, args.limit) {
            let _ = write!(
                text,
                "{}\n  Жанр: {}\n  Режиссер: {}\n\n",
                format_catalog_line(movie),
                movie.genre,
                movie.director
            );
        }
        Ok(ToolResult::ok(text))
    }
}
