//! Read-only IMDb Top 1000 dataset used as a secondary movie source.

use serde::Deserialize;
use std::cmp::Ordering;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::omdb::{Field, MovieRecord};

const REQUIRED_COLUMNS: [&str; 3] = ["Series_Title", "Released_Year", "IMDB_Rating"];

/// Errors raised while loading the dataset.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("cannot open dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed dataset: {0}")]
    Csv(#[from] csv::Error),
    #[error("dataset is missing column {0}")]
    MissingColumn(&'static str),
}

/// One row of the dataset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogMovie {
    #[serde(rename = "Series_Title")]
    pub title: String,
    #[serde(rename = "Released_Year")]
    pub year: String,
    #[serde(rename = "IMDB_Rating")]
    pub rating: f64,
    #[serde(rename = "Genre", default)]
    pub genre: String,
    #[serde(rename = "Director", default)]
    pub director: String,
    #[serde(rename = "Star1", default)]
    pub star1: String,
    #[serde(rename = "Star2", default)]
    pub star2: String,
    #[serde(rename = "Star3", default)]
    pub star3: String,
    #[serde(rename = "Star4", default)]
    pub star4: String,
    #[serde(rename = "Overview", default)]
    pub overview: String,
    #[serde(rename = "Runtime", default)]
    pub runtime: Option<String>,
}

impl CatalogMovie {
    pub fn stars(&self) -> [&str; 4] {
        [&self.star1, &self.star2, &self.star3, &self.star4]
    }

    /// Converts the row into the shape OMDb lookups produce.
    pub fn to_record(&self) -> MovieRecord {
        let actors = self
            .stars()
            .into_iter()
            .filter(|star| !star.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let mut fields = vec![
            (Field::Title, self.title.clone()),
            (Field::Year, self.year.clone()),
            (Field::ImdbRating, rating_display(self.rating)),
            (Field::Genre, self.genre.clone()),
            (Field::Director, self.director.clone()),
            (Field::Actors, actors),
            (Field::Plot, self.overview.clone()),
        ];
        if let Some(runtime) = &self.runtime {
            fields.push((Field::Runtime, runtime.clone()));
        }
        MovieRecord::from_fields(fields)
    }
}

/// The loaded dataset. Immutable after construction.
#[derive(Debug, Clone, Default)]
pub struct MovieCatalog {
    movies: Vec<CatalogMovie>,
}

impl MovieCatalog {
    /// Loads the dataset from a CSV file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let file = File::open(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_reader(file)?;
        info!(path = %path.display(), movies = catalog.len(), "Loaded movie dataset");
        Ok(catalog)
    }

    /// Parses CSV with a header row. Rows that fail to parse are skipped.
    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::Reader::from_reader(reader);

        let headers = reader.headers()?.clone();
        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(CatalogError::MissingColumn(column));
            }
        }

        let mut movies = Vec::new();
        for (line, row) in reader.deserialize::<CatalogMovie>().enumerate() {
            match row {
                Ok(movie) => movies.push(movie),
                Err(e) => warn!(row = line + 1, error = %e, "Skipping malformed dataset row"),
            }
        }

        Ok(Self { movies })
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// First movie whose title contains `title`, ignoring case.
    pub fn find_by_title(&self, title: &str) -> Option<&CatalogMovie> {
        let needle = title.to_lowercase();
        let found = self
            .movies
            .iter()
            .find(|movie| movie.title.to_lowercase().contains(&needle));
        debug!(title, found = found.is_some(), "Dataset title lookup");
        found
    }

    /// Movies whose genre list contains `genre`, in file order.
    pub fn by_genre(&self, genre: &str) -> Vec<&CatalogMovie> {
        let needle = genre.to_lowercase();
        self.filter(|movie| movie.genre.to_lowercase().contains(&needle))
    }

    pub fn by_director(&self, director: &str) -> Vec<&CatalogMovie> {
        let needle = director.to_lowercase();
        self.filter(|movie| movie.director.to_lowercase().contains(&needle))
    }

    /// Movies where any of the four billed stars matches `actor`.
    pub fn by_actor(&self, actor: &str) -> Vec<&CatalogMovie> {
        let needle = actor.to_lowercase();
        self.filter(|movie| {
            movie
                .stars()
                .iter()
                .any(|star| star.to_lowercase().contains(&needle))
        })
    }

    /// Movies rated at least `min_rating`, optionally narrowed by genre.
    pub fn rated_at_least(&self, min_rating: f64, genre: Option<&str>) -> Vec<&CatalogMovie> {
        let needle = genre.map(str::to_lowercase);
        self.filter(|movie| {
            movie.rating >= min_rating
                && needle
                    .as_deref()
                    .is_none_or(|g| movie.genre.to_lowercase().contains(g))
        })
    }

    fn filter<F>(&self, predicate: F) -> Vec<&CatalogMovie>
    where
        F: Fn(&CatalogMovie) -> bool,
    {
        self.movies.iter().filter(|movie| predicate(movie)).collect()
    }
}

/// Renders a rating the way the dataset spells it: `9.0`, `8.5`.
pub fn rating_display(rating: f64) -> String {
    if rating.fract() == 0.0 {
        format!("{:.1}", rating)
    } else {
        rating.to_string()
    }
}

/// The `limit` highest-rated movies, best first. Ties keep their input order.
pub fn top_rated(mut movies: Vec<&CatalogMovie>, limit: usize) -> Vec<&CatalogMovie> {
    movies.sort_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap_or(Ordering::Equal));
    movies.truncate(limit);
    movies
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
Poster_Link,Series_Title,Released_Year,Certificate,Runtime,Genre,IMDB_Rating,Overview,Meta_score,Director,Star1,Star2,Star3,Star4,No_of_Votes,Gross
x,The Shawshank Redemption,1994,A,142 min,Drama,9.3,Two imprisoned men bond.,80,Frank Darabont,Tim Robbins,Morgan Freeman,Bob Gunton,William Sadler,2343110,\"28,341,469\"
x,The Godfather,1972,A,175 min,\"Crime, Drama\",9.2,An organized crime dynasty.,100,Francis Ford Coppola,Marlon Brando,Al Pacino,James Caan,Diane Keaton,1620367,\"134,966,411\"
x,The Dark Knight,2008,UA,152 min,\"Action, Crime, Drama\",9.0,Batman faces the Joker.,84,Christopher Nolan,Christian Bale,Heath Ledger,Aaron Eckhart,Michael Caine,2303232,\"534,858,444\"
x,Broken Row,1999,A,100 min,Drama,not-a-number,Bad.,1,Nobody,A,B,C,D,1,1
x,Inception,2010,UA,148 min,\"Action, Adventure, Sci-Fi\",8.8,A thief steals secrets.,74,Christopher Nolan,Leonardo DiCaprio,Joseph Gordon-Levitt,Elliot Page,Ken Watanabe,2067042,\"292,576,195\"
x,Apollo 13,1995,U,140 min,\"Adventure, Drama, History\",7.6,NASA must devise a strategy.,77,Ron Howard,Tom Hanks,Bill Paxton,Kevin Bacon,Gary Sinise,269197,\"173,837,933\"
x,Heat,1995,A,170 min,\"Action, Crime, Drama\",8.2,A group of thieves.,76,Michael Mann,Al Pacino,Robert De Niro,Val Kilmer,Jon Voight,577113,\"67,436,818\"
";

    fn sample() -> MovieCatalog {
        MovieCatalog::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let catalog = sample();
        assert_eq!(catalog.len(), 6);
        assert!(catalog.find_by_title("broken row").is_none());
    }

    #[test]
    fn test_title_lookup_is_case_insensitive_substring() {
        let catalog = sample();
        let movie = catalog.find_by_title("dark KNIGHT").unwrap();
        assert_eq!(movie.year, "2008");
        assert_eq!(movie.runtime.as_deref(), Some("152 min"));
    }

    #[test]
    fn test_filters() {
        let catalog = sample();

        let nolan: Vec<_> = catalog.by_director("nolan").iter().map(|m| m.title.as_str()).collect();
        assert_eq!(nolan, vec!["The Dark Knight", "Inception"]);

        let pacino: Vec<_> = catalog.by_actor("pacino").iter().map(|m| m.title.as_str()).collect();
        assert_eq!(pacino, vec!["The Godfather", "Heat"]);

        assert_eq!(catalog.by_genre("crime").len(), 3);
        assert_eq!(catalog.rated_at_least(9.0, None).len(), 3);
        assert_eq!(catalog.rated_at_least(8.0, Some("action")).len(), 3);
    }

    #[test]
    fn test_top_rated_sorts_descending_and_truncates() {
        let catalog = sample();
        let top: Vec<_> = top_rated(catalog.by_genre("drama"), 2)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(top, vec!["The Shawshank Redemption", "The Godfather"]);
    }

    #[test]
    fn test_top_rated_keeps_order_on_ties() {
        let make = |title: &str| CatalogMovie {
            title: title.to_string(),
            year: "2000".to_string(),
            rating: 8.0,
            genre: String::new(),
            director: String::new(),
            star1: String::new(),
            star2: String::new(),
            star3: String::new(),
            star4: String::new(),
            overview: String::new(),
            runtime: None,
        };
        let movies = vec![make("first"), make("second"), make("third")];
        let top: Vec<_> = top_rated(movies.iter().collect(), 2)
            .iter()
            .map(|m| m.title.as_str())
            .collect();
        assert_eq!(top, vec!["first", "second"]);
    }

    #[test]
    fn test_to_record_carries_dataset_fields() {
        let catalog = sample();
        let record = catalog.find_by_title("Heat").unwrap().to_record();
        assert_eq!(record.get(Field::Director), "Michael Mann");
        assert_eq!(record.get(Field::ImdbRating), "8.2");
        assert_eq!(record.get(Field::Actors), "Al Pacino, Robert De Niro, Val Kilmer, Jon Voight");
        assert_eq!(record.get(Field::Awards), crate::omdb::NOT_AVAILABLE);
    }

    #[test]
    fn test_rating_display_keeps_one_decimal() {
        assert_eq!(rating_display(9.0), "9.0");
        assert_eq!(rating_display(8.8), "8.8");
        assert_eq!(rating_display(7.55), "7.55");
    }

    #[test]
    fn test_load_from_file_and_missing_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        assert_eq!(MovieCatalog::load(file.path()).unwrap().len(), 6);

        let missing = MovieCatalog::load(Path::new("/definitely/not/here.csv"));
        assert!(matches!(missing, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_missing_required_column_is_rejected() {
        let result = MovieCatalog::from_reader("Title,Year\nHeat,1995\n".as_bytes());
        assert!(matches!(result, Err(CatalogError::MissingColumn("Series_Title"))));
    }
}
