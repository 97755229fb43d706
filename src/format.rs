//! Text rendering for lookup results. Pure functions, no I/O.

use std::fmt::Write;

use crate::catalog::{rating_display, CatalogMovie};
use crate::omdb::{Field, MovieRecord};

/// Search listings never show more than this many entries.
pub const MAX_LISTED_RESULTS: usize = 10;

const DATASET_SOURCE_NOTE: &str = "(Источник: IMDb Top 1000 локальный датасет)";

/// Comparison rows: label, field and value suffix.
const COMPARISON_ROWS: [(&str, Field, &str); 7] = [
    ("Год выпуска", Field::Year, ""),
    ("Жанр", Field::Genre, ""),
    ("Режиссер", Field::Director, ""),
    ("IMDb рейтинг", Field::ImdbRating, "/10"),
    ("Длительность", Field::Runtime, ""),
    ("Актеры", Field::Actors, ""),
    ("Награды", Field::Awards, ""),
];

/// Renders every field of a movie in a fixed order.
pub fn format_single(movie: &MovieRecord) -> String {
    format!(
        "Название: {}\n\
         Год: {}\n\
         Рейтинг: {}\n\
         Дата выхода: {}\n\
         Длительность: {}\n\
         Жанр: {}\n\
         Режиссер: {}\n\
         Актеры: {}\n\
         Описание: {}\n\
         Язык: {}\n\
         Страна: {}\n\
         Награды: {}\n\
         IMDb рейтинг: {}/10 ({} голосов)",
        movie.get(Field::Title),
        movie.get(Field::Year),
        movie.get(Field::Rated),
        movie.get(Field::Released),
        movie.get(Field::Runtime),
        movie.get(Field::Genre),
        movie.get(Field::Director),
        movie.get(Field::Actors),
        movie.get(Field::Plot),
        movie.get(Field::Language),
        movie.get(Field::Country),
        movie.get(Field::Awards),
        movie.get(Field::ImdbRating),
        movie.get(Field::ImdbVotes),
    )
}

/// Renders `heading` followed by the first ten results, numbered from 1.
pub fn format_search_list(heading: &str, results: &[MovieRecord], show_type: bool) -> String {
    let mut output = format!("{}\n\n", heading);
    for (index, movie) in results.iter().take(MAX_LISTED_RESULTS).enumerate() {
        let _ = write!(
            output,
            "{}. {} ({})",
            index + 1,
            movie.get(Field::Title),
            movie.get(Field::Year)
        );
        if show_type {
            let _ = write!(output, " - {}", movie.get(Field::Type));
        }
        output.push('\n');
    }
    output
}

/// Renders two movies side by side, one field per block.
pub fn format_comparison(first: &MovieRecord, second: &MovieRecord) -> String {
    let mut output = format!(
        "Сравнение фильмов:\n\nФИЛЬМ 1: {}\nФИЛЬМ 2: {}",
        first.title(),
        second.title()
    );

    for (label, field, suffix) in COMPARISON_ROWS {
        let _ = write!(output, "\n\n{}:", label);
        for movie in [first, second] {
            let _ = write!(output, "\n  • {}: {}{}", movie.title(), movie.get(field), suffix);
        }
    }
    output
}

/// Detailed rendering of a dataset row.
pub fn format_catalog_movie(movie: &CatalogMovie) -> String {
    format!(
        "Название: {}\n\
         Год: {}\n\
         Рейтинг IMDb: {}/10\n\
         Жанр: {}\n\
         Режиссер: {}\n\
         Актеры: {}\n\
         Описание: {}\n\
         \n\
         {}",
        movie.title,
        movie.year,
        rating_display(movie.rating),
        movie.genre,
        movie.director,
        movie.stars().join(", "),
        movie.overview,
        DATASET_SOURCE_NOTE,
    )
}

/// One-line dataset entry: `Title (Year) - 8.5/10`.
pub fn format_catalog_line(movie: &CatalogMovie) -> String {
    format!(
        "{} ({}) - {}/10",
        movie.title,
        movie.year,
        rating_display(movie.rating)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::omdb::NOT_AVAILABLE;

    fn full_record() -> MovieRecord {
        MovieRecord::from_fields([
            (Field::Title, "Heat"),
            (Field::Year, "1995"),
            (Field::Rated, "R"),
            (Field::Released, "15 Dec 1995"),
            (Field::Runtime, "170 min"),
            (Field::Genre, "Action, Crime, Drama"),
            (Field::Director, "Michael Mann"),
            (Field::Actors, "Al Pacino, Robert De Niro"),
            (Field::Plot, "A group of high-end professional thieves."),
            (Field::Language, "English, Spanish"),
            (Field::Country, "United States"),
            (Field::Awards, "14 nominations"),
            (Field::ImdbRating, "8.3"),
            (Field::ImdbVotes, "700,000"),
        ])
    }

    #[test]
    fn test_format_single_renders_fixed_order() {
        let text = format_single(&full_record());
        let lines: Vec<_> = text.lines().collect();

        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "Название: Heat");
        assert_eq!(lines[2], "Рейтинг: R");
        assert_eq!(lines[8], "Описание: A group of high-end professional thieves.");
        assert_eq!(lines[12], "IMDb рейтинг: 8.3/10 (700,000 голосов)");
    }

    #[test]
    fn test_format_single_missing_plot_only_affects_its_line() {
        let full = format_single(&full_record());
        let without_plot = [
            (Field::Title, "Heat"),
            (Field::Year, "1995"),
            (Field::Rated, "R"),
            (Field::Released, "15 Dec 1995"),
            (Field::Runtime, "170 min"),
            (Field::Genre, "Action, Crime, Drama"),
            (Field::Director, "Michael Mann"),
            (Field::Actors, "Al Pacino, Robert De Niro"),
            (Field::Language, "English, Spanish"),
            (Field::Country, "United States"),
            (Field::Awards, "14 nominations"),
            (Field::ImdbRating, "8.3"),
            (Field::ImdbVotes, "700,000"),
        ];
        let partial = format_single(&MovieRecord::from_fields(without_plot));

        for (full_line, partial_line) in full.lines().zip(partial.lines()) {
            if full_line.starts_with("Описание:") {
                assert_eq!(partial_line, "Описание: N/A");
            } else {
                assert_eq!(full_line, partial_line);
            }
        }
    }

    #[test]
    fn test_format_single_empty_record() {
        let text = format_single(&MovieRecord::default());
        assert!(text.starts_with("Название: N/A\n"));
        assert!(text.ends_with("IMDb рейтинг: N/A/10 (N/A голосов)"));
    }

    #[test]
    fn test_format_search_list_truncates_to_ten() {
        let results: Vec<_> = (1..=15)
            .map(|i| {
                MovieRecord::from_fields([
                    (Field::Title, format!("Movie {}", i)),
                    (Field::Year, format!("{}", 2000 + i)),
                    (Field::Type, "movie".to_string()),
                ])
            })
            .collect();

        let text = format_search_list("Найдено 15 фильмов:", &results, true);
        let numbered: Vec<_> = text
            .lines()
            .filter(|line| line.chars().next().is_some_and(|c| c.is_ascii_digit()))
            .collect();

        assert_eq!(numbered.len(), 10);
        assert_eq!(numbered[0], "1. Movie 1 (2001) - movie");
        assert_eq!(numbered[9], "10. Movie 10 (2010) - movie");
        assert!(text.starts_with("Найдено 15 фильмов:\n\n"));
    }

    #[test]
    fn test_format_search_list_without_type() {
        let results = vec![MovieRecord::from_fields([(Field::Title, "Alien")])];
        let text = format_search_list("h", &results, false);
        assert_eq!(text, format!("h\n\n1. Alien ({})\n", NOT_AVAILABLE));
    }

    #[test]
    fn test_format_comparison_is_symmetric_per_field() {
        let a = MovieRecord::from_fields([
            (Field::Title, "Movie A"),
            (Field::Year, "1990"),
            (Field::Genre, "Drama"),
            (Field::ImdbRating, "7.1"),
        ]);
        let b = MovieRecord::from_fields([
            (Field::Title, "Movie B"),
            (Field::Year, "2001"),
            (Field::Director, "Someone"),
        ]);

        let ab = format_comparison(&a, &b);
        let ba = format_comparison(&b, &a);

        let blocks_ab: Vec<_> = ab.split("\n\n").skip(2).collect();
        let blocks_ba: Vec<_> = ba.split("\n\n").skip(2).collect();
        assert_eq!(blocks_ab.len(), 7);

        for (x, y) in blocks_ab.iter().zip(&blocks_ba) {
            let x: Vec<_> = x.lines().collect();
            let y: Vec<_> = y.lines().collect();
            assert_eq!(x[0], y[0]);
            assert_eq!(x[1], y[2]);
            assert_eq!(x[2], y[1]);
        }
        assert!(ab.contains("IMDb рейтинг:\n  • Movie A: 7.1/10\n  • Movie B: N/A/10"));
        assert!(ab.starts_with("Сравнение фильмов:\n\nФИЛЬМ 1: Movie A\nФИЛЬМ 2: Movie B"));
    }

    #[test]
    fn test_catalog_formatting() {
        let movie = CatalogMovie {
            title: "Heat".into(),
            year: "1995".into(),
            rating: 8.0,
            genre: "Crime".into(),
            director: "Michael Mann".into(),
            star1: "Al Pacino".into(),
            star2: "Robert De Niro".into(),
            star3: "Val Kilmer".into(),
            star4: "Jon Voight".into(),
            overview: "Thieves.".into(),
            runtime: None,
        };

        assert_eq!(format_catalog_line(&movie), "Heat (1995) - 8.0/10");

        let text = format_catalog_movie(&movie);
        assert!(text.contains("Рейтинг IMDb: 8.0/10\n"));
        assert!(text.contains("Актеры: Al Pacino, Robert De Niro, Val Kilmer, Jon Voight\n"));
        assert!(text.ends_with("\n\n(Источник: IMDb Top 1000 локальный датасет)"));
    }
}
