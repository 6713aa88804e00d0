use super::model::{Movie, UNKNOWN_GENRE};

/// Alternate separators rewritten to the canonical `,` before splitting.
const ALT_DELIMITERS: [char; 3] = ['|', '/', ';'];

/// Split a raw Genre cell into its normalised tokens.
///
/// Missing cells become the placeholder genre, which is then discarded along
/// with empty tokens, so `None` yields no tokens at all.
pub fn genre_tokens(raw: Option<&str>) -> Vec<String> {
    let canonical = raw.unwrap_or(UNKNOWN_GENRE).replace(&ALT_DELIMITERS[..], ",");
    canonical
        .split(',')
        .map(str::trim)
        .filter(|tok| !tok.is_empty() && *tok != UNKNOWN_GENRE)
        .map(str::to_string)
        .collect()
}

/// Duplicate each movie once per genre token.
///
/// Non-genre fields are copied unchanged. Rows with no surviving token are
/// dropped; row order and token order are preserved.
pub fn explode_genres(movies: &[Movie]) -> Vec<Movie> {
    movies
        .iter()
        .flat_map(|m| {
            genre_tokens(m.genre.as_deref())
                .into_iter()
                .map(move |genre| Movie {
                    genre: Some(genre),
                    ..m.clone()
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::movie;

    #[test]
    fn tokens_normalise_every_delimiter() {
        assert_eq!(
            genre_tokens(Some("Action| Drama /Sci-Fi; Romance ,Thriller")),
            vec!["Action", "Drama", "Sci-Fi", "Romance", "Thriller"]
        );
    }

    #[test]
    fn tokens_drop_empty_and_placeholder() {
        assert!(genre_tokens(None).is_empty());
        assert!(genre_tokens(Some("")).is_empty());
        assert_eq!(genre_tokens(Some("Unknown, ,Drama||")), vec!["Drama"]);
    }

    #[test]
    fn placeholder_match_is_case_sensitive() {
        assert_eq!(genre_tokens(Some("unknown")), vec!["unknown"]);
    }

    #[test]
    fn explode_duplicates_rows_and_keeps_other_fields() {
        let src = vec![movie(2001, "Hollywood", Some("Action|Drama"), Some(5.0))];
        let out = explode_genres(&src);
        assert_eq!(out.len(), 2);
        for (row, genre) in out.iter().zip(["Action", "Drama"]) {
            assert_eq!(row.genre.as_deref(), Some(genre));
            assert_eq!(
                Movie {
                    genre: src[0].genre.clone(),
                    ..row.clone()
                },
                src[0]
            );
        }
    }

    #[test]
    fn explode_row_count_is_sum_of_token_counts() {
        let src = vec![
            movie(2001, "A", Some("Action|Drama"), None),
            movie(2002, "A", None, None),
            movie(2003, "A", Some("Unknown"), None),
            movie(2004, "B", Some("Comedy; Horror/ Crime"), None),
            movie(2005, "B", Some(" , "), None),
        ];
        let expected: usize = src
            .iter()
            .map(|m| genre_tokens(m.genre.as_deref()).len())
            .sum();
        assert_eq!(expected, 5);
        assert_eq!(explode_genres(&src).len(), expected);
    }

    #[test]
    fn explode_is_idempotent_on_single_valued_data() {
        let src = vec![
            movie(2001, "A", Some("Action"), Some(1.0)),
            movie(2002, "B", Some("Drama"), None),
        ];
        let once = explode_genres(&src);
        assert_eq!(once, src);
        assert_eq!(explode_genres(&once), once);
    }

    #[test]
    fn explode_twice_equals_once_after_normalising() {
        let src = vec![movie(2001, "A", Some("Action / Drama|Unknown"), None)];
        let once = explode_genres(&src);
        assert_eq!(explode_genres(&once), once);
    }

    #[test]
    fn explode_of_empty_view_is_empty() {
        assert!(explode_genres(&[]).is_empty());
    }
}
