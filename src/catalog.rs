use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::extract::BookRecord;

pub const DIVISION: &str = "SD-English";
pub const LANGUAGE: &str = "English";

/// Raw genre label -> display pill. Exact-match lookup; labels with no row
/// here simply produce no pill. Static configuration, never mutated.
const GENRE_PILLS: &[(&str, &str)] = &[
    ("Adventure & Survival", "Adventure"),
    ("Classics & Canon", "Classics"),
    ("Fantasy Worlds", "Fantasy"),
    ("Historical & War", "Historical"),
    ("Horror & Supernatural", "Horror"),
    ("Humour & Feel-Good", "Humour"),
    ("Mystery, Crime & Thrillers", "Mystery"),
    ("Non-Fiction, Biography & Memoir", "Non-Fiction"),
    ("Poetry, Verse & Short Stories", "Poetry"),
    ("Reference, Study & Dictionaries", "Reference"),
    ("Romance & Relationships", "Romance"),
    ("School, Family & Growing Up", "School"),
    ("Sci-Fi & Dystopia", "Sci-Fi"),
    ("Social Issues & Justice", "Social"),
    ("Sport", "Sport"),
];

fn pill_for(raw: &str) -> Option<&'static str> {
    GENRE_PILLS
        .iter()
        .find(|(label, _)| *label == raw)
        .map(|(_, pill)| *pill)
}

/// Books keyed by (title, author), which is the identity of a book across
/// pages. The map's iteration order is the final catalog order; an absent
/// component sorts before any present string.
pub type MergedBooks = BTreeMap<(Option<String>, Option<String>), MergedBook>;

#[derive(Debug, Clone)]
pub struct MergedBook {
    pub description: Option<String>,
    pub genres: BTreeSet<String>,
    pub reading_level: Option<String>,
    pub image: Option<String>,
}

/// Fold freshly extracted records into the merge map. The first record seen
/// for a key supplies every field; later records with the same key contribute
/// only their genres.
pub fn merge_records(books: &mut MergedBooks, records: Vec<BookRecord>) {
    for record in records {
        let key = (record.title, record.author);
        match books.get_mut(&key) {
            Some(existing) => existing.genres.extend(record.genres),
            None => {
                books.insert(
                    key,
                    MergedBook {
                        description: record.description,
                        genres: record.genres.into_iter().collect(),
                        reading_level: record.reading_level,
                        image: record.image,
                    },
                );
            }
        }
    }
}

/// One serialized catalog row. Field declaration order here is the key order
/// in the emitted JSON.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub genre_pills: Vec<String>,
    pub reading_level: Option<String>,
    pub image: Option<String>,
    pub division: &'static str,
    pub language: &'static str,
}

/// Turn the merge map into the final catalog: entries in key order, ids
/// assigned by position (1-based, zero-padded to three digits; the pad
/// widens past 999 entries rather than truncating).
pub fn build_catalog(books: MergedBooks) -> Vec<CatalogEntry> {
    books
        .into_iter()
        .enumerate()
        .map(|(i, ((title, author), book))| {
            let genre_pills: BTreeSet<String> = book
                .genres
                .iter()
                .filter_map(|g| pill_for(g))
                .map(str::to_string)
                .collect();
            CatalogEntry {
                id: format!("sd-{:03}", i + 1),
                title,
                author,
                description: book.description,
                genres: book.genres.into_iter().collect(),
                genre_pills: genre_pills.into_iter().collect(),
                reading_level: book.reading_level,
                image: book.image,
                division: DIVISION,
                language: LANGUAGE,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: Option<&str>, author: Option<&str>, genres: &[&str]) -> BookRecord {
        BookRecord {
            title: title.map(str::to_string),
            author: author.map(str::to_string),
            description: None,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            reading_level: None,
            image: None,
        }
    }

    #[test]
    fn duplicate_key_unions_genres() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![record(Some("Dune"), Some("Frank Herbert"), &["Fantasy Worlds"])],
        );
        merge_records(
            &mut books,
            vec![record(Some("Dune"), Some("Frank Herbert"), &["Sci-Fi & Dystopia"])],
        );

        let entries = build_catalog(books);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].genres, vec!["Fantasy Worlds", "Sci-Fi & Dystopia"]);
        assert_eq!(entries[0].genre_pills, vec!["Fantasy", "Sci-Fi"]);
    }

    #[test]
    fn first_record_wins_every_field_but_genres() {
        let mut first = record(Some("Dune"), Some("Frank Herbert"), &["Fantasy Worlds"]);
        first.description = Some("A desert planet.".to_string());
        first.image = Some("covers/dune.jpg".to_string());
        let mut second = record(Some("Dune"), Some("Frank Herbert"), &["Sport"]);
        second.description = Some("A different blurb.".to_string());
        second.image = Some("covers/other.jpg".to_string());

        let mut books = MergedBooks::new();
        merge_records(&mut books, vec![first, second]);

        let entries = build_catalog(books);
        assert_eq!(entries[0].description.as_deref(), Some("A desert planet."));
        assert_eq!(entries[0].image.as_deref(), Some("covers/dune.jpg"));
        assert_eq!(entries[0].genres, vec!["Fantasy Worlds", "Sport"]);
    }

    #[test]
    fn unmapped_genre_kept_but_gets_no_pill() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![record(Some("Odd"), Some("A"), &["Experimental Fiction", "Sport"])],
        );

        let entries = build_catalog(books);
        assert_eq!(entries[0].genres, vec!["Experimental Fiction", "Sport"]);
        assert_eq!(entries[0].genre_pills, vec!["Sport"]);
    }

    #[test]
    fn ids_follow_sorted_position_not_encounter_order() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![
                record(Some("Beloved"), Some("Toni Morrison"), &[]),
                record(Some("Atonement"), Some("Ian McEwan"), &[]),
                record(Some("Carrie"), Some("Stephen King"), &[]),
            ],
        );

        let entries = build_catalog(books);
        let pairs: Vec<_> = entries
            .iter()
            .map(|e| (e.id.as_str(), e.title.as_deref().unwrap()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("sd-001", "Atonement"),
                ("sd-002", "Beloved"),
                ("sd-003", "Carrie"),
            ]
        );
    }

    #[test]
    fn absent_title_sorts_before_all_titles() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![
                record(Some("Atonement"), Some("Ian McEwan"), &[]),
                record(None, Some("Anon"), &[]),
            ],
        );

        let entries = build_catalog(books);
        assert_eq!(entries[0].id, "sd-001");
        assert_eq!(entries[0].title, None);
        assert_eq!(entries[1].title.as_deref(), Some("Atonement"));
    }

    #[test]
    fn same_title_different_author_stays_separate() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![
                record(Some("Collected Poems"), Some("Ted Hughes"), &[]),
                record(Some("Collected Poems"), Some("Sylvia Plath"), &[]),
            ],
        );
        assert_eq!(books.len(), 2);
    }

    #[test]
    fn entry_serializes_with_stable_key_order() {
        let mut books = MergedBooks::new();
        merge_records(
            &mut books,
            vec![record(Some("Dune"), None, &["Sci-Fi & Dystopia"])],
        );
        let entries = build_catalog(books);
        let json = serde_json::to_string_pretty(&entries).unwrap();

        let order = [
            "\"id\"",
            "\"title\"",
            "\"author\"",
            "\"description\"",
            "\"genres\"",
            "\"genre_pills\"",
            "\"reading_level\"",
            "\"image\"",
            "\"division\"",
            "\"language\"",
        ];
        let positions: Vec<_> = order
            .iter()
            .map(|key| json.find(key).expect("key present"))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);

        assert!(json.contains("\"author\": null"));
        assert!(json.contains("\"division\": \"SD-English\""));
        assert!(json.contains("\"language\": \"English\""));
    }
}
