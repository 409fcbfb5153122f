use std::sync::OnceLock;

use scraper::{ElementRef, Html, Node, Selector};

/// One book card's fields, exactly as found in the page. Extraction is
/// best-effort: a card missing a piece of markup yields `None` (or an empty
/// genre list) for that piece only, never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub genres: Vec<String>,
    pub reading_level: Option<String>,
    pub image: Option<String>,
}

struct Selectors {
    card: Selector,
    heading: Selector,
    para: Selector,
    src: Selector,
}

fn selectors() -> &'static Selectors {
    static SELECTORS: OnceLock<Selectors> = OnceLock::new();
    SELECTORS.get_or_init(|| Selectors {
        card: Selector::parse(".book-card").expect("valid selector"),
        heading: Selector::parse("h3").expect("valid selector"),
        para: Selector::parse("p").expect("valid selector"),
        src: Selector::parse("[src]").expect("valid selector"),
    })
}

/// Pull every book card out of one genre page, in document order.
pub fn extract_books(document: &str) -> Vec<BookRecord> {
    let doc = Html::parse_document(document);
    doc.select(&selectors().card).map(extract_card).collect()
}

fn extract_card(card: ElementRef) -> BookRecord {
    let sel = selectors();

    let image = card
        .select(&sel.src)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);

    let title = card
        .select(&sel.heading)
        .next()
        .map(|h| collapse_ws(&h.text().collect::<String>()));

    let genres = labeled_value(card, "Genre:")
        .map(|raw| {
            raw.split('|')
                .map(str::trim)
                .filter(|g| !g.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    BookRecord {
        title,
        author: labeled_value(card, "Author:"),
        description: description(card),
        genres,
        reading_level: labeled_value(card, "Reading Level:"),
        image,
    }
}

/// Value of the first paragraph opening with `<strong>label</strong>`:
/// the text of everything after the label, whitespace-collapsed.
fn labeled_value(card: ElementRef, label: &str) -> Option<String> {
    card.select(&selectors().para).find_map(|p| {
        let mut nodes = p.children().skip_while(|n| match n.value() {
            Node::Text(t) => t.trim().is_empty(),
            _ => false,
        });
        let strong = ElementRef::wrap(nodes.next()?)?;
        if strong.value().name() != "strong" {
            return None;
        }
        if strong.text().collect::<String>().trim() != label {
            return None;
        }
        let mut tail = String::new();
        for node in nodes {
            if let Some(el) = ElementRef::wrap(node) {
                tail.extend(el.text());
            } else if let Node::Text(t) = node.value() {
                tail.push_str(t);
            }
        }
        Some(collapse_ws(&tail))
    })
}

/// The first paragraph that does not open with a bolded label, tags
/// stripped.
fn description(card: ElementRef) -> Option<String> {
    card.select(&selectors().para)
        .find(|p| !starts_with_label(*p))
        .map(|p| collapse_ws(&p.text().collect::<String>()))
}

fn starts_with_label(p: ElementRef) -> bool {
    p.children()
        .find(|n| match n.value() {
            Node::Text(t) => !t.trim().is_empty(),
            _ => true,
        })
        .and_then(ElementRef::wrap)
        .map(|el| el.value().name() == "strong")
        .unwrap_or(false)
}

fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
