use serde::Deserialize;

use crate::error::PageError;

pub const ALL_LABEL: &str = "All";
pub const ALL_SLUG: &str = "all";

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct EventEntry {
    pub image: String,
    pub alt: String,
    #[serde(default)]
    pub category: String,
    pub title: String,
    pub date: String,
    pub location: String,
}

#[derive(Deserialize, Clone, Debug, Default, PartialEq)]
pub struct SocialLinks {
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

#[derive(Deserialize, Clone, Debug, PartialEq)]
pub struct CoachEntry {
    pub name: String,
    pub title: String,
    pub specialty: String,
    pub image: String,
    pub description: String,
    #[serde(default)]
    pub social: SocialLinks,
}

fn decode<T: for<'de> Deserialize<'de>>(what: &'static str, raw: &str) -> Result<Vec<T>, PageError> {
    serde_json::from_str(raw).map_err(|source| PageError::Data { what, source })
}

pub fn load_events() -> Result<Vec<EventEntry>, PageError> {
    decode("events", include_str!("../data/events.json"))
}

pub fn load_coaches() -> Result<Vec<CoachEntry>, PageError> {
    decode("coaches", include_str!("../data/coaches.json"))
}

/// Lowercase, with every run of whitespace collapsed into a single `-`.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut in_space = false;
    for c in label.chars() {
        if c.is_whitespace() {
            if !in_space {
                slug.push('-');
            }
            in_space = true;
        } else {
            slug.extend(c.to_lowercase());
            in_space = false;
        }
    }
    slug
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub label: String,
    pub slug: String,
}

/// "All" followed by each distinct label in first-seen order.
pub fn categories(events: &[EventEntry]) -> Vec<Category> {
    let mut labels: Vec<&str> = Vec::new();
    for event in events {
        let label = event.category.as_str();
        if !label.is_empty() && !labels.contains(&label) {
            labels.push(label);
        }
    }

    std::iter::once(Category {
        label: ALL_LABEL.to_string(),
        slug: ALL_SLUG.to_string(),
    })
    .chain(labels.into_iter().map(|label| Category {
        label: label.to_string(),
        slug: slugify(label),
    }))
    .collect()
}

/// Which events the grid shows, keyed on a filter button's `data-filter`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Filter {
    #[default]
    All,
    Category(String),
}

impl Filter {
    pub fn from_slug(slug: &str) -> Self {
        if slug == ALL_SLUG {
            Filter::All
        } else {
            Filter::Category(slug.to_string())
        }
    }

    pub fn slug(&self) -> &str {
        match self {
            Filter::All => ALL_SLUG,
            Filter::Category(slug) => slug,
        }
    }

    pub fn matches(&self, event: &EventEntry) -> bool {
        match self {
            Filter::All => true,
            Filter::Category(slug) => slugify(&event.category) == *slug,
        }
    }
}

pub fn filter_events<'a>(events: &'a [EventEntry], filter: &Filter) -> Vec<&'a EventEntry> {
    events.iter().filter(|e| filter.matches(e)).collect()
}

pub enum GridContent<'a> {
    Cards(Vec<&'a EventEntry>),
    /// Nothing in this category; shows the "No events found" placeholder.
    Empty,
}

pub fn grid_content<'a>(events: &'a [EventEntry], filter: &Filter) -> GridContent<'a> {
    let visible = filter_events(events, filter);
    if visible.is_empty() {
        GridContent::Empty
    } else {
        GridContent::Cards(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn event(title: &str, category: &str) -> EventEntry {
        EventEntry {
            image: format!("https://img.example/{}.jpg", slugify(title)),
            alt: title.to_string(),
            category: category.to_string(),
            title: title.to_string(),
            date: "Every Saturday".to_string(),
            location: "Main Gym".to_string(),
        }
    }

    fn sample() -> Vec<EventEntry> {
        vec![
            event("3x3 Street Basketball", "Tournament"),
            event("Weekend Soccer League", "League"),
            event("Spring Cup", "Tournament"),
            event("Open Water Swim", "Open Water"),
            event("Untitled", ""),
        ]
    }

    #[test]
    fn bundled_data_decodes() {
        let events = load_events().unwrap();
        assert!(!events.is_empty());
        let coaches = load_coaches().unwrap();
        assert!(!coaches.is_empty());
    }

    #[test]
    fn slug_lowercases_and_hyphenates() {
        assert_eq!(slugify("Open Water"), "open-water");
        assert_eq!(slugify("Open \t  Water"), "open-water");
        assert_eq!(slugify("TOURNAMENT"), "tournament");
        assert_eq!(slugify(" Edge "), "-edge-");
    }

    #[test]
    fn categories_start_with_all_in_first_seen_order() {
        let slugs: Vec<_> = categories(&sample()).into_iter().map(|c| c.slug).collect();
        assert_eq!(slugs, vec!["all", "tournament", "league", "open-water"]);
    }

    #[test]
    fn all_filter_returns_everything_in_order() {
        let events = sample();
        let all = filter_events(&events, &Filter::from_slug("all"));
        assert_eq!(all.len(), events.len());
        assert!(all.iter().zip(events.iter()).all(|(a, b)| *a == b));
    }

    #[test]
    fn category_filter_matches_slug_exactly() {
        let events = sample();
        let titles: Vec<_> = filter_events(&events, &Filter::from_slug("tournament"))
            .into_iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["3x3 Street Basketball", "Spring Cup"]);

        let open_water = filter_events(&events, &Filter::from_slug("open-water"));
        assert_eq!(open_water.len(), 1);
        assert!(filter_events(&events, &Filter::from_slug("open")).is_empty());
    }

    #[test]
    fn unmatched_filter_renders_placeholder() {
        let events = sample();
        assert!(matches!(
            grid_content(&events, &Filter::from_slug("race")),
            GridContent::Empty
        ));
        assert!(matches!(grid_content(&[], &Filter::All), GridContent::Empty));
        assert!(matches!(
            grid_content(&events, &Filter::All),
            GridContent::Cards(cards) if cards.len() == 5
        ));
    }

    #[test]
    fn filter_round_trips_through_data_attribute() {
        assert_eq!(Filter::from_slug(Filter::All.slug()), Filter::All);
        let league = Filter::Category("league".into());
        assert_eq!(Filter::from_slug(league.slug()), league);
    }

    proptest! {
        #[test]
        fn slug_never_contains_whitespace(label in "[A-Za-z0-9 \t\n]{0,24}") {
            let slug = slugify(&label);
            prop_assert!(!slug.chars().any(char::is_whitespace));
            prop_assert_eq!(slugify(&slug), slug.clone());
        }

        #[test]
        fn filtered_subset_is_exactly_the_matching_events(
            picks in proptest::collection::vec(0usize..4, 0..20),
            wanted in 0usize..4,
        ) {
            let labels = ["Tournament", "League", "Open Water", "Race"];
            let events: Vec<_> = picks
                .iter()
                .enumerate()
                .map(|(i, &p)| event(&format!("Event {}", i), labels[p]))
                .collect();
            let filter = Filter::from_slug(&slugify(labels[wanted]));
            let subset = filter_events(&events, &filter);

            prop_assert_eq!(subset.len(), picks.iter().filter(|&&p| p == wanted).count());
            prop_assert!(subset.iter().all(|e| e.category == labels[wanted]));
        }
    }
}
