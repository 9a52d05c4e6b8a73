use crate::PlannerError;
use serde::{Deserialize, Serialize};

pub const TITLES_PER_CATEGORY: usize = 20;
pub const RECOMMENDATION_COUNT: usize = 5;

/// Blog title suggestions, grouped in three categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleSet {
    /// Essential travel information.
    pub info: Vec<String>,
    /// Expert travel tips.
    pub tips: Vec<String>,
    /// Restaurants and trending places.
    pub hotspots: Vec<String>,
}

/// Recommended destination names, in the order the model gave them.
pub type CityRecommendations = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Info,
    Tips,
    Hotspots,
}

impl Category {
    pub const ALL: [Self; 3] = [Self::Info, Self::Tips, Self::Hotspots];

    /// The JSON key the category is decoded from.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Tips => "tips",
            Self::Hotspots => "hotspots",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "Essential travel info",
            Self::Tips => "Expert travel tips",
            Self::Hotspots => "Food & hot spots",
        }
    }
}

impl TitleSet {
    #[must_use]
    pub fn category(&self, category: Category) -> &[String] {
        match category {
            Category::Info => &self.info,
            Category::Tips => &self.tips,
            Category::Hotspots => &self.hotspots,
        }
    }

    /// All titles of a category, one per line. This is what "copy category"
    /// puts on the clipboard.
    #[must_use]
    pub fn category_text(&self, category: Category) -> String {
        self.category(category).join("\n")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.info.len() + self.tips.len() + self.hotspots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Decode the generated text into a [`TitleSet`]. All three keys must be
/// present and hold arrays of strings; extra keys are ignored. The number
/// of titles is not checked here, see [`validate_titles`].
pub fn parse_titles(text: &str) -> Result<TitleSet, PlannerError> {
    serde_json::from_str(text).map_err(|error| PlannerError::parse(&error, text))
}

/// Decode the generated text into a list of destination names. The top
/// level must be an array of strings. The length is not checked here, see
/// [`validate_recommendations`].
pub fn parse_recommendations(text: &str) -> Result<CityRecommendations, PlannerError> {
    serde_json::from_str(text).map_err(|error| PlannerError::parse(&error, text))
}

/// Require exactly [`TITLES_PER_CATEGORY`] titles in every category.
pub fn validate_titles(titles: &TitleSet) -> Result<(), PlannerError> {
    for category in Category::ALL {
        let actual = titles.category(category).len();
        if actual != TITLES_PER_CATEGORY {
            return Err(PlannerError::UnexpectedCount {
                field: category.key(),
                expected: TITLES_PER_CATEGORY,
                actual,
            });
        }
    }
    Ok(())
}

/// Require exactly [`RECOMMENDATION_COUNT`] destinations.
pub fn validate_recommendations(cities: &[String]) -> Result<(), PlannerError> {
    if cities.len() != RECOMMENDATION_COUNT {
        return Err(PlannerError::UnexpectedCount {
            field: "recommendations",
            expected: RECOMMENDATION_COUNT,
            actual: cities.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wayfarer_sdk::{strip_code_fence, ErrorKind};

    fn numbered(prefix: &str, count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("{prefix} {i}")).collect()
    }

    #[test]
    fn parses_full_title_set() {
        let text = json!({
            "info": numbered("info", 20),
            "tips": numbered("tip", 20),
            "hotspots": numbered("spot", 20),
            "note": "extra keys are ignored"
        })
        .to_string();

        let titles = parse_titles(&text).unwrap();
        assert_eq!(titles.len(), 60);
        assert_eq!(titles.tips[0], "tip 1");
        assert_eq!(titles.hotspots[19], "spot 20");
        validate_titles(&titles).unwrap();
    }

    #[test]
    fn parses_fenced_recommendations_after_stripping() {
        let text = strip_code_fence("```json\n[\"Seoul\",\"Tokyo\"]\n```");
        let cities = parse_recommendations(text).unwrap();
        assert_eq!(cities, vec!["Seoul".to_string(), "Tokyo".to_string()]);
    }

    #[test]
    fn rejects_missing_category() {
        let text = json!({ "info": ["a"], "tips": ["b"] }).to_string();
        match parse_titles(&text).unwrap_err() {
            PlannerError::Parse { reason, text: raw } => {
                assert!(reason.contains("hotspots"), "{reason}");
                assert_eq!(raw, text);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn rejects_wrong_shapes() {
        for text in [
            "Here are some great titles for your trip!",
            "[\"a\", \"b\"]",
            "{\"info\": \"a\", \"tips\": [], \"hotspots\": []}",
            "{\"info\": [1, 2], \"tips\": [], \"hotspots\": []}",
            "",
        ] {
            let error = parse_titles(text).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Parse, "{text}");
        }

        for text in [
            "Seoul, Tokyo",
            "{\"cities\": [\"Seoul\"]}",
            "[\"Seoul\", 3]",
            "null",
        ] {
            let error = parse_recommendations(text).unwrap_err();
            assert_eq!(error.kind(), ErrorKind::Parse, "{text}");
        }
    }

    #[test]
    fn validates_counts() {
        let mut titles = TitleSet {
            info: numbered("info", 20),
            tips: numbered("tip", 19),
            hotspots: numbered("spot", 20),
        };
        match validate_titles(&titles).unwrap_err() {
            PlannerError::UnexpectedCount {
                field,
                expected,
                actual,
            } => {
                assert_eq!((field, expected, actual), ("tips", 20, 19));
            }
            other => panic!("unexpected error: {other:?}"),
        }

        titles.tips.push("tip 20".to_string());
        validate_titles(&titles).unwrap();

        assert!(validate_recommendations(&numbered("city", 5)).is_ok());
        let error = validate_recommendations(&numbered("city", 2)).unwrap_err();
        assert_eq!(error.to_string(), "Expected 5 entries in recommendations, got 2");
    }

    #[test]
    fn category_text_joins_lines_in_order() {
        let titles = TitleSet {
            info: vec!["a".into(), "b".into()],
            tips: vec![],
            hotspots: vec!["c".into()],
        };
        assert_eq!(titles.category_text(Category::Info), "a\nb");
        assert_eq!(titles.category_text(Category::Tips), "");
        assert_eq!(titles.category_text(Category::Hotspots), "c");
    }
}
