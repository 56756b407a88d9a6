/// Coarse label assigned to a photo by the filename heuristic
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    Nature,
    People,
    Cityscapes,
    Other,
    Uncategorized,
}

impl Category {
    /// String stored in the `category` column and shown in the gallery
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Nature => "Nature",
            Category::People => "People",
            Category::Cityscapes => "Cityscapes",
            Category::Other => "Other",
            Category::Uncategorized => "Uncategorized",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Result of running the classifier on a filename : a category plus a list
/// of tag tokens, joined with ", " when stored
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub tags: Vec<String>,
}

impl Classification {
    /// Fallback used when a filename can't be classified : the caller takes
    /// this branch explicitly instead of masking the failure
    pub fn default_fallback() -> Self {
        Self {
            category: Category::Uncategorized,
            tags: Vec::new(),
        }
    }

    /// The tag tokens as the comma-joined string stored in the database
    pub fn tags_joined(&self) -> String {
        self.tags.join(", ")
    }
}


/// Keyword rules checked in order against the lowercased filename.
/// The first rule whose keyword is contained in the name wins.
const RULES: [(&'static str, Category); 4] = [
    ("nature", Category::Nature),
    ("people", Category::People),
    ("person", Category::People),
    ("city", Category::Cityscapes),
];

/// Guess a category from the original filename. Returns None when the name
/// is unusable (empty), in which case the upload pipeline falls back to
/// `Classification::default_fallback()`.
///
/// No rule produces tags : real tagging would need to look at the image
/// bytes, which this heuristic never does.
pub fn classify(original_filename: &str) -> Option<Classification> {
    if original_filename.is_empty() {
        return None;
    }

    let filename_lowercase = original_filename.to_lowercase();
    let category = RULES.iter()
        .find(|(keyword, _)| filename_lowercase.contains(keyword))
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other);

    Some(Classification {
        category,
        tags: Vec::new(),
    })
}


#[cfg(test)]
mod tests {
    use super::*;

    fn category_of(filename: &str) -> Category {
        classify(filename).unwrap().category
    }

    #[test]
    fn keywords_map_to_their_category() {
        assert_eq!(category_of("nature_walk.jpg"), Category::Nature);
        assert_eq!(category_of("people_at_the_beach.png"), Category::People);
        assert_eq!(category_of("third_person_view.jpg"), Category::People);
        assert_eq!(category_of("city_lights.webp"), Category::Cityscapes);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(category_of("Nature_Hike.jpg"), Category::Nature);
        assert_eq!(category_of("CITY-break.jpeg"), Category::Cityscapes);
        assert_eq!(category_of("PeRsOn.png"), Category::People);
    }

    #[test]
    fn unmatched_names_fall_through_to_other() {
        assert_eq!(category_of("random.png"), Category::Other);
        assert_eq!(category_of("IMG_20240512_113022.jpg"), Category::Other);
    }

    #[test]
    fn first_rule_wins_when_several_match() {
        // "nature" is checked before "city"
        assert_eq!(category_of("nature_in_the_city.jpg"), Category::Nature);
    }

    #[test]
    fn empty_filename_is_not_classified() {
        assert_eq!(classify(""), None);
    }

    #[test]
    fn no_rule_ever_produces_tags() {
        for name in ["nature.jpg", "person.png", "city.gif", "misc.bmp"] {
            let classification = classify(name).unwrap();
            assert!(classification.tags.is_empty());
            assert_eq!(classification.tags_joined(), "");
        }
    }

    #[test]
    fn fallback_is_uncategorized_with_no_tags() {
        let fallback = Classification::default_fallback();
        assert_eq!(fallback.category, Category::Uncategorized);
        assert_eq!(fallback.tags_joined(), "");
    }
}
