//! Citation categories - the closed set of citing/cited relationships

use std::fmt;
use std::ops::{Index, IndexMut};

/// How a citing paper relates to the claims of the paper it cites
///
/// REFUTING is strictly stronger than CONTRASTING: it means the cited
/// hypothesis is excluded, not merely disputed. NEUTRAL is the default when
/// no stance can be detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Category {
    /// Agrees with, confirms, validates, or extends the cited work
    Supporting,

    /// Disagrees with or challenges the cited work without settling the matter
    Contrasting,

    /// Definitively rules out the cited work's hypothesis
    Refuting,

    /// Cites for background or historical context
    Contextual,

    /// Cites for methods, data, tools, or software
    Methodological,

    /// Plain acknowledgment without a detectable stance
    Neutral,
}

impl Category {
    /// Number of categories
    pub const COUNT: usize = 6;

    /// All categories in canonical order
    pub const ALL: [Category; Category::COUNT] = [
        Category::Supporting,
        Category::Contrasting,
        Category::Refuting,
        Category::Contextual,
        Category::Methodological,
        Category::Neutral,
    ];

    /// Upper-case wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Supporting => "SUPPORTING",
            Category::Contrasting => "CONTRASTING",
            Category::Refuting => "REFUTING",
            Category::Contextual => "CONTEXTUAL",
            Category::Methodological => "METHODOLOGICAL",
            Category::Neutral => "NEUTRAL",
        }
    }

    /// Parse a label in any case; surrounding whitespace is ignored
    ///
    /// # Examples
    ///
    /// ```
    /// use astrolit_domain::Category;
    ///
    /// assert_eq!(Category::parse("refuting"), Some(Category::Refuting));
    /// assert_eq!(Category::parse("DISPUTING"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "SUPPORTING" => Some(Category::Supporting),
            "CONTRASTING" => Some(Category::Contrasting),
            "REFUTING" => Some(Category::Refuting),
            "CONTEXTUAL" => Some(Category::Contextual),
            "METHODOLOGICAL" => Some(Category::Methodological),
            "NEUTRAL" => Some(Category::Neutral),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Category::Supporting => 0,
            Category::Contrasting => 1,
            Category::Refuting => 2,
            Category::Contextual => 3,
            Category::Methodological => 4,
            Category::Neutral => 5,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::parse(s).ok_or_else(|| crate::DomainError::UnknownCategory(s.to_string()))
    }
}

/// A value for every category
///
/// Backed by a fixed array, so a table always has all six keys even when a
/// category never occurred.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CategoryMap<T> {
    values: [T; Category::COUNT],
}

impl<T: Copy> CategoryMap<T> {
    /// Create a table with every category set to `value`
    pub fn filled(value: T) -> Self {
        Self {
            values: [value; Category::COUNT],
        }
    }
}

impl<T> CategoryMap<T> {
    /// Iterate over `(category, value)` in canonical order
    pub fn iter(&self) -> impl Iterator<Item = (Category, &T)> {
        Category::ALL.iter().copied().zip(self.values.iter())
    }
}

impl<T> Index<Category> for CategoryMap<T> {
    type Output = T;

    fn index(&self, category: Category) -> &T {
        &self.values[category.index()]
    }
}

impl<T> IndexMut<Category> for CategoryMap<T> {
    fn index_mut(&mut self, category: Category) -> &mut T {
        &mut self.values[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Category::parse("Supporting"), Some(Category::Supporting));
        assert_eq!(Category::parse("  neutral "), Some(Category::Neutral));
        assert_eq!(Category::parse("METHODOLOGICAL"), Some(Category::Methodological));
    }

    #[test]
    fn test_parse_rejects_unknown_labels() {
        assert_eq!(Category::parse(""), None);
        assert_eq!(Category::parse("AGREES"), None);
        assert!("DISPUTED".parse::<Category>().is_err());
    }

    #[test]
    fn test_label_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::parse(category.as_str()), Some(category));
            assert_eq!(category.to_string(), category.as_str());
        }
    }

    #[test]
    fn test_category_map_has_every_key() {
        let mut counts: CategoryMap<usize> = CategoryMap::default();
        counts[Category::Refuting] += 2;

        let entries: Vec<_> = counts.iter().collect();
        assert_eq!(entries.len(), Category::COUNT);
        assert_eq!(entries[2], (Category::Refuting, &2));
        assert_eq!(counts[Category::Neutral], 0);
    }
}
