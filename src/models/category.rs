//! Fixed project categories.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification assigned when a project leaves the entry stage.
///
/// The display form doubles as the category directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Games,
    Libraries,
    #[serde(rename = "CLIs")]
    Clis,
    Web,
    #[serde(rename = "AI")]
    Ai,
    Tools,
    Other,
}

/// Accepted spellings (lowercase) and the category they normalize to.
const ALIASES: &[(&str, Category)] = &[
    ("games", Category::Games),
    ("game", Category::Games),
    ("libraries", Category::Libraries),
    ("library", Category::Libraries),
    ("clis", Category::Clis),
    ("cli", Category::Clis),
    ("web", Category::Web),
    ("ai", Category::Ai),
    ("tools", Category::Tools),
    ("tool", Category::Tools),
    ("other", Category::Other),
];

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Games,
        Category::Clis,
        Category::Libraries,
        Category::Ai,
        Category::Web,
        Category::Tools,
        Category::Other,
    ];

    /// Canonical display form, e.g. `"CLIs"`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Category::Games => "Games",
            Category::Libraries => "Libraries",
            Category::Clis => "CLIs",
            Category::Web => "Web",
            Category::Ai => "AI",
            Category::Tools => "Tools",
            Category::Other => "Other",
        }
    }

    /// Normalize free text into a category.
    ///
    /// Matches alias keys case-insensitively, then retries with the
    /// title-cased text against the canonical display forms.
    pub fn normalize(raw: &str) -> Option<Category> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }

        let key = trimmed.to_lowercase();
        if let Some((_, category)) = ALIASES.iter().find(|(alias, _)| *alias == key) {
            return Some(*category);
        }

        let titled = title_case(trimmed);
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(&titled))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
