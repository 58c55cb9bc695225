//! Deterministic keyword matcher used when the remote classifier is unavailable.

use crate::{categories::Category, classifier::ClassificationInput};

/// Default rules, walked top to bottom. The first rule with any keyword present wins.
///
/// Keywords are plain lowercase substrings; note the trailing space in `"it "`.
pub const DEFAULT_KEYWORD_RULES: &[(Category, &[&str])] = &[
    (
        Category::ConstructionCivil,
        &[
            "construction",
            "civil",
            "building",
            "road",
            "bridge",
            "cement",
            "concrete",
            "infrastructure",
        ],
    ),
    (
        Category::ItSoftwareNetworking,
        &[
            "software",
            "computer",
            "it ",
            "networking",
            "server",
            "database",
            "digital",
            "cyber",
            "web",
            "application",
        ],
    ),
    (
        Category::MedicalHealthcare,
        &[
            "medical",
            "hospital",
            "health",
            "pharma",
            "medicine",
            "surgical",
            "diagnostic",
            "ambulance",
        ],
    ),
    (
        Category::ElectricalElectronics,
        &[
            "electrical",
            "electronics",
            "power",
            "transformer",
            "cable",
            "wiring",
            "circuit",
        ],
    ),
    (
        Category::MachineryIndustrial,
        &[
            "machinery",
            "industrial",
            "equipment",
            "machine",
            "manufacturing",
            "plant",
        ],
    ),
    (
        Category::TransportAutomotive,
        &[
            "transport",
            "vehicle",
            "automotive",
            "car",
            "bus",
            "truck",
            "logistics",
        ],
    ),
    (
        Category::SecurityDefence,
        &[
            "security",
            "defence",
            "defense",
            "guard",
            "surveillance",
            "cctv",
            "military",
            "army",
        ],
    ),
    (
        Category::HousekeepingManpower,
        &[
            "housekeeping",
            "manpower",
            "cleaning",
            "janitorial",
            "staff",
            "labour",
            "labor",
        ],
    ),
    (
        Category::AgricultureRuralDevelopment,
        &[
            "agriculture",
            "rural",
            "farming",
            "irrigation",
            "crop",
            "seeds",
            "fertilizer",
        ],
    ),
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: Vec<String>,
}

/// Ordered keyword rules. Configuration data, not an algorithm: swap the table
/// with [`KeywordTable::new`] rather than tuning the matcher.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordTable {
    rules: Vec<KeywordRule>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORD_RULES.iter().map(|(category, keywords)| {
            (*category, keywords.iter().map(|k| k.to_string()).collect())
        }))
    }
}

impl KeywordTable {
    /// Keywords are lowercased but not trimmed, so `"it "` keeps its trailing space.
    pub fn new<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (Category, Vec<String>)>,
    {
        Self {
            rules: rules
                .into_iter()
                .map(|(category, keywords)| KeywordRule {
                    category,
                    keywords: keywords
                        .into_iter()
                        .filter(|k| !k.is_empty())
                        .map(|k| k.to_lowercase())
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn rules(&self) -> &[KeywordRule] {
        &self.rules
    }

    /// First category whose keyword list hits `text`. `text` is lowercased here.
    pub fn match_text(&self, text: &str) -> Option<Category> {
        let haystack = text.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.keywords.iter().any(|k| haystack.contains(k.as_str())))
            .map(|rule| rule.category)
    }

    pub fn categorize(&self, input: &ClassificationInput) -> Option<Category> {
        self.match_text(&input.fallback_haystack())
    }

    /// Never fails. No hit resolves to [`Category::Miscellaneous`].
    pub fn categorize_or_default(&self, input: &ClassificationInput) -> Category {
        self.categorize(input).unwrap_or_else(|| {
            crate::debug!(title = %input.title, "No fallback keyword matched; using Miscellaneous");
            Category::Miscellaneous
        })
    }
}
