use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of tender categories, in declaration order.
///
/// This ordering is load bearing: the prompt lists categories in this order, the
/// response repair step picks the *first* prefix hit, and the keyword fallback walks
/// its rules in the same order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Construction / Civil")]
    ConstructionCivil,
    #[serde(rename = "IT / Software / Networking")]
    ItSoftwareNetworking,
    #[serde(rename = "Medical / Healthcare")]
    MedicalHealthcare,
    #[serde(rename = "Electrical / Electronics")]
    ElectricalElectronics,
    #[serde(rename = "Machinery / Industrial")]
    MachineryIndustrial,
    #[serde(rename = "Transport / Automotive")]
    TransportAutomotive,
    #[serde(rename = "Security / Defence")]
    SecurityDefence,
    #[serde(rename = "Housekeeping / Manpower")]
    HousekeepingManpower,
    #[serde(rename = "Agriculture / Rural Development")]
    AgricultureRuralDevelopment,
    #[serde(rename = "Miscellaneous")]
    Miscellaneous,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::ConstructionCivil,
        Category::ItSoftwareNetworking,
        Category::MedicalHealthcare,
        Category::ElectricalElectronics,
        Category::MachineryIndustrial,
        Category::TransportAutomotive,
        Category::SecurityDefence,
        Category::HousekeepingManpower,
        Category::AgricultureRuralDevelopment,
        Category::Miscellaneous,
    ];

    pub const fn label(&self) -> &'static str {
        match self {
            Category::ConstructionCivil => "Construction / Civil",
            Category::ItSoftwareNetworking => "IT / Software / Networking",
            Category::MedicalHealthcare => "Medical / Healthcare",
            Category::ElectricalElectronics => "Electrical / Electronics",
            Category::MachineryIndustrial => "Machinery / Industrial",
            Category::TransportAutomotive => "Transport / Automotive",
            Category::SecurityDefence => "Security / Defence",
            Category::HousekeepingManpower => "Housekeeping / Manpower",
            Category::AgricultureRuralDevelopment => "Agriculture / Rural Development",
            Category::Miscellaneous => "Miscellaneous",
        }
    }

    /// The text before the first `/`, trimmed. "Construction / Civil" -> "Construction".
    pub fn primary_label(&self) -> &'static str {
        let label = self.label();
        label
            .split_once('/')
            .map_or(label, |(head, _)| head)
            .trim()
    }

    /// Every label joined with ", ", as listed in the classification prompt.
    pub fn joined_labels() -> String {
        Self::ALL
            .iter()
            .map(Category::label)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tender category: {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact label match only. Use the classifier's response repair for fuzzy input.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.label() == s)
            .ok_or_else(|| UnknownCategory(s.to_owned()))
    }
}
