use crate::categories::Category;

/// How a raw remote answer maps onto the closed category set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoteLabel {
    Exact(Category),
    Prefix(Category),
    Unrecognized,
}

impl RemoteLabel {
    pub fn category(&self) -> Category {
        match self {
            RemoteLabel::Exact(category) | RemoteLabel::Prefix(category) => *category,
            RemoteLabel::Unrecognized => Category::Miscellaneous,
        }
    }
}

/// Repairs near-miss answers.
///
/// Trimmed exact label first; otherwise the first category (declaration order) whose
/// primary label appears anywhere in the answer, ignoring case.
pub fn interpret_response(raw: &str) -> RemoteLabel {
    let answer = raw.trim();
    if let Ok(category) = answer.parse::<Category>() {
        return RemoteLabel::Exact(category);
    }
    let lowered = answer.to_lowercase();
    if lowered.is_empty() {
        return RemoteLabel::Unrecognized;
    }
    Category::ALL
        .into_iter()
        .find(|category| lowered.contains(&category.primary_label().to_lowercase()))
        .map_or(RemoteLabel::Unrecognized, RemoteLabel::Prefix)
}
