use serde::{Deserialize, Serialize};

/// Free-text tender metadata handed to the classifier. Never persisted by it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationInput {
    pub title: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub item_category: Option<String>,
}

impl ClassificationInput {
    /// Blank optional fields are normalized to `None` so they drop out of the prompt.
    pub fn new<T, D, I>(title: T, department: Option<D>, item_category: Option<I>) -> Self
    where
        T: Into<String>,
        D: Into<String>,
        I: Into<String>,
    {
        Self {
            title: title.into(),
            department: non_blank(department.map(Into::into)),
            item_category: non_blank(item_category.map(Into::into)),
        }
    }

    pub fn department(&self) -> Option<&str> {
        self.department.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn item_category(&self) -> Option<&str> {
        self.item_category.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// `title department itemCategory`, absent fields as empty strings.
    pub(crate) fn fallback_haystack(&self) -> String {
        format!(
            "{} {} {}",
            self.title,
            self.department().unwrap_or_default(),
            self.item_category().unwrap_or_default()
        )
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
