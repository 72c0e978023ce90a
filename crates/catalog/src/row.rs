use serde::{Deserialize, Serialize};

/// A list-valued field as it arrives from a spreadsheet export: either one
/// delimited string or an already split array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextList {
    Delimited(String),
    Items(Vec<String>),
}

impl TextList {
    /// Comma separated segments, trimmed, empty ones dropped. Order and
    /// duplicates are preserved.
    pub fn split(&self) -> Vec<String> {
        self.split_on(',')
    }

    /// Same as [`TextList::split`] with a custom delimiter.
    pub fn split_on(&self, delimiter: char) -> Vec<String> {
        let segments: Vec<&str> = match self {
            TextList::Delimited(value) => value.split(delimiter).collect(),
            TextList::Items(items) => items.iter().map(String::as_str).collect(),
        };

        segments
            .into_iter()
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl From<&str> for TextList {
    fn from(value: &str) -> Self {
        TextList::Delimited(value.to_owned())
    }
}

impl From<Vec<String>> for TextList {
    fn from(value: Vec<String>) -> Self {
        TextList::Items(value)
    }
}

/// One flat record of the source sheet. Every field is optional here;
/// defaults are applied by the transformer.
///
/// Field names accept both the snake_case form and the spreadsheet column
/// headers (`"Ingredient Name"`, `"Safe For"`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(alias = "ID")]
    pub id: Option<String>,
    #[serde(alias = "Category")]
    pub category: Option<String>,
    #[serde(alias = "Ingredient Name")]
    pub ingredient_name: Option<String>,
    #[serde(alias = "Substitute Name")]
    pub substitute_name: Option<String>,
    #[serde(alias = "Substitute Usage")]
    pub usage: Option<TextList>,
    #[serde(alias = "Notes")]
    pub notes: Option<String>,
    #[serde(alias = "Safe For")]
    pub safe_for: Option<TextList>,
    #[serde(alias = "Best For")]
    pub best_for: Option<TextList>,
    #[serde(alias = "Not Recommended For")]
    pub not_recommended_for: Option<TextList>,
    #[serde(alias = "Preparation Steps")]
    pub preparation_steps: Option<TextList>,
    #[serde(alias = "Quantity Conversion")]
    pub quantity_conversion: Option<String>,
    #[serde(alias = "Image URL")]
    pub image_url: Option<String>,
    #[serde(alias = "Alt Text")]
    pub alt_text: Option<String>,
}

impl RawRow {
    pub fn new(category: &str, ingredient_name: &str, substitute_name: &str) -> Self {
        Self {
            category: Some(category.to_owned()),
            ingredient_name: Some(ingredient_name.to_owned()),
            substitute_name: Some(substitute_name.to_owned()),
            ..Default::default()
        }
    }
}
