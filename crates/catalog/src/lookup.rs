use std::collections::HashMap;

use crate::Ingredient;

/// Trim, lower-case and collapse whitespace runs into one space.
pub fn normalize_text(value: &str) -> String {
    value
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Maps a substitute name to the ingredient it replaces. Used to tell which
/// ingredient of a submitted recipe is a known substitute.
#[derive(Debug, Clone, Default)]
pub struct SubstituteLookup(HashMap<String, String>);

impl SubstituteLookup {
    /// The first ingredient listing a substitute wins.
    pub fn new(ingredients: &[Ingredient]) -> Self {
        let mut map = HashMap::new();

        for ingredient in ingredients {
            for substitute in &ingredient.substitutes {
                map.entry(normalize_text(&substitute.name))
                    .or_insert_with(|| ingredient.name.clone());
            }
        }

        Self(map)
    }

    pub fn substitute_for(&self, name: &str) -> Option<&str> {
        self.0.get(&normalize_text(name)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
