use std::collections::HashSet;

use safeswap_shared::catalog::{Category, DietaryRestriction};

use crate::{
    CategorizationService, Ingredient, IngredientRecord, Rating, RawRow, Substitute,
    SubstituteRecord, TextList,
};

/// Result of a row transform, with the number of rows that were dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transformed {
    pub ingredients: Vec<Ingredient>,
    pub skipped: usize,
}

/// Builds the ingredient model from flat rows.
///
/// Rows are grouped by `(source category, ingredient name)` in first-seen
/// order. Rows without an ingredient name or a substitute name are skipped
/// and the rest of the batch goes through.
pub fn transform_rows(rows: &[RawRow]) -> Vec<Ingredient> {
    transform_rows_counted(rows).ingredients
}

pub fn transform_rows_counted(rows: &[RawRow]) -> Transformed {
    let mut groups: Vec<((String, String), Ingredient)> = vec![];
    let mut ingredient_ids = IssuedIds::default();
    let mut substitute_ids = IssuedIds::default();
    let mut skipped = 0;

    for (position, row) in rows.iter().enumerate() {
        let ingredient_name = non_blank(row.ingredient_name.as_deref());
        let substitute_name = non_blank(row.substitute_name.as_deref());

        let (Some(ingredient_name), Some(substitute_name)) = (ingredient_name, substitute_name)
        else {
            tracing::warn!(
                row = position,
                id = ?row.id,
                "skipping row without ingredient or substitute name"
            );
            skipped += 1;
            continue;
        };

        let source_category = row.category.as_deref().unwrap_or_default().trim();
        let key = (source_category.to_owned(), ingredient_name.to_owned());
        let row_id = non_blank(row.id.as_deref());

        let index = match groups.iter().position(|(k, _)| k == &key) {
            Some(index) => index,
            None => {
                let id = ingredient_ids.issue(match row_id {
                    Some(id) => id.to_owned(),
                    None => slug(&format!("{source_category} {ingredient_name}")),
                });

                groups.push((
                    key,
                    Ingredient {
                        id,
                        name: ingredient_name.to_owned(),
                        category: classify(source_category, ingredient_name),
                        substitutes: vec![],
                    },
                ));

                groups.len() - 1
            }
        };

        let ingredient = &mut groups[index].1;
        let substitute_id = substitute_ids.issue(match row_id {
            Some(id) => format!("{id}-sub"),
            None => format!("{}-{}", ingredient.id, ingredient.substitutes.len() + 1),
        });

        ingredient.substitutes.push(Substitute {
            id: substitute_id,
            name: substitute_name.to_owned(),
            usage: split(&row.usage),
            notes: row.notes.as_deref().unwrap_or_default().trim().to_owned(),
            safe_for: dietary(split(&row.safe_for)),
            best_for: split(&row.best_for),
            not_recommended_for: split(&row.not_recommended_for),
            preparation_steps: row
                .preparation_steps
                .as_ref()
                .map(|steps| steps.split_on('\n'))
                .unwrap_or_default(),
            quantity_conversion: non_blank(row.quantity_conversion.as_deref()).map(str::to_owned),
            image_url: non_blank(row.image_url.as_deref()).map(str::to_owned),
            alt_text: alt_text(row.alt_text.as_deref(), substitute_name),
            ratings: vec![],
        });
    }

    Transformed {
        ingredients: groups.into_iter().map(|(_, ingredient)| ingredient).collect(),
        skipped,
    }
}

/// Builds the ingredient model from the joined store shape. The stored
/// category goes through the classifier again so that condiment overrides
/// and collisions are applied uniformly.
pub fn transform_records(records: Vec<IngredientRecord>) -> Vec<Ingredient> {
    records
        .into_iter()
        .filter_map(|record| {
            let name = record.name.trim().to_owned();
            if name.is_empty() || record.id.trim().is_empty() {
                tracing::warn!(id = %record.id, "skipping ingredient record without id or name");
                return None;
            }

            let category = classify(record.category.as_deref().unwrap_or_default(), &name);
            let substitutes = record
                .substitutes
                .into_iter()
                .filter_map(|substitute| transform_substitute(&record.id, substitute))
                .collect();

            Some(Ingredient {
                id: record.id,
                name,
                category,
                substitutes,
            })
        })
        .collect()
}

fn transform_substitute(ingredient_id: &str, record: SubstituteRecord) -> Option<Substitute> {
    let (Some(id), Some(name)) = (
        non_blank(record.id.as_deref()),
        non_blank(record.name.as_deref()),
    ) else {
        tracing::warn!(ingredient_id, "skipping substitute record without id or name");
        return None;
    };

    let id = id.to_owned();
    let ratings = record
        .ratings
        .into_iter()
        .filter_map(|rating| {
            let rating_id = non_blank(rating.id.as_deref())?.to_owned();
            let value = u8::try_from(rating.rating)
                .ok()
                .filter(|v| (1..=5).contains(v));

            let Some(value) = value else {
                tracing::warn!(substitute_id = %id, rating = rating.rating, "skipping out of range rating");
                return None;
            };

            Some(Rating {
                id: rating_id,
                substitute_id: id.clone(),
                user_id: rating.user_id,
                rating: value,
                comment: rating.comment,
                created_at: rating.created_at.max(0) as u64,
            })
        })
        .collect();

    Some(Substitute {
        alt_text: alt_text(record.alt_text.as_deref(), name),
        name: name.to_owned(),
        usage: TextList::Items(record.usage).split(),
        notes: record.notes.unwrap_or_default().trim().to_owned(),
        safe_for: dietary(record.safe_for),
        best_for: TextList::Items(record.best_for).split(),
        not_recommended_for: TextList::Items(record.not_recommended_for).split(),
        preparation_steps: TextList::Items(record.preparation_steps).split(),
        quantity_conversion: non_blank(record.quantity_conversion.as_deref()).map(str::to_owned),
        image_url: non_blank(record.image_url.as_deref()).map(str::to_owned),
        id,
        ratings,
    })
}

fn classify(source_category: &str, ingredient_name: &str) -> Category {
    let classification = CategorizationService::explain(source_category, ingredient_name);

    if !classification.competing.is_empty() {
        tracing::warn!(
            ingredient = ingredient_name,
            category = %classification.category,
            competing = ?classification.competing,
            "ingredient name matches several categories"
        );
    }

    classification.category
}

fn dietary(tags: Vec<String>) -> Vec<DietaryRestriction> {
    tags.iter()
        .filter_map(|tag| DietaryRestriction::parse(tag))
        .collect()
}

fn split(value: &Option<TextList>) -> Vec<String> {
    value.as_ref().map(TextList::split).unwrap_or_default()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn alt_text(value: Option<&str>, substitute_name: &str) -> String {
    match non_blank(value) {
        Some(alt) => alt.to_owned(),
        None => format!("Image of {substitute_name}"),
    }
}

/// Ids handed out during one transform. Grouping is case-sensitive but slugs
/// are not, so a taken id gets the first free `-2`, `-3`, ... suffix.
#[derive(Default)]
struct IssuedIds(HashSet<String>);

impl IssuedIds {
    fn issue(&mut self, base: String) -> String {
        let base = if base.is_empty() {
            "item".to_owned()
        } else {
            base
        };

        let mut id = base.clone();
        let mut n = 2;
        while self.0.contains(&id) {
            id = format!("{base}-{n}");
            n += 1;
        }

        self.0.insert(id.clone());
        id
    }
}

/// Lower-case id made of the alphanumeric runs of `value` joined by `-`.
pub(crate) fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(category: &str, ingredient: &str, substitute: &str) -> RawRow {
        RawRow::new(category, ingredient, substitute)
    }

    #[test]
    fn test_groups_rows_by_category_and_name_in_first_seen_order() {
        let rows = vec![
            row("Dairy", "Milk", "Oat Milk"),
            row("Egg", "Egg", "Flax Egg"),
            row("Dairy", "Milk", "Soy Milk"),
        ];

        let ingredients = transform_rows(&rows);

        assert_eq!(ingredients.len(), 2);
        assert_eq!(ingredients[0].name, "Milk");
        assert_eq!(ingredients[0].category, Category::Dairy);
        assert_eq!(
            ingredients[0]
                .substitutes
                .iter()
                .map(|s| s.name.as_str())
                .collect::<Vec<_>>(),
            vec!["Oat Milk", "Soy Milk"]
        );
        assert_eq!(ingredients[1].name, "Egg");
        assert_eq!(ingredients[1].category, Category::Eggs);
    }

    #[test]
    fn test_same_name_in_different_categories_stays_apart() {
        let rows = vec![
            row("Dairy", "Butter", "Olive Oil"),
            row("Nuts-Seeds", "Butter", "Sunflower Butter"),
        ];

        assert_eq!(transform_rows(&rows).len(), 2);
    }

    #[test]
    fn test_safe_for_keeps_only_known_tags() {
        let mut r = row("Dairy", "Milk", "Oat Milk");
        r.safe_for = Some(TextList::from("Vegan, Bogus-Tag, Nut-Free"));

        let ingredients = transform_rows(&[r]);

        assert_eq!(
            ingredients[0].substitutes[0].safe_for,
            vec![DietaryRestriction::Vegan, DietaryRestriction::NutFree]
        );
    }

    #[test]
    fn test_usage_is_split_and_missing_fields_default() {
        let mut r = row("Dairy", "Milk", "Oat Milk");
        r.usage = Some(TextList::from("baking,  , coffee, baking"));

        let ingredients = transform_rows(&[r]);
        let substitute = &ingredients[0].substitutes[0];

        assert_eq!(substitute.usage, vec!["baking", "coffee", "baking"]);
        assert_eq!(substitute.notes, "");
        assert!(substitute.safe_for.is_empty());
        assert!(substitute.best_for.is_empty());
        assert!(substitute.preparation_steps.is_empty());
        assert_eq!(substitute.image_url, None);
        assert_eq!(substitute.alt_text, "Image of Oat Milk");
    }

    #[test]
    fn test_preparation_steps_split_on_lines() {
        let mut r = row("Egg", "Egg", "Flax Egg");
        r.preparation_steps = Some(TextList::from(
            "Mix 1 tbsp flax with 3 tbsp water\nRest, covered, for 5 minutes\n",
        ));

        let ingredients = transform_rows(&[r]);

        assert_eq!(
            ingredients[0].substitutes[0].preparation_steps,
            vec![
                "Mix 1 tbsp flax with 3 tbsp water",
                "Rest, covered, for 5 minutes"
            ]
        );
    }

    #[test]
    fn test_rows_without_names_are_skipped() {
        let rows = vec![
            row("Dairy", "Milk", ""),
            RawRow::default(),
            row("Dairy", "  ", "Oat Milk"),
            row("Dairy", "Milk", "Soy Milk"),
        ];

        let transformed = transform_rows_counted(&rows);

        assert_eq!(transformed.skipped, 3);
        assert_eq!(transformed.ingredients.len(), 1);
        assert_eq!(transformed.ingredients[0].substitutes.len(), 1);
    }

    #[test]
    fn test_ids_come_from_rows_or_slugs() {
        let mut with_id = row("Dairy", "Milk", "Oat Milk");
        with_id.id = Some("7".to_owned());
        let rows = vec![
            with_id,
            row("Dairy", "Milk", "Soy Milk"),
            row("Grains-Gluten", "Wheat Flour", "Rice Flour"),
        ];

        let ingredients = transform_rows(&rows);

        assert_eq!(ingredients[0].id, "7");
        assert_eq!(ingredients[0].substitutes[0].id, "7-sub");
        assert_eq!(ingredients[0].substitutes[1].id, "7-2");
        assert_eq!(ingredients[1].id, "grains-gluten-wheat-flour");
        assert_eq!(ingredients[1].substitutes[0].id, "grains-gluten-wheat-flour-1");
    }

    #[test]
    fn test_ids_unique_when_grouping_keys_differ_only_in_case() {
        let rows = vec![
            row("Dairy", "Milk", "Oat Milk"),
            row("dairy", "milk", "Soy Milk"),
            row("DAIRY", "MILK", "Rice Milk"),
        ];

        let ingredients = transform_rows(&rows);

        assert_eq!(ingredients.len(), 3);
        assert_eq!(ingredients[0].id, "dairy-milk");
        assert_eq!(ingredients[1].id, "dairy-milk-2");
        assert_eq!(ingredients[2].id, "dairy-milk-3");

        let substitute_ids = ingredients
            .iter()
            .flat_map(|i| i.substitutes.iter().map(|s| s.id.as_str()))
            .collect::<HashSet<_>>();
        assert_eq!(substitute_ids.len(), 3);
    }

    #[test]
    fn test_repeated_row_ids_stay_unique() {
        let mut first = row("Dairy", "Milk", "Oat Milk");
        first.id = Some("7".to_owned());
        let mut second = row("Dairy", "Milk", "Soy Milk");
        second.id = Some("7".to_owned());
        let mut other = row("Egg", "Egg", "Flax Egg");
        other.id = Some("7".to_owned());

        let ingredients = transform_rows(&[first, second, other]);

        assert_eq!(ingredients[0].id, "7");
        assert_eq!(ingredients[0].substitutes[0].id, "7-sub");
        assert_eq!(ingredients[0].substitutes[1].id, "7-sub-2");
        assert_eq!(ingredients[1].id, "7-2");
        assert_eq!(ingredients[1].substitutes[0].id, "7-sub-3");
    }

    #[test]
    fn test_generated_substitute_id_skips_taken_row_id() {
        let mut explicit = row("Dairy", "Milk", "Oat Milk");
        explicit.id = Some("dairy-milk".to_owned());
        let rows = vec![explicit, row("dairy", "milk", "Soy Milk")];

        let ingredients = transform_rows(&rows);
        assert_eq!(ingredients[0].id, "dairy-milk");
        assert_eq!(ingredients[1].id, "dairy-milk-2");
        assert_eq!(ingredients[0].substitutes[0].id, "dairy-milk-sub");
        assert_eq!(ingredients[1].substitutes[0].id, "dairy-milk-2-1");
    }

    #[test]
    fn test_transform_is_deterministic() {
        let mut r = row("Fish-Seafood", "Fish Sauce", "Coconut Aminos");
        r.safe_for = Some(TextList::from("vegan, soy-free"));
        let rows = vec![r, row("Vegetables", "Eggplant", "Zucchini")];

        assert_eq!(transform_rows(&rows), transform_rows(&rows));
    }

    #[test]
    fn test_transform_records() {
        let records = vec![IngredientRecord {
            id: "ing-1".to_owned(),
            name: "Fish Sauce".to_owned(),
            category: Some("proteins".to_owned()),
            substitutes: vec![
                SubstituteRecord {
                    id: Some("sub-1".to_owned()),
                    name: Some("Coconut Aminos".to_owned()),
                    safe_for: vec!["Vegan".to_owned(), "paleo".to_owned()],
                    usage: vec![" dressings ".to_owned()],
                    ratings: vec![
                        crate::RatingRecord {
                            id: Some("r1".to_owned()),
                            rating: 4,
                            ..Default::default()
                        },
                        crate::RatingRecord {
                            id: Some("r2".to_owned()),
                            rating: 9,
                            ..Default::default()
                        },
                    ],
                    ..Default::default()
                },
                SubstituteRecord {
                    id: None,
                    name: Some("Orphan".to_owned()),
                    ..Default::default()
                },
            ],
        }];

        let ingredients = transform_records(records);

        assert_eq!(ingredients.len(), 1);
        assert_eq!(ingredients[0].category, Category::Condiments);
        assert_eq!(ingredients[0].substitutes.len(), 1);

        let substitute = &ingredients[0].substitutes[0];
        assert_eq!(substitute.safe_for, vec![DietaryRestriction::Vegan]);
        assert_eq!(substitute.usage, vec!["dressings"]);
        assert_eq!(substitute.alt_text, "Image of Coconut Aminos");
        assert_eq!(substitute.ratings.len(), 1);
        assert_eq!(substitute.ratings[0].substitute_id, "sub-1");
        assert_eq!(substitute.average_rating(), 4.0);
    }

    #[test]
    fn test_slug() {
        assert_eq!(slug("Grains-Gluten  Wheat Flour!"), "grains-gluten-wheat-flour");
        assert_eq!(slug(" Milk"), "milk");
    }
}
