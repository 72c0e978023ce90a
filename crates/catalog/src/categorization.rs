use safeswap_shared::catalog::Category;

/// Name fragments that put an ingredient in `Condiments` whatever its source
/// category says.
const CONDIMENT_MARKERS: &[&str] = &["sauce", "dressing", "marinade", "condiment"];

/// Source category spellings found in the sheet, plus the canonical names so
/// an already classified value maps back to itself.
const SOURCE_CATEGORIES: &[(&str, Category)] = &[
    ("Dairy", Category::Dairy),
    ("Meat", Category::Proteins),
    ("Fish-Seafood", Category::Proteins),
    // eggs are their own category, not folded into proteins
    ("Egg", Category::Eggs),
    ("Grains-Gluten", Category::Grains),
    ("Nuts-Seeds", Category::NutsSeeds),
    ("Caffeine", Category::Beverages),
    ("Fruit", Category::Produce),
    ("Vegetables", Category::Produce),
    ("Sweeteners", Category::Sweeteners),
    ("Thickeners", Category::Thickeners),
    ("Condiments", Category::Condiments),
    ("dairy", Category::Dairy),
    ("eggs", Category::Eggs),
    ("proteins", Category::Proteins),
    ("grains", Category::Grains),
    ("nuts-seeds", Category::NutsSeeds),
    ("beverages", Category::Beverages),
    ("produce", Category::Produce),
    ("sweeteners", Category::Sweeteners),
    ("thickeners", Category::Thickeners),
    ("condiments", Category::Condiments),
];

/// Whole words that contain a heuristic keyword without being related to it.
/// They are blanked out of the name before the heuristics run.
const COLLISIONS: &[&str] = &["eggplant", "gumbo"];

/// Which step of the chain produced a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    CondimentOverride,
    SourceCategory,
    NameHeuristic,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub rule: Rule,
    /// Other heuristic categories the name also matched. Non-empty means the
    /// priority order decided the result.
    pub competing: Vec<Category>,
}

/// Categorization Service
///
/// Stateless domain service mapping a `(source category, ingredient name)`
/// pair to a display category. Ordered, first match wins:
///
/// 1. condiment markers in the name (or "sauce" in the source category)
/// 2. exact source category lookup
/// 3. substring heuristics on the name
/// 4. `Category::Other`
///
/// # Examples
///
/// ```
/// use safeswap_catalog::{CategorizationService, Category};
///
/// assert_eq!(
///     CategorizationService::classify("Fish-Seafood", "Fish Sauce"),
///     Category::Condiments
/// );
/// assert_eq!(
///     CategorizationService::classify("", "Eggplant"),
///     Category::Other
/// );
/// ```
pub struct CategorizationService;

impl CategorizationService {
    pub fn classify(source_category: &str, ingredient_name: &str) -> Category {
        Self::explain(source_category, ingredient_name).category
    }

    /// Same as [`CategorizationService::classify`] but reports which rule
    /// fired and any heuristic categories that lost on priority.
    pub fn explain(source_category: &str, ingredient_name: &str) -> Classification {
        let name = ingredient_name.trim().to_lowercase();
        let source = source_category.trim();

        if Self::is_condiment(&name) || source.to_lowercase().contains("sauce") {
            return Classification {
                category: Category::Condiments,
                rule: Rule::CondimentOverride,
                competing: vec![],
            };
        }

        if let Some((_, category)) = SOURCE_CATEGORIES.iter().find(|(key, _)| *key == source) {
            return Classification {
                category: *category,
                rule: Rule::SourceCategory,
                competing: vec![],
            };
        }

        let mut candidates = Self::heuristic_candidates(&name).into_iter();

        match candidates.next() {
            Some(category) => Classification {
                category,
                rule: Rule::NameHeuristic,
                competing: candidates.collect(),
            },
            None => Classification {
                category: Category::Other,
                rule: Rule::Fallback,
                competing: vec![],
            },
        }
    }

    /// Every heuristic category the lower-cased name matches, in priority
    /// order.
    fn heuristic_candidates(name: &str) -> Vec<Category> {
        let masked = Self::mask_collisions(name);
        let checks: [(Category, fn(&str) -> bool); 9] = [
            (Category::NutsSeeds, Self::is_nuts_seeds),
            (Category::Dairy, Self::is_dairy),
            (Category::Eggs, Self::is_eggs),
            (Category::Proteins, Self::is_protein),
            (Category::Grains, Self::is_grain),
            (Category::Beverages, Self::is_beverage),
            (Category::Produce, Self::is_produce),
            (Category::Sweeteners, Self::is_sweetener),
            (Category::Thickeners, Self::is_thickener),
        ];

        checks
            .into_iter()
            .filter(|(_, check)| check(&masked))
            .map(|(category, _)| category)
            .collect()
    }

    fn mask_collisions(name: &str) -> String {
        COLLISIONS
            .iter()
            .fold(name.to_owned(), |acc, word| acc.replace(word, " "))
    }

    fn is_condiment(name: &str) -> bool {
        CONDIMENT_MARKERS.iter().any(|m| name.contains(m))
    }

    fn is_nuts_seeds(name: &str) -> bool {
        name.contains("peanut butter") || name.contains("nuts") || name.contains("seeds")
    }

    fn is_dairy(name: &str) -> bool {
        ["milk", "cheese", "cream"].iter().any(|k| name.contains(k))
            || (name.contains("butter") && !name.contains("peanut butter"))
    }

    /// Checked before proteins since eggs were split out of that category.
    fn is_eggs(name: &str) -> bool {
        name.contains("egg")
    }

    fn is_protein(name: &str) -> bool {
        ["chicken", "beef", "fish", "steak"]
            .iter()
            .any(|k| name.contains(k))
    }

    fn is_grain(name: &str) -> bool {
        ["flour", "bread", "pasta"].iter().any(|k| name.contains(k))
    }

    fn is_beverage(name: &str) -> bool {
        ["coffee", "drink"].iter().any(|k| name.contains(k)) || Self::has_word(name, "tea")
    }

    /// `word` as a whole alphanumeric run, so "tea" leaves "steak" alone.
    fn has_word(name: &str, word: &str) -> bool {
        name.split(|c: char| !c.is_alphanumeric())
            .any(|part| part == word)
    }

    fn is_produce(name: &str) -> bool {
        ["fruit", "vegetable", "produce"]
            .iter()
            .any(|k| name.contains(k))
    }

    fn is_sweetener(name: &str) -> bool {
        ["sugar", "syrup", "honey"].iter().any(|k| name.contains(k))
    }

    fn is_thickener(name: &str) -> bool {
        ["starch", "gum", "thickener"]
            .iter()
            .any(|k| name.contains(k))
    }
}
