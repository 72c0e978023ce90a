use safeswap_catalog::SubstituteLookup;
use safeswap_db::table::Recipe;
use safeswap_shared::recipe::{RecipeIngredient, Status, Unit};
use sea_query::{Query, SqliteQueryBuilder};
use sea_query_sqlx::SqlxBinder;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
pub struct IngredientInput {
    pub quantity: f64,
    #[serde(default)]
    pub unit: Unit,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitRecipeInput {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 5000))]
    pub instructions: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientInput>,
    #[validate(url)]
    pub image_url: Option<String>,
}

impl SubmitRecipeInput {
    fn normalized(self, lookup: &SubstituteLookup) -> (Self, Vec<RecipeIngredient>) {
        let ingredients = self
            .ingredients
            .iter()
            .filter_map(|input| {
                let name = input.name.trim();
                if name.is_empty() {
                    return None;
                }

                Some(RecipeIngredient {
                    quantity: input.quantity,
                    unit: input.unit,
                    name: name.to_owned(),
                    substitute_for: lookup.substitute_for(name).map(str::to_owned),
                })
            })
            .collect();

        let input = Self {
            name: self.name.trim().to_owned(),
            instructions: self.instructions.trim().to_owned(),
            image_url: self
                .image_url
                .map(|url| url.trim().to_owned())
                .filter(|url| !url.is_empty()),
            ingredients: vec![],
        };

        (input, ingredients)
    }
}

impl super::Command {
    /// Stores a new recipe awaiting moderation and returns its id.
    ///
    /// Ingredients with an empty name are dropped; the others are annotated
    /// with the ingredient they substitute when `lookup` knows their name.
    #[tracing::instrument(skip_all, fields(name = %input.name))]
    pub async fn submit(
        &self,
        input: SubmitRecipeInput,
        lookup: &SubstituteLookup,
    ) -> safeswap_shared::Result<String> {
        let (input, ingredients) = input.normalized(lookup);
        input.validate()?;

        let id = ulid::Ulid::new().to_string();
        let now = safeswap_shared::now_secs();

        let statement = Query::insert()
            .into_table(Recipe::Table)
            .columns([
                Recipe::Id,
                Recipe::Name,
                Recipe::Instructions,
                Recipe::Ingredients,
                Recipe::ImageUrl,
                Recipe::Status,
                Recipe::CreatedAt,
            ])
            .values_panic([
                id.to_owned().into(),
                input.name.into(),
                input.instructions.into(),
                serde_json::to_string(&ingredients)?.into(),
                input.image_url.into(),
                Status::Pending.to_string().into(),
                now.into(),
            ])
            .to_owned();

        let (sql, values) = statement.build_sqlx(SqliteQueryBuilder);
        sqlx::query_with(&sql, values).execute(&self.0).await?;

        tracing::info!(recipe_id = %id, ingredients = ingredients.len(), "recipe submitted");

        Ok(id)
    }
}
