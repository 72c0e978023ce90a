use sea_query::Iden;

#[derive(Iden, Clone)]
pub enum Ingredient {
    Table,
    Id,
    Name,
    Category,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Substitute {
    Table,
    Id,
    IngredientId,
    Name,
    Usage,
    Notes,
    SafeFor,
    BestFor,
    NotRecommendedFor,
    PreparationSteps,
    QuantityConversion,
    ImageUrl,
    AltText,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum SubstituteRating {
    Table,
    Id,
    SubstituteId,
    UserId,
    Rating,
    Comment,
    CreatedAt,
}

#[derive(Iden, Clone)]
pub enum Recipe {
    Table,
    Id,
    Name,
    Instructions,
    Ingredients,
    ImageUrl,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden, Clone)]
pub enum PreferenceEntry {
    Table,
    Namespace,
    Key,
    Value,
    UpdatedAt,
}
