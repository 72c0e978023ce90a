pub use safeswap_shared::recipe::{RecipeIngredient, Status, Unit};

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod command;
        mod query;

        pub use command::*;
        pub use query::*;
    }
}
