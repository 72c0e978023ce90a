mod categorization;
mod facets;
mod filter;
mod lookup;
mod model;
mod notes;
mod record;
mod row;
mod transform;

pub use categorization::*;
pub use facets::*;
pub use filter::*;
pub use lookup::*;
pub use model::*;
pub use notes::*;
pub use record::*;
pub use row::*;
pub use transform::*;

pub use safeswap_shared::catalog::{Category, DietaryRestriction};

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod import;
        mod snapshot;
        mod source;

        pub use import::*;
        pub use snapshot::*;
        pub use source::*;
    }
}
