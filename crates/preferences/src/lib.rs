mod comments;
mod favorites;
mod ratings;
mod store;

pub use comments::*;
pub use favorites::*;
pub use ratings::*;
pub use store::*;

cfg_if::cfg_if! {
    if #[cfg(feature = "full")] {
        mod sqlite;

        pub use sqlite::*;
    }
}
