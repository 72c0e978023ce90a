mod moderate;
mod submit;

pub use submit::*;

use sqlx::SqlitePool;

#[derive(Clone)]
pub struct Command(pub SqlitePool);
