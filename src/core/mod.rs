pub mod clock;
pub mod errors;
pub mod models;
pub mod tasks;
pub mod utils;

pub use clock::VirtualClock;
pub use errors::GoldlistError;
pub use models::{
    Notebook,
    Profile,
    Stage,
    Status,
    VocabularyEntry,
};
