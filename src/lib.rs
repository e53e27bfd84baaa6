//! Goldlist vocabulary learning: words are written on daily pages, rested for two weeks, then
//! distilled through bronze, silver and gold passes.

pub mod core;
pub mod notifications;
pub mod persistence;
pub mod progression;
pub mod review;
pub mod roadmap;
pub mod streak;

pub use crate::core::{
    GoldlistError,
    Notebook,
    Profile,
    Stage,
    Status,
    VirtualClock,
    VocabularyEntry,
};
pub use progression::{
    advance,
    EntryUpdate,
    Transition,
};
pub use roadmap::{
    classify_pages,
    PageState,
    RoadmapPage,
};
pub use streak::{
    display_streak,
    StreakDisplay,
    StreakStatus,
};
