pub mod library;
pub mod recipe;
pub mod search_response;

pub use library::{
    FavoriteEntry, FavoriteInput, HistoryEntry, HistoryInput, Session, ToggleOutcome, User,
};
pub use recipe::{RecipeDetail, RecipeRecord};
pub use search_response::{SearchResponse, SearchResultType};
