pub mod matcher;
pub mod normalize;
pub mod similarity;

pub use matcher::match_guess;
pub use normalize::normalize;
pub use similarity::{acceptance_threshold, qualifying_similarity, similarity};
