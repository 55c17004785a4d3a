pub mod selector;

pub use selector::{daily_seed, date_key, select_daily};
