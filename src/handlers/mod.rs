pub mod predict;

pub use predict::{predict, API_KEY_HEADER};
