pub mod refresh;
pub mod standings;
pub mod stats;
