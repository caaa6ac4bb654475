pub mod hunter;

pub use hunter::{HttpMethod, HunterClient, HunterError, Params};
