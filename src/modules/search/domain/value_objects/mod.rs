mod query_intent;

pub use query_intent::*;
