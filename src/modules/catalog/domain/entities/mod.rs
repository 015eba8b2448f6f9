mod catalog_record;

pub use catalog_record::*;
