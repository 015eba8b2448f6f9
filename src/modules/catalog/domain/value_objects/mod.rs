mod category_request;

pub use category_request::*;
