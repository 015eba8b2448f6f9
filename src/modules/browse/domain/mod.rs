pub mod shelves;

pub use shelves::home_page_requests;
