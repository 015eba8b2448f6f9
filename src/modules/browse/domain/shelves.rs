use crate::modules::catalog::{CategoryParams, CategoryRequest, MediaType, TimeWindow};

const SOUTH_INDIAN_LANGUAGES: &str = "ta|te|ml|kn";
const ANIMATION_GENRE_ID: &str = "16";

/// Default shelves for the home browsing page, in display order
pub fn home_page_requests() -> Vec<CategoryRequest> {
    vec![
        CategoryRequest::new(
            "Trending Now",
            CategoryParams::trending(None, TimeWindow::Week),
        ),
        CategoryRequest::new("Popular Movies", CategoryParams::popular(MediaType::Movie)),
        CategoryRequest::new("Top Rated Movies", CategoryParams::top_rated(MediaType::Movie)),
        CategoryRequest::new("Popular TV Shows", CategoryParams::popular(MediaType::Tv)),
        CategoryRequest::new("Top Rated TV Shows", CategoryParams::top_rated(MediaType::Tv)),
        CategoryRequest::new("Now Playing", CategoryParams::now_playing()),
        CategoryRequest::new("Upcoming Movies", CategoryParams::upcoming()),
        CategoryRequest::new("Airing Today", CategoryParams::airing_today()),
        CategoryRequest::new(
            "Bollywood Hits",
            CategoryParams::discover(MediaType::Movie)
                .with_filter("with_original_language", "hi")
                .with_filter("sort_by", "popularity.desc"),
        ),
        CategoryRequest::new(
            "Korean Dramas",
            CategoryParams::discover(MediaType::Tv)
                .with_filter("with_original_language", "ko")
                .with_filter("sort_by", "popularity.desc"),
        ),
        CategoryRequest::new(
            "Anime",
            CategoryParams::discover(MediaType::Tv)
                .with_filter("with_original_language", "ja")
                .with_filter("with_genres", ANIMATION_GENRE_ID)
                .with_filter("sort_by", "popularity.desc"),
        ),
        CategoryRequest::new(
            "South Indian Blockbusters",
            CategoryParams::discover(MediaType::Movie)
                .with_filter("with_original_language", SOUTH_INDIAN_LANGUAGES)
                .with_filter("sort_by", "popularity.desc"),
        ),
        // Fetched for the "see all" view, not rendered as a row
        CategoryRequest::new("On The Air", CategoryParams::on_the_air()).with_visibility(false),
    ]
}
