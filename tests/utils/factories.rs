/// Test data factories using builder pattern
///
/// Provides convenient methods to create catalog records with sensible defaults
use reelshelf::modules::catalog::{CatalogPage, CatalogRecord, MediaType};

pub struct RecordFactory {
    record: CatalogRecord,
}

impl RecordFactory {
    pub fn movie(id: u64, title: &str) -> Self {
        Self {
            record: CatalogRecord::new(id, MediaType::Movie, title),
        }
        .with_language("en")
        .with_votes(6.5, 500)
        .with_popularity(20.0)
    }

    pub fn tv(id: u64, title: &str) -> Self {
        Self {
            record: CatalogRecord::new(id, MediaType::Tv, title),
        }
        .with_language("en")
        .with_votes(6.5, 500)
        .with_popularity(20.0)
    }

    pub fn person(id: u64, name: &str) -> Self {
        Self {
            record: CatalogRecord::new(id, MediaType::Person, name),
        }
    }

    pub fn with_language(mut self, language: &str) -> Self {
        self.record.original_language = Some(language.to_string());
        self
    }

    pub fn with_release_date(mut self, date: &str) -> Self {
        match self.record.media_type {
            Some(MediaType::Tv) => self.record.first_air_date = Some(date.to_string()),
            _ => self.record.release_date = Some(date.to_string()),
        }
        self
    }

    pub fn with_popularity(mut self, popularity: f64) -> Self {
        self.record.popularity = popularity;
        self
    }

    pub fn with_votes(mut self, average: f64, count: u64) -> Self {
        self.record.vote_average = average;
        self.record.vote_count = count;
        self
    }

    pub fn with_overview(mut self, overview: &str) -> Self {
        self.record.overview = Some(overview.to_string());
        self
    }

    pub fn adult(mut self) -> Self {
        self.record.adult = true;
        self
    }

    pub fn tagged_as(mut self, media_type: Option<MediaType>) -> Self {
        self.record.media_type = media_type;
        self
    }

    pub fn build(self) -> CatalogRecord {
        self.record
    }
}

/// Single-page upstream response
pub fn page(records: Vec<CatalogRecord>) -> CatalogPage {
    CatalogPage::single(records)
}

/// `count` plain movies with ids starting at `first_id`
pub fn movies(first_id: u64, count: usize) -> Vec<CatalogRecord> {
    (0..count as u64)
        .map(|offset| {
            let id = first_id + offset;
            RecordFactory::movie(id, &format!("Movie {}", id)).build()
        })
        .collect()
}

pub fn ids(records: &[CatalogRecord]) -> Vec<u64> {
    records.iter().map(|record| record.id).collect()
}
