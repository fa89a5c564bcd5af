use anyhow::Result;
use async_trait::async_trait;

use crate::catalog::Collection;
use crate::models::AnimeRecord;

mod client;
mod map;

pub use client::{AniListClient, ANILIST_ENDPOINT, PER_PAGE};

/// Where the fetch job gets each collection from.
#[async_trait]
pub trait AnimeSource: Send + Sync {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<AnimeRecord>>;
}

#[async_trait]
impl AnimeSource for AniListClient {
    async fn fetch_collection(&self, collection: Collection) -> Result<Vec<AnimeRecord>> {
        let media = self.fetch_page(collection).await?;
        Ok(media.into_iter().map(map::media_to_record).collect())
    }
}
