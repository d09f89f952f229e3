//! Story service - about page content and gallery

use std::sync::Arc;

use crate::domain::{ApiError, GalleryImage, Story};
use crate::infrastructure::http::{HttpClientExt, HttpClientTrait};

#[derive(Debug)]
pub struct StoryService<C: HttpClientTrait + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClientTrait + ?Sized> Clone for StoryService<C> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<C: HttpClientTrait + ?Sized> StoryService<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    pub async fn get_stories(&self) -> Result<Vec<Story>, ApiError> {
        self.client.get("/stories/published").await
    }

    /// Get a story by slug; the slug is sent as a single path segment
    pub async fn get_story(&self, slug: &str) -> Result<Story, ApiError> {
        self.client
            .get(&format!("/stories/{}", urlencoding::encode(slug)))
            .await
    }

    pub async fn get_gallery(&self) -> Result<Vec<GalleryImage>, ApiError> {
        self.client.get("/stories/gallery").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::http::MockHttpClientTrait;
    use serde_json::json;

    #[tokio::test]
    async fn test_get_story_by_slug() {
        let mut client = MockHttpClientTrait::new();
        client
            .expect_send()
            .withf(|_, path, _| path == "/stories/our-history")
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"id": 1, "title": "Our History", "slug": "our-history", "section": "about"}))
            });

        let service = StoryService::new(Arc::new(client));
        let story = service.get_story("our-history").await.unwrap();

        assert_eq!(story.section.as_deref(), Some("about"));
    }

    #[tokio::test]
    async fn test_slug_is_encoded_as_one_segment() {
        let mut client = MockHttpClientTrait::new();
        client
            .expect_send()
            .withf(|_, path, _| path == "/stories/beer%2Fcider%3F%20%23")
            .times(1)
            .returning(|_, _, _| {
                Ok(json!({"id": 2, "title": "Beer and Cider", "slug": "beer/cider? #"}))
            });

        let service = StoryService::new(Arc::new(client));
        let story = service.get_story("beer/cider? #").await.unwrap();

        assert_eq!(story.id, 2);
    }
}
