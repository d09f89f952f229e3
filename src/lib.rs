//! Pub Site Client
//!
//! Data layer for the pub's public website:
//! - HTTP client for the backend REST API
//! - Typed services for menu, events, specials, opening hours, stories and contact
//! - A shared request cache with in-flight de-duplication and fetch-state subscriptions

pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::fmt;
use std::sync::Arc;

use domain::{
    keys, ApiError, CacheKeyParams, Event, GalleryImage, MenuCategory, MenuItem, OpeningHours,
    Special, Story,
};
use infrastructure::{
    cache::{RequestCache, Subscription},
    http::{resolve_image_url, HttpClient, HttpClientTrait},
    services::{
        ContactService, EventService, MenuService, OpeningHoursService, SpecialService,
        StoryService,
    },
};
use tracing::info;

/// Create a site client from the layered configuration
pub fn create_site_client() -> anyhow::Result<SiteClient> {
    let config = AppConfig::load()?;
    create_site_client_with_config(&config)
}

/// Create a site client with custom configuration
pub fn create_site_client_with_config(config: &AppConfig) -> anyhow::Result<SiteClient> {
    let base_url = config.api.base_url.trim();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ApiError::configuration(format!(
            "api.base_url must be an http(s) URL, got '{}'",
            config.api.base_url
        ))
        .into());
    }

    info!("Backend API: {}", base_url);

    let client: Arc<dyn HttpClientTrait> = Arc::new(HttpClient::new(base_url));

    let mut config = config.clone();
    config.api.base_url = base_url.to_string();
    Ok(SiteClient::new(config, client))
}

/// Services plus the shared request cache, wired against one backend
#[derive(Clone)]
pub struct SiteClient {
    config: AppConfig,
    cache: RequestCache,
    menu: MenuService<dyn HttpClientTrait>,
    events: EventService<dyn HttpClientTrait>,
    specials: SpecialService<dyn HttpClientTrait>,
    opening_hours: OpeningHoursService<dyn HttpClientTrait>,
    stories: StoryService<dyn HttpClientTrait>,
    contact: ContactService<dyn HttpClientTrait>,
}

impl fmt::Debug for SiteClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteClient")
            .field("base_url", &self.config.api.base_url)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl SiteClient {
    pub fn new(config: AppConfig, client: Arc<dyn HttpClientTrait>) -> Self {
        let cache = RequestCache::new(config.cache.policy());

        Self {
            menu: MenuService::new(client.clone()),
            events: EventService::new(client.clone()),
            specials: SpecialService::new(client.clone()),
            opening_hours: OpeningHoursService::new(client.clone()),
            stories: StoryService::new(client.clone()),
            contact: ContactService::new(client),
            cache,
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn cache(&self) -> &RequestCache {
        &self.cache
    }

    pub fn menu(&self) -> &MenuService<dyn HttpClientTrait> {
        &self.menu
    }

    pub fn events(&self) -> &EventService<dyn HttpClientTrait> {
        &self.events
    }

    pub fn specials(&self) -> &SpecialService<dyn HttpClientTrait> {
        &self.specials
    }

    pub fn opening_hours(&self) -> &OpeningHoursService<dyn HttpClientTrait> {
        &self.opening_hours
    }

    pub fn stories(&self) -> &StoryService<dyn HttpClientTrait> {
        &self.stories
    }

    pub fn contact(&self) -> &ContactService<dyn HttpClientTrait> {
        &self.contact
    }

    /// Resolve an image path against the backend base URL
    pub fn image_url(&self, path: &str) -> String {
        resolve_image_url(&self.config.api.base_url, path)
    }

    // Cached views used by the site's pages

    pub fn cached_opening_hours(&self) -> Subscription<Vec<OpeningHours>> {
        let service = self.opening_hours.clone();
        self.cache.subscribe(keys::OPENING_HOURS, move || async move {
            service.get_opening_hours().await
        })
    }

    pub fn cached_menu_items(&self) -> Subscription<Vec<MenuItem>> {
        let service = self.menu.clone();
        self.cache
            .subscribe(keys::MENU_ITEMS, move || async move { service.get_items().await })
    }

    pub fn cached_menu_categories(&self) -> Subscription<Vec<MenuCategory>> {
        let service = self.menu.clone();
        self.cache.subscribe(keys::MENU_CATEGORIES, move || async move {
            service.get_categories().await
        })
    }

    pub fn cached_category_items(&self, category_id: i64) -> Subscription<Vec<MenuItem>> {
        let key = CacheKeyParams::new(keys::MENU_ITEMS).with_component("category", category_id);
        let service = self.menu.clone();
        self.cache.subscribe(key, move || async move {
            service.get_items_by_category(category_id).await
        })
    }

    /// Active events, as shown on the landing page
    pub fn cached_active_events(&self) -> Subscription<Vec<Event>> {
        let service = self.events.clone();
        self.cache.subscribe(keys::ACTIVE_EVENTS_HOME, move || async move {
            service.get_active_events().await
        })
    }

    pub fn cached_events(&self) -> Subscription<Vec<Event>> {
        let service = self.events.clone();
        self.cache
            .subscribe(keys::EVENTS, move || async move { service.get_events().await })
    }

    pub fn cached_upcoming_events(&self) -> Subscription<Vec<Event>> {
        let service = self.events.clone();
        self.cache.subscribe(keys::UPCOMING_EVENTS, move || async move {
            service.get_upcoming_events().await
        })
    }

    pub fn cached_specials(&self) -> Subscription<Vec<Special>> {
        let service = self.specials.clone();
        self.cache
            .subscribe(keys::SPECIALS, move || async move { service.get_specials().await })
    }

    pub fn cached_active_specials(&self) -> Subscription<Vec<Special>> {
        let service = self.specials.clone();
        self.cache.subscribe(keys::ACTIVE_SPECIALS, move || async move {
            service.get_active_specials().await
        })
    }

    pub fn cached_stories(&self) -> Subscription<Vec<Story>> {
        let service = self.stories.clone();
        self.cache
            .subscribe(keys::STORIES, move || async move { service.get_stories().await })
    }

    pub fn cached_gallery(&self) -> Subscription<Vec<GalleryImage>> {
        let service = self.stories.clone();
        self.cache
            .subscribe(keys::GALLERY, move || async move { service.get_gallery().await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ContactMessage, DayOfWeek};
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn site_for(server: &MockServer) -> SiteClient {
        let mut config = AppConfig::default();
        config.api.base_url = format!("{}/api", server.uri());
        create_site_client_with_config(&config).unwrap()
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "localhost:3000".to_string();

        let error = create_site_client_with_config(&config).unwrap_err();
        assert!(error.to_string().contains("api.base_url"));
    }

    #[test]
    fn test_image_url() {
        let site = create_site_client_with_config(&AppConfig::default()).unwrap();

        assert_eq!(
            site.image_url("/uploads/pie.jpg"),
            "http://localhost:3000/api/uploads/pie.jpg"
        );
        assert_eq!(
            site.image_url("https://cdn.example.com/pie.jpg"),
            "https://cdn.example.com/pie.jpg"
        );
    }

    #[test]
    fn test_base_url_whitespace_is_trimmed() {
        let mut config = AppConfig::default();
        config.api.base_url = "  https://thecrown.example/api/  ".to_string();

        let site = create_site_client_with_config(&config).unwrap();

        assert_eq!(site.config().api.base_url, "https://thecrown.example/api/");
        assert_eq!(
            site.image_url("uploads/bar.jpg"),
            "https://thecrown.example/api/uploads/bar.jpg"
        );
    }

    #[tokio::test]
    async fn test_events_and_specials_views_use_their_own_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "Quiz Night", "startDate": "2026-11-05T19:30:00Z", "isActive": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/specials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 4, "title": "Fish Friday", "isActive": true}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let site = site_for(&server).await;
        let events = site.cached_events().settled().await;
        let specials = site.cached_specials().settled().await;

        assert_eq!(events.data.unwrap()[0].title, "Quiz Night");
        assert_eq!(specials.data.unwrap()[0].title, "Fish Friday");
        assert!(site.cache().entry(keys::EVENTS).is_some());
        assert!(site.cache().entry(keys::SPECIALS).is_some());
    }

    #[tokio::test]
    async fn test_opening_hours_are_fetched_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/opening-hours"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"dayOfWeek": "monday", "openTime": "11:00", "closeTime": "23:00", "isClosed": false}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let site = site_for(&server).await;
        let mut first = site.cached_opening_hours();
        let mut second = site.cached_opening_hours();

        let state = first.settled().await;
        assert_eq!(state.data.unwrap()[0].day_of_week, DayOfWeek::Monday);
        assert!(second.settled().await.error.is_none());

        // Fresh entry: no second request
        let third = site.cached_opening_hours();
        assert!(!third.state().loading);
        assert!(third.state().data.is_some());
    }

    #[tokio::test]
    async fn test_category_items_use_distinct_keys() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/menu/categories/1/items"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/menu/categories/2/items"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Category not found"})))
            .mount(&server)
            .await;

        let site = site_for(&server).await;
        let starters = site.cached_category_items(1).settled().await;
        let missing = site.cached_category_items(2).settled().await;

        assert!(starters.data.unwrap().is_empty());
        let error = missing.error.unwrap();
        assert_eq!(error.status_code, Some(404));
        assert_eq!(error.message, "Category not found");
        assert_eq!(site.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_contact_submission() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/contact"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"success": true})))
            .expect(1)
            .mount(&server)
            .await;

        let site = site_for(&server).await;
        let message = ContactMessage::new("Ada", "ada@example.com", "Hello", "Great pies");

        assert!(site.contact().submit(&message).await.unwrap().success);
    }
}
