//! Resource services, one per backend area

mod contact_service;
mod event_service;
mod menu_service;
mod opening_hours_service;
mod special_service;
mod story_service;

pub use contact_service::ContactService;
pub use event_service::EventService;
pub use menu_service::MenuService;
pub use opening_hours_service::OpeningHoursService;
pub use special_service::SpecialService;
pub use story_service::StoryService;
