// The core module contains all business logic.
// Each feature gets its own submodule.

#[path = "locale/locale_service.rs"]
pub mod locale;

#[path = "moderation/moderation_service.rs"]
pub mod moderation;
