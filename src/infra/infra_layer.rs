// The infra module contains implementations of core concerns.
// Each feature implementation goes in its own submodule.

#[path = "locale/json_pack_loader.rs"]
pub mod locale;
