//! Shared portal container and placeholder scaffolding

use dioxus::prelude::*;
use perch_common::{placeholder_ids, PortalConfig};

/// Portal config from context, or the default when none is provided
pub fn use_portal_config() -> PortalConfig {
    try_use_context::<PortalConfig>().unwrap_or_default()
}

/// The shared container every portal appends its proxy node to.
///
/// Render once per page, ahead of any dropdown that may be open on first
/// render. Alternatively put the element in the page's base markup.
#[component]
pub fn PortalTarget() -> Element {
    let container_id = use_portal_config().container_id;

    rsx! {
        perch-portal-target { "id": "{container_id}" }
    }
}

/// Empty anchor elements, one per key, with ids `{prefix}{key}`.
///
/// For callers that need a pre-existing node per dropdown. Stateless.
#[component]
pub fn DropdownPlaceholders(keys: Vec<String>) -> Element {
    let config = use_portal_config();
    let ids = placeholder_ids(&config.placeholder_prefix, &keys);

    rsx! {
        div {
            for id in ids {
                div { key: "{id}", id: "{id}" }
            }
        }
    }
}
