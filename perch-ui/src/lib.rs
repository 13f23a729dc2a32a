//! perch-ui - Dioxus components and browser backends for perch
//!
//! Contains the `Dropdown` view, the shared `PortalTarget` container, and the
//! `web-sys` implementations of the portal's DOM and frame seams.

pub mod animation_frame;
pub mod components;
pub mod custom_elements;
pub mod web_dom;

pub use animation_frame::AnimationFrameScheduler;
pub use components::*;
pub use custom_elements::{install, WebPortal};
pub use web_dom::WebDom;

pub use perch_common::{DropdownMsg, DropdownState, PortalConfig, Position};
