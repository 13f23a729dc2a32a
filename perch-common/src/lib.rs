//! perch-common - Renderer-independent logic for perch
//!
//! Contains the dropdown state machine and the portal engine, plus the DOM
//! and frame-scheduling seams they run on. Browser backends live in perch-ui.

pub mod config;
pub mod dom;
pub mod dropdown;
pub mod error;
pub mod frame;
pub mod memory_dom;
pub mod portal;
pub mod registry;

pub use config::PortalConfig;
pub use dom::PortalDom;
pub use dropdown::{
    click_message, overlay_style, placeholder_id, placeholder_ids, BoundingRect, DropdownMsg,
    DropdownState, Position,
};
pub use error::{ConfigError, DomError, PortalError, RegistryError};
pub use frame::{FrameQueue, FrameScheduler};
pub use memory_dom::{MemoryDom, NodeId};
pub use portal::PortalElement;
pub use registry::{
    is_valid_custom_element_name, ElementKind, ElementRegistry, CONTAINER_TAG, PORTAL_TAG,
};
