//! Dropdown and portal components

pub mod dropdown;
pub mod portal_target;

pub use dropdown::{use_dropdown_state, Dropdown};
pub use portal_target::{use_portal_config, DropdownPlaceholders, PortalTarget};
