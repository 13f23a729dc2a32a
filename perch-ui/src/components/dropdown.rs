//! Dropdown rendered through a portal
//!
//! The trigger stays in normal flow. When open, the content is rendered
//! inside a `perch-portal` element, which moves it into the shared container,
//! and placed with fixed positioning at the anchor captured on click.
//!
//! ```ignore
//! let mut menus = use_dropdown_state::<MenuId>();
//! let menus_read: ReadSignal<DropdownState<MenuId>> = menus.into();
//! rsx! {
//!     Dropdown {
//!         trigger_id: MenuId::File,
//!         state: menus_read,
//!         on_toggle: move |msg| menus.write().update(msg),
//!         trigger: rsx! { "File" },
//!         MenuItems {}
//!     }
//! }
//! ```

use std::hash::Hash;
use std::rc::Rc;

use dioxus::prelude::*;
use perch_common::{click_message, overlay_style, BoundingRect, DropdownMsg, DropdownState};

/// Hook holding the open dropdowns of one UI tree, empty at first render
pub fn use_dropdown_state<K>() -> Signal<DropdownState<K>>
where
    K: Clone + Eq + Hash + 'static,
{
    use_signal(DropdownState::new)
}

/// Read the element's bounding box as it is right now.
fn live_rect(mounted: &MountedData) -> Option<BoundingRect> {
    let element = mounted.downcast::<web_sys_x::Element>()?;
    let rect = element.get_bounding_client_rect();
    Some(BoundingRect {
        left: rect.left(),
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
    })
}

/// Trigger plus, when open, portal-rendered content
#[component]
pub fn Dropdown<K: Clone + PartialEq + Eq + Hash + 'static>(
    /// Identity of this dropdown; unique among rendered dropdowns
    trigger_id: K,
    /// Open dropdowns, shared by every dropdown keyed from the same state
    state: ReadSignal<DropdownState<K>>,
    /// Receives `Open`/`Close` for this dropdown's key
    on_toggle: EventHandler<DropdownMsg<K>>,
    /// Always-visible trigger content
    trigger: Element,
    /// Overlay content
    children: Element,
    #[props(default)]
    class: Option<String>,
) -> Element {
    let mut trigger_ref: Signal<Option<Rc<MountedData>>> = use_signal(|| None);

    let position = state.read().position(&trigger_id);
    let is_open = position.is_some();
    let trigger_class = class.unwrap_or_default();

    let overlay = position.map(|position| {
        let style = overlay_style(position);
        rsx! {
            perch-portal {
                div { style: "{style}", {children} }
            }
        }
    });

    rsx! {
        button {
            class: "{trigger_class}",
            onmounted: move |evt: MountedEvent| trigger_ref.set(Some(evt.data())),
            onclick: move |_| {
                let rect = if is_open {
                    None
                } else {
                    trigger_ref.peek().as_deref().and_then(live_rect)
                };
                if let Some(msg) = click_message(trigger_id.clone(), is_open, rect) {
                    on_toggle.call(msg);
                }
            },
            {trigger}
            {overlay}
        }
    }
}
