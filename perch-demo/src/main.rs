//! perch demo - three menus sharing one dropdown state
//!
//! Open several menus at once; each stays anchored where its trigger was when
//! clicked. The overlays live in the shared portal container, outside the
//! clipped toolbar.

use std::fmt;

use dioxus::prelude::*;
use perch_ui::{
    use_dropdown_state, Dropdown, DropdownPlaceholders, DropdownState, PortalConfig, PortalTarget,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Menu {
    File,
    Edit,
    View,
}

impl Menu {
    const ALL: [Menu; 3] = [Menu::File, Menu::Edit, Menu::View];

    fn label(&self) -> &'static str {
        match self {
            Menu::File => "File",
            Menu::Edit => "Edit",
            Menu::View => "View",
        }
    }

    fn items(&self) -> &'static [&'static str] {
        match self {
            Menu::File => &["New", "Open…", "Save"],
            Menu::Edit => &["Undo", "Redo", "Find"],
            Menu::View => &["Zoom In", "Zoom Out"],
        }
    }
}

impl fmt::Display for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_lowercase())
    }
}

fn main() {
    if let Err(e) = perch_ui::install(&PortalConfig::default()) {
        tracing::error!("Failed to install portal elements: {e}");
    }
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    use_context_provider(PortalConfig::default);
    let mut menus = use_dropdown_state::<Menu>();
    let menus_read: ReadSignal<DropdownState<Menu>> = menus.into();
    let open_count = menus.read().len();

    rsx! {
        PortalTarget {}
        div { style: "overflow: hidden; height: 40px; display: flex; gap: 8px;",
            for menu in Menu::ALL {
                Dropdown {
                    key: "{menu}",
                    trigger_id: menu,
                    state: menus_read,
                    on_toggle: move |msg| menus.write().update(msg),
                    trigger: rsx! { {menu.label()} },
                    ul { style: "background: white; border: 1px solid #ccc; margin: 0; padding: 4px;",
                        for item in menu.items() {
                            li { "{item}" }
                        }
                    }
                }
            }
        }
        p { "{open_count} open" }
        DropdownPlaceholders { keys: Menu::ALL.iter().map(Menu::to_string).collect::<Vec<_>>() }
    }
}
