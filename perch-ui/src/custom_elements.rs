//! Custom element registration
//!
//! `install` defines two tags with the page's element registry:
//!
//! - `perch-portal`: a thin element class whose lifecycle callbacks and
//!   child-mutation methods call into Rust, where each connected element is
//!   backed by a `PortalElement<WebDom, AnimationFrameScheduler>`. An element
//!   that isn't connected works on its own children, so subtrees and cloned
//!   templates built before connection move into the proxy node on connect.
//! - `perch-portal-target`: the shared container, a plain element.
//!
//! Registration happens once per page and lives as long as the page, so the
//! hook closures are held in thread-local storage and never dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use perch_common::{
    ElementRegistry, PortalConfig, PortalElement, PortalError, RegistryError,
    CONTAINER_TAG, PORTAL_TAG,
};
use tracing::{debug, error, info};
use wasm_bindgen_x::closure::Closure;
use wasm_bindgen_x::{JsCast, JsValue};

use crate::animation_frame::AnimationFrameScheduler;
use crate::web_dom::WebDom;

pub type WebPortal = PortalElement<WebDom, AnimationFrameScheduler>;

/// Property on each portal element holding its key into `PORTALS`
const PORTAL_KEY_PROP: &str = "__perchPortalKey";

/// Counter for portal element keys
static PORTAL_KEY_COUNTER: AtomicU64 = AtomicU64::new(0);

/// The portal element class. Takes the Rust hooks object, returns the class.
const PORTAL_CLASS_SOURCE: &str = r#"
return class extends HTMLElement {
    connectedCallback() { hooks.connected(this); }
    disconnectedCallback() { hooks.disconnected(this); }
    get childNodes() { return hooks.childNodes(this); }
    appendChild(child) { return hooks.appendChild(this, child); }
    insertBefore(node, reference) { return hooks.insertBefore(this, node, reference); }
    removeChild(child) { return hooks.removeChild(this, child); }
    replaceData(offset, count, data) { return hooks.replaceData(this, offset, count, data); }
};
"#;

const CONTAINER_CLASS_SOURCE: &str = "return class extends HTMLElement {};";

type ElementHook = Closure<dyn FnMut(web_sys_x::HtmlElement) -> Result<(), JsValue>>;
type ChildNodesHook =
    Closure<dyn FnMut(web_sys_x::HtmlElement) -> Result<js_sys_x::Array, JsValue>>;
type ChildHook =
    Closure<dyn FnMut(web_sys_x::HtmlElement, web_sys_x::Node) -> Result<web_sys_x::Node, JsValue>>;
type InsertHook = Closure<
    dyn FnMut(web_sys_x::HtmlElement, web_sys_x::Node, JsValue) -> Result<web_sys_x::Node, JsValue>,
>;
type ReplaceDataHook =
    Closure<dyn FnMut(web_sys_x::HtmlElement, u32, u32, String) -> Result<(), JsValue>>;

/// Rust side of the portal element class
struct PortalHooks {
    connected: ElementHook,
    disconnected: ElementHook,
    child_nodes: ChildNodesHook,
    append_child: ChildHook,
    insert_before: InsertHook,
    remove_child: ChildHook,
    replace_data: ReplaceDataHook,
}

/// What every hook needs to build a portal for an element
#[derive(Clone)]
struct HookContext {
    dom: WebDom,
    scheduler: AnimationFrameScheduler,
    container_id: Rc<str>,
}

thread_local! {
    static HOOKS: RefCell<Option<PortalHooks>> = const { RefCell::new(None) };
    static REGISTRY: RefCell<ElementRegistry> = RefCell::new(ElementRegistry::new());
    /// Portals of connected elements
    static PORTALS: RefCell<HashMap<u64, WebPortal>> = RefCell::new(HashMap::new());
}

/// Registry with both tags defined, checked against what is already defined.
fn stage_registry(current: &ElementRegistry) -> Result<ElementRegistry, RegistryError> {
    for tag in [PORTAL_TAG, CONTAINER_TAG] {
        if current.get(tag).is_some() {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
    }
    let mut staged = ElementRegistry::new();
    staged.define_defaults()?;
    Ok(staged)
}

/// Define the portal and container elements with the page's registry.
///
/// Must run once, before any portal element is created. The container with
/// `config.container_id` must be in the document before a dropdown opens.
/// Nothing is recorded unless both elements were defined.
pub fn install(config: &PortalConfig) -> Result<(), RegistryError> {
    config
        .validate()
        .map_err(|e| RegistryError::Host(e.to_string()))?;
    let staged = REGISTRY.with(|registry| stage_registry(&registry.borrow()))?;

    let window = web_sys_x::window().ok_or_else(|| RegistryError::Host("no window".into()))?;
    let elements = window.custom_elements();
    for tag in [PORTAL_TAG, CONTAINER_TAG] {
        if !elements.get(tag).is_undefined() {
            return Err(RegistryError::AlreadyDefined(tag.to_string()));
        }
    }
    let document = window
        .document()
        .ok_or_else(|| RegistryError::Host("no document".into()))?;
    let context = HookContext {
        dom: WebDom::new(document).map_err(|e| RegistryError::Host(e.to_string()))?,
        scheduler: AnimationFrameScheduler::new(window),
        container_id: Rc::from(config.container_id.as_str()),
    };

    let hooks = PortalHooks::new(&context);
    let portal_class = build_class(PORTAL_CLASS_SOURCE, &hooks.to_js()?)?;
    let container_class = build_class(CONTAINER_CLASS_SOURCE, &JsValue::UNDEFINED)?;

    elements
        .define(CONTAINER_TAG, &container_class)
        .map_err(registry_error)?;
    elements
        .define(PORTAL_TAG, &portal_class)
        .map_err(registry_error)?;

    REGISTRY.with(|registry| *registry.borrow_mut() = staged);
    HOOKS.with(|slot| *slot.borrow_mut() = Some(hooks));

    info!(container = %config.container_id, "Portal elements installed");
    Ok(())
}

fn registry_error(err: JsValue) -> RegistryError {
    RegistryError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn build_class(source: &str, hooks: &JsValue) -> Result<js_sys_x::Function, RegistryError> {
    let factory = js_sys_x::Function::new_with_args("hooks", source);
    factory
        .call1(&JsValue::NULL, hooks)
        .map_err(registry_error)?
        .dyn_into::<js_sys_x::Function>()
        .map_err(registry_error)
}

fn portal_error(err: PortalError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Key of a portal element, assigned on first use
fn element_key(element: &web_sys_x::HtmlElement) -> Result<u64, JsValue> {
    if let Some(key) = js_sys_x::Reflect::get(element, &PORTAL_KEY_PROP.into())?.as_f64() {
        return Ok(key as u64);
    }
    let key = PORTAL_KEY_COUNTER.fetch_add(1, Ordering::Relaxed);
    let stored = js_sys_x::Reflect::set(
        element,
        &PORTAL_KEY_PROP.into(),
        &JsValue::from_f64(key as f64),
    )?;
    if !stored {
        return Err(JsValue::from_str("cannot tag portal element with its key"));
    }
    Ok(key)
}

/// Portal backing `element`.
///
/// Connected elements have one in `PORTALS`; any other element gets a
/// detached portal that operates on the element's own children. Returns a
/// handle so no thread-local borrow is held while the DOM is mutated, since
/// moving a nested portal re-enters here.
fn portal_for(
    element: &web_sys_x::HtmlElement,
    context: &HookContext,
) -> Result<(u64, WebPortal), JsValue> {
    let key = element_key(element)?;
    if let Some(portal) = PORTALS.with(|portals| portals.borrow().get(&key).cloned()) {
        return Ok((key, portal));
    }
    let host: web_sys_x::Node = element.clone().into();
    let portal = WebPortal::new(
        context.dom.clone(),
        context.scheduler.clone(),
        host,
        &context.container_id,
    );
    Ok((key, portal))
}

impl PortalHooks {
    fn new(context: &HookContext) -> Self {
        use web_sys_x::{HtmlElement, Node};

        let ctx = context.clone();
        let connected: ElementHook = Closure::wrap(Box::new(
            move |element: HtmlElement| -> Result<(), JsValue> {
                let (key, portal) = portal_for(&element, &ctx)?;
                portal.attach().map_err(|e| {
                    error!("Portal attach failed: {e}");
                    portal_error(e)
                })?;
                PORTALS.with(|portals| portals.borrow_mut().insert(key, portal));
                Ok(())
            },
        ));

        let disconnected: ElementHook = Closure::wrap(Box::new(
            |element: HtmlElement| -> Result<(), JsValue> {
                let key = element_key(&element)?;
                let Some(portal) = PORTALS.with(|portals| portals.borrow_mut().remove(&key))
                else {
                    return Ok(());
                };
                debug!(key, "Portal element disconnected");
                portal.detach().map_err(portal_error)
            },
        ));

        let ctx = context.clone();
        let child_nodes: ChildNodesHook = Closure::wrap(Box::new(
            move |element: HtmlElement| -> Result<js_sys_x::Array, JsValue> {
                let (_, portal) = portal_for(&element, &ctx)?;
                Ok(portal.child_nodes().into_iter().collect())
            },
        ));

        let ctx = context.clone();
        let append_child: ChildHook = Closure::wrap(Box::new(
            move |element: HtmlElement, child: Node| -> Result<Node, JsValue> {
                let (_, portal) = portal_for(&element, &ctx)?;
                portal.append_child(&child).map_err(portal_error)?;
                Ok(child)
            },
        ));

        let ctx = context.clone();
        let insert_before: InsertHook = Closure::wrap(Box::new(
            move |element: HtmlElement, node: Node, reference: JsValue| -> Result<Node, JsValue> {
                let reference = reference.dyn_into::<Node>().ok();
                let (_, portal) = portal_for(&element, &ctx)?;
                portal
                    .insert_before(&node, reference.as_ref())
                    .map_err(portal_error)
            },
        ));

        let ctx = context.clone();
        let remove_child: ChildHook = Closure::wrap(Box::new(
            move |element: HtmlElement, child: Node| -> Result<Node, JsValue> {
                let (_, portal) = portal_for(&element, &ctx)?;
                portal.remove_child(&child).map_err(portal_error)
            },
        ));

        let ctx = context.clone();
        let replace_data: ReplaceDataHook = Closure::wrap(Box::new(
            move |element: HtmlElement,
                  offset: u32,
                  count: u32,
                  data: String|
                  -> Result<(), JsValue> {
                let (_, portal) = portal_for(&element, &ctx)?;
                portal
                    .replace_data(offset, count, &data)
                    .map_err(portal_error)
            },
        ));

        Self {
            connected,
            disconnected,
            child_nodes,
            append_child,
            insert_before,
            remove_child,
            replace_data,
        }
    }

    /// Hooks object handed to the class source
    fn to_js(&self) -> Result<JsValue, RegistryError> {
        let object = js_sys_x::Object::new();
        let entries: [(&str, &JsValue); 7] = [
            ("connected", self.connected.as_ref()),
            ("disconnected", self.disconnected.as_ref()),
            ("childNodes", self.child_nodes.as_ref()),
            ("appendChild", self.append_child.as_ref()),
            ("insertBefore", self.insert_before.as_ref()),
            ("removeChild", self.remove_child.as_ref()),
            ("replaceData", self.replace_data.as_ref()),
        ];
        for (name, hook) in entries {
            js_sys_x::Reflect::set(&object, &name.into(), hook).map_err(registry_error)?;
        }
        Ok(object.into())
    }
}
