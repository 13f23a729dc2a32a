//! Browser DOM backend for the portal engine
//!
//! Child mutations go through the native `Node.prototype` and
//! `CharacterData.prototype` functions rather than method lookup, so they
//! reach the real child list even on a `perch-portal` element whose own
//! methods are overridden.

use std::rc::Rc;

use js_sys_x::{Function, Object, Reflect};
use perch_common::{DomError, PortalDom};
use wasm_bindgen_x::{JsCast, JsValue};

/// Native child-list primitives, captured once
#[derive(Debug)]
struct NativeNode {
    append_child: Function,
    insert_before: Function,
    remove_child: Function,
    child_nodes: Function,
    replace_data: Function,
}

fn prototype(constructor: &str) -> Result<JsValue, JsValue> {
    let constructor = Reflect::get(&js_sys_x::global(), &constructor.into())?;
    Reflect::get(&constructor, &"prototype".into())
}

fn function(target: &JsValue, name: &str) -> Result<Function, JsValue> {
    Reflect::get(target, &name.into())?.dyn_into::<Function>()
}

impl NativeNode {
    fn load() -> Result<Self, JsValue> {
        let node = prototype("Node")?;
        let character_data = prototype("CharacterData")?;
        let child_nodes =
            Object::get_own_property_descriptor(node.unchecked_ref(), &"childNodes".into());

        Ok(Self {
            append_child: function(&node, "appendChild")?,
            insert_before: function(&node, "insertBefore")?,
            remove_child: function(&node, "removeChild")?,
            child_nodes: function(&child_nodes, "get")?,
            replace_data: function(&character_data, "replaceData")?,
        })
    }
}

/// Portal DOM operations against a live `Document`
#[derive(Clone, Debug)]
pub struct WebDom {
    document: web_sys_x::Document,
    native: Rc<NativeNode>,
}

impl WebDom {
    pub fn new(document: web_sys_x::Document) -> Result<Self, DomError> {
        let native = NativeNode::load().map_err(host_error)?;
        Ok(Self {
            document,
            native: Rc::new(native),
        })
    }
}

pub(crate) fn host_error(err: JsValue) -> DomError {
    DomError::Host(err.as_string().unwrap_or_else(|| format!("{err:?}")))
}

fn into_node(value: Result<JsValue, JsValue>) -> Result<web_sys_x::Node, DomError> {
    value
        .and_then(|v| v.dyn_into::<web_sys_x::Node>())
        .map_err(host_error)
}

impl PortalDom for WebDom {
    type Node = web_sys_x::Node;

    fn element_by_id(&self, id: &str) -> Option<web_sys_x::Node> {
        self.document.get_element_by_id(id).map(Into::into)
    }

    fn create_proxy(&self) -> Result<web_sys_x::Node, DomError> {
        self.document
            .create_element("div")
            .map(Into::into)
            .map_err(host_error)
    }

    fn append_child(
        &self,
        parent: &web_sys_x::Node,
        child: &web_sys_x::Node,
    ) -> Result<web_sys_x::Node, DomError> {
        into_node(self.native.append_child.call1(parent, child))
    }

    fn insert_before(
        &self,
        parent: &web_sys_x::Node,
        new: &web_sys_x::Node,
        reference: Option<&web_sys_x::Node>,
    ) -> Result<web_sys_x::Node, DomError> {
        let reference: &JsValue = match reference {
            Some(node) => node.as_ref(),
            None => &JsValue::NULL,
        };
        into_node(self.native.insert_before.call2(parent, new, reference))
    }

    fn remove_child(
        &self,
        parent: &web_sys_x::Node,
        child: &web_sys_x::Node,
    ) -> Result<web_sys_x::Node, DomError> {
        into_node(self.native.remove_child.call1(parent, child))
    }

    fn child_nodes(&self, parent: &web_sys_x::Node) -> Vec<web_sys_x::Node> {
        let Ok(list) = self
            .native
            .child_nodes
            .call0(parent)
            .and_then(|v| v.dyn_into::<web_sys_x::NodeList>())
        else {
            return Vec::new();
        };
        (0..list.length()).filter_map(|i| list.item(i)).collect()
    }

    fn replace_data(
        &self,
        node: &web_sys_x::Node,
        offset: u32,
        count: u32,
        data: &str,
    ) -> Result<(), DomError> {
        self.native
            .replace_data
            .call3(node, &offset.into(), &count.into(), &data.into())
            .map(|_| ())
            .map_err(host_error)
    }
}
