use perch_common::{
    click_message, BoundingRect, DropdownState, FrameQueue, MemoryDom, NodeId, PortalConfig,
    PortalDom, PortalElement, PortalError, CONTAINER_TAG,
    PORTAL_TAG,
};

/// Shape of a subtree as (tag or text) pairs, depth-first
fn structure(dom: &MemoryDom, root: NodeId) -> Vec<String> {
    let mut out = Vec::new();
    for child in dom.child_nodes(&root) {
        match dom.text(child) {
            Some(text) => out.push(format!("#text:{text}")),
            None => {
                out.push(format!("<{}>", dom.tag(child).unwrap_or_default()));
                out.extend(structure(dom, child));
                out.push("</>".to_string());
            }
        }
    }
    out
}

struct Fixture {
    dom: MemoryDom,
    frames: FrameQueue,
    container: NodeId,
    config: PortalConfig,
}

impl Fixture {
    fn new() -> Self {
        let config = PortalConfig::default();
        let dom = MemoryDom::new();
        let container = dom.provision(CONTAINER_TAG, &config.container_id);
        Self {
            dom,
            frames: FrameQueue::new(),
            container,
            config,
        }
    }

    fn portal(&self) -> PortalElement<MemoryDom, FrameQueue> {
        PortalElement::new(
            self.dom.clone(),
            self.frames.clone(),
            self.dom.create_element(PORTAL_TAG),
            &self.config.container_id,
        )
    }
}

#[test]
fn test_forwarded_ops_match_plain_container() {
    let fx = Fixture::new();
    let portal = fx.portal();
    portal.attach().unwrap();
    let plain = fx.dom.create_element("div");

    // Same starting children in both
    let mut portal_nodes = Vec::new();
    let mut plain_nodes = Vec::new();
    for label in ["one", "two", "three"] {
        let a = fx.dom.create_text(label);
        let b = fx.dom.create_text(label);
        portal.insert_before(&a, None).unwrap();
        fx.dom.insert_before(&plain, &b, None).unwrap();
        portal_nodes.push(a);
        plain_nodes.push(b);
    }

    let proxy = portal.proxy().unwrap();
    assert_eq!(structure(&fx.dom, proxy), structure(&fx.dom, plain));

    let a = fx.dom.create_element("span");
    let b = fx.dom.create_element("span");
    portal.insert_before(&a, Some(&portal_nodes[1])).unwrap();
    fx.dom.insert_before(&plain, &b, Some(&plain_nodes[1])).unwrap();

    portal.remove_child(&portal_nodes[0]).unwrap();
    fx.dom.remove_child(&plain, &plain_nodes[0]).unwrap();

    fx.dom.replace_data(&portal_nodes[2], 0, 5, "3").unwrap();
    fx.dom.replace_data(&plain_nodes[2], 0, 5, "3").unwrap();

    let plain_result: Result<(), PortalError> =
        fx.dom.replace_data(&plain, 0, 0, "x").map_err(Into::into);
    assert_eq!(portal.replace_data(0, 0, "x"), plain_result);

    assert_eq!(structure(&fx.dom, proxy), structure(&fx.dom, plain));
    assert_eq!(
        structure(&fx.dom, proxy),
        vec!["<span>", "</>", "#text:two", "#text:3"]
    );
}

#[test]
fn test_child_nodes_reads_proxy() {
    let fx = Fixture::new();
    let portal = fx.portal();
    portal.attach().unwrap();
    let node = fx.dom.create_text("hello");
    portal.insert_before(&node, None).unwrap();
    assert_eq!(portal.child_nodes(), vec![node]);
    assert_eq!(fx.dom.parent(node), portal.proxy());
    assert!(fx.dom.is_connected(node));
}

#[test]
fn test_reattach_leaves_one_proxy() {
    let fx = Fixture::new();
    let portal = fx.portal();
    portal.attach().unwrap();
    portal.detach().unwrap();
    portal.attach().unwrap();
    assert_eq!(fx.dom.child_nodes(&fx.container).len(), 1);
    portal.detach().unwrap();
    assert!(fx.dom.child_nodes(&fx.container).is_empty());
}

#[test]
fn test_appends_land_after_one_frame_in_order() {
    let fx = Fixture::new();
    let portal = fx.portal();
    portal.attach().unwrap();
    let first = fx.dom.create_text("a");
    let second = fx.dom.create_text("b");
    portal.append_child(&first).unwrap();
    portal.append_child(&second).unwrap();
    assert!(portal.child_nodes().is_empty());
    assert_eq!(fx.frames.run_frame(), 2);
    assert_eq!(portal.child_nodes(), vec![first, second]);
    assert_eq!(fx.dom.text_content(fx.container), "ab");
}

#[test]
fn test_dropdown_opens_into_portal() {
    let fx = Fixture::new();
    let mut state: DropdownState<&str> = DropdownState::new();
    let trigger = BoundingRect {
        left: 120.5,
        top: 28.0,
        right: 200.0,
        bottom: 48.0,
    };

    let msg = click_message("menu", state.is_open(&"menu"), Some(trigger)).unwrap();
    state.update(msg);
    let position = state.position(&"menu").unwrap();
    assert_eq!((position.x, position.y), (120.5, 48.0));

    // An open dropdown renders its overlay through a portal
    let portal = fx.portal();
    portal.attach().unwrap();
    let overlay = fx.dom.create_element("div");
    fx.dom
        .append_child(&overlay, &fx.dom.create_text("menu items"))
        .unwrap();
    portal.append_child(&overlay).unwrap();
    fx.frames.run_frame();
    assert_eq!(fx.dom.text_content(fx.container), "menu items");

    let msg = click_message("menu", state.is_open(&"menu"), None).unwrap();
    state.update(msg);
    assert!(!state.is_open(&"menu"));
    portal.detach().unwrap();
    assert_eq!(fx.dom.text_content(fx.container), "");
}

/// Copy of `node`'s subtree, the way a renderer instantiates a template
fn deep_clone(dom: &MemoryDom, node: NodeId) -> NodeId {
    let copy = match (dom.text(node), dom.tag(node)) {
        (Some(text), _) => dom.create_text(&text),
        (None, tag) => dom.create_element(&tag.unwrap_or_default()),
    };
    for child in dom.child_nodes(&node) {
        let child_copy = deep_clone(dom, child);
        dom.append_child(&copy, &child_copy).unwrap();
    }
    copy
}

#[test]
fn test_cloned_template_content_reaches_container() {
    let fx = Fixture::new();

    // Template built once on a portal that never connects
    let template = fx.portal();
    let overlay = fx.dom.create_element("div");
    fx.dom
        .append_child(&overlay, &fx.dom.create_text("menu items"))
        .unwrap();
    template.append_child(&overlay).unwrap();
    assert_eq!(template.child_nodes(), vec![overlay]);
    assert_eq!(fx.frames.pending(), 0);

    // Instance cloned from the template, then connected
    let host = deep_clone(&fx.dom, *template.host());
    let instance = PortalElement::new(
        fx.dom.clone(),
        fx.frames.clone(),
        host,
        &fx.config.container_id,
    );
    assert_eq!(instance.child_nodes().len(), 1);
    instance.attach().unwrap();

    assert_eq!(fx.dom.text_content(fx.container), "menu items");
    assert!(fx.dom.child_nodes(&host).is_empty());
    assert_eq!(
        structure(&fx.dom, *template.host()),
        structure(&fx.dom, instance.proxy().unwrap())
    );
}
