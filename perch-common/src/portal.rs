//! Portal element engine
//!
//! A portal presents itself to its rendering tree as an ordinary container
//! while its children physically live in a proxy node appended to the shared
//! container. While attached, all child mutations are forwarded to the proxy
//! node; appends are deferred to the next frame so they never land in the
//! middle of the renderer's own commit, while insert, remove and replace stay
//! synchronous.
//!
//! While detached the portal behaves as a plain element: operations target
//! its own host node. Renderers build subtrees (and clone templates) before
//! connecting them, so on attach the host's children move into the proxy,
//! and on detach they move back.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::dom::PortalDom;
use crate::error::PortalError;
use crate::frame::FrameScheduler;

struct Attachment<N> {
    container: N,
    proxy: N,
}

/// One portal instance. Clones are handles to the same portal.
pub struct PortalElement<D: PortalDom, S: FrameScheduler> {
    dom: D,
    scheduler: S,
    host: D::Node,
    container_id: Rc<str>,
    attachment: Rc<RefCell<Option<Attachment<D::Node>>>>,
}

impl<D: PortalDom, S: FrameScheduler> Clone for PortalElement<D, S> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            scheduler: self.scheduler.clone(),
            host: self.host.clone(),
            container_id: self.container_id.clone(),
            attachment: self.attachment.clone(),
        }
    }
}

impl<D: PortalDom, S: FrameScheduler> PortalElement<D, S> {
    /// Portal for the element `host`, targeting the container `container_id`.
    pub fn new(dom: D, scheduler: S, host: D::Node, container_id: &str) -> Self {
        Self {
            dom,
            scheduler,
            host,
            container_id: Rc::from(container_id),
            attachment: Rc::new(RefCell::new(None)),
        }
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// The portal element's own node
    pub fn host(&self) -> &D::Node {
        &self.host
    }

    pub fn is_attached(&self) -> bool {
        self.attachment.borrow().is_some()
    }

    /// The proxy node in the shared container, while attached
    pub fn proxy(&self) -> Option<D::Node> {
        self.attachment.borrow().as_ref().map(|a| a.proxy.clone())
    }

    /// The node currently receiving this portal's children
    fn target(&self) -> D::Node {
        self.proxy().unwrap_or_else(|| self.host.clone())
    }

    fn move_children(&self, from: &D::Node, to: &D::Node) -> Result<(), PortalError> {
        for child in self.dom.child_nodes(from) {
            self.dom.append_child(to, &child)?;
        }
        Ok(())
    }

    /// Create a proxy node, append it as the container's last child, and move
    /// the host's children into it.
    ///
    /// The container must already be in the document.
    pub fn attach(&self) -> Result<(), PortalError> {
        if self.is_attached() {
            return Err(PortalError::AlreadyAttached);
        }
        let container = self.dom.element_by_id(&self.container_id).ok_or_else(|| {
            PortalError::ContainerMissing {
                id: self.container_id.to_string(),
            }
        })?;
        let proxy = self.dom.create_proxy()?;
        self.dom.append_child(&container, &proxy)?;
        *self.attachment.borrow_mut() = Some(Attachment {
            container,
            proxy: proxy.clone(),
        });
        self.move_children(&self.host, &proxy)?;
        debug!(container = %self.container_id, "Portal attached");
        Ok(())
    }

    /// Move the proxy's children back to the host and remove the proxy from
    /// the container. No-op when detached.
    pub fn detach(&self) -> Result<(), PortalError> {
        let Some(Attachment { container, proxy }) = self.attachment.borrow_mut().take() else {
            return Ok(());
        };
        self.move_children(&proxy, &self.host)?;
        self.dom.remove_child(&container, &proxy)?;
        debug!(container = %self.container_id, "Portal detached");
        Ok(())
    }

    /// Children of the proxy node while attached, the host's otherwise.
    pub fn child_nodes(&self) -> Vec<D::Node> {
        self.dom.child_nodes(&self.target())
    }

    pub fn insert_before(
        &self,
        new: &D::Node,
        reference: Option<&D::Node>,
    ) -> Result<D::Node, PortalError> {
        Ok(self.dom.insert_before(&self.target(), new, reference)?)
    }

    pub fn remove_child(&self, child: &D::Node) -> Result<D::Node, PortalError> {
        Ok(self.dom.remove_child(&self.target(), child)?)
    }

    pub fn replace_data(&self, offset: u32, count: u32, data: &str) -> Result<(), PortalError> {
        Ok(self
            .dom
            .replace_data(&self.target(), offset, count, data)?)
    }

    /// Append `child`.
    ///
    /// While attached the append is deferred to the next frame and lands in
    /// whichever node is the target when the frame runs. While detached it
    /// is applied to the host immediately.
    pub fn append_child(&self, child: &D::Node) -> Result<(), PortalError> {
        if !self.is_attached() {
            self.dom.append_child(&self.host, child)?;
            return Ok(());
        }
        let portal = self.clone();
        let child = child.clone();
        self.scheduler.request_frame(Box::new(move || {
            if let Err(e) = portal.dom.append_child(&portal.target(), &child) {
                warn!("Deferred portal append failed: {e}");
            }
        }));
        Ok(())
    }
}
