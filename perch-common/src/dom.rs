//! Child-mutation capability the portal engine runs on
//!
//! The two implementations are `MemoryDom` here and `WebDom` in perch-ui.
//! Every method mirrors the DOM primitive of the same name, including which
//! node it returns.

use std::fmt::Debug;

use crate::error::DomError;

pub trait PortalDom: Clone + 'static {
    /// Handle to a node. Equality is node identity.
    type Node: Clone + PartialEq + Debug + 'static;

    /// Connected element with the given `id`, if any.
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Fresh, unattached element to receive a portal's children.
    fn create_proxy(&self) -> Result<Self::Node, DomError>;

    fn append_child(&self, parent: &Self::Node, child: &Self::Node)
        -> Result<Self::Node, DomError>;

    /// Insert `new` before `reference`, or at the end when `reference` is `None`.
    fn insert_before(
        &self,
        parent: &Self::Node,
        new: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<Self::Node, DomError>;

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node)
        -> Result<Self::Node, DomError>;

    fn child_nodes(&self, parent: &Self::Node) -> Vec<Self::Node>;

    /// Replace `count` UTF-16 units of character data starting at `offset`.
    fn replace_data(
        &self,
        node: &Self::Node,
        offset: u32,
        count: u32,
        data: &str,
    ) -> Result<(), DomError>;
}
