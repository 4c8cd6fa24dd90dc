// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Retained node tree for the table.
//!
//! Nodes live in an arena keyed by [`NodeId`]. Each [`Region`] has a fixed root
//! node; everything else hangs below one of them. Ids are issued from a
//! counter and never reused, so a stale id simply stops resolving once its
//! node is detached.

use std::collections::BTreeMap;

use thousand_proto::Card;
use thousand_scene_port::{Content, Frame, NodeId, Region, Sprite, Tint, Transform};

/// Game meaning attached to a node, used to find it again after a rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// A resting card in a derived region.
    Card(Card),
    /// A transient sprite carrying a card between regions.
    InFlight(Card),
}

/// One element of the scene.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Transform relative to the parent.
    pub transform: Transform,
    /// What the node draws.
    pub content: Content,
    /// Emphasis.
    pub tint: Tint,
    /// Hidden nodes (and their subtrees) are skipped when flattening.
    pub visible: bool,
    /// Optional game tag.
    pub tag: Option<NodeTag>,
    region: Region,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(region: Region, parent: Option<NodeId>, transform: Transform, content: Content) -> Self {
        Self {
            transform,
            content,
            tint: Tint::Normal,
            visible: true,
            tag: None,
            region,
            parent,
            children: Vec::new(),
        }
    }

    /// Region this node belongs to.
    pub fn region(&self) -> Region {
        self.region
    }

    /// Parent node, `None` only for region roots.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in draw order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed scene graph.
#[derive(Debug)]
pub struct SceneGraph {
    nodes: BTreeMap<NodeId, Node>,
    roots: BTreeMap<Region, NodeId>,
    next_id: u64,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Empty scene with one root per region.
    pub fn new() -> Self {
        let mut scene = Self {
            nodes: BTreeMap::new(),
            roots: BTreeMap::new(),
            next_id: 0,
        };
        for region in Region::ALL {
            let id = scene.issue();
            scene.nodes.insert(
                id,
                Node::new(region, None, Transform::IDENTITY, Content::Empty),
            );
            scene.roots.insert(region, id);
        }
        scene
    }

    fn issue(&mut self) -> NodeId {
        self.next_id += 1;
        NodeId(self.next_id)
    }

    fn root(&self, region: Region) -> NodeId {
        self.roots.get(&region).copied().unwrap_or(NodeId(0))
    }

    fn insert_under(
        &mut self,
        parent: NodeId,
        region: Region,
        transform: Transform,
        content: Content,
    ) -> NodeId {
        let id = self.issue();
        self.nodes
            .insert(id, Node::new(region, Some(parent), transform, content));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        id
    }

    /// Add a node under a region root.
    pub fn spawn(&mut self, region: Region, transform: Transform, content: Content) -> NodeId {
        let parent = self.root(region);
        self.insert_under(parent, region, transform, content)
    }

    /// Add a node under `parent`. Returns `None` if the parent is gone.
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        transform: Transform,
        content: Content,
    ) -> Option<NodeId> {
        let region = self.nodes.get(&parent)?.region;
        Some(self.insert_under(parent, region, transform, content))
    }

    /// Look up a node.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node access.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Whether the id still resolves.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Total live nodes, region roots included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: region roots are permanent.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Direct children of a region root.
    pub fn region_children(&self, region: Region) -> &[NodeId] {
        self.nodes
            .get(&self.root(region))
            .map(|n| n.children.as_slice())
            .unwrap_or_default()
    }

    /// First direct child of `region` carrying `tag`.
    pub fn find_tagged(&self, region: Region, tag: NodeTag) -> Option<NodeId> {
        self.region_children(region)
            .iter()
            .copied()
            .find(|id| self.nodes.get(id).and_then(|n| n.tag) == Some(tag))
    }

    /// Remove a node and its subtree. Region roots cannot be detached.
    pub fn detach(&mut self, id: NodeId) -> bool {
        let Some(node) = self.nodes.get(&id) else {
            return false;
        };
        let Some(parent) = node.parent else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(removed) = self.nodes.remove(&next) {
                stack.extend(removed.children);
            }
        }
        true
    }

    /// Remove every child of a region.
    pub fn clear_region(&mut self, region: Region) {
        let children = self.region_children(region).to_vec();
        for child in children {
            self.detach(child);
        }
    }

    /// Remove every non-root node.
    pub fn clear(&mut self) {
        for region in Region::ALL {
            self.clear_region(region);
        }
    }

    /// Move a top-level node (and subtree) under another region's root.
    /// The local transform is kept; region roots sit at the origin.
    pub fn reparent(&mut self, id: NodeId, region: Region) -> bool {
        let new_parent = self.root(region);
        let Some(old_parent) = self.nodes.get(&id).and_then(|n| n.parent) else {
            return false;
        };
        if let Some(p) = self.nodes.get_mut(&old_parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(p) = self.nodes.get_mut(&new_parent) {
            p.children.push(id);
        }
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.get_mut(&next) {
                node.region = region;
                stack.extend(node.children.iter().copied());
            }
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            node.parent = Some(new_parent);
        }
        true
    }

    /// Flatten visible nodes with content into world-space sprites,
    /// regions back to front, depth first.
    pub fn flatten(&self, width: u32, height: u32) -> Frame {
        let mut sprites = Vec::new();
        for region in Region::ALL {
            let mut stack = vec![(self.root(region), Transform::IDENTITY)];
            while let Some((id, parent_world)) = stack.pop() {
                let Some(node) = self.nodes.get(&id) else {
                    continue;
                };
                if !node.visible {
                    continue;
                }
                let world = parent_world.then(&node.transform);
                if node.content != Content::Empty {
                    sprites.push(Sprite {
                        node: id,
                        region,
                        transform: world,
                        content: node.content.clone(),
                        tint: node.tint,
                    });
                }
                stack.extend(node.children.iter().rev().map(|c| (*c, world)));
            }
        }
        Frame {
            width,
            height,
            sprites,
        }
    }
}
