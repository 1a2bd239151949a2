
use msb_api::Result;
use msb_core::collections::HashSet;

use crate::object::{Hub, Uuid};
use crate::playable::Playable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Node {
    pub uuid: Uuid,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
}

/// Snapshot of a container and everything below it.
///
/// Nodes are stored in pre-order, so `nodes()` doubles as the flattened tree.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Builds the tree below a soundboard or group.
    pub fn build(hub: &Hub, root: Uuid) -> Result<Tree> {
        hub.container(root)?;

        let mut tree = Tree { nodes: Vec::new() };
        tree.add_subtree(hub, root, None);
        Ok(tree)
    }

    /// Builds a tree of every soundboard below a synthetic root with the nil uuid.
    pub fn build_all(hub: &Hub) -> Tree {
        let mut tree = Tree {
            nodes: vec![Node {
                uuid: Uuid::nil(),
                parent: None,
                children: Vec::new(),
            }],
        };

        for &soundboard in &hub.soundboard_order {
            tree.add_subtree(hub, soundboard, Some(tree.root()));
        }

        tree
    }

    fn add_subtree(&mut self, hub: &Hub, uuid: Uuid, parent: Option<NodeId>) {
        let mut stack = vec![(uuid, parent)];

        while let Some((uuid, parent)) = stack.pop() {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                uuid,
                parent,
                children: Vec::new(),
            });

            if let Some(parent) = parent {
                self.nodes[parent.0].children.push(id);
            }

            let children = match hub.container(uuid) {
                Ok(container) => container.children(),
                Err(_) => &[][..],
            };

            stack.extend(
                children
                    .iter()
                    .rev()
                    .filter(|&&child| hub.playables.has(child))
                    .map(|&child| (child, Some(id))),
            );
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn find(&self, uuid: Uuid) -> Option<NodeId> {
        self.nodes.iter().position(|v| v.uuid == uuid).map(NodeId)
    }

    /// The node itself followed by its ancestors, ending at the root.
    pub fn hierarchy(&self, id: NodeId) -> Hierarchy<'_> {
        Hierarchy {
            tree: self,
            next: Some(id),
        }
    }

    /// The node and all of its descendants in pre-order.
    pub fn flat_children(&self, id: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![id];

        while let Some(id) = stack.pop() {
            result.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }

        result
    }

    /// Uuids of every node that is, or is an ancestor of, a node in `uuids`.
    pub fn ancestor_closure(&self, uuids: &[Uuid]) -> HashSet<Uuid> {
        let wanted = uuids.iter().copied().collect::<HashSet<_>>();
        let mut closure = HashSet::default();

        for (index, node) in self.nodes.iter().enumerate() {
            if !wanted.contains(&node.uuid) {
                continue;
            }

            for id in self.hierarchy(NodeId(index)) {
                if !closure.insert(self.node(id).uuid) {
                    break;
                }
            }
        }

        closure
    }

    /// Sounds in the tree, pre-order.
    pub fn sounds<'a>(&'a self, hub: &'a Hub) -> impl Iterator<Item = Uuid> + 'a {
        self.nodes
            .iter()
            .map(|node| node.uuid)
            .filter(|&uuid| matches!(hub.playables.get(uuid), Some(Playable::Sound(_))))
    }
}

pub struct Hierarchy<'a> {
    tree: &'a Tree,
    next: Option<NodeId>,
}

impl Iterator for Hierarchy<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.next?;
        self.next = self.tree.node(id).parent;
        Some(id)
    }
}
