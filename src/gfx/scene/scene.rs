use cgmath::{Matrix4, SquareMatrix, Vector3, Vector4};

use super::node::{Light, MeshNode, NodeId, NodeKind, NodeTransform, SceneNode};
use crate::gfx::picking::Aabb;

/// Scene graph stored as an arena of nodes
///
/// The scene owns every node; everything else refers to nodes through
/// [`NodeId`] handles. Removing a node removes its whole subtree.
#[derive(Debug, Default)]
pub struct Scene {
    nodes: Vec<Option<SceneNode>>,
    roots: Vec<NodeId>,
}

/// A visible mesh node with its resolved world matrix
pub struct RenderItem<'a> {
    pub id: NodeId,
    pub world: Matrix4<f32>,
    pub mesh: &'a MeshNode,
}

/// An active light with its world placement
pub struct PlacedLight {
    pub id: NodeId,
    pub light: Light,
    pub position: Vector3<f32>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `node` under `parent` (or as a root) and returns its handle
    ///
    /// A stale parent id makes the node a root.
    pub fn add(&mut self, parent: Option<NodeId>, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = parent.filter(|p| self.contains(*p));
        node.parent = parent;
        node.children.clear();
        self.nodes.push(Some(node));

        match parent.and_then(|p| self.nodes[p.index()].as_mut()) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    pub fn add_group(&mut self, parent: Option<NodeId>, name: &str, transform: NodeTransform) -> NodeId {
        self.add(parent, SceneNode::group(name).with_transform(transform))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.nodes.get(id.index()), Some(Some(_)))
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|(_, n)| n.name == name).map(|(id, _)| id)
    }

    pub fn set_transform(&mut self, id: NodeId, transform: NodeTransform) -> bool {
        match self.get_mut(id) {
            Some(node) => {
                node.transform = transform;
                true
            }
            None => false,
        }
    }

    /// `id` and everything below it, parents before children
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if !self.contains(id) {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.get(current) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Removes `id` and its descendants; returns how many nodes went away
    pub fn remove_subtree(&mut self, id: NodeId) -> usize {
        let doomed = self.subtree(id);
        if doomed.is_empty() {
            return 0;
        }

        match self.get(id).and_then(|n| n.parent) {
            Some(parent) => {
                if let Some(parent_node) = self.get_mut(parent) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        for node in &doomed {
            self.nodes[node.index()] = None;
        }
        doomed.len()
    }

    /// Removes every child subtree of `id`, keeping `id` itself
    pub fn clear_children(&mut self, id: NodeId) -> usize {
        let children = self.get(id).map(|n| n.children.clone()).unwrap_or_default();
        children.into_iter().map(|c| self.remove_subtree(c)).sum()
    }

    /// Product of the local matrices from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Option<Matrix4<f32>> {
        let mut node = self.get(id)?;
        let mut matrix = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.get(parent)?;
            matrix = node.transform.matrix() * matrix;
        }
        Some(matrix)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vector3<f32>> {
        let m = self.world_matrix(id)?;
        Some(Vector3::new(m.w.x, m.w.y, m.w.z))
    }

    /// Whether `id` and all its ancestors are visible
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            match self.get(node_id) {
                Some(node) if node.visible => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// World-space bounds of every mesh below `id`
    pub fn subtree_bounds(&self, id: NodeId) -> Option<Aabb> {
        self.subtree(id)
            .into_iter()
            .filter(|n| self.is_visible(*n))
            .filter_map(|n| {
                let local = self.get(n)?.as_mesh()?.mesh.bounds()?;
                Some(local.transform(&self.world_matrix(n)?))
            })
            .reduce(|a, b| a.union(&b))
    }

    /// Visible mesh nodes with their world matrices
    pub fn render_items(&self) -> Vec<RenderItem<'_>> {
        let mut items = Vec::new();
        let mut stack: Vec<(NodeId, Matrix4<f32>)> = self
            .roots
            .iter()
            .rev()
            .map(|r| (*r, Matrix4::identity()))
            .collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(node) = self.get(id) else { continue };
            if !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            if let NodeKind::Mesh(mesh) = &node.kind {
                if !mesh.mesh.is_empty() {
                    items.push(RenderItem { id, world, mesh });
                }
            }
            stack.extend(node.children.iter().rev().map(|c| (*c, world)));
        }
        items
    }

    /// Visible lights with their world positions
    pub fn lights(&self) -> Vec<PlacedLight> {
        self.iter()
            .filter(|(id, _)| self.is_visible(*id))
            .filter_map(|(id, node)| {
                let light = *node.as_light()?;
                let world = self.world_matrix(id)?;
                let position = world * Vector4::new(0.0, 0.0, 0.0, 1.0);
                Some(PlacedLight {
                    id,
                    light,
                    position: position.truncate(),
                })
            })
            .collect()
    }
}
