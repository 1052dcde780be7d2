//! Reference-preserving structural edits.
//!
//! [`ModelModifier`] wraps a [`Model`] and exposes the edits that touch more
//! than one table: the hierarchy plus skins, animations and the avatar
//! extension. Editing the tables directly is allowed, but consistency is then
//! the caller's problem.
//!
//! Every operation validates its preconditions before writing anything, so an
//! `Err` leaves the model untouched.
//!
//! Spring-bone and collider node references live outside [`Model`] and are
//! not retargeted by [`ModelModifier::replace_node`]. Callers carrying such
//! data must rewrite it themselves.

use crate::errors::{GraphError, Result};
use crate::model::{MaterialKey, MeshGroupKey, Model, NodeHandle};

pub struct ModelModifier<'a> {
    model: &'a mut Model,
}

impl<'a> ModelModifier<'a> {
    pub fn new(model: &'a mut Model) -> Self {
        Self { model }
    }

    #[inline]
    #[must_use]
    pub fn model(&self) -> &Model {
        self.model
    }

    // ========================================================================
    // Mesh
    // ========================================================================

    /// Replaces a mesh group.
    ///
    /// - `src = None, dst = Some` adds `dst`
    /// - `src = Some, dst = None` removes `src` and clears node references
    /// - both set: swap ownership and repoint nodes
    ///
    /// An unused or stale `src` is not an error.
    pub fn replace_mesh_group(
        &mut self,
        src: Option<MeshGroupKey>,
        dst: Option<MeshGroupKey>,
    ) -> Result<()> {
        if let Some(dst) = dst
            && !self.model.mesh_groups.exists(dst)
        {
            return Err(GraphError::MeshGroupNotFound(dst));
        }

        if let Some(src) = src {
            self.model.mesh_groups.unregister(src);
        }
        if let Some(dst) = dst {
            self.model.mesh_groups.register(dst);
        }

        let Some(src) = src else {
            return Ok(());
        };
        let members = self.model.nodes.keys().to_vec();
        let mut repointed = 0;
        for handle in members {
            if let Some(node) = self.model.nodes.get_mut(handle)
                && node.mesh == Some(src)
            {
                node.mesh = dst;
                repointed += 1;
            }
        }
        log::debug!("Replaced mesh group {src:?} with {dst:?} on {repointed} node(s)");
        Ok(())
    }

    // ========================================================================
    // Node
    // ========================================================================

    /// Attaches `node` as the last child of `parent` (root when `None`) and
    /// registers it.
    pub fn add_node(&mut self, node: NodeHandle, parent: Option<NodeHandle>) -> Result<()> {
        if !self.model.nodes.exists(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        if self.model.contains_node(node) {
            return Err(GraphError::DuplicateNode(node));
        }
        let parent = parent.unwrap_or(self.model.root());
        self.require_member(parent)?;

        self.model.attach(node, parent);
        self.model.nodes.register(node);
        log::debug!("Added node {node:?} under {parent:?}");
        Ok(())
    }

    /// Unlinks `node` from the hierarchy and unregisters it.
    ///
    /// Fails if a blend-shape mesh-weight binding or a first-person annotation
    /// still targets the node. The children of the removed node move up to
    /// its former parent and keep their world transforms.
    ///
    /// Skin joints and animation tracks pointing at the node are left as
    /// they are.
    pub fn remove_node(&mut self, node: NodeHandle) -> Result<()> {
        self.require_member(node)?;
        let Some(parent) = self.model.parent_of(node) else {
            return Err(GraphError::RootNode(node));
        };
        if let Some(referenced_by) = self
            .model
            .avatar
            .as_ref()
            .and_then(|a| a.find_reference(node))
        {
            return Err(GraphError::UnsupportedRemoval {
                node,
                referenced_by,
            });
        }

        let children = self
            .model
            .get_node(node)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.model.attach_keep_world(child, parent);
        }
        // stray back-links, if any
        let strays: Vec<NodeHandle> = self
            .model
            .nodes
            .iter()
            .filter_map(|(h, n)| (n.parent == Some(node)).then_some(h))
            .collect();
        for child in strays {
            self.model.attach_keep_world(child, parent);
        }

        self.model.detach(node);
        self.model.nodes.unregister(node);

        if self.model.skins.values().any(|s| s.contains(node)) {
            log::warn!("Removed node {node:?} is still used as a skin joint");
        }
        log::debug!("Removed node {node:?}");
        Ok(())
    }

    /// Puts `dst` in place of `src` and rewrites every reference to `src`.
    ///
    /// In order:
    /// 1. `dst` becomes a sibling of `src`, keeping its world transform
    /// 2. children of `src` move to `dst`, keeping their world transforms
    /// 3. `src` is detached and unregistered
    /// 4. skin joint slots move from `src` to `dst`; inverse bind matrices
    ///    stay with their slot
    /// 5. animation tracks keyed by `src` are rekeyed to `dst`
    /// 6. `dst` is registered
    /// 7. mesh-weight bindings are retargeted; first-person annotations on
    ///    `src` are dropped and `dst` gets `Auto` if it has none
    ///
    /// `dst` must be an allocated node that is not part of the graph.
    pub fn replace_node(&mut self, src: NodeHandle, dst: NodeHandle) -> Result<()> {
        self.require_member(src)?;
        if !self.model.nodes.exists(dst) {
            return Err(GraphError::NodeNotFound(dst));
        }
        let Some(parent) = self.model.parent_of(src) else {
            return Err(GraphError::RootNode(src));
        };
        // checked in the order the steps below would hit them
        if let Some(animation) = self
            .model
            .animations
            .iter()
            .find(|a| a.node_map.contains_key(&dst))
        {
            return Err(GraphError::ConflictingTrack {
                animation: animation.name.clone(),
                node: dst,
            });
        }
        if self.model.contains_node(dst) {
            return Err(GraphError::AlreadyExists(dst));
        }

        // 1. dst joins as a sibling of src
        self.model.attach_keep_world(dst, parent);

        // 2. children move over
        let children = self
            .model
            .get_node(src)
            .map(|n| n.children.clone())
            .unwrap_or_default();
        for child in children {
            self.model.attach_keep_world(child, dst);
        }

        // 3. src leaves the graph
        self.model.detach(src);
        self.model.nodes.unregister(src);

        // 4. skins
        let mut slots = 0;
        for skin in self.model.skins.values_mut() {
            slots += skin.replace(src, dst);
        }

        // 5. animation
        for animation in &mut self.model.animations {
            if let Some(track) = animation.node_map.remove(&src) {
                animation.node_map.insert(dst, track);
            }
        }

        // 6. dst joins the node table
        self.model.nodes.register(dst);

        // 7. avatar extension
        if let Some(avatar) = self.model.avatar.as_mut() {
            avatar.replace_node(src, dst);
        }

        log::debug!("Replaced node {src:?} with {dst:?} ({slots} skin slot(s))");
        Ok(())
    }

    // ========================================================================
    // Material
    // ========================================================================

    /// Points every submesh using `src` at `dst`. Returns the number of
    /// submeshes changed.
    pub fn replace_material(&mut self, src: MaterialKey, dst: MaterialKey) -> usize {
        let members = self.model.mesh_groups.keys().to_vec();
        let mut count = 0;
        for key in members {
            let Some(group) = self.model.mesh_groups.get_mut(key) else {
                continue;
            };
            for submesh in group
                .meshes
                .iter_mut()
                .flat_map(|m| m.submeshes.iter_mut())
            {
                if submesh.material == src {
                    submesh.material = dst;
                    count += 1;
                }
            }
        }
        log::debug!("Replaced material {src:?} with {dst:?} on {count} submesh(es)");
        count
    }

    fn require_member(&self, node: NodeHandle) -> Result<()> {
        if !self.model.nodes.exists(node) {
            return Err(GraphError::NodeNotFound(node));
        }
        if !self.model.contains_node(node) {
            return Err(GraphError::NotRegistered(node));
        }
        Ok(())
    }
}
