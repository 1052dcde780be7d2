//! Avatar model graph.
//!
//! Manages the node hierarchy and the tables that point into it:
//! - Node: hierarchy + local transform
//! - MeshGroup / Mesh / Submesh: renderable references to materials
//! - Skin: joint slots + inverse bind matrices
//! - Animation: node-keyed tracks
//! - Material: name + vector property bag
//!
//! Nodes and mesh groups are stored in slot arenas. Being allocated is not
//! the same as being part of the graph: a [`Registry`] keeps the ordered set
//! of members separately, so a node can be created ahead of an
//! [`add_node`](crate::modifier::ModelModifier::add_node) or survive a
//! [`remove_node`](crate::modifier::ModelModifier::remove_node) while its
//! handle stays valid.

pub mod animation;
pub mod mesh;
pub mod node;
pub mod skin;
pub mod transform;

pub use animation::{Animation, InterpolationMode, KeyframeTrack, NodeAnimation};
pub use mesh::{Material, Mesh, MeshGroup, Submesh};
pub use node::Node;
pub use skin::Skin;
pub use transform::Transform;

use glam::Affine3A;
use rustc_hash::FxHashSet;
use slotmap::{Key, SlotMap, new_key_type};

use crate::avatar::AvatarExtension;

new_key_type! {
    pub struct NodeHandle;
    pub struct MeshGroupKey;
    pub struct MaterialKey;
    pub struct SkinKey;
}

// ============================================================================
// Registry
// ============================================================================

/// Slot arena plus an ordered membership list over it.
///
/// `members` keeps registration order; `member_set` answers membership.
#[derive(Debug, Clone)]
pub struct Registry<K: Key, V> {
    arena: SlotMap<K, V>,
    members: Vec<K>,
    member_set: FxHashSet<K>,
}

impl<K: Key, V> Registry<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            arena: SlotMap::with_key(),
            members: Vec::new(),
            member_set: FxHashSet::default(),
        }
    }

    /// Allocates a value without making it a member.
    pub fn create(&mut self, value: V) -> K {
        self.arena.insert(value)
    }

    #[inline]
    #[must_use]
    pub fn exists(&self, key: K) -> bool {
        self.arena.contains_key(key)
    }

    /// Whether `key` is a member.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.member_set.contains(&key)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, key: K) -> Option<&V> {
        self.arena.get(key)
    }

    #[inline]
    pub fn get_mut(&mut self, key: K) -> Option<&mut V> {
        self.arena.get_mut(key)
    }

    /// Member keys in registration order.
    #[inline]
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.members
    }

    /// Members in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (K, &V)> + '_ {
        self.members
            .iter()
            .filter_map(|&k| self.arena.get(k).map(|v| (k, v)))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Returns `false` if `key` was already a member.
    pub(crate) fn register(&mut self, key: K) -> bool {
        if !self.member_set.insert(key) {
            return false;
        }
        self.members.push(key);
        true
    }

    /// Returns `false` if `key` was not a member.
    pub(crate) fn unregister(&mut self, key: K) -> bool {
        if !self.member_set.remove(&key) {
            return false;
        }
        if let Some(pos) = self.members.iter().position(|&k| k == key) {
            self.members.remove(pos);
        }
        true
    }
}

impl<K: Key, V> Default for Registry<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Model
// ============================================================================

/// In-memory avatar model, as materialized by a codec.
///
/// Invariant: every node reachable from `root` is a member of `nodes`, and
/// every member of `nodes` is reachable from `root`.
#[derive(Debug, Clone)]
pub struct Model {
    pub nodes: Registry<NodeHandle, Node>,
    pub mesh_groups: Registry<MeshGroupKey, MeshGroup>,
    pub skins: SlotMap<SkinKey, Skin>,
    pub animations: Vec<Animation>,
    pub materials: SlotMap<MaterialKey, Material>,
    pub avatar: Option<AvatarExtension>,

    root: NodeHandle,
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}

impl Model {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = Registry::new();
        let root = nodes.create(Node::new("__root__"));
        nodes.register(root);

        Self {
            nodes,
            mesh_groups: Registry::new(),
            skins: SlotMap::with_key(),
            animations: Vec::new(),
            materials: SlotMap::with_key(),
            avatar: None,
            root,
        }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeHandle {
        self.root
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Allocates a detached node. It joins the graph through
    /// [`ModelModifier::add_node`](crate::modifier::ModelModifier::add_node)
    /// or as the destination of a node replacement.
    pub fn create_node(&mut self, mut node: Node) -> NodeHandle {
        node.parent = None;
        node.children.clear();
        self.nodes.create(node)
    }

    /// Allocates, attaches and registers a node in one step.
    ///
    /// Meant for loaders building a fresh hierarchy. Falls back to the root
    /// when `parent` is not a member.
    pub fn add_to_parent(&mut self, node: Node, parent: NodeHandle) -> NodeHandle {
        let parent = if self.nodes.contains(parent) {
            parent
        } else {
            log::warn!("Parent {parent:?} is not in the model, attaching to root");
            self.root
        };
        let handle = self.create_node(node);
        self.attach(handle, parent);
        self.nodes.register(handle);
        handle
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Whether the node is a member of the graph.
    #[inline]
    #[must_use]
    pub fn contains_node(&self, handle: NodeHandle) -> bool {
        self.nodes.contains(handle)
    }

    #[must_use]
    pub fn find_node(&self, name: &str) -> Option<NodeHandle> {
        self.nodes
            .iter()
            .find_map(|(h, n)| (n.name == name).then_some(h))
    }

    #[must_use]
    pub fn parent_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
        self.nodes.get(handle)?.parent
    }

    /// World matrix derived from the current parent chain.
    ///
    /// A detached node's local matrix is its world matrix.
    #[must_use]
    pub fn world_matrix(&self, handle: NodeHandle) -> Affine3A {
        let mut world = Affine3A::IDENTITY;
        let mut current = Some(handle);
        while let Some(h) = current {
            let Some(node) = self.nodes.get(h) else {
                break;
            };
            world = node.transform.local_matrix() * world;
            current = node.parent;
        }
        world
    }

    /// Whether `node` is `ancestor` or lies below it.
    #[must_use]
    pub fn is_descendant_of(&self, node: NodeHandle, ancestor: NodeHandle) -> bool {
        let mut current = Some(node);
        while let Some(h) = current {
            if h == ancestor {
                return true;
            }
            current = self.parent_of(h);
        }
        false
    }

    /// Pre-order traversal of the subtree under `start`, `start` included.
    #[must_use]
    pub fn traverse(&self, start: NodeHandle) -> Vec<NodeHandle> {
        let mut out = Vec::new();
        let mut stack = vec![start];
        while let Some(h) = stack.pop() {
            let Some(node) = self.nodes.get(h) else {
                continue;
            };
            out.push(h);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Checks the membership/reachability invariant and parent/child symmetry.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let reachable: FxHashSet<NodeHandle> = self.traverse(self.root).into_iter().collect();
        let members: FxHashSet<NodeHandle> = self.nodes.keys().iter().copied().collect();
        if reachable != members || members.len() != self.nodes.len() {
            return false;
        }

        self.nodes.iter().all(|(handle, node)| {
            let parent_ok = match node.parent {
                Some(p) => self
                    .nodes
                    .get(p)
                    .is_some_and(|pn| pn.children.iter().filter(|&&c| c == handle).count() == 1),
                None => handle == self.root,
            };
            parent_ok
                && node
                    .children
                    .iter()
                    .all(|&c| self.parent_of(c) == Some(handle))
        })
    }

    // ========================================================================
    // Hierarchy primitives
    // ========================================================================

    /// Unlinks `child` from its parent, both directions.
    pub(crate) fn detach(&mut self, child: NodeHandle) {
        let Some(parent) = self.parent_of(child) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = None;
        }
    }

    /// Appends `child` under `parent`, keeping its local transform.
    pub(crate) fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if child == parent {
            log::warn!("Cannot attach node to itself!");
            return;
        }
        self.detach(child);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    /// Appends `child` under `parent`, rewriting its local transform so its
    /// world transform is unchanged.
    pub(crate) fn attach_keep_world(&mut self, child: NodeHandle, parent: NodeHandle) {
        let world = self.world_matrix(child);
        let parent_world = self.world_matrix(parent);
        self.attach(child, parent);
        if let Some(c) = self.nodes.get_mut(child) {
            c.transform.apply_local_matrix(parent_world.inverse() * world);
        }
    }

    // ========================================================================
    // Mesh groups, materials, skins
    // ========================================================================

    /// Allocates a mesh group without registering it.
    pub fn create_mesh_group(&mut self, group: MeshGroup) -> MeshGroupKey {
        self.mesh_groups.create(group)
    }

    /// Allocates and registers a mesh group.
    pub fn add_mesh_group(&mut self, group: MeshGroup) -> MeshGroupKey {
        let key = self.mesh_groups.create(group);
        self.mesh_groups.register(key);
        key
    }

    #[inline]
    #[must_use]
    pub fn get_mesh_group(&self, key: MeshGroupKey) -> Option<&MeshGroup> {
        self.mesh_groups.get(key)
    }

    #[inline]
    #[must_use]
    pub fn contains_mesh_group(&self, key: MeshGroupKey) -> bool {
        self.mesh_groups.contains(key)
    }

    pub fn add_material(&mut self, material: Material) -> MaterialKey {
        self.materials.insert(material)
    }

    #[must_use]
    pub fn get_material(&self, key: MaterialKey) -> Option<&Material> {
        self.materials.get(key)
    }

    pub fn get_material_mut(&mut self, key: MaterialKey) -> Option<&mut Material> {
        self.materials.get_mut(key)
    }

    pub fn add_skin(&mut self, skin: Skin) -> SkinKey {
        self.skins.insert(skin)
    }
}
