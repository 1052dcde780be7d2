//! Error Types
//!
//! This module defines the error types reported by structural graph edits.
//!
//! # Overview
//!
//! The main error type [`GraphError`] covers every way a
//! [`ModelModifier`](crate::modifier::ModelModifier) operation can be rejected.
//! Every variant is raised *before* anything is written, so a failed call
//! leaves the [`Model`](crate::model::Model) exactly as it was.
//!
//! The blend-shape accumulator has no error type: bindings whose material
//! cannot be resolved are skipped.
//!
//! # Usage
//!
//! ```rust,ignore
//! use myth_avatar::errors::{GraphError, Result};
//!
//! fn strip_head(modifier: &mut ModelModifier, head: NodeHandle) -> Result<()> {
//!     modifier.remove_node(head)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

use crate::model::{MeshGroupKey, NodeHandle};

/// Which avatar-extension table still points at a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeReference {
    /// A mesh-weight binding inside a blend-shape clip.
    BlendShape,
    /// A first-person mesh annotation.
    FirstPerson,
}

impl std::fmt::Display for NodeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeReference::BlendShape => f.write_str("blend shape binding"),
            NodeReference::FirstPerson => f.write_str("first person annotation"),
        }
    }
}

/// Errors raised by graph mutation operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    // ========================================================================
    // Membership
    // ========================================================================
    /// The node is already a member of `Model.nodes`.
    #[error("Node {0:?} is already registered in the model")]
    DuplicateNode(NodeHandle),

    /// The replacement node is already a member of the graph.
    #[error("Replacement node {0:?} already exists in the model")]
    AlreadyExists(NodeHandle),

    /// The handle does not refer to a live node.
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeHandle),

    /// The node exists but is not part of the graph.
    #[error("Node {0:?} is not registered in the model")]
    NotRegistered(NodeHandle),

    /// The handle does not refer to a live mesh group.
    #[error("Mesh group not found: {0:?}")]
    MeshGroupNotFound(MeshGroupKey),

    /// The operation cannot be applied to the graph root.
    #[error("Operation is not valid on the root node {0:?}")]
    RootNode(NodeHandle),

    // ========================================================================
    // Cross references
    // ========================================================================
    /// The node is still referenced from the avatar extension.
    #[error("Node {node:?} is still referenced from a {referenced_by}; retarget it first")]
    UnsupportedRemoval {
        node: NodeHandle,
        referenced_by: NodeReference,
    },

    /// The replacement node already owns an animation track.
    #[error("Animation '{animation}' already has a track for node {node:?}")]
    ConflictingTrack { animation: String, node: NodeHandle },
}

/// Alias for `Result<T, GraphError>`.
pub type Result<T> = std::result::Result<T, GraphError>;
