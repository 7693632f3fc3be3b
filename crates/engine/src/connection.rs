//! Connection rules: which node kinds may be joined by an edge.
//!
//! An edge is legal when its source kind can originate edges and its target
//! kind can receive them.  Agents only produce, servers only consume; every
//! workflow kind does both.  Self-loops are refused by the store before the
//! kinds are consulted.

use std::fmt;

use nodes::NodeKind;

/// Why a prospective edge was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionRejection {
    /// Source and target are the same node.
    SelfLoop,
    /// The source kind cannot originate edges.
    SourceCannotOriginate(NodeKind),
    /// The target kind cannot receive edges.
    TargetCannotReceive(NodeKind),
    /// The pair is already connected and parallel edges are disabled.
    Duplicate,
}

impl fmt::Display for ConnectionRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelfLoop => write!(f, "a node cannot connect to itself"),
            Self::SourceCannotOriginate(kind) => write!(f, "'{kind}' nodes cannot start an edge"),
            Self::TargetCannotReceive(kind) => write!(f, "'{kind}' nodes cannot receive an edge"),
            Self::Duplicate => write!(f, "the nodes are already connected"),
        }
    }
}

/// Whether an edge from a `source`-kind node to a `target`-kind node is legal.
pub fn is_valid_connection(source: NodeKind, target: NodeKind) -> bool {
    check_connection(source, target).is_ok()
}

/// Like [`is_valid_connection`] but says which endpoint is at fault.
pub fn check_connection(source: NodeKind, target: NodeKind) -> Result<(), ConnectionRejection> {
    if !source.can_originate() {
        return Err(ConnectionRejection::SourceCannotOriginate(source));
    }
    if !target.can_receive() {
        return Err(ConnectionRejection::TargetCannotReceive(target));
    }
    Ok(())
}
