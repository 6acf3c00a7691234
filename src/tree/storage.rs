//! `NodeStorage`: the append-only arena backing the syntax tree. Nodes are
//! fixed-size `(start, length, kind, parent)` records; children are tracked
//! out-of-line in three parallel arrays so the node record itself never
//! grows.
//!
//! This is deliberately not a `rowan`-style `GreenNodeBuilder`/`GreenNode`
//! tree — `rowan` builds an immutable, structurally-shared tree bottom-up
//! from already-parsed children, which doesn't fit an index-overlay design
//! where a node's length is unknown until its children are.

use crate::error::StorageError;
use crate::tree::{NodeId, NodeKind, NONE};

#[derive(Debug, Clone, Copy)]
struct NodeRow {
    start: u32,
    length: u32,
    kind: NodeKind,
    parent: NodeId,
}

/// A snapshot of one node: its own fields plus its materialized child ids.
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: NodeId,
    pub start: u32,
    pub length: u32,
    pub kind: NodeKind,
    pub parent: NodeId,
    pub children: Vec<NodeId>,
}

/// Append-only arena of syntax nodes plus their child-adjacency lists.
///
/// `nodes` holds one `NodeRow` per allocated node. `children_start` and
/// `children_count` are parallel to `nodes` and index into `children_data`,
/// which holds the flattened, possibly-fragmented run of child ids for every
/// parent that has ever had a child appended (see [`Self::append_child`] for
/// the four-case append algorithm).
pub struct NodeStorage {
    capacity: usize,
    nodes: Vec<NodeRow>,
    children_start: Vec<u32>,
    children_count: Vec<u32>,
    children_data: Vec<NodeId>,
    alive: bool,
}

impl NodeStorage {
    /// Allocates backing storage for up to `capacity` nodes. `capacity` must
    /// be at least 1.
    pub fn create(capacity: usize) -> Result<Self, StorageError> {
        if capacity == 0 {
            return Err(StorageError::InvalidCapacity {
                capacity: 0,
                requested: 0,
            });
        }
        Ok(Self {
            capacity,
            nodes: Vec::with_capacity(capacity),
            children_start: Vec::with_capacity(capacity),
            children_count: Vec::with_capacity(capacity),
            children_data: Vec::new(),
            alive: true,
        })
    }

    fn ensure_alive(&self) -> Result<(), StorageError> {
        if self.alive {
            Ok(())
        } else {
            Err(StorageError::ReleasedStorageAccess)
        }
    }

    /// Appends a new node. If `parent` names an already-allocated node, the
    /// new id is appended to that parent's child run.
    pub fn allocate(
        &mut self,
        start: u32,
        length: u32,
        kind: NodeKind,
        parent: NodeId,
    ) -> Result<NodeId, StorageError> {
        self.ensure_alive()?;
        if self.nodes.len() == self.capacity {
            return Err(StorageError::StorageFull {
                capacity: self.capacity as u32,
                requested: (self.nodes.len() + 1) as u32,
            });
        }
        if start.checked_add(length).is_none() {
            return Err(StorageError::InvalidLength {
                node: self.nodes.len() as u32,
                start,
                length,
            });
        }
        let id = self.nodes.len() as NodeId;
        self.nodes.push(NodeRow {
            start,
            length,
            kind,
            parent,
        });
        self.children_start.push(0);
        self.children_count.push(0);

        if parent >= 0 && (parent as usize) < (id as usize) {
            self.append_child(parent, id);
        }

        Ok(id)
    }

    /// The four-case child-append algorithm: appends
    /// `child` to `parent`'s run in `children_data`, relocating the run to
    /// the tail if another parent has since written past it. Relocated runs
    /// are left dormant in place — the store never compacts `children_data`.
    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        let p = parent as usize;
        let tail = self.children_data.len() as u32;

        if self.children_count[p] == 0 {
            // case 2: parent has no children yet.
            self.children_start[p] = tail;
            self.children_data.push(child);
            self.children_count[p] = 1;
            return;
        }

        let start = self.children_start[p];
        let count = self.children_count[p];
        if start + count == tail {
            // case 3: parent's run is already at the tail.
            self.children_data.push(child);
            self.children_count[p] += 1;
            return;
        }

        // case 4: another parent has written further into children_data
        // since; relocate this parent's run to the tail, then append.
        let existing: Vec<NodeId> =
            self.children_data[start as usize..(start + count) as usize].to_vec();
        let new_start = self.children_data.len() as u32;
        self.children_data.extend(existing);
        self.children_data.push(child);
        self.children_start[p] = new_start;
        self.children_count[p] += 1;
    }

    /// In-place mutation of an already-allocated node's length, used when a
    /// construct's extent isn't known until its children have been parsed.
    pub fn update_length(&mut self, id: NodeId, new_length: u32) -> Result<(), StorageError> {
        self.ensure_alive()?;
        let row = self.row_mut(id)?;
        let start = row.start;
        if start.checked_add(new_length).is_none() {
            return Err(StorageError::InvalidLength {
                node: id as u32,
                start,
                length: new_length,
            });
        }
        row.length = new_length;
        Ok(())
    }

    /// In-place retagging of an already-allocated node's kind, used the same
    /// way `update_length` is: when a construct's exact kind isn't known
    /// until tokens past its start have been inspected (e.g. disambiguating
    /// a marker annotation from a normal/single-member one only once its
    /// argument list has been read).
    pub fn update_kind(&mut self, id: NodeId, new_kind: NodeKind) -> Result<(), StorageError> {
        self.ensure_alive()?;
        let row = self.row_mut(id)?;
        row.kind = new_kind;
        Ok(())
    }

    fn row(&self, id: NodeId) -> Result<&NodeRow, StorageError> {
        if id < 0 || id as usize >= self.nodes.len() {
            return Err(StorageError::InvalidNodeId {
                capacity: self.nodes.len() as u32,
                requested: id.max(0) as u32,
            });
        }
        Ok(&self.nodes[id as usize])
    }

    fn row_mut(&mut self, id: NodeId) -> Result<&mut NodeRow, StorageError> {
        if id < 0 || id as usize >= self.nodes.len() {
            return Err(StorageError::InvalidNodeId {
                capacity: self.nodes.len() as u32,
                requested: id.max(0) as u32,
            });
        }
        Ok(&mut self.nodes[id as usize])
    }

    /// A snapshot of `id`'s fields and its ordered children.
    pub fn get_node(&self, id: NodeId) -> Result<NodeRecord, StorageError> {
        self.ensure_alive()?;
        let row = *self.row(id)?;
        Ok(NodeRecord {
            id,
            start: row.start,
            length: row.length,
            kind: row.kind,
            parent: row.parent,
            children: self.get_children(id)?,
        })
    }

    /// The ordered child ids of `id`, in declaration order.
    pub fn get_children(&self, id: NodeId) -> Result<Vec<NodeId>, StorageError> {
        self.ensure_alive()?;
        self.row(id)?;
        let p = id as usize;
        let start = self.children_start[p] as usize;
        let count = self.children_count[p] as usize;
        Ok(self.children_data[start..start + count].to_vec())
    }

    pub fn count(&self) -> usize {
        self.nodes.len()
    }

    /// A rough byte estimate of storage in use: node records plus the three
    /// adjacency arrays, including fragmented/dormant runs.
    pub fn memory_estimate(&self) -> usize {
        let node_bytes = self.nodes.len() * std::mem::size_of::<NodeRow>();
        let adjacency_bytes = (self.children_start.len() + self.children_count.len())
            * std::mem::size_of::<u32>()
            + self.children_data.len() * std::mem::size_of::<NodeId>();
        node_bytes + adjacency_bytes
    }

    /// Clears all nodes and children while keeping the storage alive and at
    /// its original capacity, for reuse across parses.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.children_start.clear();
        self.children_count.clear();
        self.children_data.clear();
    }

    /// Releases the arena. After this, every other operation fails with
    /// [`StorageError::ReleasedStorageAccess`].
    pub fn release(&mut self) {
        self.alive = false;
        self.nodes.clear();
        self.children_start.clear();
        self.children_count.clear();
        self.children_data.clear();
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_appends_in_order() {
        let mut s = NodeStorage::create(16).unwrap();
        let root = s.allocate(0, 10, NodeKind::CompilationUnit, NONE).unwrap();
        let a = s.allocate(0, 5, NodeKind::ClassDeclaration, root).unwrap();
        let b = s.allocate(5, 5, NodeKind::ClassDeclaration, root).unwrap();
        assert_eq!(root, 0);
        assert_eq!(a, 1);
        assert_eq!(b, 2);
        assert_eq!(s.get_children(root).unwrap(), vec![a, b]);
    }

    #[test]
    fn storage_full_is_reported() {
        let mut s = NodeStorage::create(1).unwrap();
        s.allocate(0, 1, NodeKind::Error, NONE).unwrap();
        let err = s.allocate(0, 1, NodeKind::Error, NONE).unwrap_err();
        assert!(matches!(err, StorageError::StorageFull { .. }));
    }

    #[test]
    fn invalid_node_id_is_reported() {
        let s = NodeStorage::create(4).unwrap();
        let err = s.get_node(7).unwrap_err();
        assert!(matches!(err, StorageError::InvalidNodeId { .. }));
    }

    #[test]
    fn update_length_mutates_in_place() {
        let mut s = NodeStorage::create(4).unwrap();
        let id = s.allocate(0, 3, NodeKind::Block, NONE).unwrap();
        s.update_length(id, 9).unwrap();
        assert_eq!(s.get_node(id).unwrap().length, 9);
    }

    #[test]
    fn update_length_rejects_start_plus_length_overflow() {
        let mut s = NodeStorage::create(4).unwrap();
        let id = s.allocate(u32::MAX - 2, 1, NodeKind::Block, NONE).unwrap();
        let err = s.update_length(id, u32::MAX).unwrap_err();
        assert!(matches!(err, StorageError::InvalidLength { .. }));
        // the rejected update must not have taken effect.
        assert_eq!(s.get_node(id).unwrap().length, 1);
    }

    #[test]
    fn allocate_rejects_start_plus_length_overflow() {
        let mut s = NodeStorage::create(4).unwrap();
        let err = s.allocate(u32::MAX, 1, NodeKind::Block, NONE).unwrap_err();
        assert!(matches!(err, StorageError::InvalidLength { .. }));
    }

    #[test]
    fn update_kind_mutates_in_place() {
        let mut s = NodeStorage::create(4).unwrap();
        let id = s.allocate(0, 3, NodeKind::MarkerAnnotation, NONE).unwrap();
        s.update_kind(id, NodeKind::SingleMemberAnnotation).unwrap();
        assert_eq!(s.get_node(id).unwrap().kind, NodeKind::SingleMemberAnnotation);
    }

    #[test]
    fn release_then_access_fails() {
        let mut s = NodeStorage::create(4).unwrap();
        let id = s.allocate(0, 1, NodeKind::Block, NONE).unwrap();
        s.release();
        assert!(!s.is_alive());
        assert!(matches!(
            s.get_node(id),
            Err(StorageError::ReleasedStorageAccess)
        ));
    }

    #[test]
    fn interleaved_allocation_triggers_relocation() {
        // Two parents (p0, p1) interleave children: p0 gets a child, then p1
        // gets a child (pushing past p0's run-at-tail position), then p0
        // gets a second child — which must relocate p0's run to the tail
        // rather than corrupt p1's data.
        let mut s = NodeStorage::create(16).unwrap();
        let p0 = s.allocate(0, 1, NodeKind::Block, NONE).unwrap();
        let p1 = s.allocate(0, 1, NodeKind::Block, NONE).unwrap();
        let c0 = s.allocate(0, 1, NodeKind::Error, p0).unwrap();
        let c1 = s.allocate(0, 1, NodeKind::Error, p1).unwrap();
        let c2 = s.allocate(0, 1, NodeKind::Error, p0).unwrap();

        assert_eq!(s.get_children(p0).unwrap(), vec![c0, c2]);
        assert_eq!(s.get_children(p1).unwrap(), vec![c1]);
    }

    #[test]
    fn reset_clears_but_keeps_alive() {
        let mut s = NodeStorage::create(4).unwrap();
        s.allocate(0, 1, NodeKind::Block, NONE).unwrap();
        s.reset();
        assert_eq!(s.count(), 0);
        assert!(s.is_alive());
        let id = s.allocate(0, 1, NodeKind::Block, NONE).unwrap();
        assert_eq!(id, 0);
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(matches!(
            NodeStorage::create(0),
            Err(StorageError::InvalidCapacity { .. })
        ));
    }
}
