use crate::hierarchy::Tree;
use crate::object::Uuid;

/// Playables whose "something inside is playing" state flipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changes {
    pub added: Vec<Uuid>,
    pub removed: Vec<Uuid>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Compares the playing sets (each instance widened to itself plus all of its
/// ancestors) before and after a change.
///
/// The trees may differ when playables moved between the two snapshots.
/// Results follow the pre-order of the tree they were taken from. The nil
/// root of a general tree is never reported.
pub fn changes(
    tree_before: &Tree,
    tree_after: &Tree,
    playing_before: &[Uuid],
    playing_after: &[Uuid],
) -> Changes {
    let before = tree_before.ancestor_closure(playing_before);
    let after = tree_after.ancestor_closure(playing_after);

    let added = tree_after
        .nodes()
        .iter()
        .map(|node| node.uuid)
        .filter(|uuid| !uuid.is_nil() && after.contains(uuid) && !before.contains(uuid))
        .collect();

    let removed = tree_before
        .nodes()
        .iter()
        .map(|node| node.uuid)
        .filter(|uuid| !uuid.is_nil() && before.contains(uuid) && !after.contains(uuid))
        .collect();

    Changes { added, removed }
}
