use gitm_types::ObjectId;

/// An ordered, deduplicated sequence of commits, oldest first.
///
/// Invariants: every element is an ancestor-or-self of the selection
/// target; parents appear before children; no element repeats.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommitRange {
    commits: Vec<ObjectId>,
}

impl CommitRange {
    /// Wrap an already-ordered, already-deduplicated commit list.
    ///
    /// The caller guarantees the invariants; [`select_range`] is the
    /// normal way to obtain a range.
    ///
    /// [`select_range`]: crate::select::select_range
    pub fn from_ordered(commits: Vec<ObjectId>) -> Self {
        Self { commits }
    }

    /// Number of commits in the range.
    pub fn len(&self) -> usize {
        self.commits.len()
    }

    /// Returns `true` if the range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }

    /// The oldest commit in the range.
    pub fn first(&self) -> Option<ObjectId> {
        self.commits.first().copied()
    }

    /// The newest commit in the range (the selection target).
    pub fn last(&self) -> Option<ObjectId> {
        self.commits.last().copied()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &ObjectId> {
        self.commits.iter()
    }

    /// The underlying slice, oldest first.
    pub fn as_slice(&self) -> &[ObjectId] {
        &self.commits
    }

    /// Returns `true` if `id` is in the range.
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.commits.contains(id)
    }
}

impl<'a> IntoIterator for &'a CommitRange {
    type Item = &'a ObjectId;
    type IntoIter = std::slice::Iter<'a, ObjectId>;

    fn into_iter(self) -> Self::IntoIter {
        self.commits.iter()
    }
}
