use crate::error::{FlowVersionError, Result};
use crate::git::{BranchRef, Repository, TagRef};
use chrono::{DateTime, Utc};
use git2::Oid;
use std::collections::{BinaryHeap, HashMap, HashSet};

#[derive(Debug, Clone)]
struct MockCommit {
    parents: Vec<Oid>,
    time: i64,
    seq: u64,
}

/// In-memory commit graph for testing without a git repository
///
/// Commits are created with explicit parents and committer timestamps
/// (seconds since the epoch). Branches and tags are plain name-to-commit
/// maps kept in insertion order.
pub struct MockRepository {
    commits: HashMap<Oid, MockCommit>,
    branches: Vec<BranchRef>,
    tags: Vec<TagRef>,
    next_seq: u64,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: HashMap::new(),
            branches: Vec::new(),
            tags: Vec::new(),
            next_seq: 0,
        }
    }

    /// Add a commit with the given parents and committer time
    ///
    /// # Returns
    /// * `Ok(Oid)` - The generated commit id
    /// * `Err` - If a parent is unknown
    pub fn add_commit(&mut self, parents: &[Oid], time: i64) -> Result<Oid> {
        if let Some(missing) = parents.iter().find(|p| !self.commits.contains_key(*p)) {
            return Err(FlowVersionError::repository(format!(
                "Unknown parent commit {}",
                missing
            )));
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&seq.to_be_bytes());
        let oid = Oid::from_bytes(&bytes)?;

        self.commits.insert(
            oid,
            MockCommit {
                parents: parents.to_vec(),
                time,
                seq,
            },
        );
        Ok(oid)
    }

    /// Create or move a local branch
    pub fn set_branch(&mut self, name: impl Into<String>, tip: Oid) {
        self.upsert_branch(BranchRef::local(name, tip));
    }

    /// Create or move a remote-tracking branch, e.g. `origin/develop`
    pub fn set_remote_branch(&mut self, name: impl Into<String>, tip: Oid) {
        self.upsert_branch(BranchRef::remote(name, tip));
    }

    /// Remove a local branch
    pub fn delete_branch(&mut self, name: &str) {
        self.branches.retain(|b| b.is_remote || b.name != name);
    }

    /// Add a tag pointing at a commit
    pub fn add_tag(&mut self, name: impl Into<String>, target: Oid) {
        self.tags.push(TagRef {
            name: name.into(),
            target: Some(target),
        });
    }

    /// Add a tag that does not peel to a commit
    pub fn add_non_commit_tag(&mut self, name: impl Into<String>) {
        self.tags.push(TagRef {
            name: name.into(),
            target: None,
        });
    }

    fn upsert_branch(&mut self, branch: BranchRef) {
        match self
            .branches
            .iter_mut()
            .find(|b| b.canonical_name == branch.canonical_name)
        {
            Some(existing) => *existing = branch,
            None => self.branches.push(branch),
        }
    }

    fn commit(&self, oid: Oid) -> Result<&MockCommit> {
        self.commits
            .get(&oid)
            .ok_or_else(|| FlowVersionError::repository(format!("Unknown commit {}", oid)))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn list_branches(&self) -> Result<Vec<BranchRef>> {
        Ok(self.branches.clone())
    }

    fn find_branch(&self, name: &str) -> Result<Option<BranchRef>> {
        Ok(self
            .branches
            .iter()
            .find(|b| !b.is_remote && b.name == name)
            .cloned())
    }

    fn list_tags(&self) -> Result<Vec<TagRef>> {
        Ok(self.tags.clone())
    }

    fn merge_base(&self, a: Oid, b: Oid) -> Result<Option<Oid>> {
        let other: HashSet<Oid> = self.commits_reachable_from(b)?.into_iter().collect();

        // The first shared commit in topological order is not an ancestor of any other shared commit
        Ok(self
            .commits_reachable_from(a)?
            .into_iter()
            .find(|oid| other.contains(oid)))
    }

    fn commits_reachable_from(&self, tip: Oid) -> Result<Vec<Oid>> {
        let mut reachable = HashSet::new();
        let mut stack = vec![tip];
        while let Some(oid) = stack.pop() {
            if reachable.insert(oid) {
                stack.extend(self.commit(oid)?.parents.iter().copied());
            }
        }

        let mut pending_children: HashMap<Oid, usize> = HashMap::new();
        for oid in &reachable {
            for parent in &self.commit(*oid)?.parents {
                *pending_children.entry(*parent).or_insert(0) += 1;
            }
        }

        // Emit a commit once all its children are emitted, newest (time, creation order) first
        let mut ready = BinaryHeap::new();
        let tip_commit = self.commit(tip)?;
        ready.push((tip_commit.time, tip_commit.seq, tip));

        let mut ordered = Vec::with_capacity(reachable.len());
        while let Some((_, _, oid)) = ready.pop() {
            ordered.push(oid);
            for parent in &self.commit(oid)?.parents {
                if let Some(count) = pending_children.get_mut(parent) {
                    *count -= 1;
                    if *count == 0 {
                        let commit = self.commit(*parent)?;
                        ready.push((commit.time, commit.seq, *parent));
                    }
                }
            }
        }

        Ok(ordered)
    }

    fn commit_time(&self, commit: Oid) -> Result<DateTime<Utc>> {
        let seconds = self.commit(commit)?.time;
        DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            FlowVersionError::repository(format!("Timestamp {} is out of range", seconds))
        })
    }
}
