// tests/scenarios_test.rs
use flow_version::domain::SemanticVersion;
use flow_version::git::{BranchRef, Git2Repository, Repository as _};
use flow_version::{find_version, FlowVersionError};
use git2::{Oid, Repository, Signature, Time};
use tempfile::TempDir;

/// A git repository on disk whose commits get strictly increasing timestamps
struct TestRepo {
    dir: TempDir,
    repo: Repository,
    clock: i64,
}

impl TestRepo {
    fn new() -> Self {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        TestRepo {
            dir,
            repo,
            clock: 1_600_000_000,
        }
    }

    fn signature(&mut self) -> Signature<'static> {
        self.clock += 60;
        Signature::new("Test User", "test@example.com", &Time::new(self.clock, 0))
            .expect("Could not create signature")
    }

    fn commit(&mut self, parents: &[Oid]) -> Oid {
        let sig = self.signature();
        let tree_id = self
            .repo
            .treebuilder(None)
            .and_then(|b| b.write())
            .expect("Could not write tree");
        let tree = self.repo.find_tree(tree_id).expect("Could not find tree");
        let parents: Vec<_> = parents
            .iter()
            .map(|p| self.repo.find_commit(*p).expect("Could not find parent"))
            .collect();
        let parent_refs: Vec<_> = parents.iter().collect();
        self.repo
            .commit(None, &sig, &sig, "commit", &tree, &parent_refs)
            .expect("Could not create commit")
    }

    fn chain(&mut self, from: Option<Oid>, count: usize) -> Vec<Oid> {
        let mut parent = from;
        let mut out = Vec::new();
        for _ in 0..count {
            let parents: Vec<Oid> = parent.into_iter().collect();
            let oid = self.commit(&parents);
            out.push(oid);
            parent = Some(oid);
        }
        out
    }

    fn branch(&self, name: &str, oid: Oid) {
        self.repo
            .reference(&format!("refs/heads/{}", name), oid, true, "test")
            .expect("Could not create branch");
    }

    fn delete_branch(&self, name: &str) {
        self.repo
            .find_reference(&format!("refs/heads/{}", name))
            .and_then(|mut r| r.delete())
            .expect("Could not delete branch");
    }

    fn tag(&self, name: &str, oid: Oid) {
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo
            .tag_lightweight(name, &object, false)
            .expect("Could not create tag");
    }

    fn annotated_tag(&mut self, name: &str, oid: Oid) {
        let sig = self.signature();
        let object = self.repo.find_object(oid, None).unwrap();
        self.repo
            .tag(name, &object, &sig, "release", false)
            .expect("Could not create annotated tag");
    }

    fn facade(&self) -> Git2Repository {
        Git2Repository::open(self.dir.path()).expect("Could not open repository")
    }
}

fn version_of(repo: &Git2Repository, branch: &str) -> SemanticVersion {
    let branch = repo.find_branch(branch).unwrap().expect("branch exists");
    find_version(repo, &branch).expect("version resolves")
}

#[test]
fn test_develop_without_tags_falls_back_to_root() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 6);
    t.branch("master", c[0]);
    t.branch("develop", c[5]);

    let repo = t.facade();
    let version = version_of(&repo, "develop");
    assert_eq!(version.to_string(), "0.1.0-beta.5");
    let meta = version.build_metadata.unwrap();
    assert_eq!(meta.commits_since_tag, Some(5));
    assert_eq!(meta.sha, Some(c[5].to_string()));
    assert_eq!(meta.branch.as_deref(), Some("develop"));
}

#[test]
fn test_feature_branch_after_tagged_develop() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 4);
    t.branch("master", c[0]);
    t.branch("develop", c[3]);
    t.tag("1.0.0", c[3]);
    let f = t.chain(Some(c[3]), 2);
    t.branch("feature/login", f[1]);

    let repo = t.facade();
    assert_eq!(
        version_of(&repo, "feature/login").to_string(),
        "1.1.0-alpha/login.2"
    );
}

#[test]
fn test_release_branch_counts_commits_since_develop() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 3);
    t.branch("master", c[0]);
    let r = t.chain(Some(c[2]), 4);
    t.branch("release/1.2.0", r[3]);
    let d = t.chain(Some(c[2]), 1);
    t.branch("develop", d[0]);

    let repo = t.facade();
    let version = version_of(&repo, "release/1.2.0");
    assert_eq!(version.to_string(), "1.2.0-rc.4");
    assert_eq!(version.patch, 0);
}

#[test]
fn test_tag_on_tip_is_a_release_build() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 3);
    t.branch("develop", c[1]);
    t.branch("master", c[2]);
    t.annotated_tag("1.2.0", c[2]);

    let repo = t.facade();
    let version = version_of(&repo, "master");
    assert_eq!(version.to_string(), "1.2.0");
    assert!(version.is_release());
    let meta = version.build_metadata.unwrap();
    assert_eq!(meta.commits_since_tag, Some(0));
    assert_eq!(meta.branch.as_deref(), Some("master"));
    assert_eq!(meta.sha, Some(c[2].to_string()));
}

#[test]
fn test_missing_master_is_a_topology_error() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 2);
    t.branch("develop", c[1]);

    let repo = t.facade();
    let develop = repo.find_branch("develop").unwrap().unwrap();
    match find_version(&repo, &develop).unwrap_err() {
        FlowVersionError::Topology { branch, existing } => {
            assert_eq!(branch, "master");
            assert_eq!(existing, vec!["refs/heads/develop".to_string()]);
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_hotfix_keeps_patch() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 2);
    t.branch("master", c[0]);
    t.tag("1.2.2", c[0]);
    t.branch("develop", c[1]);
    let h = t.chain(Some(c[0]), 3);
    t.branch("hotfix/1.2.3", h[2]);

    let repo = t.facade();
    let version = version_of(&repo, "hotfix/1.2.3");
    assert_eq!(version.to_string(), "1.2.3-patch.3");
    assert_eq!(version.patch, 3);
}

#[test]
fn test_hotfix_tags_do_not_bump_develop() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 2);
    t.tag("1.0.0", c[0]);
    let h = t.chain(Some(c[1]), 1);
    t.tag("1.0.1", h[0]);
    t.branch("master", h[0]);
    let d = t.chain(Some(h[0]), 2);
    t.branch("develop", d[1]);

    let repo = t.facade();
    // 1.0.1 is skipped, 1.0.0 anchors at c[1]: c[1], h[0], d[0], d[1]
    assert_eq!(version_of(&repo, "develop").to_string(), "1.1.0-beta.4");
}

#[test]
fn test_finished_release_merged_back_into_develop() {
    let mut t = TestRepo::new();
    let root = t.chain(None, 1)[0];
    let d = t.chain(Some(root), 2);
    let r = t.chain(Some(d[1]), 1);
    let merge_master = t.commit(&[root, r[0]]);
    t.tag("1.0.0", merge_master);
    let merge_develop = t.commit(&[d[1], r[0]]);
    let e = t.chain(Some(merge_develop), 2);

    t.branch("master", merge_master);
    t.branch("develop", e[1]);
    t.branch("release/1.0.0", r[0]);

    let repo = t.facade();
    // Open release branch: merge-base r[0], commits e[1], e[0], merge_develop
    assert_eq!(version_of(&repo, "develop").to_string(), "1.1.0-beta.3");

    t.delete_branch("release/1.0.0");
    let repo = t.facade();
    // Tag only: anchored at merge_develop, which is counted
    assert_eq!(version_of(&repo, "develop").to_string(), "1.1.0-beta.3");
}

#[test]
fn test_open_release_moves_develop_to_next_minor() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 3);
    t.branch("master", c[0]);
    t.tag("1.1.0", c[0]);
    let r = t.chain(Some(c[2]), 2);
    t.branch("release/1.2.0", r[1]);
    let d = t.chain(Some(c[2]), 3);
    t.branch("develop", d[2]);

    let repo = t.facade();
    assert_eq!(version_of(&repo, "develop").to_string(), "1.3.0-beta.3");
    assert_eq!(version_of(&repo, "release/1.2.0").to_string(), "1.2.0-rc.2");
}

#[test]
fn test_malformed_release_branch_is_a_parse_error() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 2);
    t.branch("master", c[0]);
    t.branch("develop", c[0]);
    t.branch("release/next", c[1]);

    let repo = t.facade();
    let branch = repo.find_branch("release/next").unwrap().unwrap();
    assert!(matches!(
        find_version(&repo, &branch),
        Err(FlowVersionError::Parse(_))
    ));
}

#[test]
fn test_detached_head_resolves_owning_feature() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 2);
    t.branch("master", c[0]);
    t.branch("develop", c[1]);
    let f = t.chain(Some(c[1]), 2);
    t.branch("feature/search", f[1]);
    t.repo.set_head_detached(f[1]).unwrap();

    let repo = t.facade();
    let head = repo.head_branch().unwrap();
    assert_eq!(head.canonical_name, "HEAD");
    let version = find_version(&repo, &head).unwrap();
    assert_eq!(version.to_string(), "0.1.0-alpha/search.3");
}

#[test]
fn test_repeated_resolution_is_stable() {
    let mut t = TestRepo::new();
    let c = t.chain(None, 3);
    t.branch("master", c[0]);
    t.tag("0.4.0", c[0]);
    let f = t.chain(Some(c[2]), 1);
    t.branch("develop", c[2]);
    t.branch("feature/a", f[0]);

    let repo = t.facade();
    let branch: BranchRef = repo.find_branch("feature/a").unwrap().unwrap();
    let first = find_version(&repo, &branch).unwrap();
    let second = find_version(&repo, &branch).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), "0.5.0-alpha/a.3");
}
