use crate::harness::TestWorkspace;
use attn_core::{git_available, manual_identity, Config, FacetName, FacetStore};
use std::path::Path;
use std::process::Command;

fn git_init(root: &Path) -> bool {
    Command::new("git")
        .args(["init", "-q"])
        .current_dir(root)
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

#[test]
fn test_git_and_manual_identities_agree() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let workspace = TestWorkspace::empty().unwrap();
    workspace.write_file("app.rb", b"puts 'app'\n").unwrap();
    workspace.write_file("lib/crlf.rb", b"line one\r\nline two\r\n").unwrap();
    assert!(git_init(workspace.path()));

    let ws = workspace.open_with(Config::default()).unwrap();
    let sync = ws.synchronizer().unwrap();
    assert!(sync.is_vcs_managed());

    for (dir, file) in [(".", "app.rb"), ("lib", "crlf.rb")] {
        let report = sync.sync(Path::new(dir)).unwrap().done().unwrap();
        assert_eq!(report.created, 1);
        assert!(report.failed.is_empty());

        let dir_path = ws.root().join(dir);
        let store = FacetStore::load(&dir_path.join("Attributes.ini"))
            .unwrap()
            .unwrap();
        let stored = store
            .facet(&FacetName::file(file))
            .and_then(|f| f.content_id())
            .unwrap();
        assert_eq!(stored, manual_identity(&dir_path.join(file)).unwrap());
    }
}

#[test]
fn test_outside_git_is_not_vcs_managed() {
    if !git_available() {
        eprintln!("git not available, skipping");
        return;
    }

    let workspace = TestWorkspace::empty().unwrap();
    workspace.write_file("app.rb", b"puts 'app'").unwrap();

    let ws = workspace.open_with(Config::default()).unwrap();
    let sync = ws.synchronizer().unwrap();
    // A temp dir may still sit inside some enclosing repository.
    if sync.is_vcs_managed() {
        return;
    }

    let report = sync.sync(Path::new(".")).unwrap().done().unwrap();
    assert_eq!(report.created, 1);
    assert!(!sync.statistics(Path::new(".")).unwrap().done().unwrap().vcs_managed);
}
