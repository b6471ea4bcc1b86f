use finddupes::duplicates::{DuplicateFinder, DuplicateGroup, FinderConfig};
use finddupes::scanner::WalkerConfig;
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

const COPIES: [&str; 4] = ["a", "b/c", "d", "e/f/g"];

/// `empty.txt`, `8bytes.txt` and `12bytes.txt` four times each in different
/// subdirectories, plus one `unique.gif`.
fn fixture() -> TempDir {
    let dir = tempdir().unwrap();
    for sub in COPIES {
        let sub = dir.path().join(sub);
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join("empty.txt"), b"").unwrap();
        fs::write(sub.join("8bytes.txt"), b"12345678").unwrap();
        fs::write(sub.join("12bytes.txt"), b"hello world!").unwrap();
    }
    fs::write(dir.path().join("unique.gif"), b"GIF89a").unwrap();
    dir
}

fn find(root: &Path, config: FinderConfig) -> Vec<DuplicateGroup> {
    DuplicateFinder::new(config).unwrap().find_duplicates(root).0
}

fn names(group: &DuplicateGroup) -> Vec<&str> {
    group.files.iter().map(|f| f.name()).collect()
}

fn all_named(group: &DuplicateGroup, name: &str) -> bool {
    group.files.iter().all(|f| f.name() == name)
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let (groups, summary) = DuplicateFinder::with_defaults().find_duplicates(dir.path());

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_default_bounds() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default());

    assert_eq!(groups.len(), 3);
    for group in &groups {
        assert_eq!(group.len(), 4);
        let first = group.files[0].name();
        assert!(all_named(group, first), "mixed group: {:?}", names(group));
    }
}

#[test]
fn test_scan_min_size_excludes_empty_files() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_size_bounds(1, 1_000_000_000));

    assert_eq!(groups.len(), 2);
    for group in &groups {
        assert_eq!(group.len(), 4);
        assert!(!all_named(group, "empty.txt"));
    }
}

#[test]
fn test_scan_only_empty_files() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_size_bounds(0, 0));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);
    assert!(all_named(&groups[0], "empty.txt"));
}

#[test]
fn test_scan_files_smaller_than_8_bytes() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_size_bounds(0, 7));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);
    assert!(all_named(&groups[0], "empty.txt"));
}

#[test]
fn test_scan_files_larger_than_8_bytes() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_size_bounds(9, 1_000_000_000));

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);
    assert!(all_named(&groups[0], "12bytes.txt"));
}

#[test]
fn test_scan_files_8_bytes_or_larger() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_size_bounds(8, 1_000_000_000));

    assert_eq!(groups.len(), 2);
    for group in &groups {
        assert_eq!(group.len(), 4);
        assert!(all_named(group, "8bytes.txt") || all_named(group, "12bytes.txt"));
    }
}

#[test]
fn test_scan_include_glob() {
    let dir = fixture();
    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(false, vec!["*.gif".to_string()], vec![]))
        .with_min_group_size(1);
    let groups = find(dir.path(), config);

    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0]), vec!["unique.gif"]);
}

#[test]
fn test_scan_include_glob_and_size() {
    let dir = fixture();
    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(false, vec!["*.txt".to_string()], vec![]))
        .with_size_bounds(7, 9);
    let groups = find(dir.path(), config);

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 4);
    assert!(all_named(&groups[0], "8bytes.txt"));
}

#[test]
fn test_scan_exclude_glob() {
    let dir = fixture();
    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(false, vec![], vec!["*.txt".to_string()]))
        .with_min_group_size(1);
    let groups = find(dir.path(), config);

    assert_eq!(groups.len(), 1);
    assert_eq!(names(&groups[0]), vec!["unique.gif"]);
}

#[test]
fn test_scan_exclude_directory() {
    let dir = fixture();
    let config = FinderConfig::default()
        .with_walker_config(WalkerConfig::new(false, vec![], vec!["e".to_string()]));
    let groups = find(dir.path(), config);

    assert_eq!(groups.len(), 3);
    for group in &groups {
        assert_eq!(group.len(), 3);
        assert!(group.files.iter().all(|f| !f.path().starts_with(dir.path().join("e"))));
    }
}

#[test]
fn test_scan_min_group_size_larger_than_any_group() {
    let dir = fixture();
    let groups = find(dir.path(), FinderConfig::default().with_min_group_size(5));
    assert!(groups.is_empty());
}

#[test]
fn test_scan_root_is_a_file() {
    let dir = fixture();
    let root = dir.path().join("unique.gif");
    let groups = find(&root, FinderConfig::default().with_min_group_size(1));
    assert!(groups.is_empty());
}

#[test]
fn test_scan_summary_counts() {
    let dir = fixture();
    let (groups, summary) = DuplicateFinder::with_defaults().find_duplicates(dir.path());

    assert_eq!(groups.len(), 3);
    assert_eq!(summary.total_files, 13);
    assert_eq!(summary.size_candidates, 12);
    assert_eq!(summary.size_groups, 3);
    assert_eq!(summary.duplicate_groups, 3);
    assert_eq!(summary.duplicate_files, 9);
    assert_eq!(summary.reclaimable_space, 3 * 8 + 3 * 12);
}

#[cfg(unix)]
#[test]
fn test_scan_symlinked_directory_only_when_following() {
    let dir = tempdir().unwrap();
    let real = dir.path().join("real");
    fs::create_dir(&real).unwrap();
    fs::write(real.join("x.bin"), b"payload").unwrap();

    let outside = tempdir().unwrap();
    fs::write(outside.path().join("y.bin"), b"payload").unwrap();
    std::os::unix::fs::symlink(outside.path(), dir.path().join("link")).unwrap();

    let not_following = find(dir.path(), FinderConfig::default());
    assert!(not_following.is_empty());

    let following = find(
        dir.path(),
        FinderConfig::default().with_walker_config(WalkerConfig::new(true, vec![], vec![])),
    );
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].len(), 2);
}
