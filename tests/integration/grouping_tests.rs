use finddupes::duplicates::{
    group_by_key, group_by_key_concurrent, DuplicateFinder, FinderConfig, HashKey, SizeKey,
};
use finddupes::scanner::{FileRef, HashAlgorithm, Walker, WalkerConfig};
use std::fs;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Files with a handful of repeated contents, some sharing a size but not
/// their bytes.
fn mixed_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let contents: [&[u8]; 5] = [b"alpha", b"bravo", b"alpha", b"charlie-1", b"charlie-2"];
    for i in 0..40 {
        let sub = dir.path().join(format!("d{}", i % 5)).join(format!("s{}", i % 3));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{i}.dat")), contents[i % contents.len()]).unwrap();
    }
    dir
}

fn walk(root: &Path) -> Vec<FileRef> {
    Walker::new(root, WalkerConfig::default())
        .unwrap()
        .walk()
        .collect()
}

#[test]
fn test_concurrent_finder_matches_sequential() {
    let dir = mixed_tree();

    let sequential = DuplicateFinder::new(FinderConfig::default().with_workers(0))
        .unwrap()
        .find_duplicates(dir.path())
        .0;

    for workers in [1, 2, 16] {
        let concurrent = DuplicateFinder::new(FinderConfig::default().with_workers(workers))
            .unwrap()
            .find_duplicates(dir.path())
            .0;
        assert_eq!(sequential, concurrent, "workers = {workers}");
    }
}

#[test]
fn test_many_two_file_size_classes_concurrent_matches_sequential() {
    let dir = tempdir().unwrap();
    for size in 1..=60usize {
        // Every fourth class holds two different files
        let second = if size % 4 == 0 { b'y' } else { b'x' };
        fs::write(dir.path().join(format!("a{size}.dat")), vec![b'x'; size]).unwrap();
        fs::write(dir.path().join(format!("b{size}.dat")), vec![second; size]).unwrap();
    }

    let sequential = DuplicateFinder::new(FinderConfig::default().with_workers(0))
        .unwrap()
        .find_duplicates(dir.path());
    let concurrent = DuplicateFinder::new(FinderConfig::default().with_workers(16))
        .unwrap()
        .find_duplicates(dir.path());

    assert_eq!(sequential.0, concurrent.0);
    assert_eq!(concurrent.0.len(), 45);
    assert!(concurrent.0.iter().all(|g| g.len() == 2));
}

#[test]
fn test_no_two_groups_share_content() {
    let dir = mixed_tree();

    for workers in [0, 4] {
        let config = FinderConfig::default().with_workers(workers);
        let (groups, _) = DuplicateFinder::new(config).unwrap().find_duplicates(dir.path());
        assert!(!groups.is_empty());

        let mut seen: Vec<(u64, Vec<u8>)> = Vec::new();
        for group in &groups {
            let bytes = fs::read(group.files[0].path()).unwrap();
            assert!(
                !seen.iter().any(|(size, b)| *size == group.size && *b == bytes),
                "two groups hold the same content (workers = {workers})"
            );
            seen.push((group.size, bytes));
        }

        let mut paths: Vec<_> = groups.iter().flat_map(|g| g.paths()).collect();
        let total = paths.len();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), total, "a file appears in two groups");
    }
}

#[test]
fn test_grouped_files_are_byte_identical() {
    let dir = mixed_tree();

    for algorithm in [HashAlgorithm::Blake3, HashAlgorithm::Sha256] {
        let config = FinderConfig::default().with_algorithm(algorithm).with_workers(4);
        let (groups, _) = DuplicateFinder::new(config).unwrap().find_duplicates(dir.path());

        assert!(!groups.is_empty());
        for group in &groups {
            let first = fs::read(group.files[0].path()).unwrap();
            for file in &group.files[1..] {
                assert_eq!(fs::read(file.path()).unwrap(), first);
            }
            assert_eq!(group.size, first.len() as u64);
        }
    }
}

#[test]
fn test_same_size_different_content_split() {
    let dir = mixed_tree();
    let (groups, _) = DuplicateFinder::with_defaults().find_duplicates(dir.path());

    // alpha/bravo share a size, as do the two charlie variants
    assert_eq!(groups.len(), 4);
    let sizes: Vec<u64> = groups.iter().map(|g| g.size).collect();
    assert_eq!(sizes.iter().filter(|&&s| s == 5).count(), 2);
    assert_eq!(sizes.iter().filter(|&&s| s == 9).count(), 2);
}

#[test]
fn test_group_members_keep_walk_order() {
    let dir = mixed_tree();
    let walked = walk(dir.path());
    let position = |f: &FileRef| walked.iter().position(|w| w == f).unwrap();

    let groups = group_by_key_concurrent(walked.clone(), &SizeKey::default(), 2, 8);
    for group in &groups {
        let order: Vec<usize> = group.files.iter().map(position).collect();
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(order, sorted);
    }
}

#[test]
fn test_hash_grouping_within_size_class() {
    let dir = mixed_tree();
    let walked = walk(dir.path());

    let size_groups = group_by_key(walked, &SizeKey::default(), 2);
    let hash_key = HashKey::new(HashAlgorithm::Blake3);

    let mut total = 0;
    for size_group in size_groups {
        for hash_group in group_by_key(size_group.files, &hash_key, 2) {
            assert!(hash_group.len() >= 2);
            total += hash_group.len();
        }
    }
    assert_eq!(total, 40);
}
