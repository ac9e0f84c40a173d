//! Integration tests for filetundra
//!
//! These tests crawl real directory trees into on-disk indexes and check the
//! index afterwards.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use filetundra::{
    config::IndexConfig,
    crawl::{CrawlError, CrawlMode, Crawler},
    index::FileIndex,
    types::{FileRecord, DIRECTORY_MIME, FALLBACK_MIME},
};
use tempfile::TempDir;

/// A small tree with nested directories, plain files and a zip archive
fn build_tree() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    std::fs::create_dir_all(root.join("photos/2019")).unwrap();
    std::fs::create_dir_all(root.join("docs")).unwrap();
    std::fs::write(root.join("docs/report.txt"), b"quarterly numbers").unwrap();
    std::fs::write(root.join("photos/2019/Holiday_Pictures-2019.raw"), b"not an image").unwrap();
    write_zip(
        &root.join("docs/bundle.zip"),
        &["vacation_notes.txt", "budget/spreadsheet.csv"],
    );
    dir
}

fn write_zip(path: &Path, members: &[&str]) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored);
    for member in members {
        zip.start_file(*member, options).unwrap();
        zip.write_all(b"contents").unwrap();
    }
    zip.finish().unwrap();
}

fn touch(path: &Path, when: SystemTime) {
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(when)
        .unwrap();
}

fn all_entries(root: &Path) -> Vec<PathBuf> {
    walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|e| e.unwrap().into_path())
        .collect()
}

fn lookup(index: &FileIndex, path: &Path) -> Option<FileRecord> {
    index
        .snapshot()
        .find_by_id(&path.to_string_lossy())
        .unwrap()
}

fn search_ids(index: &FileIndex, text: &str) -> Vec<String> {
    let snapshot = index.snapshot();
    let mut ids: Vec<String> = snapshot
        .search(text)
        .unwrap()
        .map(|r| r.unwrap().id)
        .collect();
    ids.sort();
    ids
}

/// Every visited path is retrievable with the state it had on disk
#[test]
fn test_initial_crawl_matches_filesystem() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();

    let stats = Crawler::new(&index, tree.path())
        .run(CrawlMode::Initial)
        .unwrap();

    let entries = all_entries(tree.path());
    assert_eq!(stats.visited, entries.len());
    assert_eq!(stats.inserted, entries.len());

    for path in entries {
        let record = lookup(&index, &path).expect("every visited path is indexed");
        let metadata = std::fs::metadata(&path).unwrap();
        assert_eq!(record.id, path.to_string_lossy());
        assert_eq!(record.size, metadata.len());
        assert_eq!(
            record.modified_time,
            filetundra::types::unix_seconds(metadata.modified().unwrap())
        );
        if metadata.is_dir() {
            assert_eq!(record.mime_type, DIRECTORY_MIME);
        }
    }

    let report = lookup(&index, &tree.path().join("docs/report.txt")).unwrap();
    assert_eq!(report.mime_type, FALLBACK_MIME);
    assert_eq!(report.dirname, tree.path().join("docs").to_string_lossy());

    let bundle = lookup(&index, &tree.path().join("docs/bundle.zip")).unwrap();
    assert_eq!(bundle.mime_type, "application/zip");
    assert_eq!(
        bundle.archive_filenames,
        vec!["vacation_notes.txt", "budget/spreadsheet.csv"]
    );
}

#[test]
fn test_update_after_initial_changes_nothing() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    let crawler = Crawler::new(&index, tree.path());
    let initial = crawler.run(CrawlMode::Initial).unwrap();

    let update = crawler.run(CrawlMode::Update).unwrap();
    assert_eq!(update.visited, initial.visited);
    assert_eq!(update.skipped, initial.visited);
    assert_eq!(update.inserted, 0);
    assert_eq!(update.updated, 0);
}

#[test]
fn test_touched_file_is_the_only_update() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    let crawler = Crawler::new(&index, tree.path());
    crawler.run(CrawlMode::Initial).unwrap();

    let before: Vec<FileRecord> = all_entries(tree.path())
        .iter()
        .map(|p| lookup(&index, p).unwrap())
        .collect();

    let report = tree.path().join("docs/report.txt");
    let later = SystemTime::now() + Duration::from_secs(600);
    touch(&report, later);

    let stats = crawler.run(CrawlMode::Update).unwrap();
    assert_eq!(stats.updated, 1);
    assert_eq!(stats.inserted, 0);

    for old in before {
        let new = lookup(&index, Path::new(&old.id)).unwrap();
        if Path::new(&old.id) == report {
            assert_eq!(new.modified_time, filetundra::types::unix_seconds(later));
        } else {
            assert_eq!(new, old);
        }
    }
    assert_eq!(index.num_records() as usize, all_entries(tree.path()).len());
}

#[test]
fn test_new_entries_are_inserted_by_update() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    let crawler = Crawler::new(&index, tree.path());
    crawler.run(CrawlMode::Initial).unwrap();

    let fresh = tree.path().join("photos/2019/sunset.raw");
    std::fs::write(&fresh, b"pixels").unwrap();

    let stats = crawler.run(CrawlMode::Update).unwrap();
    assert_eq!(stats.inserted, 1);
    assert!(lookup(&index, &fresh).is_some());
}

#[test]
fn test_deleted_files_stay_indexed() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    let crawler = Crawler::new(&index, tree.path());
    crawler.run(CrawlMode::Initial).unwrap();

    let report = tree.path().join("docs/report.txt");
    std::fs::remove_file(&report).unwrap();
    crawler.run(CrawlMode::Update).unwrap();

    assert!(lookup(&index, &report).is_some());
}

#[cfg(unix)]
#[test]
fn test_failed_initial_crawl_commits_nothing() {
    let tree = build_tree();
    std::os::unix::fs::symlink(
        tree.path().join("does-not-exist"),
        tree.path().join("docs/dangling"),
    )
    .unwrap();
    let index = FileIndex::in_memory().unwrap();

    let result = Crawler::new(&index, tree.path()).run(CrawlMode::Initial);
    assert!(matches!(result, Err(CrawlError::Stat { .. })));
    assert_eq!(index.num_records(), 0);
}

#[cfg(unix)]
#[test]
fn test_failed_update_keeps_previous_state() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    let crawler = Crawler::new(&index, tree.path());
    crawler.run(CrawlMode::Initial).unwrap();
    let count = index.num_records();

    let fresh = tree.path().join("docs/fresh.txt");
    std::fs::write(&fresh, b"new").unwrap();
    std::os::unix::fs::symlink(
        tree.path().join("does-not-exist"),
        tree.path().join("docs/dangling"),
    )
    .unwrap();

    assert!(crawler.run(CrawlMode::Update).is_err());
    assert_eq!(index.num_records(), count);
    assert!(lookup(&index, &fresh).is_none());
}

#[test]
fn test_search_by_basename_and_archive_member() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    Crawler::new(&index, tree.path())
        .run(CrawlMode::Initial)
        .unwrap();

    let holiday = tree
        .path()
        .join("photos/2019/Holiday_Pictures-2019.raw")
        .to_string_lossy()
        .into_owned();
    assert!(search_ids(&index, "holiday").contains(&holiday));
    assert!(search_ids(&index, "Pictures").contains(&holiday));

    let bundle = tree
        .path()
        .join("docs/bundle.zip")
        .to_string_lossy()
        .into_owned();
    assert!(search_ids(&index, "vacation").contains(&bundle));
    assert!(search_ids(&index, "spreadsheet").contains(&bundle));

    // One edit away still matches
    assert!(search_ids(&index, "reprt").contains(
        &tree.path().join("docs/report.txt").to_string_lossy().into_owned()
    ));

    assert!(search_ids(&index, "").is_empty());
    assert!(search_ids(&index, "zzzzqqqq").is_empty());
}

#[test]
fn test_lookup_by_directory() {
    let tree = build_tree();
    let index = FileIndex::in_memory().unwrap();
    Crawler::new(&index, tree.path())
        .run(CrawlMode::Initial)
        .unwrap();

    let snapshot = index.snapshot();
    let mut names: Vec<String> = snapshot
        .lookup_by_dirname(&tree.path().join("docs").to_string_lossy())
        .unwrap()
        .map(|r| r.unwrap().display_name())
        .collect();
    names.sort();
    assert_eq!(names, vec!["bundle.zip", "report.txt"]);
}

#[test]
fn test_index_persists_across_reopen() {
    let tree = build_tree();
    let scratch = TempDir::new().unwrap();
    let index_dir = scratch.path().join("filetundra.tantivy");
    let config = IndexConfig::default();

    let (index, created) = FileIndex::open_or_create(&index_dir, &config).unwrap();
    assert!(created);
    let stats = Crawler::new(&index, tree.path())
        .run(CrawlMode::Initial)
        .unwrap();
    drop(index);

    let (index, created) = FileIndex::open_or_create(&index_dir, &config).unwrap();
    assert!(!created);
    assert_eq!(index.num_records() as usize, stats.inserted);

    let report = lookup(&index, &tree.path().join("docs/report.txt")).unwrap();
    assert_eq!(report.size, 17);

    let update = Crawler::new(&index, tree.path())
        .run(CrawlMode::Update)
        .unwrap();
    assert_eq!(update.skipped, stats.visited);
}
