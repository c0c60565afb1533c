//! End-to-end scenarios over real temporary file trees.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use regex_search_core::{search, EffectiveConfig, SearchHandle, SearchRequest};
use tempfile::tempdir;

async fn run(
    pattern: &str,
    roots: Vec<PathBuf>,
    config: EffectiveConfig,
) -> regex_search_core::SearchResultBundle {
    let request = SearchRequest::new(pattern, roots, config);
    search(request, SearchHandle::new()).await
}

#[tokio::test]
async fn two_matches_on_one_line_both_recorded() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("a.txt");
    fs::write(&file, "foo bar foo\n").unwrap();

    let bundle = run("foo", vec![file.clone()], EffectiveConfig::default()).await;

    assert_eq!(bundle.results.len(), 2);
    assert_eq!(bundle.results[0].path, file);
    assert_eq!(bundle.results[0].line_number, 1);
    assert_eq!(bundle.results[0].line, "foo bar foo");
    assert_eq!(
        (bundle.results[0].match_start, bundle.results[0].match_end),
        (0, 3)
    );
    assert_eq!(
        (bundle.results[1].match_start, bundle.results[1].match_end),
        (8, 11)
    );
}

#[tokio::test]
async fn results_across_files_ordered_by_path_then_line() {
    let dir = tempdir().unwrap();
    let b = dir.path().join("b");
    fs::create_dir(&b).unwrap();
    fs::write(b.join("one.txt"), "x\nhit\n").unwrap();
    fs::write(b.join("two.txt"), "hit\n").unwrap();

    let bundle = run("hit", vec![b.clone()], EffectiveConfig::default()).await;

    assert_eq!(bundle.results.len(), 2);
    assert_eq!(bundle.results[0].path, b.join("one.txt"));
    assert_eq!(bundle.results[0].line_number, 2);
    assert_eq!(bundle.results[1].path, b.join("two.txt"));
    assert_eq!(bundle.results[1].line_number, 1);
}

#[tokio::test]
async fn hidden_and_binary_files_are_skipped() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join(".hidden.txt"), "x\n").unwrap();
    fs::write(dir.path().join("image.png"), "x\n").unwrap();
    fs::write(dir.path().join("code.txt"), "xyz\n").unwrap();

    let bundle = run("x", vec![dir.path().to_path_buf()], EffectiveConfig::default()).await;

    assert_eq!(bundle.results.len(), 1);
    assert_eq!(bundle.results[0].path, dir.path().join("code.txt"));
    assert_eq!(
        (bundle.results[0].match_start, bundle.results[0].match_end),
        (0, 1)
    );
}

#[tokio::test]
async fn invalid_pattern_is_the_only_error_reported() {
    let dir = tempdir().unwrap();
    let bundle = run(
        "[unclosed",
        vec![dir.path().to_path_buf()],
        EffectiveConfig::default(),
    )
    .await;

    assert!(bundle.results.is_empty());
    assert!(!bundle.truncated);
    assert_eq!(bundle.errors.len(), 1);
    assert!(bundle.errors[0].contains("Invalid regex pattern"));
}

#[tokio::test]
async fn result_cap_truncates_but_stays_sorted() {
    let dir = tempdir().unwrap();
    for i in 0..10 {
        let content = "hit\n".repeat(100);
        fs::write(dir.path().join(format!("f{i}.txt")), content).unwrap();
    }

    let config = EffectiveConfig::new(1024 * 1024, 250, 8, true, false);
    let bundle = run("hit", vec![dir.path().to_path_buf()], config).await;

    assert_eq!(bundle.results.len(), 250);
    assert!(bundle.truncated);
    let mut sorted = bundle.results.clone();
    regex_search_core::sorting::sort_records(&mut sorted);
    assert_eq!(sorted, bundle.results);
}

#[tokio::test]
async fn cancellation_mid_run_returns_partial_results() {
    let dir = tempdir().unwrap();
    for i in 0..1000 {
        fs::write(dir.path().join(format!("f{i}.txt")), "hit\n").unwrap();
    }

    // A single worker makes the race deterministic: cancellation is checked
    // once per file, so cancelling right after the first completion leaves
    // the remaining 999 files undispatched.
    let config = EffectiveConfig::new(1024 * 1024, 10_000, 1, true, false);
    let request = SearchRequest::new("hit", vec![dir.path().to_path_buf()], config);
    let handle = SearchHandle::new();
    let canceller = handle.clone();

    let search_task = tokio::spawn(search(request, handle));

    // Give at least one worker a chance to complete a file before cancelling.
    loop {
        if canceller.progress().processed_files >= 1 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    canceller.cancel();

    let bundle = search_task.await.unwrap();

    assert!(bundle.progress.cancelled);
    assert!(!bundle.results.is_empty());
    assert!(bundle.results.len() < 1000);
}
