use splash::{ProcessError, ProcessOptions, Processor};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const PAGE: &str = "<html><head></head><body><pre><code class=\"language-go\">package main\n</code></pre></body></html>";

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn options(inputs: Vec<std::path::PathBuf>) -> ProcessOptions {
    ProcessOptions {
        inputs,
        style: "github".to_string(),
        ..ProcessOptions::default()
    }
}

#[test]
fn test_mirrors_tree_into_output_dir() {
    let input = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(input.path(), "index.html", PAGE);
    write(input.path(), "docs/guide.htm", PAGE);
    write(input.path(), "docs/notes.txt", "<pre>not html</pre>");

    let stats = Processor::new(ProcessOptions {
        output_dir: Some(output.path().to_path_buf()),
        ..options(vec![input.path().to_path_buf()])
    })
    .process()
    .unwrap();

    assert_eq!(stats.files_processed, 2);
    assert_eq!(stats.files_failed, 0);
    assert_eq!(stats.blocks_highlighted, 2);
    assert!(stats.bytes_output > stats.bytes_input);

    let index = fs::read_to_string(output.path().join("index.html")).unwrap();
    assert!(index.contains("<pre class=\"splash\">"), "{index}");
    assert!(index.contains("<style>"), "{index}");
    assert!(output.path().join("docs/guide.htm").exists());
    assert!(!output.path().join("docs/notes.txt").exists());

    // Inputs are left alone
    assert_eq!(fs::read_to_string(input.path().join("index.html")).unwrap(), PAGE);
}

#[test]
fn test_in_place_and_idempotent() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "page.html", PAGE);
    let file = dir.path().join("page.html");

    let first = Processor::new(options(vec![file.clone()])).process().unwrap();
    assert_eq!(first.blocks_highlighted, 1);
    let once = fs::read_to_string(&file).unwrap();
    assert_ne!(once, PAGE);

    let second = Processor::new(options(vec![file.clone()])).process().unwrap();
    assert_eq!(second.blocks_highlighted, 0);
    assert_eq!(second.blocks_skipped, 1);
    assert_eq!(fs::read_to_string(&file).unwrap(), once);
}

#[test]
fn test_failing_file_is_reported_and_left_unwritten() {
    let dir = TempDir::new().unwrap();
    let broken = "<body><pre>no head here</pre></body>";
    write(dir.path(), "good.html", PAGE);
    write(dir.path(), "broken.html", broken);

    let stats = Processor::new(options(vec![dir.path().to_path_buf()]))
        .process()
        .unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 1);
    assert!(stats.failed_files[0].0.ends_with("broken.html"));
    let message = &stats.failed_files[0].1;
    assert!(message.contains("broken.html"), "{message}");
    assert_eq!(message.matches("HTML should contain").count(), 1, "{message}");
    assert_eq!(fs::read_to_string(dir.path().join("broken.html")).unwrap(), broken);
}

#[test]
fn test_missing_input_is_an_error() {
    let dir = TempDir::new().unwrap();
    let result = Processor::new(options(vec![dir.path().join("missing.html")])).process();
    assert!(result.is_err());
}

#[test]
fn test_colliding_outputs_are_an_error() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(first.path(), "index.html", PAGE);
    write(second.path(), "index.html", PAGE);

    let err = Processor::new(ProcessOptions {
        output_dir: Some(output.path().to_path_buf()),
        ..options(vec![first.path().to_path_buf(), second.path().to_path_buf()])
    })
    .process()
    .unwrap_err();

    assert!(matches!(err, ProcessError::DuplicateOutput { .. }), "{err}");
    assert!(err.to_string().contains("index.html"), "{err}");
    assert!(!output.path().join("index.html").exists());
}

#[test]
fn test_repeated_input_is_processed_once() {
    let dir = TempDir::new().unwrap();
    let output = TempDir::new().unwrap();
    write(dir.path(), "index.html", PAGE);
    let file = dir.path().join("index.html");

    let stats = Processor::new(ProcessOptions {
        output_dir: Some(output.path().to_path_buf()),
        ..options(vec![file.clone(), dir.path().to_path_buf(), file])
    })
    .process()
    .unwrap();

    assert_eq!(stats.files_processed, 1);
    assert_eq!(stats.files_failed, 0);
    assert!(output.path().join("index.html").exists());
}
