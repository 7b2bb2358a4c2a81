// Chunk: docs/chunks/file_persistence - Load and save

//! Integration tests for loading, saving and directory navigation.

use std::fs;

use lite_edit_buffer::{BufferError, BufferMode, TextBuffer};

#[test]
fn test_save_then_load_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let content = b"line one\r\nline two\n\ttabbed\x01\n";

    let mut buf = TextBuffer::from_bytes(content);
    buf.save_as(&path).unwrap();
    assert_eq!(fs::read(&path).unwrap(), content);
    assert_eq!(buf.pathname(), Some(path.as_path()));

    let mut reloaded = TextBuffer::new();
    reloaded.load(&path).unwrap();
    assert_eq!(reloaded.as_bytes(), content);
    assert_eq!(reloaded.cursor(), 0);
    assert!(!reloaded.is_modified());
}

#[test]
fn test_load_resets_cursor_and_mark() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "abc\n").unwrap();

    let mut buf = TextBuffer::from_str("something longer");
    buf.set_cursor(10);
    buf.set_mark_at(3);
    buf.load(&path).unwrap();

    assert_eq!(buf.content(), "abc\n");
    assert_eq!(buf.cursor(), 0);
    assert_eq!(buf.mark(), None);
    assert_eq!(*buf.mode(), BufferMode::Text);
}

#[test]
fn test_load_missing_file_leaves_buffer_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.txt");

    let mut buf = TextBuffer::from_str("keep me");
    buf.set_cursor(4);
    let err = buf.load(&missing).unwrap_err();

    assert!(matches!(err, BufferError::Io { .. }));
    assert_eq!(
        err.io_error().map(|e| e.kind()),
        Some(std::io::ErrorKind::NotFound)
    );
    assert_eq!(buf.content(), "keep me");
    assert_eq!(buf.cursor(), 4);
    assert_eq!(buf.pathname(), None);
}

#[test]
fn test_save_without_pathname_fails() {
    let mut buf = TextBuffer::from_str("x");
    assert!(matches!(buf.save(), Err(BufferError::NoPathname)));
}

#[test]
fn test_save_uses_loaded_pathname() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.txt");
    fs::write(&path, "abc").unwrap();

    let mut buf = TextBuffer::new();
    buf.load(&path).unwrap();
    buf.set_cursor(3);
    buf.insert_str("def");
    assert!(buf.is_modified());
    buf.save().unwrap();

    assert!(!buf.is_modified());
    assert_eq!(fs::read_to_string(&path).unwrap(), "abcdef");
}

#[test]
fn test_save_to_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("no/such/dir/file.txt");

    let mut buf = TextBuffer::from_str("x");
    assert!(matches!(buf.save_as(&path), Err(BufferError::Io { .. })));
    assert_eq!(buf.pathname(), None);
}

#[test]
fn test_load_directory_enters_navigation_mode() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "bee").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();

    let mut buf = TextBuffer::new();
    buf.load(dir.path()).unwrap();

    assert_eq!(buf.content(), "..\nb.txt\nsub\n");
    match buf.mode() {
        BufferMode::Navigation {
            directory,
            entry_count,
        } => {
            assert_eq!(directory, dir.path());
            assert_eq!(*entry_count, 3);
        }
        BufferMode::Text => panic!("expected navigation mode"),
    }
}

#[test]
fn test_navigation_targets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "bee").unwrap();

    let mut buf = TextBuffer::new();
    buf.load(dir.path()).unwrap();

    assert_eq!(buf.navigation_entry().unwrap().as_deref(), Some(".."));
    assert_eq!(
        buf.navigation_target().unwrap().as_deref(),
        dir.path().parent()
    );

    buf.next_line();
    assert_eq!(buf.navigation_entry().unwrap().as_deref(), Some("b.txt"));
    assert_eq!(
        buf.navigation_target().unwrap(),
        Some(dir.path().join("b.txt"))
    );

    // The empty line after the final entry names nothing
    buf.next_line();
    assert_eq!(buf.navigation_entry().unwrap(), None);
    assert_eq!(buf.navigation_target().unwrap(), None);
}

#[test]
fn test_navigate_into_file_switches_back_to_text() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("b.txt"), "bee").unwrap();

    let mut buf = TextBuffer::new();
    buf.load(dir.path()).unwrap();
    buf.next_line();
    let target = buf.navigation_target().unwrap().unwrap();
    buf.load(&target).unwrap();

    assert_eq!(buf.content(), "bee");
    assert!(!buf.mode().is_navigation());
}
