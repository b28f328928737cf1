use std::fs;
use std::io::Write;

use acidlog::staging::{AtomicFileWriter, StagedFile, StagingNamer};
use acidlog::DirectoryView;

use super::{names_of, raw_names, setup_temp_dir};

// =============================================================================
// Publication
// =============================================================================

#[test]
fn test_write_then_close_publishes() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("myfile1");

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    let n = writer.write(b"Hello World\n").unwrap();
    assert_eq!(n, 12);

    // Not visible under its real name yet
    assert!(!path.exists());
    assert!(!raw_names(&dir).contains(&"myfile1".to_string()));
    assert!(writer.staging_path().exists());

    let published = writer.close().unwrap();
    assert_eq!(published, path);
    assert_eq!(fs::read(&path).unwrap(), b"Hello World\n");
    assert_eq!(raw_names(&dir), vec!["myfile1".to_string()]);
}

#[test]
fn test_second_file_does_not_disturb_first() {
    let (_temp, dir) = setup_temp_dir();
    let first = dir.join("myfile1");
    let second = dir.join("myfile2");

    let mut writer = AtomicFileWriter::open(&first).unwrap();
    writer.write(b"one").unwrap();
    writer.close().unwrap();

    let mut writer = AtomicFileWriter::open(&second).unwrap();
    writer.write(b"two").unwrap();

    let view = DirectoryView::new(&dir);
    assert_eq!(names_of(&view.list_all().unwrap()), vec!["myfile1"]);
    assert!(first.exists());

    writer.close().unwrap();
    assert_eq!(names_of(&view.list_all().unwrap()), vec!["myfile1", "myfile2"]);
}

#[test]
fn test_open_removes_existing_file() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("report.csv");
    fs::write(&path, b"old contents").unwrap();

    let mut writer = AtomicFileWriter::open(&path).unwrap();

    // Destructive overwrite: the old file is gone before close
    assert!(!path.exists());

    writer.write(b"new").unwrap();
    writer.close().unwrap();
    assert_eq!(fs::read(&path).unwrap(), b"new");
}

#[test]
fn test_multiple_writes_append() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("parts");

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    for i in 0..100 {
        writer.write(format!("line {}\n", i).as_bytes()).unwrap();
    }
    let total = writer.bytes_written();
    writer.close().unwrap();

    let content = fs::read_to_string(&path).unwrap();
    assert_eq!(content.len() as u64, total);
    assert_eq!(content.lines().count(), 100);
    assert_eq!(content.lines().last(), Some("line 99"));
}

#[test]
fn test_io_write_trait() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("formatted");

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    writeln!(writer, "answer={}", 42).unwrap();
    writer.flush().unwrap();
    assert!(!path.exists());
    writer.close().unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "answer=42\n");
}

#[test]
fn test_empty_file_is_published() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("empty");

    AtomicFileWriter::open(&path).unwrap().close().unwrap();

    assert!(path.exists());
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

// =============================================================================
// Staging Names
// =============================================================================

#[test]
fn test_staging_name_carries_pid() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("data.bin");

    let writer = AtomicFileWriter::open(&path).unwrap();
    let expected = format!("data.bin.{}.acid", std::process::id());
    assert_eq!(raw_names(&dir), vec![expected]);
    assert_eq!(writer.final_path(), path);
    writer.close().unwrap();
}

#[test]
fn test_explicit_namer() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("data.bin");
    let staged = StagedFile::with_namer(&path, StagingNamer::for_process(77)).unwrap();

    let mut writer = AtomicFileWriter::with_staged(staged).unwrap();
    assert!(dir.join("data.bin.77.acid").exists());
    writer.write(b"x").unwrap();
    writer.close().unwrap();

    assert!(!dir.join("data.bin.77.acid").exists());
    assert_eq!(fs::read(&path).unwrap(), b"x");
}

// =============================================================================
// Failure Paths
// =============================================================================

#[test]
fn test_drop_without_close_discards() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("partial");

    {
        let mut writer = AtomicFileWriter::open(&path).unwrap();
        writer.write(b"half a rec").unwrap();
    }

    assert!(!path.exists());
    assert!(raw_names(&dir).is_empty());
}

#[test]
fn test_open_in_missing_directory_fails() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("no_such_dir").join("file");

    let result = AtomicFileWriter::open(&path);
    assert!(matches!(result, Err(acidlog::AcidError::Io(_))));
}

#[test]
fn test_failed_close_discards_staged_file() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("target");

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    writer.write(b"never published").unwrap();
    let staging = writer.staging_path().to_path_buf();

    // A non-empty directory now occupies the public name, so the rename fails
    fs::create_dir(&path).unwrap();
    fs::write(path.join("inner"), b"").unwrap();

    let result = writer.close();

    assert!(matches!(result, Err(acidlog::AcidError::Io(_))));
    assert!(!staging.exists());
    assert!(path.is_dir());
    assert_eq!(raw_names(&dir), vec!["target"]);
}
