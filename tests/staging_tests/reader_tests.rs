use std::fs;
use std::io::BufRead;

use acidlog::staging::{AtomicFileReader, AtomicFileWriter};
use acidlog::{AcidError, DirectoryView};

use super::{names_of, setup_temp_dir};

// =============================================================================
// Acquisition
// =============================================================================

#[test]
fn test_open_missing_file_is_not_found() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("absent");

    match AtomicFileReader::open(&path) {
        Err(AcidError::NotFound { path: reported }) => assert_eq!(reported, path),
        Err(e) => panic!("Expected NotFound, got {}", e),
        Ok(_) => panic!("Expected NotFound, got a reader"),
    }
}

#[test]
fn test_held_file_is_busy() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("queue.item");
    fs::write(&path, b"payload").unwrap();

    let reader = AtomicFileReader::open(&path).unwrap();
    assert!(!path.exists());

    let second = AtomicFileReader::open(&path);
    assert!(second.unwrap_err().is_not_found());

    // Data is still on disk under the staging name
    assert_eq!(fs::read(reader.staging_path()).unwrap(), b"payload");

    reader.close().unwrap();
    assert!(path.exists());

    let mut again = AtomicFileReader::open(&path).unwrap();
    assert_eq!(again.read_all().unwrap(), b"payload");
    again.close().unwrap();
}

#[test]
fn test_file_being_written_is_not_found() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("incoming");

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    writer.write(b"in progress").unwrap();
    assert!(AtomicFileReader::open(&path).unwrap_err().is_not_found());

    writer.close().unwrap();
    let mut reader = AtomicFileReader::open(&path).unwrap();
    assert_eq!(reader.read_to_string().unwrap(), "in progress");
    reader.close().unwrap();
}

#[test]
fn test_held_file_hidden_from_listing() {
    let (_temp, dir) = setup_temp_dir();
    fs::write(dir.join("a"), b"1").unwrap();
    fs::write(dir.join("b"), b"2").unwrap();

    let view = DirectoryView::new(&dir);
    let reader = AtomicFileReader::open(dir.join("a")).unwrap();
    assert_eq!(names_of(&view.list_all().unwrap()), vec!["b"]);

    reader.close().unwrap();
    assert_eq!(names_of(&view.list_all().unwrap()), vec!["a", "b"]);
}

// =============================================================================
// Reading
// =============================================================================

#[test]
fn test_read_in_chunks() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("chunks");
    fs::write(&path, b"abcdefghij").unwrap();

    let mut reader = AtomicFileReader::open(&path).unwrap();
    assert_eq!(reader.read(4).unwrap(), b"abcd");
    assert_eq!(reader.read(4).unwrap(), b"efgh");
    assert_eq!(reader.read(4).unwrap(), b"ij");
    assert!(reader.read(4).unwrap().is_empty());
    reader.close().unwrap();
}

#[test]
fn test_read_line_by_line() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("lines");
    fs::write(&path, "first\nsecond\nthird").unwrap();

    let mut reader = AtomicFileReader::open(&path).unwrap();
    assert_eq!(reader.read_line().unwrap(), "first\n");
    assert_eq!(reader.read_lines().unwrap(), vec!["second", "third"]);
    assert_eq!(reader.read_line().unwrap(), "");
    reader.close().unwrap();
}

#[test]
fn test_bufread_trait() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("records");
    fs::write(&path, "1\n2\n3\n").unwrap();

    let mut reader = AtomicFileReader::open(&path).unwrap();
    let sum: u32 = (&mut reader)
        .lines()
        .map(|l| l.unwrap().parse::<u32>().unwrap())
        .sum();
    assert_eq!(sum, 6);
    reader.close().unwrap();
}

#[test]
fn test_round_trip_content_unchanged() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("blob");
    let payload: Vec<u8> = (0..=255u8).cycle().take(64 * 1024).collect();

    let mut writer = AtomicFileWriter::open(&path).unwrap();
    writer.write(&payload).unwrap();
    writer.close().unwrap();

    let mut reader = AtomicFileReader::open(&path).unwrap();
    assert_eq!(reader.read_all().unwrap(), payload);
    reader.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), payload);
}

// =============================================================================
// Release
// =============================================================================

#[test]
fn test_drop_restores_file() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("dropped");
    fs::write(&path, b"keep me").unwrap();

    {
        let mut reader = AtomicFileReader::open(&path).unwrap();
        let _ = reader.read(2).unwrap();
    }

    assert_eq!(fs::read(&path).unwrap(), b"keep me");
}

#[test]
fn test_close_returns_path() {
    let (_temp, dir) = setup_temp_dir();
    let path = dir.join("returned");
    fs::write(&path, b"").unwrap();

    let reader = AtomicFileReader::open(&path).unwrap();
    assert_eq!(reader.final_path(), path);
    assert_eq!(reader.close().unwrap(), path);
}
