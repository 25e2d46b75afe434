//! Staging store integration tests

use docchat::store::format_size;
use docchat::store::StagingStore;

#[test]
fn staging_list_reflects_uploads_exactly() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::new(dir.path().join("temp")).unwrap();

    let names = ["report.pdf", "notes.txt", "data.csv"];
    for name in names {
        store.save(name, format!("contents of {name}").as_bytes()).unwrap();
    }

    let listed: Vec<String> = store.list().unwrap().into_iter().map(|d| d.name).collect();
    let mut expected: Vec<String> = names.iter().map(ToString::to_string).collect();
    expected.sort();
    assert_eq!(listed, expected);
}

#[test]
fn staging_directory_creation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("temp");

    let store = StagingStore::new(&path).unwrap();
    store.save("a.txt", b"x").unwrap();

    // Re-opening an existing directory keeps its contents
    let reopened = StagingStore::new(&path).unwrap();
    assert_eq!(reopened.list().unwrap().len(), 1);
}

#[test]
fn delete_removes_exactly_the_named_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = StagingStore::new(dir.path()).unwrap();

    store.save("keep.txt", b"keep").unwrap();
    store.save("drop.txt", b"drop").unwrap();

    store.delete("drop.txt").unwrap();

    let names: Vec<String> = store.list().unwrap().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["keep.txt".to_string()]);

    // Deleting a non-existent file errors and leaves the rest alone
    assert!(store.delete("drop.txt").is_err());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn sizes_use_binary_units_with_decreasing_magnitude() {
    // Magnitude is monotonically decreasing across unit boundaries
    let kb = 1024u64;
    assert_eq!(format_size(kb - 1), "1023.00 B");
    assert_eq!(format_size(kb), "1.00 KB");
    assert_eq!(format_size(kb * kb - 1), "1024.00 KB");
    assert_eq!(format_size(kb * kb), "1.00 MB");
    assert_eq!(format_size(kb * kb * kb), "1.00 GB");

    let listed_size = |bytes: &[u8]| {
        let dir = tempfile::tempdir().unwrap();
        let store = StagingStore::new(dir.path()).unwrap();
        store.save("f.txt", bytes).unwrap();
        store.list().unwrap()[0].human_size.clone()
    };
    assert_eq!(listed_size(&[0u8; 2048]), "2.00 KB");
}
