use core_logic::{KeyStore, PrivateKey};
use tempfile::tempdir;

fn key(byte: &str) -> String {
    byte.repeat(32)
}

#[test]
fn creates_template_file_when_absent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("private_keys.txt");

    let store = KeyStore::new(path.clone());
    let keys = store.load().unwrap();

    assert!(keys.is_empty());
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with('#'));
    assert!(content.contains("one per line"));
}

#[test]
fn loads_keys_in_file_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keys.txt");
    let body = format!("{}\n0x{}\n", key("11"), key("22"));
    std::fs::write(&path, body).unwrap();

    let keys = KeyStore::new(path).load().unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].as_str(), key("11"));
    assert_eq!(keys[1].as_str(), format!("0x{}", key("22")));
}

#[test]
fn skips_comments_blanks_and_malformed_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("keys.txt");
    let body = format!(
        "# header comment\n\n{}\nnot-a-key\n   {}   \n0xzz\n",
        key("aa"),
        key("bb")
    );
    std::fs::write(&path, body).unwrap();

    let keys = KeyStore::new(path).load().unwrap();

    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].as_str(), key("aa"));
    // surrounding whitespace is trimmed
    assert_eq!(keys[1].as_str(), key("bb"));
}

#[test]
fn debug_output_redacts_key_material() {
    let secret = key("ab");
    let k = PrivateKey::new(secret.clone());
    let rendered = format!("{:?}", k);
    assert!(!rendered.contains(&secret));
    assert!(rendered.contains("REDACTED"));
}
