use std::sync::Arc;
use tollgate_keystore::{KeyStore, KeyStoreError, MemoryKeyStore, StorageMedium};
use tollgate_types::Credentials;

#[test]
fn memory_roundtrip() {
    let store = MemoryKeyStore::new();
    let creds = Credentials::new(Some("AK"), Some("CK"));
    store.write(StorageMedium::File, &creds).unwrap();
    assert_eq!(store.read(StorageMedium::File).unwrap(), creds);
    assert!(store.contains(StorageMedium::File));
    assert!(!store.contains(StorageMedium::Registry));
}

#[test]
fn memory_with_keys_and_delete() {
    let store = MemoryKeyStore::with_keys(StorageMedium::Registry, Credentials::new(Some("AK"), None));
    assert!(store.contains(StorageMedium::Registry));
    store.delete(StorageMedium::Registry).unwrap();
    assert!(store.read(StorageMedium::Registry).unwrap().is_empty());
}

#[test]
fn arc_store_delegates() {
    let store = Arc::new(MemoryKeyStore::new());
    let shared: Arc<MemoryKeyStore> = Arc::clone(&store);
    shared
        .write(StorageMedium::File, &Credentials::new(Some("AK"), None))
        .unwrap();
    assert!(store.contains(StorageMedium::File));
}

#[test]
fn medium_names() {
    assert_eq!(StorageMedium::File.to_string(), "file");
    assert_eq!(StorageMedium::default(), StorageMedium::Registry);
    assert_eq!(StorageMedium::ALL.len(), 2);
    let json = serde_json::to_string(&StorageMedium::Registry).unwrap();
    assert_eq!(json, "\"registry\"");
}

#[test]
fn error_display_unavailable() {
    let err = KeyStoreError::Unavailable(StorageMedium::File, "no home".into());
    let msg = err.to_string();
    assert!(msg.contains("file"));
    assert!(msg.contains("no home"));
}
