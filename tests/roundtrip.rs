//! End-to-end integration tests driving the public API through real temp
//! files, the way a caller embedding this crate would use it.

use std::fs;

use cryptstream::{decrypt, encrypt, read_header, DecryptOptions, EncryptOptions};

#[test]
fn hello_world_scenario_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("message.txt");
    fs::write(&input, "Hello, World! This is a test file.").unwrap();

    let artifact = dir.path().join("message.cstream");
    encrypt(&input, &artifact, b"password123", EncryptOptions::default()).unwrap();

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let outcome = decrypt(&artifact, &output_dir, b"password123", DecryptOptions::default()).unwrap();

    assert_eq!(fs::read_to_string(outcome.output_path).unwrap(), "Hello, World! This is a test file.");
}

#[test]
fn single_chunk_boundary_file_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ones.bin");
    fs::write(&input, vec![0x61u8; 1_048_576]).unwrap();

    let artifact = dir.path().join("ones.cstream");
    let options = EncryptOptions { enable_gzip: false, ..EncryptOptions::default() };
    encrypt(&input, &artifact, b"pw", options).unwrap();

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let outcome = decrypt(&artifact, &output_dir, b"pw", DecryptOptions::default()).unwrap();

    assert_eq!(fs::read(outcome.output_path).unwrap(), vec![0x61u8; 1_048_576]);
}

#[test]
fn directory_with_nested_subdirectory_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("project");
    fs::create_dir(&src).unwrap();
    fs::write(src.join("file1.txt"), "File 1 content").unwrap();
    fs::write(src.join("file2.txt"), "File 2 content").unwrap();
    fs::create_dir(src.join("subdir")).unwrap();
    fs::write(src.join("subdir").join("file3.txt"), "File 3 content").unwrap();

    let artifact = dir.path().join("project.cstream");
    encrypt(&src, &artifact, b"pw", EncryptOptions::default()).unwrap();

    let header = read_header(&artifact, b"pw", cryptstream::kdf::KdfParams::default()).unwrap();
    assert!(header.was_directory);

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let outcome = decrypt(&artifact, &output_dir, b"pw", DecryptOptions::default()).unwrap();

    let restored = outcome.output_path;
    assert_eq!(fs::read_to_string(restored.join("file1.txt")).unwrap(), "File 1 content");
    assert_eq!(fs::read_to_string(restored.join("file2.txt")).unwrap(), "File 2 content");
    assert_eq!(fs::read_to_string(restored.join("subdir").join("file3.txt")).unwrap(), "File 3 content");
}

#[test]
fn wrong_password_fails_and_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("secret.txt");
    fs::write(&input, "top secret").unwrap();

    let artifact = dir.path().join("secret.cstream");
    encrypt(&input, &artifact, b"correct_password", EncryptOptions::default()).unwrap();

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let err = decrypt(&artifact, &output_dir, b"wrong_password", DecryptOptions::default()).unwrap_err();

    assert!(err.is_auth_failure());
    assert!(!output_dir.join("secret.txt").exists());
}

#[test]
fn single_bit_flip_in_trailing_mac_is_detected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.bin");
    fs::write(&input, "some file contents to protect").unwrap();

    let artifact_path = dir.path().join("data.cstream");
    encrypt(&input, &artifact_path, b"pw", EncryptOptions::default()).unwrap();

    let mut bytes = fs::read(&artifact_path).unwrap();
    let flip_at = bytes.len() - 20;
    bytes[flip_at] ^= 0x01;
    fs::write(&artifact_path, &bytes).unwrap();

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    let err = decrypt(&artifact_path, &output_dir, b"pw", DecryptOptions::default()).unwrap_err();
    assert!(err.is_auth_failure());
}

#[test]
fn truncated_artifact_fails_to_decrypt() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.bin");
    fs::write(&input, vec![7u8; 5000]).unwrap();

    let artifact_path = dir.path().join("data.cstream");
    encrypt(&input, &artifact_path, b"pw", EncryptOptions::default()).unwrap();

    let mut bytes = fs::read(&artifact_path).unwrap();
    bytes.truncate(bytes.len() - 100);
    fs::write(&artifact_path, &bytes).unwrap();

    let output_dir = dir.path().join("out");
    fs::create_dir(&output_dir).unwrap();
    assert!(decrypt(&artifact_path, &output_dir, b"pw", DecryptOptions::default()).is_err());
}

#[test]
fn different_chunk_sizes_both_roundtrip_to_the_same_plaintext() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.bin");
    let payload = vec![0x5Au8; 50_000];
    fs::write(&input, &payload).unwrap();

    for chunk_size in [1024u32, 4096, 64 * 1024] {
        let artifact = dir.path().join(format!("data-{chunk_size}.cstream"));
        let options = EncryptOptions { chunk_size, ..EncryptOptions::default() };
        encrypt(&input, &artifact, b"pw", options).unwrap();

        let output_dir = dir.path().join(format!("out-{chunk_size}"));
        fs::create_dir(&output_dir).unwrap();
        let outcome = decrypt(&artifact, &output_dir, b"pw", DecryptOptions::default()).unwrap();
        assert_eq!(fs::read(outcome.output_path).unwrap(), payload);
    }
}

#[test]
fn progress_callback_is_monotonic_and_reaches_the_total() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("data.bin");
    fs::write(&input, vec![3u8; 200_000]).unwrap();

    let calls = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
    let calls_clone = calls.clone();

    let artifact = dir.path().join("data.cstream");
    let options = EncryptOptions {
        chunk_size: 16 * 1024,
        on_progress: Some(Box::new(move |processed, total| calls_clone.lock().unwrap().push((processed, total)))),
        ..EncryptOptions::default()
    };
    encrypt(&input, &artifact, b"pw", options).unwrap();

    let recorded = calls.lock().unwrap();
    assert!(!recorded.is_empty());
    let mut last = 0u64;
    for &(processed, total) in recorded.iter() {
        assert!(processed >= last);
        assert!(processed <= total);
        last = processed;
    }
    assert_eq!(recorded.last().unwrap().0, recorded.last().unwrap().1);
}

#[test]
fn read_header_does_not_require_a_successful_full_decrypt() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("notes.txt");
    fs::write(&input, "some header-worthy content").unwrap();

    let artifact = dir.path().join("notes.cstream");
    let outcome = encrypt(&input, &artifact, b"pw", EncryptOptions::default()).unwrap();

    let header = read_header(&artifact, b"pw", cryptstream::kdf::KdfParams::default()).unwrap();
    assert_eq!(header.original_name, outcome.header.original_name);
    assert_eq!(header.uuid, outcome.header.uuid);
}

#[test]
fn cleanup_leaves_no_output_file_when_input_path_is_missing() {
    let dir = tempfile::tempdir().unwrap();
    let missing_input = dir.path().join("does-not-exist.txt");
    let artifact = dir.path().join("out.cstream");

    let err = encrypt(&missing_input, &artifact, b"pw", EncryptOptions::default()).unwrap_err();
    assert!(matches!(err, cryptstream::CryptError::InvalidInput(_)));
    assert!(!artifact.exists());
}
