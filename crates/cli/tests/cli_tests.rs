use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn diskcache(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_diskcache"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run diskcache")
}

fn diskcache_with_stdin(dir: &Path, args: &[&str], input: &[u8]) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_diskcache"))
        .arg("--dir")
        .arg(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to run diskcache");

    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(input)
        .unwrap();

    child.wait_with_output().unwrap()
}

#[test]
fn test_set_from_stdin_then_get() {
    let temp_dir = TempDir::new().unwrap();

    let output = diskcache_with_stdin(temp_dir.path(), &["set", "greeting"], b"hello\n");
    assert!(output.status.success(), "{output:?}");

    let output = diskcache(temp_dir.path(), &["get", "greeting"]);
    assert!(output.status.success());
    assert_eq!(output.stdout, b"hello\n");
}

#[test]
fn test_set_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let cache_dir = temp_dir.path().join("cache");
    let input = temp_dir.path().join("input.bin");
    let value: Vec<u8> = (0..300_000u32).map(|i| (i % 253) as u8).collect();
    std::fs::write(&input, &value).unwrap();

    let output = diskcache(
        &cache_dir,
        &["set", "blob", "--file", input.to_str().unwrap()],
    );
    assert!(output.status.success(), "{output:?}");

    let output = diskcache(&cache_dir, &["get", "blob"]);
    assert_eq!(output.stdout, value);
}

#[test]
fn test_get_missing_fails() {
    let temp_dir = TempDir::new().unwrap();

    let output = diskcache(temp_dir.path(), &["get", "absent"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_delete_twice_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    diskcache_with_stdin(temp_dir.path(), &["set", "k"], b"v");
    assert!(diskcache(temp_dir.path(), &["delete", "k"]).status.success());
    assert!(diskcache(temp_dir.path(), &["delete", "k"]).status.success());
    assert!(!diskcache(temp_dir.path(), &["get", "k"]).status.success());
}

#[test]
fn test_path_and_keys_agree() {
    let temp_dir = TempDir::new().unwrap();
    diskcache_with_stdin(temp_dir.path(), &["set", "listed"], b"v");

    let output = diskcache(temp_dir.path(), &["path", "listed"]);
    let line = String::from_utf8(output.stdout).unwrap();
    let (storage_key, path) = line.trim_end().split_once('\t').unwrap();
    assert_eq!(storage_key.len(), 64);
    assert_eq!(std::fs::read(path).unwrap(), b"v");

    let output = diskcache(temp_dir.path(), &["keys"]);
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim_end(), storage_key);

    let output = diskcache(temp_dir.path(), &["keys", "--prefix", &storage_key[..4]]);
    assert_eq!(String::from_utf8(output.stdout).unwrap().trim_end(), storage_key);

    assert!(!diskcache(temp_dir.path(), &["keys", "--prefix", "zz"]).status.success());
}

#[test]
fn test_clear() {
    let temp_dir = TempDir::new().unwrap();
    diskcache_with_stdin(temp_dir.path(), &["set", "a"], b"1");
    diskcache_with_stdin(temp_dir.path(), &["set", "b"], b"2");

    assert!(diskcache(temp_dir.path(), &["clear"]).status.success());

    let output = diskcache(temp_dir.path(), &["keys"]);
    assert!(output.stdout.is_empty());
}
