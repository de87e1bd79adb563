//! Tests for `dpapi-cli encrypt`.

use crate::support::*;

#[test]
fn test_encrypt_text_prints_base64() {
    let t = Test::new();

    let output = t.encrypt(&["--text", HELLO]);
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.ends_with('\n'));
    assert_base64(out.trim_end());
}

#[test]
fn test_encrypt_is_not_deterministic() {
    let t = Test::new();

    let a = t.encrypt_text(HELLO, &[]);
    let b = t.encrypt_text(HELLO, &[]);
    assert_ne!(a, b);
}

#[test]
fn test_encrypt_to_file_writes_raw_bytes() {
    let t = Test::new();
    let out_path = t.path("out.bin");

    let output = t.encrypt(&["--text", "secret", "--output-file", out_path.to_str().unwrap()]);
    assert_success(&output);
    assert_stdout_contains(&output, "Encrypted data written to:");
    assert_stdout_contains(&output, "out.bin");

    let bytes = t.read("out.bin");
    assert!(!bytes.is_empty());
    assert_ne!(bytes, b"secret");
}

#[test]
fn test_relative_output_resolves_against_cwd() {
    let t = Test::new();

    let output = t.encrypt(&["-t", "secret", "-o", "nested.bin"]);
    assert_success(&output);
    assert!(t.path("nested.bin").exists());
    // The confirmation shows the resolved absolute path.
    assert_stdout_contains(&output, &t.path("nested.bin").display().to_string());
}

#[test]
fn test_input_file_overrides_text() {
    let t = Test::new();
    t.write("plain.txt", "from file");

    let output = t.encrypt(&["--text", "from flag", "--input-file", "plain.txt", "-o", "out.bin"]);
    assert_success(&output);

    let output = t.decrypt(&["-i", "out.bin"]);
    assert_success(&output);
    assert_stdout_line(&output, "from file");
}

#[test]
fn test_f_is_an_alias_for_input_file() {
    let t = Test::new();
    t.write("plain.txt", "aliased");

    let output = t.encrypt(&["-f", "plain.txt", "-o", "out.bin"]);
    assert_success(&output);

    let output = t.decrypt(&["-f", "out.bin"]);
    assert_success(&output);
    assert_stdout_line(&output, "aliased");
}

#[test]
fn test_binary_file_roundtrip() {
    let t = Test::new();
    t.write("blob.bin", all_bytes());

    assert_success(&t.encrypt(&["-i", "blob.bin", "-o", "blob.enc"]));
    assert_success(&t.decrypt(&["-i", "blob.enc", "-o", "blob.out"]));
    assert_eq!(t.read("blob.out"), all_bytes());
}

#[test]
fn test_armor_writes_base64_text() {
    let t = Test::new();

    let output = t.encrypt(&["--text", "secret", "--armor", "-o", "out.txt"]);
    assert_success(&output);

    let text = String::from_utf8(t.read("out.txt")).unwrap();
    assert!(text.ends_with('\n'));
    assert_base64(text.trim_end());
}

#[cfg(unix)]
#[test]
fn test_output_file_is_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::new();
    assert_success(&t.encrypt(&["-t", "secret", "-o", "out.bin"]));

    let mode = std::fs::metadata(t.path("out.bin"))
        .unwrap()
        .permissions()
        .mode()
        & 0o777;
    assert_eq!(mode, 0o600);
}
