//! Tests for `dpapi-cli decrypt`.

use crate::support::*;

#[test]
fn test_decrypt_console_ciphertext() {
    let t = Test::new();
    let ciphertext = t.encrypt_text(HELLO, &[]);

    let output = t.decrypt(&["--text", &ciphertext]);
    assert_success(&output);
    assert_stdout_line(&output, HELLO);
}

#[test]
fn test_entropy_file_roundtrip() {
    let t = Test::new();

    let output = t.encrypt(&[
        "--text",
        "secret",
        "--entropy",
        "pepper",
        "--output-file",
        "out.bin",
    ]);
    assert_success(&output);

    let output = t.decrypt(&["--input-file", "out.bin", "--entropy", "pepper"]);
    assert_success(&output);
    assert_stdout_line(&output, "secret");
}

#[test]
fn test_missing_entropy_fails() {
    let t = Test::new();
    assert_success(&t.encrypt(&["-t", "secret", "-e", "pepper", "-o", "out.bin"]));

    let output = t.decrypt(&["--input-file", "out.bin"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_wrong_entropy_fails() {
    let t = Test::new();
    let ciphertext = t.encrypt_text("secret", &["-e", "pepper"]);

    let output = t.decrypt(&["-t", &ciphertext, "-e", "salt"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}

#[test]
fn test_unexpected_entropy_fails() {
    let t = Test::new();
    let ciphertext = t.encrypt_text("secret", &[]);

    let output = t.decrypt(&["-t", &ciphertext, "-e", "pepper"]);
    assert_failure(&output);
}

#[test]
fn test_empty_entropy_is_no_entropy() {
    let t = Test::new();
    let ciphertext = t.encrypt_text("secret", &["--entropy", ""]);

    let output = t.decrypt(&["-t", &ciphertext]);
    assert_success(&output);
    assert_stdout_line(&output, "secret");
}

#[test]
fn test_decrypt_to_file() {
    let t = Test::new();
    let ciphertext = t.encrypt_text(HELLO, &[]);

    let output = t.decrypt(&["-t", &ciphertext, "-o", "plain.txt"]);
    assert_success(&output);
    assert_stdout_contains(&output, "Decrypted data written to:");
    assert_eq!(t.read("plain.txt"), HELLO.as_bytes());
}

#[test]
fn test_decrypt_tolerates_wrapped_base64() {
    let t = Test::new();
    let ciphertext = t.encrypt_text(HELLO, &[]);
    let (head, tail) = ciphertext.split_at(ciphertext.len() / 2);
    let wrapped = format!("{}\r\n{}\n", head, tail);

    let output = t.decrypt(&["-t", &wrapped]);
    assert_success(&output);
    assert_stdout_line(&output, HELLO);
}

#[test]
fn test_file_input_is_raw_without_armor() {
    let t = Test::new();
    let ciphertext = t.encrypt_text(HELLO, &[]);
    t.write("cipher.txt", &ciphertext);

    // Without --armor a file is taken as raw ciphertext bytes.
    let output = t.decrypt(&["-i", "cipher.txt"]);
    assert_failure(&output);

    let output = t.decrypt(&["-i", "cipher.txt", "--armor"]);
    assert_success(&output);
    assert_stdout_line(&output, HELLO);
}

#[test]
fn test_armored_file_roundtrip() {
    let t = Test::new();

    assert_success(&t.encrypt(&["-t", "armored", "-a", "-o", "out.txt", "-e", "x"]));
    let output = t.decrypt(&["-a", "-i", "out.txt", "-e", "x"]);
    assert_success(&output);
    assert_stdout_line(&output, "armored");
}

#[test]
fn test_garbage_ciphertext_fails() {
    let t = Test::new();

    // Valid base64, not a protected blob.
    let output = t.decrypt(&["-t", "SGVsbG8sIHdvcmxkIQ=="]);
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
}

#[test]
fn test_other_user_cannot_decrypt() {
    let alice = Test::new();
    let bob = Test::new();

    let ciphertext = alice.encrypt_text("for alice", &[]);
    // Bob gets a separate user key.
    bob.encrypt_text("for bob", &[]);

    let output = bob.decrypt(&["-t", &ciphertext]);
    assert_failure(&output);
}
