//! Command helper methods for Test.

use super::{assert_success, stdout, Test, MACHINE_ID};
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a dpapi-cli command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - DPAPI_CLI_HOME set to the temporary home directory
    /// - The local backend with a fixed machine identity
    /// - Current directory set to the test working directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("dpapi-cli").expect("failed to find dpapi-cli binary");
        cmd.env("DPAPI_CLI_HOME", self.home.path());
        cmd.env("DPAPI_CLI_MACHINE_ID", MACHINE_ID);
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("DPAPI_CLI_SCOPE");
        cmd.env("DPAPI_CLI_BACKEND", "local");
        cmd.env_remove("DPAPI_CLI_LOG");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Run dpapi-cli with raw arguments.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run dpapi-cli")
    }

    /// Shortcut for `dpapi-cli encrypt ...`.
    pub fn encrypt(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("encrypt")
            .args(args)
            .output()
            .expect("failed to run dpapi-cli encrypt")
    }

    /// Shortcut for `dpapi-cli decrypt ...`.
    pub fn decrypt(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("decrypt")
            .args(args)
            .output()
            .expect("failed to run dpapi-cli decrypt")
    }

    /// Encrypt `text` to the console and return the base64 ciphertext.
    pub fn encrypt_text(&self, text: &str, extra: &[&str]) -> String {
        let mut args = vec!["--text", text];
        args.extend_from_slice(extra);
        let output = self.encrypt(&args);
        assert_success(&output);
        stdout(&output).trim_end().to_string()
    }
}
