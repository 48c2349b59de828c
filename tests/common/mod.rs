#![allow(dead_code)]

use assert_cmd::Command;
use predicates::prelude::*;

/// Test helper for running astroday commands with less boilerplate
pub struct AstrodayTest {
    cmd: Command,
}

pub fn astroday_command() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("astroday"));
    cmd.env_remove("RUST_LOG");
    cmd
}

impl AstrodayTest {
    pub fn new() -> Self {
        Self {
            cmd: astroday_command(),
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<std::ffi::OsStr>,
    {
        self.cmd.args(args);
        self
    }

    pub fn arg<S: AsRef<std::ffi::OsStr>>(mut self, arg: S) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn assert_success(mut self) -> assert_cmd::assert::Assert {
        self.cmd.assert().success()
    }

    /// Assert the command succeeds and stdout contains every text
    pub fn assert_success_contains_all(mut self, texts: &[&str]) -> assert_cmd::assert::Assert {
        let mut assertion = self.cmd.assert().success();
        for text in texts {
            assertion = assertion.stdout(predicate::str::contains(*text));
        }
        assertion
    }

    /// Assert the command fails with the message on stderr
    pub fn assert_failure_with(mut self, message: &str) -> assert_cmd::assert::Assert {
        self.cmd
            .assert()
            .failure()
            .stderr(predicate::str::contains(message))
    }

    /// Get the raw command for complex assertions
    pub fn command(self) -> Command {
        self.cmd
    }

    /// Stdout of a successful run
    pub fn stdout(mut self) -> String {
        let output = self.cmd.output().unwrap();
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap()
    }
}

/// Berlin at the June solstice, local noon
pub fn berlin_solstice(command: &str) -> AstrodayTest {
    AstrodayTest::new().args([
        "--timezone=Europe/Berlin",
        "52.52",
        "13.405",
        "2024-06-21T12:00:00",
        command,
    ])
}

/// Parse `field,value` CSV into pairs, skipping the header
pub fn csv_pairs(text: &str) -> Vec<(String, String)> {
    text.lines()
        .skip(1)
        .filter_map(|line| line.split_once(','))
        .map(|(field, value)| (field.to_string(), value.to_string()))
        .collect()
}

pub fn csv_value(text: &str, field: &str) -> Option<String> {
    csv_pairs(text)
        .into_iter()
        .find(|(name, _)| name == field)
        .map(|(_, value)| value)
}

/// `HH:MM` as minutes after midnight
pub fn minutes(text: &str) -> i64 {
    let (h, m) = text.split_once(':').unwrap();
    h.parse::<i64>().unwrap() * 60 + m.parse::<i64>().unwrap()
}
