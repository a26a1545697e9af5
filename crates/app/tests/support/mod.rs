#![forbid(unsafe_code)]
#![allow(dead_code)]

use serde_json::Value;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("cm_app_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) struct Server {
    child: Child,
    stdin: Option<ChildStdin>,
    stdout: BufReader<ChildStdout>,
    storage_dir: PathBuf,
    next_id: i64,
}

impl Server {
    pub(crate) fn start(test_name: &str) -> Self {
        Self::start_with_args(test_name, &[])
    }

    pub(crate) fn start_with_args(test_name: &str, extra_args: &[&str]) -> Self {
        Self::start_in(temp_dir(test_name), extra_args)
    }

    pub(crate) fn start_in(storage_dir: PathBuf, extra_args: &[&str]) -> Self {
        std::fs::create_dir_all(&storage_dir).expect("create storage dir");
        let mut child = Command::new(env!("CARGO_BIN_EXE_check-matrix"))
            .arg("--storage-dir")
            .arg(&storage_dir)
            .args(extra_args)
            .env_remove("CHECK_MATRIX_LOG")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn check-matrix");

        let stdin = child.stdin.take().expect("stdin");
        let stdout = BufReader::new(child.stdout.take().expect("stdout"));

        Self {
            child,
            stdin: Some(stdin),
            stdout,
            storage_dir,
            next_id: 0,
        }
    }

    pub(crate) fn storage_dir(&self) -> &Path {
        &self.storage_dir
    }

    pub(crate) fn send_raw(&mut self, line: &str) {
        let stdin = self.stdin.as_mut().expect("stdin open");
        writeln!(stdin, "{line}").expect("write request");
        stdin.flush().expect("flush request");
    }

    pub(crate) fn recv(&mut self) -> Value {
        let mut line = String::new();
        self.stdout.read_line(&mut line).expect("read response");
        assert!(!line.trim().is_empty(), "empty response line");
        serde_json::from_str(&line).expect("parse response json")
    }

    pub(crate) fn call(&mut self, method: &str, params: Value) -> Value {
        self.next_id += 1;
        let req = serde_json::json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": method,
            "params": params,
        });
        self.send_raw(&req.to_string());
        let resp = self.recv();
        assert_eq!(resp["id"], serde_json::json!(self.next_id), "response id mismatch");
        resp
    }

    pub(crate) fn result(&mut self, method: &str, params: Value) -> Value {
        let resp = self.call(method, params);
        match resp.get("result") {
            Some(result) => result.clone(),
            None => panic!("{method} failed: {resp}"),
        }
    }

    /// Closes stdin and waits for a clean exit.
    pub(crate) fn shutdown(mut self) -> PathBuf {
        drop(self.stdin.take());
        let status = self.child.wait().expect("wait for exit");
        assert!(status.success(), "server exited with {status}");
        self.storage_dir.clone()
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        drop(self.stdin.take());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
