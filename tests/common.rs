use std::collections::HashMap;
use std::fs;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};
use std::thread;
use tempfile::TempDir;

#[allow(dead_code)]
pub struct TestContext {
    pub _temp_dir: TempDir,
    pub config_path: PathBuf,
    pub cache_dir: PathBuf,
    pub bin_path: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.json");
        let cache_dir = temp_dir.path().join("cache");

        let bin_path = PathBuf::from(env!("CARGO_BIN_EXE_update-rpm-github"));

        Self {
            _temp_dir: temp_dir,
            config_path,
            cache_dir,
            bin_path,
        }
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::new(&self.bin_path);
        cmd.env("UPDATE_RPM_GITHUB_CONFIG", &self.config_path);
        cmd.env("UPDATE_RPM_GITHUB_CACHE_DIR", &self.cache_dir);
        // Nothing listens on the discard port; API calls fail without leaving the host
        cmd.env("UPDATE_RPM_GITHUB_API_URL", "http://127.0.0.1:9");
        cmd.env_remove("GITHUB_TOKEN");
        cmd.env_remove("RUST_LOG");
        for proxy in [
            "HTTP_PROXY",
            "http_proxy",
            "HTTPS_PROXY",
            "https_proxy",
            "ALL_PROXY",
            "all_proxy",
        ] {
            cmd.env_remove(proxy);
        }
        cmd.env("HOME", self._temp_dir.path());
        cmd.env("XDG_CONFIG_HOME", self._temp_dir.path().join("config"));
        cmd
    }

    /// Write an executable shell script into the test directory.
    pub fn write_script(&self, name: &str, body: &str) -> PathBuf {
        let path = self._temp_dir.path().join(name);
        let mut file = fs::File::create(&path).expect("Failed to create script");
        file.write_all(format!("#!/bin/sh\n{}\n", body).as_bytes())
            .expect("Failed to write script");
        file.sync_all().expect("Failed to sync script");
        drop(file);
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
        path
    }

    /// Stand-in for `rpm`: every artifact is `name` at `version`, and
    /// `installed` is what the database reports (`None` for absent).
    pub fn fake_rpm(&self, name: &str, version: &str, installed: Option<&str>) -> PathBuf {
        let query = match installed {
            Some(v) => format!("printf '%s\\n' '{}'", v),
            None => "echo \"package $4 is not installed\"; exit 1".to_string(),
        };
        let body = [
            "case \"$1\" in".to_string(),
            "  -qp)".to_string(),
            "    case \"$3\" in".to_string(),
            format!("      *NAME*) printf '%s' '{}' ;;", name),
            format!("      *VERSION*) printf '%s' '{}' ;;", version),
            "    esac ;;".to_string(),
            format!("  -q) {} ;;", query),
            "esac".to_string(),
        ]
        .join("\n");
        self.write_script("rpm", &body)
    }

    /// Stand-in for the package manager: records its arguments in
    /// `installer.log` and exits with `code`.
    pub fn fake_installer(&self, code: i32) -> PathBuf {
        let log = self.installer_log();
        let body = format!("printf '%s\\n' \"$@\" > '{}'\nexit {}", log.display(), code);
        self.write_script("dnf", &body)
    }

    pub fn installer_log(&self) -> PathBuf {
        self._temp_dir.path().join("installer.log")
    }
}

/// Minimal HTTP server standing in for the GitHub API and its downloads.
///
/// Every response closes the connection; unknown paths get a 404.
#[allow(dead_code)]
pub struct ReleaseServer {
    base_url: String,
    routes: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

#[allow(dead_code)]
impl ReleaseServer {
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
        let base_url = format!("http://{}", listener.local_addr().expect("No local address"));
        let routes: Arc<Mutex<HashMap<String, Vec<u8>>>> = Arc::default();
        let requests: Arc<Mutex<Vec<String>>> = Arc::default();

        let (thread_routes, thread_requests) = (routes.clone(), requests.clone());
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                serve(stream, &thread_routes, &thread_requests);
            }
        });

        Self {
            base_url,
            routes,
            requests,
        }
    }

    pub fn url(&self) -> &str {
        &self.base_url
    }

    pub fn route(&self, path: &str, body: impl Into<Vec<u8>>) {
        self.routes
            .lock()
            .unwrap()
            .insert(path.to_string(), body.into());
    }

    /// Serve `repo`'s latest release with one downloadable asset per name.
    pub fn publish_release(&self, repo: &str, tag: &str, assets: &[&str]) {
        let assets: Vec<serde_json::Value> = assets
            .iter()
            .map(|name| {
                let path = format!("/download/{}", name);
                self.route(&path, format!("payload of {}", name));
                serde_json::json!({
                    "name": name,
                    "browser_download_url": format!("{}{}", self.base_url, path),
                })
            })
            .collect();
        let release = serde_json::json!({ "tag_name": tag, "assets": assets });
        self.route(
            &format!("/repos/{}/releases/latest", repo),
            release.to_string(),
        );
    }

    /// Paths requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[allow(dead_code)]
fn serve(
    mut stream: TcpStream,
    routes: &Mutex<HashMap<String, Vec<u8>>>,
    requests: &Mutex<Vec<String>>,
) {
    let mut head = Vec::new();
    let mut buf = [0u8; 1024];
    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => return,
            Ok(n) => head.extend_from_slice(&buf[..n]),
        }
    }

    let head = String::from_utf8_lossy(&head);
    let path = head
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    requests.lock().unwrap().push(path.clone());

    let (status, body) = match routes.lock().unwrap().get(&path) {
        Some(body) => ("200 OK", body.clone()),
        None => ("404 Not Found", b"{\"message\":\"Not Found\"}".to_vec()),
    };
    let header = format!(
        "HTTP/1.1 {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        status,
        body.len()
    );
    let _ = stream.write_all(header.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

#[allow(dead_code)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        }
    }
}

#[allow(dead_code)]
impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        if !self.status.success() {
            panic!(
                "Command failed with status {:?}\nstdout: {}\nstderr: {}",
                self.status.code(),
                self.stdout,
                self.stderr
            );
        }
        self
    }

    pub fn assert_exit_code(&self, code: i32) -> &Self {
        assert_eq!(
            self.status.code(),
            Some(code),
            "Unexpected exit status\nstdout: {}\nstderr: {}",
            self.stdout,
            self.stderr
        );
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Stdout did not contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Stderr did not contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }
}
