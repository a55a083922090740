use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use anyhow::{Context, Ok, Result};
use insta_cmd::get_cargo_bin;
use serde_json::{Value, json};
use tempfile::TempDir;
use tiny_http::{Header, Response, Server};

mod init;
mod translate;

const BIN_NAME: &str = "dictsync";

pub struct CliTest {
    _temp_dir: TempDir,
    project_dir: PathBuf,
}

impl CliTest {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().canonicalize()?;
        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
        })
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<()> {
        let file_path = self.project_dir.join(path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory:{}", parent.display()))?;
        }

        fs::write(&file_path, content)
            .with_context(|| format!("Failed to write file: {}", file_path.display()))?;

        Ok(())
    }

    pub fn create_dir(&self, path: &str) -> Result<()> {
        let dir = self.project_dir.join(path);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory:{}", dir.display()))
    }

    pub fn root(&self) -> &Path {
        &self.project_dir
    }

    pub fn command(&self) -> Command {
        let mut cmd = Command::new(get_cargo_bin(BIN_NAME));
        cmd.current_dir(&self.project_dir);
        cmd.env_clear();
        cmd.env("NO_COLOR", "1"); // Disable colors for consistent test output
        cmd
    }

    /// Config file selecting the OpenAI provider served by `server`.
    pub fn write_config(&self, server: &MockOpenAi) -> Result<()> {
        self.write_file(
            ".dictsyncrc.json",
            &json!({
                "provider": "openai",
                "providers": {"openai": {"baseUrl": server.base_url()}}
            })
            .to_string(),
        )
    }

    /// `dictsync translate locales` against `server`.
    pub fn translate_command(&self, server: &MockOpenAi) -> Result<Command> {
        self.write_config(server)?;
        let mut cmd = self.command();
        cmd.args(["translate", "locales"]);
        cmd.env("OPENAI_API_KEY", "sk-test");
        Ok(cmd)
    }

    pub fn read_file(&self, path: &str) -> Result<String> {
        let file_path = self.project_dir.join(path);
        fs::read_to_string(&file_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))
    }
}

/// Chat completions endpoint answering every unit with `[<target>] <source>`.
pub struct MockOpenAi {
    addr: String,
    requests: Arc<AtomicUsize>,
}

impl MockOpenAi {
    pub fn start() -> Result<Self> {
        let server = Server::http("127.0.0.1:0").map_err(|e| anyhow::anyhow!(e))?;
        let addr = format!(
            "http://{}",
            server
                .server_addr()
                .to_ip()
                .context("mock server has no IP address")?
        );
        let requests = Arc::new(AtomicUsize::new(0));
        let counter = requests.clone();

        thread::spawn(move || {
            for mut request in server.incoming_requests() {
                counter.fetch_add(1, Ordering::SeqCst);
                let mut body = String::new();
                let _ = request.as_reader().read_to_string(&mut body);
                let response = answer(&body).unwrap_or_else(|| json!({"choices": []}));
                let _ = request.respond(
                    Response::from_string(response.to_string()).with_header(
                        Header::from_bytes("Content-Type", "application/json")
                            .expect("valid header"),
                    ),
                );
            }
        });

        Ok(Self { addr, requests })
    }

    pub fn base_url(&self) -> String {
        format!("{}/v1", self.addr)
    }

    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

fn answer(body: &str) -> Option<Value> {
    let body: Value = serde_json::from_str(body).ok()?;
    let prompt = body["messages"][1]["content"].as_str()?;
    let payload = prompt.split("'''").nth(1)?.trim();
    let items: Vec<Value> = serde_json::from_str(payload).ok()?;

    let output: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "id": item["id"],
                "value": format!(
                    "[{}] {}",
                    item["targetLocale"].as_str().unwrap_or_default(),
                    item["sourceText"].as_str().unwrap_or_default()
                ),
            })
        })
        .collect();

    Some(json!({
        "choices": [{"message": {"content": json!({"output": output}).to_string()}}]
    }))
}
