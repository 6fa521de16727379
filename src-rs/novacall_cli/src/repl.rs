use std::io::{self, BufRead};
use std::sync::Arc;

use tokio::sync::mpsc;

use novacall_rs::call_task::FormField;
use novacall_rs::helpers::build_api;
use novacall_rs::{App, ClientConfig};

use crate::render;
use crate::watch::follow;

pub struct REPL {
    pub config: ClientConfig,
    pub app: App,
    input: mpsc::UnboundedReceiver<io::Result<String>>,
}

/// Reads stdin on a plain thread so a pending read never holds up runtime shutdown.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let failed = line.is_err();
            if tx.send(line).is_err() || failed {
                break;
            }
        }
    });
    rx
}

impl REPL {
    pub fn new(config: ClientConfig, app: App) -> Self {
        Self {
            config,
            app,
            input: spawn_stdin_reader(),
        }
    }

    pub async fn run(&mut self) {
        render::banner(&self.config);
        loop {
            render::prompt();
            let line = match self.read_line().await {
                Some(line) => line,
                None => break,
            };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if line.starts_with('/') {
                if self.handle_command(&line).await {
                    break;
                }
                continue;
            }
            render::info("unknown input, type /help");
        }
        self.app.clear().await;
    }

    /// Ctrl-C ends the read like EOF does: it leaves `/new` or ends the session.
    async fn read_line(&mut self) -> Option<String> {
        tokio::select! {
            line = self.input.recv() => match line {
                Some(Ok(line)) => Some(line),
                Some(Err(err)) => {
                    render::error(&err.to_string());
                    None
                }
                None => None,
            },
            _ = tokio::signal::ctrl_c() => {
                render::info("");
                None
            }
        }
    }

    async fn handle_command(&mut self, line: &str) -> bool {
        let mut parts = line.splitn(2, ' ');
        let cmd = parts.next().unwrap_or("").trim_start_matches('/');
        let rest = parts.next().unwrap_or("").trim();
        match cmd {
            "exit" | "quit" => return true,
            "help" => render::help(),
            "new" => {
                if self.fill_form().await {
                    self.submit().await;
                }
            }
            "set" => self.set_field(rest),
            "form" => render::form(self.app.form()),
            "reset" => {
                *self.app.form_mut() = Default::default();
                render::info("form reset");
            }
            "submit" => self.submit().await,
            "watch" => self.watch(rest).await,
            "show" => match self.app.viewer() {
                Some(viewer) => {
                    for line in render::transcript_lines(&viewer.snapshot()) {
                        render::info(&line);
                    }
                }
                None => render::info("no transcript yet"),
            },
            "id" => match self.app.created_id() {
                Some(id) => render::created(id),
                None => render::info("no call task yet"),
            },
            "config" => render::config(&self.config),
            "base" => {
                if rest.is_empty() {
                    render::info(&format!("base: {}", self.config.backend_url));
                } else {
                    self.update_base(rest);
                }
            }
            _ => render::info("unknown command, type /help"),
        }
        false
    }

    /// Walks every field; an empty answer keeps the current value. Returns false on EOF.
    async fn fill_form(&mut self) -> bool {
        for field in FormField::ALL {
            let current = self.app.form().get(field);
            render::field_prompt(field, &current);
            let answer = match self.read_line().await {
                Some(answer) => answer,
                None => return false,
            };
            if answer.trim().is_empty() {
                continue;
            }
            if let Err(err) = self.app.form_mut().set(field, &answer) {
                render::error(&err.to_string());
            }
        }
        true
    }

    fn set_field(&mut self, rest: &str) {
        let mut parts = rest.splitn(2, ' ');
        let name = parts.next().unwrap_or("");
        let value = parts.next().unwrap_or("");
        let field = match FormField::parse(name) {
            Some(field) => field,
            None => {
                render::error(&format!("unknown field: {}", name));
                return;
            }
        };
        match self.app.form_mut().set(field, value) {
            Ok(()) => render::info(&format!("{} updated", field.name())),
            Err(err) => render::error(&err.to_string()),
        }
    }

    async fn submit(&mut self) {
        render::creating();
        match self.app.submit().await {
            Ok(id) => {
                render::created(&id);
                if let Some(viewer) = self.app.viewer() {
                    follow(viewer).await;
                }
            }
            Err(err) => render::error(&err.to_string()),
        }
    }

    async fn watch(&mut self, rest: &str) {
        if !rest.is_empty() {
            self.app.set_created_id(rest).await;
        }
        match self.app.viewer() {
            Some(viewer) => {
                follow(viewer).await;
            }
            None => render::info("nothing to watch, create a call task or pass an id"),
        }
    }

    fn update_base(&mut self, url: &str) {
        let candidate = self.config.clone().with_backend(url);
        match build_api(&candidate) {
            Ok(api) => {
                self.config = candidate;
                self.app.set_api(Arc::new(api));
                render::info("base url updated");
            }
            Err(err) => render::error(&err.to_string()),
        }
    }
}
