use std::io::{self, Write};

use novacall_rs::call_task::{CallTaskForm, FormField};
use novacall_rs::transcript::{StopReason, TranscriptEntry, ViewerSnapshot};
use novacall_rs::ClientConfig;

pub fn banner(cfg: &ClientConfig) {
    println!("NovaCall");
    println!("Create and track outbound calls handled by an AI in Manohar's voice.");
    println!("API: {}", cfg.backend_url);
    println!("Type /help for commands.");
}

pub fn prompt() {
    print!("> ");
    let _ = io::stdout().flush();
}

pub fn field_prompt(field: FormField, current: &str) {
    let marker = if field.is_required() { "*" } else { "" };
    if current.is_empty() {
        print!("{}{}: ", field.label(), marker);
    } else {
        print!("{}{} [{}]: ", field.label(), marker, current);
    }
    let _ = io::stdout().flush();
}

pub fn help() {
    println!("Commands:");
    println!("  /help                  Show commands");
    println!("  /exit | /quit          Exit");
    println!("  /new                   Fill in the form and create a call task");
    println!("  /set <field> <value>   Set one form field (phone, intent, script, points, fallback, voice, consent)");
    println!("  /form                  Show the form");
    println!("  /reset                 Reset the form");
    println!("  /submit                Create a call task from the form");
    println!("  /watch [call-id]       Follow a transcript (Ctrl-C stops following)");
    println!("  /show                  Redraw the current transcript");
    println!("  /id                    Show the current call task id");
    println!("  /config                Show current config");
    println!("  /base <url>            Update backend URL");
}

pub fn form(form: &CallTaskForm) {
    for line in form_lines(form) {
        println!("{}", line);
    }
}

pub fn form_lines(form: &CallTaskForm) -> Vec<String> {
    let mut lines = Vec::new();
    for field in FormField::ALL {
        let marker = if field.is_required() { "*" } else { " " };
        lines.push(format!("{} {:<20} {}", marker, field.name(), form.get(field)));
    }
    if let Some(err) = form.error() {
        lines.push(format!("error: {}", err));
    }
    lines
}

/// Shown while a submission is in flight; nothing else can be submitted meanwhile.
pub fn creating() {
    println!("Creating...");
}

pub fn created(id: &str) {
    println!("Call Task ID: {}", id);
}

pub fn config(cfg: &ClientConfig) {
    println!("config:");
    println!("  backend: {}", cfg.backend_url);
    println!("  poll: {}ms", cfg.poll_interval_ms);
    println!("  limit: {}", cfg.transcript_limit);
    println!("  timeout: {}s", cfg.timeout_secs);
    match cfg.max_consecutive_failures {
        Some(max) => println!("  max failures: {}", max),
        None => println!("  max failures: unbounded"),
    }
}

pub fn entry_line(entry: &TranscriptEntry) -> String {
    let mut line = format!("[{}] {}", entry.role, entry.text);
    if let Some(ts) = entry.timestamp.as_ref().map(|ts| ts.to_local_string()) {
        if !ts.is_empty() {
            line.push_str(&format!(" • {}", ts));
        }
    }
    if let Some(outcome) = entry.outcome() {
        line.push_str(&format!("  ({})", outcome));
    }
    line
}

/// Full view of a snapshot, as it would look freshly drawn.
pub fn transcript_lines(snap: &ViewerSnapshot) -> Vec<String> {
    let mut lines = Vec::new();
    if snap.live {
        lines.push("Transcript [live]".to_string());
    } else {
        lines.push("Transcript".to_string());
    }
    if let Some(err) = &snap.error {
        lines.push(format!("error: {}", err));
    }
    if snap.items.is_empty() {
        lines.push("Waiting for entries...".to_string());
    } else {
        lines.extend(snap.items.iter().map(entry_line));
    }
    lines
}

/// Turns successive snapshots into terminal output without redrawing lines
/// that are already on screen.
#[derive(Default)]
pub struct TranscriptPrinter {
    shown: Vec<TranscriptEntry>,
    last_error: Option<String>,
    started: bool,
    waiting_shown: bool,
    finished: bool,
}

impl TranscriptPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, snap: &ViewerSnapshot) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.started {
            self.started = true;
            let badge = if snap.live { " [live]" } else { "" };
            lines.push(format!("Transcript for {}{}", snap.call_id, badge));
        }

        if snap.error.is_some() && snap.error != self.last_error {
            if let Some(err) = &snap.error {
                lines.push(format!("error: {}", err));
            }
            self.last_error = snap.error.clone();
        }

        if snap.items.is_empty() && self.shown.is_empty() {
            if !self.waiting_shown && snap.error.is_none() {
                lines.push("Waiting for entries...".to_string());
                self.waiting_shown = true;
            }
        } else if snap.items.starts_with(&self.shown) {
            lines.extend(snap.items[self.shown.len()..].iter().map(entry_line));
            self.shown = snap.items.clone();
        } else {
            lines.push("-- transcript updated --".to_string());
            if snap.items.is_empty() {
                lines.push("Waiting for entries...".to_string());
            }
            lines.extend(snap.items.iter().map(entry_line));
            self.shown = snap.items.clone();
        }

        if !snap.live && !self.finished {
            self.finished = true;
            match &snap.stopped {
                Some(StopReason::Outcome(outcome)) => lines.push(format!("call ended: {}", outcome)),
                Some(StopReason::TooManyFailures(n)) => {
                    lines.push(format!("stopped after {} failed fetches", n))
                }
                None => lines.push("stopped".to_string()),
            }
        }
        lines
    }
}

pub fn info(msg: &str) {
    println!("{}", msg);
}

pub fn error(msg: &str) {
    eprintln!("error: {}", msg);
}
