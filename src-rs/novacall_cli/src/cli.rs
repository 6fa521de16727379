use clap::{Args, Parser, Subcommand};

use novacall_rs::call_task::CallTaskForm;
use novacall_rs::ClientConfig;

#[derive(Parser, Debug)]
#[command(name = "novacall", version, about = "Create outbound call tasks and follow their transcripts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Backend base URL (defaults to the address baked in at build time)
    #[arg(long, global = true, env = "NOVACALL_BACKEND_URL", value_name = "URL")]
    pub backend: Option<String>,

    /// Transcript poll period in milliseconds
    #[arg(long = "poll-ms", global = true, env = "NOVACALL_POLL_MS", value_name = "MS")]
    pub poll_ms: Option<u64>,

    /// Maximum transcript entries requested per poll
    #[arg(long, global = true, value_name = "N")]
    pub limit: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", global = true, value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Stop polling after this many consecutive failed fetches (0 = never)
    #[arg(long = "max-failures", global = true, value_name = "N")]
    pub max_failures: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive session (the default)
    Repl,
    /// Create a call task, then follow its transcript
    ///
    /// Example: novacall create --phone +11234567890 --intent "Confirm appointment" --voice-model manohar-voice-v1
    Create(CreateArgs),
    /// Follow the transcript of an existing call
    ///
    /// Example: novacall watch 665f1c2e9b
    Watch { call_id: String },
}

#[derive(Args, Debug, Default)]
pub struct CreateArgs {
    /// Target phone number in E.164 format
    #[arg(long, default_value = "")]
    pub phone: String,
    /// What the call is about
    #[arg(long, default_value = "")]
    pub intent: String,
    /// Voice model identifier
    #[arg(long = "voice-model", default_value = "")]
    pub voice_model: String,
    /// Full conversation script
    #[arg(long)]
    pub script: Option<String>,
    /// Comma-separated talking points
    #[arg(long = "talking-points")]
    pub talking_points: Option<String>,
    /// Semicolon-separated fallback triggers (replaces the defaults)
    #[arg(long)]
    pub fallback: Option<String>,
    /// Play the recording disclaimer
    #[arg(long)]
    pub consent: bool,
    /// Print the id and exit without following the transcript
    #[arg(long = "no-watch")]
    pub no_watch: bool,
}

impl CreateArgs {
    pub fn apply(&self, form: &mut CallTaskForm) {
        form.target_phone = self.phone.clone();
        form.intent = self.intent.clone();
        form.voice_model_id = self.voice_model.clone();
        if let Some(script) = &self.script {
            form.script = script.clone();
        }
        if let Some(points) = &self.talking_points {
            form.talking_points = points.clone();
        }
        if let Some(fallback) = &self.fallback {
            form.fallback_conditions = fallback.clone();
        }
        form.consent_required = self.consent;
    }
}

impl Cli {
    /// Flags and env vars layered over the built-in defaults.
    pub fn client_config(&self) -> ClientConfig {
        let mut cfg = ClientConfig::default();
        if let Some(backend) = &self.backend {
            cfg = cfg.with_backend(backend);
        }
        if let Some(ms) = self.poll_ms {
            cfg.poll_interval_ms = ms;
        }
        if let Some(limit) = self.limit {
            cfg.transcript_limit = limit;
        }
        if let Some(secs) = self.timeout_secs {
            cfg.timeout_secs = secs;
        }
        if let Some(max) = self.max_failures {
            cfg.max_consecutive_failures = (max > 0).then_some(max);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "novacall",
            "--backend",
            "http://calls.internal:9000",
            "--poll-ms",
            "250",
            "--max-failures",
            "5",
            "watch",
            "abc123",
        ])
        .unwrap();
        let cfg = cli.client_config();
        assert_eq!(cfg.backend_url, "http://calls.internal:9000");
        assert_eq!(cfg.poll_interval_ms, 250);
        assert_eq!(cfg.transcript_limit, 200);
        assert_eq!(cfg.max_consecutive_failures, Some(5));
        assert!(matches!(cli.command, Some(Command::Watch { ref call_id }) if call_id == "abc123"));
    }

    #[test]
    fn create_args_fill_the_form() {
        let cli = Cli::try_parse_from([
            "novacall",
            "create",
            "--phone",
            "+11234567890",
            "--intent",
            "Reschedule",
            "--voice-model",
            "manohar-voice-v1",
            "--talking-points",
            "greet, ask",
            "--consent",
        ])
        .unwrap();
        let args = match cli.command {
            Some(Command::Create(args)) => args,
            other => panic!("unexpected command: {:?}", other),
        };
        let mut form = CallTaskForm::new();
        args.apply(&mut form);
        let req = form.to_request();
        assert_eq!(req.target_phone, "+11234567890");
        assert_eq!(req.talking_points, Some(vec!["greet".to_string(), "ask".to_string()]));
        assert_eq!(req.fallback_conditions.map(|f| f.len()), Some(3));
        assert!(req.consent_required);
        assert!(!args.no_watch);
    }

    #[test]
    fn zero_max_failures_means_unbounded() {
        let cli = Cli::try_parse_from(["novacall", "--max-failures", "0"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.client_config().max_consecutive_failures, None);
    }
}
