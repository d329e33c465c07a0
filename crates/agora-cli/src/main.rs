use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;

use agora_core::{
    ClientConfig, ClientOptions, ConfigLoader, ConversationClient, HttpBackend, MessageRenderer,
    NullRenderer, RequestOrdering, RestartPolicy, SendOutcome,
};
use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use log::LevelFilter;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

mod commands;
mod terminal_renderer;

use commands::ChatCommand;
use terminal_renderer::TerminalRenderer;

#[derive(Parser, Debug)]
#[clap(
    name = "Agora",
    author,
    version = "0.1.0",
    about = "Terminal client for the Agora dialogue backend"
)]
struct Cli {
    #[clap(
        long,
        short,
        help = "YAML configuration file [default: <config dir>/agora/config.yaml if present]"
    )]
    config: Option<PathBuf>,

    #[clap(long, help = "Backend base URL, e.g. http://localhost:5000/api")]
    base_url: Option<String>,

    #[clap(long, help = "Fixed session id (generated when omitted)")]
    session_id: Option<String>,

    #[clap(long, help = "Dialogue topic forwarded to the backend")]
    topic: Option<String>,

    #[clap(long, help = "Per-request timeout in seconds")]
    timeout_secs: Option<u64>,

    #[clap(long, help = "Keep one message in flight at a time so replies stay in order")]
    sequential: bool,

    #[clap(
        long,
        help = "Only reset the local conversation when the backend confirms the restart"
    )]
    require_backend_restart: bool,

    #[clap(long, help = "Do not print the typing indicator while a reply is pending")]
    no_typing: bool,

    #[clap(long, help = "Send a single message, print the reply to stdout and exit")]
    message: Option<String>,

    #[clap(long, short, default_value = "info")]
    log_level: String,

    #[clap(long, default_value = "agora.log", help = "File that receives log output")]
    log_file: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to a file so they never interleave with the conversation.
    let log_level_filter = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&cli.log_file)
        .with_context(|| format!("Failed to open log file {}", cli.log_file.display()))?;
    env_logger::Builder::new()
        .filter_level(log_level_filter)
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .init();

    let config = load_config(&cli).await?;
    log::info!(
        "Configuration loaded: backend {} (timeout {}s)",
        config.backend.base_url,
        config.backend.timeout_secs
    );

    let backend = Arc::new(HttpBackend::from_config(&config.backend));
    let options = ClientOptions::from_config(&config);

    match cli.message {
        Some(text) => {
            let client = ConversationClient::new(backend, Arc::new(NullRenderer), options);
            run_single_message(&client, &text).await
        }
        None => {
            let renderer: Arc<dyn MessageRenderer> =
                Arc::new(TerminalRenderer::new(!cli.no_typing));
            let client = Arc::new(ConversationClient::new(backend, renderer, options));
            println!(
                "{} session {}. Type /help for commands.",
                "Agora".bold(),
                client.session_id()
            );
            run_chat(client, BufReader::new(tokio::io::stdin())).await
        }
    }
}

async fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            log::info!("Loading configuration from file: {}", path.display());
            ConfigLoader::from_file(path).await?
        }
        None => match dirs::config_dir() {
            Some(dir) => ConfigLoader::from_file_or_default(dir.join("agora").join("config.yaml")).await?,
            None => ConfigLoader::from_str("")?,
        },
    };

    apply_overrides(cli, &mut config);
    config.validate()?;
    Ok(config)
}

/// Command-line flags win over file and environment values.
fn apply_overrides(cli: &Cli, config: &mut ClientConfig) {
    if let Some(base_url) = &cli.base_url {
        config.backend.base_url = base_url.clone();
    }
    if let Some(session_id) = &cli.session_id {
        config.session.id = Some(session_id.clone());
    }
    if let Some(topic) = &cli.topic {
        config.session.topic = Some(topic.clone());
    }
    if let Some(timeout_secs) = cli.timeout_secs {
        config.backend.timeout_secs = timeout_secs;
    }
    if cli.sequential {
        config.behavior.ordering = RequestOrdering::Sequential;
    }
    if cli.require_backend_restart {
        config.behavior.restart_policy = RestartPolicy::RequireBackend;
    }
}

async fn run_single_message(client: &ConversationClient, text: &str) -> Result<()> {
    match client.send_message(text).await? {
        SendOutcome::Replied(reply) => {
            println!("{}", reply.text());
            Ok(())
        }
        SendOutcome::Ignored => bail!("Nothing to send: the message is blank"),
        SendOutcome::Discarded => bail!("The reply was dropped by a session restart"),
    }
}

/// Drive the conversation from `input` until EOF or `/quit`, then wait for
/// every reply still in flight.
async fn run_chat<R>(client: Arc<ConversationClient>, input: R) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut in_flight = JoinSet::new();
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        // Reap finished sends so the set only holds pending ones.
        while in_flight.try_join_next().is_some() {}

        match ChatCommand::parse(&line) {
            ChatCommand::Send(text) => {
                // Replies are rendered as they arrive; the prompt stays usable meanwhile.
                let client = client.clone();
                in_flight.spawn(async move {
                    if let Err(err) = client.send_message(&text).await {
                        log::warn!("Message not delivered: {}", err);
                    }
                });
            }
            ChatCommand::Restart => {
                if let Err(err) = client.restart().await {
                    if client.options().restart_policy == RestartPolicy::Always {
                        println!(
                            "{}",
                            format!("(the backend did not confirm the restart: {err})").dim()
                        );
                    }
                }
            }
            ChatCommand::Summary => {
                if let Err(err) = client.request_summary().await {
                    log::warn!("Summary unavailable: {}", err);
                }
            }
            ChatCommand::Help => println!("{}", ChatCommand::help_text()),
            ChatCommand::Quit => break,
            ChatCommand::Unknown(name) => {
                println!("Unknown command {name}. Type /help for the list.")
            }
        }
    }

    if !in_flight.is_empty() {
        log::debug!("Waiting for {} pending replies", in_flight.len());
    }
    while let Some(joined) = in_flight.join_next().await {
        if let Err(err) = joined {
            log::error!("Send task failed: {}", err);
        }
    }

    log::info!("Leaving session {}", client.session_id());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_core::backend::{MessageReply, MessageRequest, RestartReply, SessionRequest, Summary};
    use agora_core::{ClientError, ConversationBackend, Message};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Answers every message with an echo after a fixed delay.
    struct SlowEchoBackend {
        delay: Duration,
    }

    #[async_trait]
    impl ConversationBackend for SlowEchoBackend {
        async fn send_message(&self, request: MessageRequest) -> Result<MessageReply, ClientError> {
            tokio::time::sleep(self.delay).await;
            Ok(MessageReply::ai_response(format!("echo: {}", request.message)))
        }

        async fn restart(&self, _request: SessionRequest) -> Result<RestartReply, ClientError> {
            Ok(RestartReply::default())
        }

        async fn summary(&self, _request: SessionRequest) -> Result<Summary, ClientError> {
            Ok(Summary::default())
        }
    }

    fn slow_client() -> Arc<ConversationClient> {
        Arc::new(ConversationClient::new(
            Arc::new(SlowEchoBackend {
                delay: Duration::from_millis(100),
            }),
            Arc::new(NullRenderer),
            ClientOptions::new("hackathon_user_1".into()),
        ))
    }

    #[tokio::test]
    async fn test_pending_replies_arrive_before_input_eof_returns() {
        let client = slow_client();

        run_chat(client.clone(), &b"hello\n"[..]).await.unwrap();

        assert_eq!(
            client.messages().await,
            vec![Message::user("hello"), Message::ai("echo: hello")]
        );
        assert!(!client.is_waiting_for_reply().await);
    }

    #[tokio::test]
    async fn test_quit_waits_for_pending_replies() {
        let client = slow_client();

        run_chat(client.clone(), &b"one\ntwo\n/quit\nignored\n"[..])
            .await
            .unwrap();

        let messages = client.messages().await;
        assert_eq!(messages.len(), 4);
        assert!(messages.contains(&Message::ai("echo: one")));
        assert!(messages.contains(&Message::ai("echo: two")));
        assert!(!messages.contains(&Message::user("ignored")));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "agora",
            "--base-url",
            "http://10.0.0.2:5000/api",
            "--session-id",
            "from_flag",
            "--topic",
            "virtue",
            "--timeout-secs",
            "7",
            "--sequential",
            "--require-backend-restart",
        ]);
        let mut config = ClientConfig::default();
        config.session.id = Some("from_file".to_string());

        apply_overrides(&cli, &mut config);

        assert_eq!(config.backend.base_url, "http://10.0.0.2:5000/api");
        assert_eq!(config.backend.timeout_secs, 7);
        assert_eq!(config.session.id.as_deref(), Some("from_flag"));
        assert_eq!(config.session.topic.as_deref(), Some("virtue"));
        assert_eq!(config.behavior.ordering, RequestOrdering::Sequential);
        assert_eq!(config.behavior.restart_policy, RestartPolicy::RequireBackend);
    }

    #[test]
    fn test_absent_flags_keep_config_values() {
        let cli = Cli::parse_from(["agora"]);
        let mut config = ClientConfig::default();
        config.session.topic = Some("justice".to_string());
        config.behavior.ordering = RequestOrdering::Sequential;
        let expected = config.clone();

        apply_overrides(&cli, &mut config);

        assert_eq!(config, expected);
        assert!(!cli.no_typing);
    }

    #[test]
    fn test_no_typing_flag() {
        assert!(Cli::parse_from(["agora", "--no-typing"]).no_typing);
    }
}
