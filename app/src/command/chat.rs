use std::io::Write;

use mnemo_config::Config;
use mnemo_orchestrator::ConversationOptions;
use tracing::info;

use crate::runtime;

/// Input parameters for the Chat command strategy.
#[derive(Debug, Clone)]
pub struct ChatInput {
    pub user_id: String,
    pub session_id: String,
    pub role_id: String,
    /// Single message to send (non-interactive mode); falls back to a
    /// stdin REPL when absent.
    pub message: Option<String>,
}

/// Strategy for a local conversation turn against the orchestrator
/// directly, without going through `mnemo_http` — useful for smoke-testing
/// a deployment's configuration from the same machine.
#[derive(Debug, Clone, Copy)]
pub struct ChatStrategy;

impl super::CommandStrategy for ChatStrategy {
    type Input = ChatInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let rt = runtime::build(&config).await?;

        info!("chatting as user={} session={}", input.user_id, input.session_id);

        match &input.message {
            Some(message) => {
                let (response, _meta) = rt
                    .orchestrator
                    .chat(
                        &input.user_id,
                        &input.session_id,
                        &input.role_id,
                        message,
                        &ConversationOptions::default(),
                    )
                    .await?;
                println!("{response}");
            }
            None => run_repl(&rt, &input).await?,
        }

        Ok(())
    }
}

async fn run_repl(rt: &runtime::Runtime, input: &ChatInput) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "/quit" || line == "/exit" {
            break;
        }

        let (response, meta) = rt
            .orchestrator
            .chat(&input.user_id, &input.session_id, &input.role_id, line, &ConversationOptions::default())
            .await?;

        println!("{response}");
        if meta.extraction_triggered {
            println!("(memory extraction triggered)");
        }
    }

    Ok(())
}
