use crate::artifact::ArtifactStore;
use crate::cli::Args;
use crate::config::Config;
use crate::conversation::Conversation;
use crate::core::error::ChatError;
use crate::display;
use crate::input::{self, LineEditor, PipedInput, PromptSource};
use crate::orchestrator::{Orchestrator, RetryPolicy};
use crate::providers::openai::OpenAIProvider;
use crate::web::WebServer;
use is_terminal::IsTerminal;
use std::io;
use std::sync::Arc;

pub struct Application {
    pub args: Args,
    pub config: Config,
    pub orchestrator: Arc<Orchestrator>,
}

impl Application {
    pub fn new(args: Args, config: Config, api_key: String) -> Self {
        let provider = Arc::new(OpenAIProvider::new(api_key, &config));
        let artifacts = ArtifactStore::new(config.output_dir.clone(), config.preview_images);
        let orchestrator = Orchestrator::new(
            provider.clone(),
            provider,
            artifacts,
            RetryPolicy::from_config(&config),
        );

        Self {
            args,
            config,
            orchestrator: Arc::new(orchestrator),
        }
    }

    pub async fn run(&self) -> Result<(), ChatError> {
        if self.args.web {
            self.handle_web_mode().await
        } else {
            self.handle_terminal_mode().await
        }
    }

    async fn handle_web_mode(&self) -> Result<(), ChatError> {
        let server = WebServer::new(&self.config, self.orchestrator.clone());
        server.start().await
    }

    async fn handle_terminal_mode(&self) -> Result<(), ChatError> {
        let mut conversation = Conversation::new(self.config.history_limit);

        if io::stdin().is_terminal() {
            display::display_welcome();
            let mut editor = LineEditor::new()?;
            run_session(&mut editor, &self.orchestrator, &mut conversation).await?;
        } else {
            let mut piped = PipedInput::new(io::stdin().lock());
            run_session(&mut piped, &self.orchestrator, &mut conversation).await?;
        }

        display::display_goodbye();
        Ok(())
    }
}

/// Runs the prompt loop, then lets the source tidy up. A failure while
/// tidying up does not change the exit status.
pub async fn run_session(
    source: &mut dyn PromptSource,
    orchestrator: &Orchestrator,
    conversation: &mut Conversation,
) -> Result<(), ChatError> {
    run_prompt_loop(source, orchestrator, conversation).await?;
    if let Err(e) = source.finish() {
        log::warn!("could not save input history: {}", e);
    }
    Ok(())
}

/// Reads prompts until `exit` or end of input, answering each one.
pub async fn run_prompt_loop(
    source: &mut dyn PromptSource,
    orchestrator: &Orchestrator,
    conversation: &mut Conversation,
) -> Result<(), ChatError> {
    while let Some(line) = source.read_prompt(input::PROMPT)? {
        if input::is_exit_command(&line) {
            break;
        }

        let reply = orchestrator.respond(conversation, &line).await;
        display::display_reply(&reply);
    }
    Ok(())
}
