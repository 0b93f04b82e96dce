//! Pruning run: credential, token exchange, tag list, plan, delete, report

use crate::cli::args::Args;
use crate::cli::config::RetentionConfig;
use crate::error::Result;
use crate::logging::Logger;
use crate::registry::{CommandCredentialSource, CredentialSource, RegistryApi, RegistryClient};
use crate::retention::{BatchDeleter, PruneSummary, Reporter, RetentionPlanner};
use std::sync::Arc;
use std::time::Instant;

pub struct Runner {
    config: RetentionConfig,
    credentials: Box<dyn CredentialSource>,
    registry: Arc<dyn RegistryApi>,
    reporter: Reporter,
    output: Logger,
}

impl Runner {
    /// Validate arguments and set up the default collaborators. Nothing touches the
    /// network or spawns a process here.
    pub fn new(args: Args) -> Result<Self> {
        let config = RetentionConfig::from_args(&args)?;
        let output = config.logger();

        let credentials = CommandCredentialSource::new(&config.token_command, output.clone())?;
        let registry = RegistryClient::builder(config.repository.clone())
            .with_output(output.clone())
            .build()?;

        Ok(Self::with_collaborators(
            config,
            Box::new(credentials),
            Arc::new(registry),
            output,
        ))
    }

    pub fn with_collaborators(
        config: RetentionConfig,
        credentials: Box<dyn CredentialSource>,
        registry: Arc<dyn RegistryApi>,
        output: Logger,
    ) -> Self {
        let reporter = Reporter::new(output.clone(), config.output);
        Self {
            config,
            credentials,
            registry,
            reporter,
            output,
        }
    }

    /// Replace the default stdout reporter
    pub fn with_reporter(mut self, reporter: Reporter) -> Self {
        self.reporter = reporter;
        self
    }

    pub async fn run(&self) -> Result<PruneSummary> {
        let start_time = Instant::now();

        self.output.section("GCR Pruner");
        self.output.info(&format!("Repository: {}", self.config.repository));
        self.output.info(&format!("Keeping: {} most recent images", self.config.keep));

        self.output.subsection("Authenticating");
        let identity_token = self.credentials.identity_token().await?;
        let token = self.registry.exchange_token(&identity_token).await?;
        self.output.step("Registry token obtained");

        self.output.subsection("Planning");
        let manifests = self.registry.list_manifests(&token).await?;
        let candidates = RetentionPlanner::new(self.output.clone()).plan(manifests, self.config.keep);

        if self.config.dry_run {
            let images: Vec<String> = candidates
                .iter()
                .map(|c| self.config.repository.image_reference(&c.digest))
                .collect();
            self.reporter.render_plan(&images)?;
            return Ok(PruneSummary::default());
        }

        let outcomes = if candidates.is_empty() {
            Vec::new()
        } else {
            self.output.subsection("Deleting");
            BatchDeleter::new(
                Arc::clone(&self.registry),
                self.config.repository.clone(),
                self.output.clone(),
            )
            .delete_all(&candidates, &token)
            .await
        };

        let summary = self.reporter.summarize(outcomes)?;

        let elapsed = self.output.format_duration(start_time.elapsed());
        if summary.has_failures() {
            self.output.warning(&format!(
                "Completed in {}: {} deleted, {} failed",
                elapsed,
                summary.succeeded.len(),
                summary.failed.len()
            ));
        } else {
            self.output.success(&format!(
                "Completed in {}: {} deleted",
                elapsed,
                summary.succeeded.len()
            ));
        }

        Ok(summary)
    }
}
