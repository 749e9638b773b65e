//! The immutable-after-construction Runtime bundle (spec §3, §4.7).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use loom_approval::ApprovalMediator;
use loom_llm::ChatProvider;
use loom_session::Session;
use tokio::sync::RwLock;

use crate::config::RuntimeConfig;
use crate::environment::Environment;
use crate::labor_market::LaborMarket;

/// Process-wide-but-per-session handle bundling every ambient service a
/// tool or subagent needs: the working directory, the LLM handle, the
/// session, the approval mediator, the labor market, configuration, and the
/// environment descriptor.
///
/// Lifetime is one session. Owned exclusively by the agent loop; shared with
/// tools and subagents by immutable reference (wrap in `Arc` to share across
/// tasks).
pub struct Runtime {
    workspace_root: PathBuf,
    cwd: Arc<RwLock<PathBuf>>,
    llm: Arc<dyn ChatProvider>,
    session: Session,
    approval: ApprovalMediator,
    labor_market: Arc<LaborMarket>,
    config: RuntimeConfig,
    environment: Environment,
}

impl Runtime {
    /// Build a runtime bundle. `cwd` starts out equal to `workspace_root`.
    #[must_use]
    pub fn new(
        workspace_root: impl Into<PathBuf>,
        llm: Arc<dyn ChatProvider>,
        session: Session,
        approval: ApprovalMediator,
        labor_market: Arc<LaborMarket>,
        config: RuntimeConfig,
    ) -> Self {
        let workspace_root = workspace_root.into();
        let environment = Environment::detect(workspace_root.clone());
        Self {
            cwd: Arc::new(RwLock::new(workspace_root.clone())),
            workspace_root,
            llm,
            session,
            approval,
            labor_market,
            config,
            environment,
        }
    }

    /// The project root the session was opened against.
    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// The shared, mutable current-working-directory cell (tools like `cd`
    /// would update this; it starts equal to `workspace_root`).
    #[must_use]
    pub fn cwd(&self) -> &Arc<RwLock<PathBuf>> {
        &self.cwd
    }

    /// The configured LLM handle.
    #[must_use]
    pub fn llm(&self) -> &Arc<dyn ChatProvider> {
        &self.llm
    }

    /// The on-disk session this runtime belongs to.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The shared approval mediator.
    #[must_use]
    pub fn approval(&self) -> &ApprovalMediator {
        &self.approval
    }

    /// The subagent template registry.
    #[must_use]
    pub fn labor_market(&self) -> &Arc<LaborMarket> {
        &self.labor_market
    }

    /// Ambient runtime configuration.
    #[must_use]
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The host environment descriptor.
    #[must_use]
    pub fn environment(&self) -> &Environment {
        &self.environment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loom_llm::{LlmResult, ProviderCapabilities, StepRequest, StepResult, Usage};
    use loom_session::LoomHome;
    use loom_wire::Wire;

    struct StubProvider;

    #[async_trait::async_trait]
    impl ChatProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }
        fn model(&self) -> &str {
            "stub-model"
        }
        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities::default()
        }
        async fn step(
            &self,
            _request: StepRequest<'_>,
            _on_message_part: loom_llm::MessagePartSink,
            on_tool_result: loom_llm::ToolResultSink,
        ) -> LlmResult<StepResult> {
            Ok(StepResult::new("m1".to_string(), Usage::default(), vec![], on_tool_result))
        }
    }

    #[tokio::test]
    async fn exposes_every_bundled_service() {
        let tmp = tempfile::tempdir().unwrap();
        let home = LoomHome::from_path(tmp.path().join("home"));
        let workdir = tmp.path().join("project");
        std::fs::create_dir_all(&workdir).unwrap();
        let session = Session::create(&home, &workdir).unwrap();
        let wire = Wire::new();
        let approval = ApprovalMediator::new(wire, false);

        let runtime = Runtime::new(
            &workdir,
            Arc::new(StubProvider),
            session,
            approval,
            Arc::new(LaborMarket::new()),
            RuntimeConfig::default(),
        );

        assert_eq!(runtime.workspace_root(), workdir);
        assert_eq!(*runtime.cwd().read().await, workdir);
        assert_eq!(runtime.llm().model(), "stub-model");
        assert!(!runtime.approval().yolo());
        assert!(runtime.labor_market().names().is_empty());
        assert_eq!(runtime.environment().working_directory(), workdir);
    }
}
