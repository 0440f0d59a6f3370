//! In-memory fakes for the collaborator traits.
//!
//! Every call is appended to a shared [`Journal`] before its behaviour is
//! applied, so tests can assert both what was invoked and what was not.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fleet::{
    BackendError, BackendResult, Bot, BotConfiguration, BotId, BotServer, BranchName, CommitSha,
    CommitStatus, Integration, IntegrationNumber, PullRequest, PullRequestNumber,
    RepositoryClient, SyncConfig,
};
use reconciler::{completion, CompletionReceiver, Reconciler};

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FetchPullRequests,
    FetchBots,
    CreateBot(String),
    DeleteBot(String),
    Integrate(String),
    LatestIntegration(String),
    GetStatus(String),
    SetStatus(String, CommitStatus),
    AddComment(u64, String),
    /// A callback-driven backend noticed its caller stopped waiting.
    Abandoned(String),
}

#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<Call>>>);

impl Journal {
    fn record(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.calls().contains(call)
    }

    pub fn position(&self, call: &Call) -> Option<usize> {
        self.calls().iter().position(|c| c == call)
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| predicate(c)).count()
    }
}

// ---------------------------------------------------------------------------
// Behaviour injection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Behavior {
    #[default]
    Succeed,
    Fail,
    /// Never completes; only a bounded wait gets the caller out.
    Hang,
}

impl Behavior {
    async fn apply<T>(self, value: T) -> BackendResult<T> {
        match self {
            Behavior::Succeed => Ok(value),
            Behavior::Fail => Err(BackendError::new("injected failure")),
            Behavior::Hang => std::future::pending().await,
        }
    }
}

// ---------------------------------------------------------------------------
// Repository
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct FakeRepository {
    journal: Journal,
    prs: Vec<PullRequest>,
    statuses: Mutex<HashMap<String, CommitStatus>>,
    pub fetch: Behavior,
    pub get_status: Behavior,
    pub set_status: Behavior,
    pub add_comment: Behavior,
}

impl FakeRepository {
    pub fn new(journal: &Journal, prs: Vec<PullRequest>) -> Self {
        Self {
            journal: journal.clone(),
            prs,
            ..Self::default()
        }
    }

    pub fn with_status(self, sha: &str, status: CommitStatus) -> Self {
        self.statuses.lock().unwrap().insert(sha.to_string(), status);
        self
    }

    pub fn status_of(&self, sha: &str) -> CommitStatus {
        self.statuses
            .lock()
            .unwrap()
            .get(sha)
            .copied()
            .unwrap_or(CommitStatus::NoStatus)
    }
}

#[async_trait]
impl RepositoryClient for FakeRepository {
    async fn fetch_pull_requests(&self) -> BackendResult<Vec<PullRequest>> {
        self.journal.record(Call::FetchPullRequests);
        self.fetch.apply(self.prs.clone()).await
    }

    async fn get_status(&self, sha: &CommitSha) -> BackendResult<CommitStatus> {
        self.journal.record(Call::GetStatus(sha.to_string()));
        let current = self.status_of(sha.as_str());
        self.get_status.apply(current).await
    }

    async fn set_status(&self, status: CommitStatus, sha: &CommitSha) -> BackendResult<()> {
        self.journal.record(Call::SetStatus(sha.to_string(), status));
        self.set_status.apply(()).await?;
        self.statuses.lock().unwrap().insert(sha.to_string(), status);
        Ok(())
    }

    async fn add_comment(&self, pr: PullRequestNumber, text: &str) -> BackendResult<()> {
        self.journal.record(Call::AddComment(pr.as_u64(), text.to_string()));
        self.add_comment.apply(()).await
    }
}

// ---------------------------------------------------------------------------
// Bots
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FakeBot {
    journal: Journal,
    id: BotId,
    name: String,
    latest: Option<Integration>,
    pub delete: Behavior,
    pub integrate: Behavior,
    pub latest_integration: Behavior,
}

impl FakeBot {
    pub fn new(journal: &Journal, name: &str) -> Self {
        Self {
            journal: journal.clone(),
            id: BotId::new(format!("bot-{}", name.to_lowercase().replace(' ', "-"))).unwrap(),
            name: name.to_string(),
            latest: None,
            delete: Behavior::Succeed,
            integrate: Behavior::Succeed,
            latest_integration: Behavior::Succeed,
        }
    }

    pub fn with_latest(mut self, result: &str, summary: &str) -> Self {
        self.latest = Some(integration(3, "completed", result, summary));
        self
    }
}

#[async_trait]
impl Bot for FakeBot {
    fn id(&self) -> &BotId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn delete(&self) -> BackendResult<()> {
        self.journal.record(Call::DeleteBot(self.name.clone()));
        self.delete.apply(()).await
    }

    async fn integrate(&self) -> BackendResult<Integration> {
        self.journal.record(Call::Integrate(self.name.clone()));
        let next = self.latest.as_ref().map_or(1, |i| i.number.as_u64() + 1);
        self.integrate
            .apply(integration(next, "pending", "unknown", ""))
            .await
    }

    async fn latest_integration(&self) -> BackendResult<Option<Integration>> {
        self.journal.record(Call::LatestIntegration(self.name.clone()));
        self.latest_integration.apply(self.latest.clone()).await
    }
}

// ---------------------------------------------------------------------------
// Callback-driven bots
// ---------------------------------------------------------------------------

/// A bot whose backend answers through completion callbacks fired from its
/// own task, bridged into the port with [`completion`].
#[derive(Debug)]
pub struct CallbackBot {
    journal: Journal,
    id: BotId,
    name: String,
    latest: Option<Integration>,
    pub delete: Behavior,
    pub integrate: Behavior,
}

impl CallbackBot {
    pub fn new(journal: &Journal, name: &str) -> Self {
        Self {
            journal: journal.clone(),
            id: BotId::new(format!("cb-{}", name.to_lowercase().replace(' ', "-"))).unwrap(),
            name: name.to_string(),
            latest: None,
            delete: Behavior::Succeed,
            integrate: Behavior::Succeed,
        }
    }

    pub fn with_latest(mut self, result: &str, summary: &str) -> Self {
        self.latest = Some(integration(3, "completed", result, summary));
        self
    }

    /// Hands a completion callback to the simulated backend. `Hang` keeps the
    /// callback unfired until the caller gives up, then records that.
    fn request<T: Send + 'static>(&self, behavior: Behavior, value: T) -> CompletionReceiver<T> {
        let (done, signal) = completion();
        let journal = self.journal.clone();
        let name = self.name.clone();
        tokio::spawn(async move {
            match behavior {
                Behavior::Succeed => {
                    done.complete(Ok(value));
                }
                Behavior::Fail => {
                    done.complete(Err(BackendError::new("injected failure")));
                }
                Behavior::Hang => {
                    while !done.is_abandoned() {
                        tokio::time::sleep(Duration::from_millis(100)).await;
                    }
                    journal.record(Call::Abandoned(name));
                }
            }
        });
        signal
    }
}

#[async_trait]
impl Bot for CallbackBot {
    fn id(&self) -> &BotId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn delete(&self) -> BackendResult<()> {
        self.journal.record(Call::DeleteBot(self.name.clone()));
        self.request(self.delete, ()).await
    }

    async fn integrate(&self) -> BackendResult<Integration> {
        self.journal.record(Call::Integrate(self.name.clone()));
        self.request(self.integrate, integration(1, "pending", "unknown", ""))
            .await
    }

    async fn latest_integration(&self) -> BackendResult<Option<Integration>> {
        self.journal.record(Call::LatestIntegration(self.name.clone()));
        self.request(Behavior::Succeed, self.latest.clone()).await
    }
}

#[derive(Debug, Default)]
pub struct FakeBotServer {
    journal: Journal,
    bots: Vec<Arc<dyn Bot>>,
    created: Mutex<Vec<BotConfiguration>>,
    create_behaviors: HashMap<String, Behavior>,
    pub fetch: Behavior,
    /// Behaviour of `integrate` on bots this server creates.
    pub created_bot_integrate: Behavior,
}

impl FakeBotServer {
    pub fn new(journal: &Journal, bots: Vec<FakeBot>) -> Self {
        Self {
            journal: journal.clone(),
            bots: bots
                .into_iter()
                .map(|bot| Arc::new(bot) as Arc<dyn Bot>)
                .collect(),
            ..Self::default()
        }
    }

    pub fn with_bot(mut self, bot: impl Bot + 'static) -> Self {
        self.bots.push(Arc::new(bot));
        self
    }

    pub fn with_create(mut self, name: &str, behavior: Behavior) -> Self {
        self.create_behaviors.insert(name.to_string(), behavior);
        self
    }

    pub fn created(&self) -> Vec<BotConfiguration> {
        self.created.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotServer for FakeBotServer {
    async fn fetch_bots(&self) -> BackendResult<Vec<Arc<dyn Bot>>> {
        self.journal.record(Call::FetchBots);
        self.fetch.apply(self.bots.clone()).await
    }

    async fn create_bot(&self, config: &BotConfiguration) -> BackendResult<Arc<dyn Bot>> {
        let name = config.name.to_string();
        self.journal.record(Call::CreateBot(name.clone()));
        let behavior = self.create_behaviors.get(&name).copied().unwrap_or_default();
        behavior.apply(()).await?;

        self.created.lock().unwrap().push(config.clone());
        let mut bot = FakeBot::new(&self.journal, &name);
        bot.integrate = self.created_bot_integrate;
        Ok(Arc::new(bot))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn integration(number: u64, step: &str, result: &str, summary: &str) -> Integration {
    Integration {
        number: IntegrationNumber::new(number),
        current_step: step.to_string(),
        result: result.to_string(),
        summary: summary.to_string(),
    }
}

pub fn pr(number: u64, sha: &str, branch: &str, title: &str) -> PullRequest {
    PullRequest {
        number: PullRequestNumber::new(number),
        sha: CommitSha::new(sha),
        branch: BranchName::new(branch),
        title: Some(title.to_string()),
    }
}

pub fn config() -> SyncConfig {
    SyncConfig::from_toml_str(
        r#"
repository = "org/repo"

[template]
project_or_workspace = "App.xcworkspace"
scheme_name = "App"
public_key = "ssh-rsa AAAA"
private_key = "-----BEGIN KEY-----"
device_ids = ["iphone-15"]
"#,
    )
    .unwrap()
}

pub fn reconciler(repository: &Arc<FakeRepository>, server: &Arc<FakeBotServer>) -> Reconciler {
    Reconciler::new(
        Arc::clone(repository) as Arc<dyn RepositoryClient>,
        Arc::clone(server) as Arc<dyn BotServer>,
        &config(),
    )
}
