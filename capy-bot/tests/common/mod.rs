//! Test doubles and harness for router/flow integration tests.
//!
//! The mock gateway records every outbound text so tests can assert on replies
//! without a live transport; the mock providers record calls and can be
//! switched between accept/reject/fail behaviors.

use async_trait::async_trait;
use capy_core::{CapyError, Gateway, Result};
use jobspy_client::{JobPosting, JobProvider};
use portal_auth::AuthProvider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use storage::{
    BotTextRepository, CourseRepository, InteractionRepository, SearchLogRepository,
    SessionRepository, SqlitePoolManager,
};

use capy_bot::flows::{AuthenticationFlow, JobSearchFlow, MenuFlow};
use capy_bot::{ConversationRouter, Messenger};

/// Mock Gateway that records sends and never talks to a network.
pub struct MockGateway {
    sent: Mutex<Vec<(String, String)>>,
    fail_sends: AtomicBool,
}

impl MockGateway {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_sends: AtomicBool::new(false),
        }
    }

    /// All texts sent so far, in order.
    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn last_text(&self) -> String {
        self.sent
            .lock()
            .unwrap()
            .last()
            .map(|(_, text)| text.clone())
            .unwrap_or_default()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(CapyError::Gateway("mock transport down".to_string()));
        }
        Ok(())
    }

    fn session_name(&self) -> &str {
        "test-session"
    }

    async fn session_status(&self) -> Result<String> {
        Ok("WORKING".to_string())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum AuthBehavior {
    Accept,
    Reject,
    Fail,
}

/// Mock AuthProvider backed by the real session repository, so link/logout
/// mutate storage exactly like the production service.
pub struct MockAuthProvider {
    behavior: Mutex<AuthBehavior>,
    sessions: Arc<SessionRepository>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockAuthProvider {
    pub fn new(sessions: Arc<SessionRepository>) -> Self {
        Self {
            behavior: Mutex::new(AuthBehavior::Accept),
            sessions,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_behavior(&self, behavior: AuthBehavior) {
        *self.behavior.lock().unwrap() = behavior;
    }

    /// `(ra, password)` pairs `authenticate` was called with.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthProvider for MockAuthProvider {
    async fn authenticate(&self, ra: &str, password: &str) -> Result<bool> {
        self.calls
            .lock()
            .unwrap()
            .push((ra.to_string(), password.to_string()));
        match *self.behavior.lock().unwrap() {
            AuthBehavior::Accept => Ok(true),
            AuthBehavior::Reject => Ok(false),
            AuthBehavior::Fail => Err(CapyError::Provider("mock portal down".to_string())),
        }
    }

    async fn link(&self, chat_id: &str, ra: &str, password: &str) -> Result<()> {
        let token = format!("enc::{}", password);
        self.sessions
            .mark_authenticated(chat_id, ra, &token)
            .await
            .map_err(|e| CapyError::Database(e.to_string()))?;
        Ok(())
    }

    async fn logout(&self, chat_id: &str) -> Result<bool> {
        self.sessions
            .apply_logout(chat_id)
            .await
            .map_err(|e| CapyError::Database(e.to_string()))
    }
}

/// Mock JobProvider with configurable results or failure.
pub struct MockJobProvider {
    results: Mutex<Vec<JobPosting>>,
    fail: AtomicBool,
    calls: Mutex<Vec<(Vec<String>, usize)>>,
}

impl MockJobProvider {
    pub fn new() -> Self {
        Self {
            results: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_results(&self, results: Vec<JobPosting>) {
        *self.results.lock().unwrap() = results;
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// `(terms, limit)` pairs `search` was called with.
    pub fn calls(&self) -> Vec<(Vec<String>, usize)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobProvider for MockJobProvider {
    async fn search(&self, terms: &[String], limit: usize) -> Result<Vec<JobPosting>> {
        self.calls.lock().unwrap().push((terms.to_vec(), limit));
        if self.fail.load(Ordering::SeqCst) {
            return Err(CapyError::Provider("mock jobspy down".to_string()));
        }
        Ok(self.results.lock().unwrap().clone())
    }
}

pub fn posting(title: &str, company: &str, url: &str) -> JobPosting {
    JobPosting {
        title: title.to_string(),
        company: company.to_string(),
        location: None,
        url: url.to_string(),
        description: None,
    }
}

/// Fully wired router over a temp SQLite database and the mocks above.
pub struct TestHarness {
    pub router: Arc<ConversationRouter>,
    pub sessions: Arc<SessionRepository>,
    pub courses: Arc<CourseRepository>,
    pub interactions: Arc<InteractionRepository>,
    pub search_logs: Arc<SearchLogRepository>,
    pub texts: Arc<BotTextRepository>,
    pub gateway: Arc<MockGateway>,
    pub auth: Arc<MockAuthProvider>,
    pub jobs: Arc<MockJobProvider>,
    _dir: tempfile::TempDir,
}

pub async fn harness() -> TestHarness {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("bot.db");
    let pool = SqlitePoolManager::new(path.to_str().unwrap())
        .await
        .expect("Failed to create pool");

    let sessions = Arc::new(SessionRepository::new(pool.clone()).await.unwrap());
    let courses = Arc::new(CourseRepository::new(pool.clone()).await.unwrap());
    let interactions = Arc::new(InteractionRepository::new(pool.clone()).await.unwrap());
    let search_logs = Arc::new(SearchLogRepository::new(pool.clone()).await.unwrap());
    let texts = Arc::new(BotTextRepository::new(pool).await.unwrap());

    let gateway = Arc::new(MockGateway::new());
    let auth = Arc::new(MockAuthProvider::new(sessions.clone()));
    let jobs = Arc::new(MockJobProvider::new());

    let messenger = Arc::new(Messenger::new(
        gateway.clone(),
        interactions.clone(),
        texts.clone(),
    ));
    let auth_flow = Arc::new(AuthenticationFlow::new(
        messenger.clone(),
        sessions.clone(),
        auth.clone(),
    ));
    let job_flow = Arc::new(JobSearchFlow::new(
        messenger.clone(),
        sessions.clone(),
        courses.clone(),
        jobs.clone(),
        search_logs.clone(),
        5,
    ));
    let menu_flow = Arc::new(MenuFlow::new(messenger.clone()));

    let router = Arc::new(ConversationRouter::new(
        sessions.clone(),
        messenger,
        auth_flow,
        job_flow,
        menu_flow,
    ));

    TestHarness {
        router,
        sessions,
        courses,
        interactions,
        search_logs,
        texts,
        gateway,
        auth,
        jobs,
        _dir: dir,
    }
}

impl TestHarness {
    /// Shorthand: process one inbound user message.
    pub async fn say(&self, chat_id: &str, text: &str) {
        self.router
            .process_message(chat_id, text, false)
            .await
            .expect("process_message failed");
    }

    /// Registers an authenticated session directly in storage.
    pub async fn authenticated_session(&self, chat_id: &str, ra: &str) {
        self.sessions.get_or_create(chat_id).await.unwrap();
        self.sessions
            .mark_authenticated(chat_id, ra, "enc::senha")
            .await
            .unwrap();
    }
}
