//! Execution session lifecycle and result classification.
//!
//! An `ExecutionSession` owns the state of the active run: the selected
//! language, the code and stdin buffers, the running flag, and the last
//! classified outcome. One run moves Idle -> Submitting -> Polling -> Idle;
//! any judge error short-circuits back to Idle with an error outcome, and
//! nothing is retried automatically.
//!
//! Runs are identified by a generation counter. Starting a run bumps the
//! generation; a result that arrives carrying a stale generation is
//! discarded without touching session state, so a superseded run can never
//! interleave its output into the current one. No cancellation is sent to
//! the remote service for the superseded submission.

use crate::core_types::{JudgeResult, Language, RunOutcome, SubmissionRequest};
use crate::errors::ExecError;
use crate::judge::JudgeClient;
use crate::languages::{classify_name, starter_snippet};
use crate::poller::{poll_submission, PollPolicy};
use crate::storage::KeyValueStore;
use std::sync::Arc;
use uuid::Uuid;

pub const KEY_CODE: &str = "editor-code";
pub const KEY_STDIN: &str = "editor-stdin";
pub const KEY_LANGUAGE: &str = "language-id";

/// Handle for one started run: the generation that identifies it and the
/// immutable request snapshot taken when it began.
#[derive(Debug, Clone)]
pub struct RunTicket {
    generation: u64,
    pub request: SubmissionRequest,
}

impl RunTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

pub struct ExecutionSession {
    judge: Arc<dyn JudgeClient>,
    storage: Arc<dyn KeyValueStore>,
    policy: PollPolicy,
    session_id: Uuid,
    language_id: Option<u32>,
    code: String,
    stdin: String,
    running: bool,
    outcome: Option<RunOutcome>,
    generation: u64,
}

impl ExecutionSession {
    pub fn new(
        judge: Arc<dyn JudgeClient>,
        storage: Arc<dyn KeyValueStore>,
        policy: PollPolicy,
    ) -> Self {
        Self {
            judge,
            storage,
            policy,
            session_id: Uuid::new_v4(),
            language_id: None,
            code: String::new(),
            stdin: String::new(),
            running: false,
            outcome: None,
            generation: 0,
        }
    }

    /// Reload persisted buffers from the storage seam.
    pub fn restore(&mut self) -> Result<(), ExecError> {
        if let Some(code) = self.storage.get(KEY_CODE)? {
            self.code = code;
        }
        if let Some(stdin) = self.storage.get(KEY_STDIN)? {
            self.stdin = stdin;
        }
        if let Some(raw) = self.storage.get(KEY_LANGUAGE)? {
            match raw.parse::<u32>() {
                Ok(id) => self.language_id = Some(id),
                Err(_) => log::warn!("ignoring unparseable persisted language id {:?}", raw),
            }
        }
        Ok(())
    }

    /// Select a language; replaces the code buffer with its starter snippet
    /// when the language is recognized, and clears any previous outcome.
    pub fn set_language(&mut self, language: &Language) -> Result<(), ExecError> {
        self.language_id = Some(language.id);
        self.storage.set(KEY_LANGUAGE, &language.id.to_string())?;
        if let Some(kind) = classify_name(&language.name) {
            self.code = starter_snippet(kind).to_string();
            self.storage.set(KEY_CODE, &self.code)?;
        } else {
            log::debug!("no starter snippet for {:?}, keeping buffer", language.name);
        }
        self.outcome = None;
        Ok(())
    }

    pub fn set_code(&mut self, code: impl Into<String>) -> Result<(), ExecError> {
        self.code = code.into();
        self.storage.set(KEY_CODE, &self.code)
    }

    pub fn set_stdin(&mut self, stdin: impl Into<String>) -> Result<(), ExecError> {
        self.stdin = stdin.into();
        self.storage.set(KEY_STDIN, &self.stdin)
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn stdin(&self) -> &str {
        &self.stdin
    }

    pub fn language_id(&self) -> Option<u32> {
        self.language_id
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn last_outcome(&self) -> Option<&RunOutcome> {
        self.outcome.as_ref()
    }

    /// Start a run: clear stale output, bump the generation, and snapshot
    /// the request. Fails if no language is selected.
    pub fn begin_run(&mut self) -> Result<RunTicket, ExecError> {
        let language_id = self
            .language_id
            .ok_or_else(|| ExecError::Config("no language selected".to_string()))?;

        self.generation += 1;
        self.running = true;
        self.outcome = None;

        log::info!(
            "session {} starting run {} (language {})",
            self.session_id,
            self.generation,
            language_id
        );

        Ok(RunTicket {
            generation: self.generation,
            request: SubmissionRequest {
                source_code: self.code.clone(),
                language_id,
                stdin: self.stdin.clone(),
            },
        })
    }

    /// Submit the request and poll it to completion. Submit always finishes
    /// (or fails) before the first poll; polls are strictly sequential.
    pub async fn execute(&self, request: &SubmissionRequest) -> Result<JudgeResult, ExecError> {
        let token = self.judge.submit(request).await?;
        poll_submission(self.judge.as_ref(), &token, &self.policy).await
    }

    /// Apply the outcome of a run. Returns `None` when the ticket's
    /// generation is stale, i.e. another run has started since; stale
    /// results never touch session state.
    pub fn finish_run(
        &mut self,
        generation: u64,
        result: Result<JudgeResult, ExecError>,
    ) -> Option<RunOutcome> {
        if generation != self.generation {
            log::warn!(
                "session {} discarding stale result for run {} (current run {})",
                self.session_id,
                generation,
                self.generation
            );
            return None;
        }

        self.running = false;
        let outcome = match result {
            Ok(result) => classify(&result),
            Err(err) => {
                log::error!("session {} run {} failed: {}", self.session_id, generation, err);
                RunOutcome::failure(format!("Failed to run code: {}", err))
            }
        };
        self.outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Drive one complete run. Judge errors are absorbed into an error
    /// outcome here; they never propagate past the session boundary.
    pub async fn run(&mut self) -> RunOutcome {
        let ticket = match self.begin_run() {
            Ok(ticket) => ticket,
            Err(err) => {
                let outcome = RunOutcome::failure(format!("Failed to run code: {}", err));
                self.outcome = Some(outcome.clone());
                return outcome;
            }
        };
        let result = self.execute(&ticket.request).await;
        self.finish_run(ticket.generation, result)
            .unwrap_or_else(|| RunOutcome::failure("run superseded".to_string()))
    }
}

/// Split a judge result into primary output, warnings, and an error flag.
///
/// 1. Non-empty stdout (after trimming) is the primary output; stderr and
///    compile_output, when non-empty, join into the warnings text (stderr
///    first, newline-separated), and the error flag is set when either is
///    non-empty.
/// 2. Empty stdout with non-empty stderr promotes stderr to primary output
///    with the error flag set and no warnings.
/// 3. Both empty: empty primary output, no warnings, no error flag,
///    regardless of compile_output.
pub fn classify(result: &JudgeResult) -> RunOutcome {
    let has_stdout = !result.stdout.trim().is_empty();
    let has_stderr = !result.stderr.trim().is_empty();
    let has_compile = !result.compile_output.trim().is_empty();

    if has_stdout {
        let mut warnings = String::new();
        if has_stderr {
            warnings.push_str(&result.stderr);
        }
        if has_compile {
            if !warnings.is_empty() {
                warnings.push('\n');
            }
            warnings.push_str(&result.compile_output);
        }
        RunOutcome {
            output: result.stdout.clone(),
            warnings,
            is_error: has_stderr || has_compile,
        }
    } else if has_stderr {
        RunOutcome {
            output: result.stderr.clone(),
            warnings: String::new(),
            is_error: true,
        }
    } else {
        RunOutcome {
            output: String::new(),
            warnings: String::new(),
            is_error: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_types::JudgeStatus;
    use crate::judge::Judge0Client;
    use crate::storage::MemoryStore;
    use crate::test_utils::mock_judge_server::{MockJudgeScript, MockJudgeServer, MockReply};
    use serde_json::json;
    use std::time::Duration;

    fn result(stdout: &str, stderr: &str, compile_output: &str, status_id: u32) -> JudgeResult {
        JudgeResult {
            stdout: stdout.to_string(),
            stderr: stderr.to_string(),
            compile_output: compile_output.to_string(),
            status: JudgeStatus { id: status_id, description: String::new() },
        }
    }

    #[test]
    fn rule1_stdout_is_primary_with_joined_warnings() {
        let outcome = classify(&result("1\n", "warning: foo", "note: bar", 3));
        assert_eq!(outcome.output, "1\n");
        assert_eq!(outcome.warnings, "warning: foo\nnote: bar");
        assert!(outcome.is_error);
    }

    #[test]
    fn rule1_clean_stdout_is_not_an_error() {
        let outcome = classify(&result("1\n", "", "", 3));
        assert_eq!(outcome.output, "1\n");
        assert!(outcome.warnings.is_empty());
        assert!(!outcome.is_error);
    }

    #[test]
    fn rule1_single_warning_channel_has_no_leading_newline() {
        let outcome = classify(&result("ok\n", "", "note: bar", 3));
        assert_eq!(outcome.warnings, "note: bar");
        assert!(outcome.is_error);
    }

    #[test]
    fn rule2_stderr_becomes_primary() {
        let outcome = classify(&result("", "Traceback: boom", "", 11));
        assert_eq!(outcome.output, "Traceback: boom");
        assert!(outcome.warnings.is_empty());
        assert!(outcome.is_error);
    }

    #[test]
    fn rule2_applies_when_stdout_is_only_whitespace() {
        let outcome = classify(&result("  \n", "Traceback: boom", "", 11));
        assert_eq!(outcome.output, "Traceback: boom");
        assert!(outcome.is_error);
    }

    #[test]
    fn rule3_ignores_compile_output() {
        let outcome = classify(&result("", "", "SyntaxError: invalid syntax", 6));
        assert_eq!(outcome.output, "");
        assert_eq!(outcome.warnings, "");
        assert!(!outcome.is_error);
    }

    fn session_for(server: &MockJudgeServer) -> ExecutionSession {
        let judge = Arc::new(Judge0Client::new(server.base_url()));
        let storage = Arc::new(MemoryStore::new());
        let policy = PollPolicy {
            max_attempts: 20,
            interval: Duration::from_millis(5),
        };
        ExecutionSession::new(judge, storage, policy)
    }

    #[tokio::test]
    async fn run_submits_polls_once_and_classifies() {
        let server = MockJudgeServer::start(MockJudgeScript {
            submit: vec![MockReply::Json(json!({ "token": "abc123" }))],
            status: vec![MockReply::Json(json!({
                "stdout": "1\n",
                "stderr": "",
                "compile_output": "",
                "status": { "id": 3, "description": "Accepted" },
            }))],
            ..Default::default()
        })
        .await;

        let mut session = session_for(&server);
        session
            .set_language(&Language { id: 71, name: "Python (3.8.1)".into() })
            .unwrap();
        session.set_code("print(1)").unwrap();
        session.set_stdin("").unwrap();

        let outcome = session.run().await;
        assert_eq!(outcome.output, "1\n");
        assert!(outcome.warnings.is_empty());
        assert!(!outcome.is_error);
        assert!(!session.is_running());

        // Exactly one submit and one poll, keyed by the returned token.
        let submits = server.submit_requests();
        assert_eq!(submits.len(), 1);
        assert_eq!(submits[0]["source_code"], "print(1)");
        assert_eq!(submits[0]["language_id"], 71);
        assert_eq!(server.status_calls(), vec!["abc123".to_string()]);

        server.shutdown().await;
    }

    #[tokio::test]
    async fn submit_error_prevents_any_poll() {
        let server = MockJudgeServer::start(MockJudgeScript {
            submit: vec![MockReply::Json(json!({ "message": "nope" }))],
            ..Default::default()
        })
        .await;

        let mut session = session_for(&server);
        session
            .set_language(&Language { id: 71, name: "Python (3.8.1)".into() })
            .unwrap();

        let outcome = session.run().await;
        assert!(outcome.is_error);
        assert!(outcome.output.contains("submission failed"));
        assert!(server.status_calls().is_empty());
        assert!(!session.is_running());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn run_without_language_is_an_error_outcome() {
        let server = MockJudgeServer::start(MockJudgeScript::default()).await;

        let mut session = session_for(&server);
        let outcome = session.run().await;
        assert!(outcome.is_error);
        assert!(outcome.output.contains("no language selected"));
        assert!(server.submit_requests().is_empty());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn beginning_a_run_clears_the_previous_outcome() {
        let server = MockJudgeServer::start(MockJudgeScript {
            submit: vec![MockReply::Json(json!({ "message": "nope" }))],
            ..Default::default()
        })
        .await;

        let mut session = session_for(&server);
        session
            .set_language(&Language { id: 71, name: "Python (3.8.1)".into() })
            .unwrap();
        let outcome = session.run().await;
        assert!(outcome.is_error);
        assert!(session.last_outcome().is_some());

        // No stale output is visible while the next run is submitting.
        let _ticket = session.begin_run().unwrap();
        assert!(session.last_outcome().is_none());
        assert!(session.is_running());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn stale_run_results_are_discarded() {
        let server = MockJudgeServer::start(MockJudgeScript::default()).await;

        let mut session = session_for(&server);
        session
            .set_language(&Language { id: 71, name: "Python (3.8.1)".into() })
            .unwrap();

        let first = session.begin_run().unwrap();
        let second = session.begin_run().unwrap();
        assert_ne!(first.generation(), second.generation());

        // The superseded run's result arrives late and must not apply.
        let stale = session.finish_run(first.generation(), Ok(result("old\n", "", "", 3)));
        assert!(stale.is_none());
        assert!(session.last_outcome().is_none());
        assert!(session.is_running());

        let fresh = session.finish_run(second.generation(), Ok(result("new\n", "", "", 3)));
        assert_eq!(fresh.unwrap().output, "new\n");
        assert!(!session.is_running());

        server.shutdown().await;
    }

    #[tokio::test]
    async fn selecting_a_language_applies_its_starter_snippet() {
        let server = MockJudgeServer::start(MockJudgeScript::default()).await;

        let mut session = session_for(&server);
        session
            .set_language(&Language { id: 63, name: "JavaScript (Node.js 12.14.0)".into() })
            .unwrap();
        assert!(session.code().contains("console.log(add(1, 2));"));

        server.shutdown().await;
    }

    #[tokio::test]
    async fn buffers_survive_a_session_restart() {
        let server = MockJudgeServer::start(MockJudgeScript::default()).await;
        let judge = Arc::new(Judge0Client::new(server.base_url()));
        let storage = Arc::new(MemoryStore::new());

        let mut session = ExecutionSession::new(judge.clone(), storage.clone(), PollPolicy::default());
        session.set_code("print(42)").unwrap();
        session.set_stdin("42").unwrap();
        session
            .set_language(&Language { id: 99, name: "Brainfuck (bf 1.0)".into() })
            .unwrap();

        let mut restored = ExecutionSession::new(judge, storage, PollPolicy::default());
        restored.restore().unwrap();
        assert_eq!(restored.code(), "print(42)");
        assert_eq!(restored.stdin(), "42");
        assert_eq!(restored.language_id(), Some(99));

        server.shutdown().await;
    }
}
