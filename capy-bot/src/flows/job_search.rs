//! Job search flow: course selection, term selection and the search itself.
//!
//! The most state-heavy flow. Menu lists are recomputed fresh on every reply
//! (the reference data may change between prompt and answer), so a stale
//! prompt can at worst produce an out-of-range error, never a wrong pick.

use async_trait::async_trait;
use capy_core::{FlowHandler, FlowOutcome, FlowState, Result, UserSession};
use jobspy_client::JobProvider;
use std::sync::Arc;
use storage::{Course, CourseRepository, SearchLogRepository, SearchPreviewEntry, SearchTerm, SessionRepository};
use tracing::{error, info};

use super::{db_err, parse_choice};
use crate::messenger::Messenger;
use crate::texts;

pub struct JobSearchFlow {
    messenger: Arc<Messenger>,
    sessions: Arc<SessionRepository>,
    courses: Arc<CourseRepository>,
    jobs: Arc<dyn JobProvider>,
    search_logs: Arc<SearchLogRepository>,
    result_limit: usize,
}

impl JobSearchFlow {
    pub fn new(
        messenger: Arc<Messenger>,
        sessions: Arc<SessionRepository>,
        courses: Arc<CourseRepository>,
        jobs: Arc<dyn JobProvider>,
        search_logs: Arc<SearchLogRepository>,
        result_limit: usize,
    ) -> Self {
        Self {
            messenger,
            sessions,
            courses,
            jobs,
            search_logs,
            result_limit,
        }
    }

    /// Entry point for `3`/`vagas`/`buscar`/`cursos`. Requires authentication;
    /// refuses to enter a state with nothing to select.
    pub async fn start_course_selection(&self, session: &mut UserSession) -> Result<()> {
        if !session.is_authenticated {
            self.messenger
                .send(&session.chat_id, texts::MUST_REGISTER_FIRST)
                .await;
            return Ok(());
        }

        let courses = self.courses.active_courses().await.map_err(db_err)?;
        if courses.is_empty() {
            self.messenger
                .send(&session.chat_id, texts::NO_COURSES_CONFIGURED)
                .await;
            return Ok(());
        }

        let menu = render_course_menu(&courses);
        session.enter_flow(FlowState::AwaitingCourseChoice);
        self.sessions.update_flow(session).await.map_err(db_err)?;
        self.messenger.send(&session.chat_id, &menu).await;
        Ok(())
    }

    async fn handle_course_choice(&self, session: &mut UserSession, text: &str) -> Result<()> {
        let courses = self.courses.active_courses().await.map_err(db_err)?;

        let Some(choice) = parse_choice(text) else {
            self.messenger
                .send(&session.chat_id, texts::COURSE_NUMBER_ONLY)
                .await;
            return Ok(());
        };
        if choice == 0 || choice > courses.len() {
            self.messenger
                .send(&session.chat_id, texts::INVALID_COURSE_NUMBER)
                .await;
            return Ok(());
        }

        let course = &courses[choice - 1];
        session.selected_course_id = Some(course.id);
        self.sessions
            .set_selected_course(&session.chat_id, course.id)
            .await
            .map_err(db_err)?;
        info!(chat_id = %session.chat_id, course = %course.name, "Course selected");

        self.start_term_selection(session).await
    }

    /// Renders the term menu for the selected course, or backs out to idle
    /// when the course has no configured terms (the user must never be left
    /// stuck in a state with nothing to select).
    pub async fn start_term_selection(&self, session: &mut UserSession) -> Result<()> {
        let Some(course) = self.selected_course(session).await? else {
            self.messenger
                .send(&session.chat_id, texts::NO_COURSE_SELECTED)
                .await;
            session.reset_flow();
            self.sessions.update_flow(session).await.map_err(db_err)?;
            return Ok(());
        };

        let terms = self.courses.default_terms(course.id).await.map_err(db_err)?;
        if terms.is_empty() {
            self.messenger
                .send(
                    &session.chat_id,
                    &format!(
                        "⚠️ O curso {} não tem termos de busca configurados.",
                        course.name
                    ),
                )
                .await;
            session.reset_flow();
            self.sessions.update_flow(session).await.map_err(db_err)?;
            return Ok(());
        }

        let menu = render_term_menu(&course.name, &terms);
        session.enter_flow(FlowState::AwaitingTermChoice);
        self.sessions.update_flow(session).await.map_err(db_err)?;
        self.messenger.send(&session.chat_id, &menu).await;
        Ok(())
    }

    async fn handle_term_choice(&self, session: &mut UserSession, text: &str) -> Result<()> {
        let Some(course) = self.selected_course(session).await? else {
            self.messenger
                .send(&session.chat_id, texts::NO_COURSE_SELECTED)
                .await;
            session.reset_flow();
            self.sessions.update_flow(session).await.map_err(db_err)?;
            return Ok(());
        };

        // Recomputed fresh; the prompt the user is answering may be stale.
        let terms = self.courses.default_terms(course.id).await.map_err(db_err)?;
        if terms.is_empty() {
            self.messenger
                .send(
                    &session.chat_id,
                    &format!(
                        "⚠️ O curso {} não tem termos de busca configurados.",
                        course.name
                    ),
                )
                .await;
            session.reset_flow();
            self.sessions.update_flow(session).await.map_err(db_err)?;
            return Ok(());
        }

        let Some(choice) = parse_choice(text) else {
            self.messenger
                .send(&session.chat_id, texts::TERM_NUMBER_ONLY)
                .await;
            return Ok(());
        };

        let (selected_terms, label) = if choice == terms.len() + 1 {
            // Trailing "Buscar Todos" slot: every term, priority order kept.
            let all: Vec<String> = terms.iter().map(|t| t.term.clone()).collect();
            (all, texts::ALL_TERMS_LABEL.to_string())
        } else if (1..=terms.len()).contains(&choice) {
            let term = &terms[choice - 1];
            session.selected_term_id = Some(term.id);
            self.sessions
                .set_selected_term(&session.chat_id, term.id)
                .await
                .map_err(db_err)?;
            (vec![term.term.clone()], term.term.clone())
        } else {
            self.messenger
                .send(&session.chat_id, texts::INVALID_TERM_NUMBER)
                .await;
            return Ok(());
        };

        // Leave the flow before searching so a slow or crashing provider can
        // never strand the session mid-transition.
        session.reset_flow();
        self.sessions.update_flow(session).await.map_err(db_err)?;

        self.perform_search(session, &selected_terms, &label).await
    }

    /// Runs the search and renders results. Provider failures become an empty
    /// result set; the search is logged either way. No menu re-render
    /// afterward, so results stay uncluttered.
    pub async fn perform_search(
        &self,
        session: &UserSession,
        terms: &[String],
        label: &str,
    ) -> Result<()> {
        self.messenger
            .send(
                &session.chat_id,
                &format!("🔎 Buscando vagas para: *{}*... Aguarde.", label),
            )
            .await;

        let postings = match self.jobs.search(terms, self.result_limit).await {
            Ok(postings) => postings,
            Err(e) => {
                error!(chat_id = %session.chat_id, error = %e, "Job search failed");
                Vec::new()
            }
        };

        let preview: Vec<SearchPreviewEntry> = postings
            .iter()
            .take(5)
            .map(|p| SearchPreviewEntry {
                title: p.title.clone(),
                company: p.company.clone(),
                url: p.url.clone(),
            })
            .collect();
        if let Err(e) = self
            .search_logs
            .record(&session.chat_id, terms, postings.len() as i64, &preview)
            .await
        {
            error!(chat_id = %session.chat_id, error = %e, "Failed to log search");
        }

        if postings.is_empty() {
            self.messenger
                .send(&session.chat_id, texts::NO_JOBS_FOUND)
                .await;
            return Ok(());
        }

        let mut lines = vec![format!("🚀 *Vagas Encontradas ({})*:", postings.len())];
        for posting in &postings {
            lines.push(format!(
                "\n💼 *{}*\n🏢 {}\n🔗 {}",
                non_empty(&posting.title, "Vaga"),
                non_empty(&posting.company, "Empresa"),
                non_empty(&posting.url, "#"),
            ));
        }
        self.messenger.send(&session.chat_id, &lines.join("\n")).await;

        info!(
            chat_id = %session.chat_id,
            ?terms,
            results_count = postings.len(),
            "Job search completed"
        );
        Ok(())
    }

    async fn selected_course(&self, session: &UserSession) -> Result<Option<Course>> {
        let Some(course_id) = session.selected_course_id else {
            return Ok(None);
        };
        self.courses.find_course(course_id).await.map_err(db_err)
    }
}

fn non_empty<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

fn render_course_menu(courses: &[Course]) -> String {
    let lines: Vec<String> = courses
        .iter()
        .enumerate()
        .map(|(idx, course)| format!("*{}*) {}", idx + 1, course.name))
        .collect();
    format!(
        "🎓 **Selecione seu Curso**:\n\n{}\n\nDigite o número correspondente:",
        lines.join("\n")
    )
}

fn render_term_menu(course_name: &str, terms: &[SearchTerm]) -> String {
    let mut lines: Vec<String> = terms
        .iter()
        .enumerate()
        .map(|(idx, term)| format!("*{}*) {}", idx + 1, term.term))
        .collect();
    lines.push(format!("*{}*) {}", terms.len() + 1, texts::SEARCH_ALL_OPTION));
    format!(
        "🔍 Curso: *{}*\nEscolha o termo de busca:\n\n{}\n\nDigite o número:",
        course_name,
        lines.join("\n")
    )
}

#[async_trait]
impl FlowHandler for JobSearchFlow {
    async fn try_handle(&self, session: &mut UserSession, text: &str) -> Result<FlowOutcome> {
        match session.current_state {
            FlowState::AwaitingCourseChoice => {
                self.handle_course_choice(session, text).await?;
                Ok(FlowOutcome::Consumed)
            }
            FlowState::AwaitingTermChoice => {
                self.handle_term_choice(session, text).await?;
                Ok(FlowOutcome::Consumed)
            }
            _ => Ok(FlowOutcome::NotApplicable),
        }
    }
}
