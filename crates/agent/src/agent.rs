//! Question-answering facade.

use cesantias_core::{AppConfig, AppError, AppResult};
use cesantias_records::{compute_stats, AggregateStats, CsvSource, RecordSource, RecordStore};
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::classifier::{ClassifiedIntent, Classifier};
use crate::executor::QueryExecutor;
use crate::knowledge::KnowledgeBase;
use crate::matcher::Question;
use crate::trace::Trace;
use crate::types::{Action, AnswerResult, EngineConfig, Intent};

/// Routes questions to the record store or the knowledge corpus.
///
/// The store is loaded lazily, at most once, by the first call that needs
/// it. Concurrent callers wait on the same load.
#[derive(Debug)]
pub struct SeveranceAgent {
    source: Arc<dyn RecordSource>,
    store: OnceCell<RecordStore>,
    classifier: Classifier,
    knowledge: KnowledgeBase,
    config: EngineConfig,
}

impl SeveranceAgent {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self::with_config(source, EngineConfig::default())
    }

    pub fn with_config(source: Arc<dyn RecordSource>, config: EngineConfig) -> Self {
        Self {
            source,
            store: OnceCell::new(),
            classifier: Classifier::new(config.min_document_digits),
            knowledge: KnowledgeBase::builtin(),
            config,
        }
    }

    /// Replace the built-in knowledge corpus.
    pub fn with_knowledge(mut self, knowledge: KnowledgeBase) -> Self {
        self.knowledge = knowledge;
        self
    }

    /// Build an agent from application configuration.
    ///
    /// Reads the knowledge corpus eagerly when one is configured; the
    /// records file is only opened on first use.
    pub fn from_config(config: &AppConfig) -> AppResult<Self> {
        let mut source = CsvSource::new(config.resolved_data_file());
        if let Some(delimiter) = config.delimiter {
            source = source.with_delimiter(delimiter as u8);
        }

        let agent = Self::with_config(Arc::new(source), EngineConfig::from(config));

        match config.resolved_knowledge_file() {
            Some(path) => Ok(agent.with_knowledge(KnowledgeBase::load(&path)?)),
            None => Ok(agent),
        }
    }

    /// Load the record store if it has not been loaded yet.
    ///
    /// A failed load leaves the agent uninitialized so a later call retries.
    pub async fn initialize(&self) -> AppResult<()> {
        self.store().await.map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.store.initialized()
    }

    async fn store(&self) -> AppResult<&RecordStore> {
        self.store
            .get_or_try_init(|| async {
                RecordStore::load(self.source.as_ref()).await.map_err(|e| {
                    tracing::error!("Failed to load severance records: {}", e);
                    match e {
                        AppError::DataLoad(_) => e,
                        other => AppError::DataLoad(other.to_string()),
                    }
                })
            })
            .await
    }

    /// Answer one question.
    ///
    /// Rejects empty, blank, symbol-only and overlong input. Every other
    /// question gets an answer, including lookups that find no record.
    pub async fn process_question(&self, text: &str) -> AppResult<AnswerResult> {
        self.validate_question(text)?;

        let classified = self.classifier.classify(text);
        tracing::debug!(
            "Classified question as {}/{} (rule {:?})",
            classified.intent.action(),
            classified.intent.operation(),
            classified.rule
        );

        let result = match &classified.intent {
            Intent::Knowledge => self.answer_from_knowledge(text),
            Intent::Data(query) => {
                let store = self.store().await?;
                let execution = QueryExecutor::new(store).execute(query);
                AnswerResult::new(execution.answer, with_rule(execution.trace, &classified))
            }
        };

        tracing::info!("Answered question: {}", result.thinking());
        Ok(result)
    }

    /// Aggregate statistics over every loaded record.
    pub async fn get_stats(&self) -> AppResult<AggregateStats> {
        let store = self.store().await?;
        Ok(compute_stats(store.all()))
    }

    fn answer_from_knowledge(&self, text: &str) -> AnswerResult {
        let answer = self.knowledge.answer(&Question::new(text));

        let mut trace = Trace::new(Action::Knowledge, "knowledge");
        trace = if answer.topics.is_empty() {
            trace.with_outcome("no topic matched, listed available topics")
        } else {
            trace
                .with_parameter("topic", answer.topics.join("+"))
                .with_outcome(format!("matched {} keywords", answer.score))
        };

        AnswerResult::new(answer.text, trace)
    }

    fn validate_question(&self, text: &str) -> AppResult<()> {
        let trimmed = text.trim();

        if trimmed.is_empty() {
            tracing::warn!("Rejected empty question");
            return Err(AppError::Input("Question must not be empty".to_string()));
        }

        let length = trimmed.chars().count();
        if length > self.config.max_question_chars {
            tracing::warn!("Rejected question of {} characters", length);
            return Err(AppError::Input(format!(
                "Question is too long ({} characters, maximum {})",
                length, self.config.max_question_chars
            )));
        }

        if !trimmed.chars().any(char::is_alphanumeric) {
            tracing::warn!("Rejected question without letters or digits");
            return Err(AppError::Input(
                "Question must contain letters or digits".to_string(),
            ));
        }

        Ok(())
    }
}

fn with_rule(trace: Trace, classified: &ClassifiedIntent) -> Trace {
    match classified.rule {
        Some(rule) => trace.with_rule(rule.precedence().to_string()),
        None => trace,
    }
}
