//! Factory chatbot.
//!
//! Questions are matched against an ordered table of keyword sets; the first
//! intent with a keyword contained in the lower-cased question wins and picks
//! the response template. Templates are filled from freshly computed metrics.
//!
//! An optional remote [`AnswerProvider`] can be put in front of the keyword
//! responder. Remote failures and timeouts fall back to the keyword answer.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::models::{BatchQuality, EnergyMetrics, LineStatus, MetricsSummary, StatusEntry};
use super::store::DataStore;
use crate::errors::BotError;

pub const DEFAULT_PRODUCTION_TARGET: f64 = 600.0;
/// Efficiency above this is reported as good.
pub const EFFICIENCY_GOOD_ABOVE: f64 = 55.0;
/// Overall status is good when at least this many lines are operational.
pub const HEALTHY_LINE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Production,
    Efficiency,
    Downtime,
    Status,
    Quality,
    Energy,
    Help,
}

/// Evaluated top to bottom; the first match wins.
const INTENTS: &[(Intent, &[&str])] = &[
    (Intent::Production, &["production", "output", "units"]),
    (Intent::Efficiency, &["efficiency", "performance"]),
    (Intent::Downtime, &["downtime", "maintenance", "repair"]),
    (Intent::Status, &["status", "condition", "state"]),
    (Intent::Quality, &["quality", "batch quality", "pass rate"]),
    (Intent::Energy, &["energy", "consumption", "emissions"]),
    (Intent::Help, &["help", "assist", "command", "what can you"]),
];

const HELP_TEXT: &str = "I can provide information about production rates, efficiency, downtime, line status, \
batch quality, and energy consumption. You can ask questions like 'What's our current production?', \
'How's our efficiency?', 'Any downtime issues?', 'What's the status of our lines?', \
'How's our batch quality?', or 'What's our energy consumption?'";

const FALLBACK_TEXT: &str = "I'm not sure I understand. You can ask about production, efficiency, downtime, status, \
batch quality, or energy consumption. Type 'help' for more information.";

pub fn detect_intent(question: &str) -> Option<Intent> {
    let question = question.to_lowercase();
    INTENTS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| question.contains(k)))
        .map(|(intent, _)| *intent)
}

/// Everything a template can reference, computed at question time.
#[derive(Debug, Clone)]
pub struct BotContext {
    pub metrics: MetricsSummary,
    pub status: Vec<StatusEntry>,
    pub batch_quality: BatchQuality,
    pub energy: EnergyMetrics,
}

impl BotContext {
    pub fn from_store(store: &DataStore) -> Self {
        Self {
            metrics: store.metrics().value,
            status: store.status().value,
            batch_quality: store.batch_quality().value,
            energy: store.energy_metrics().value,
        }
    }

    fn count(&self, status: LineStatus) -> usize {
        self.status.iter().filter(|line| line.status == status).count()
    }
}

fn format_target(target: f64) -> String {
    if target.fract() == 0.0 {
        format!("{:.0}", target)
    } else {
        format!("{}", target)
    }
}

/// Fill the template for `intent`, or the generic reply when there is none.
pub fn render(intent: Option<Intent>, ctx: &BotContext, production_target: f64) -> String {
    let m = &ctx.metrics;
    match intent {
        Some(Intent::Production) => format!(
            "Current production is at {:.2} units. This is {} our target of {} units. Efficiency is at {:.2}%.",
            m.production,
            if m.production > production_target { "above" } else { "below" },
            format_target(production_target),
            m.efficiency,
        ),
        Some(Intent::Efficiency) => format!(
            "Factory efficiency is currently at {:.2}%. {} Our profit margin is {:.2}%.",
            m.efficiency,
            if m.efficiency > EFFICIENCY_GOOD_ABOVE {
                "This is good!"
            } else {
                "We should aim to improve this."
            },
            m.profit_margin,
        ),
        Some(Intent::Downtime) => format!(
            "Current downtime is {:.2} hours. Some machines may require maintenance soon based on their age.",
            m.downtime,
        ),
        Some(Intent::Status) => {
            let operational = ctx.count(LineStatus::Operational);
            format!(
                "Currently, {} production lines are operational, {} lines are showing warnings, and {} lines are down. Overall factory status is {}",
                operational,
                ctx.count(LineStatus::Warning),
                ctx.count(LineStatus::Down),
                if operational >= HEALTHY_LINE_COUNT { "good." } else { "concerning." },
            )
        }
        Some(Intent::Quality) => format!(
            "The average batch quality pass rate is {:.2}%. Our best batch had a {:.2}% pass rate, while our worst had a {:.2}% pass rate.",
            ctx.batch_quality.average, ctx.batch_quality.max, ctx.batch_quality.min,
        ),
        Some(Intent::Energy) => format!(
            "Average energy consumption is {:.2} kWh with an efficiency rating of {:.2}. CO2 emissions average {:.2} kg.",
            ctx.energy.consumption, ctx.energy.efficiency, ctx.energy.emissions,
        ),
        Some(Intent::Help) => HELP_TEXT.to_string(),
        None => FALLBACK_TEXT.to_string(),
    }
}

// ── Answer providers ──────────────────────────────────────────────────

/// Anything that can turn a question into an answer.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, BotError>;
}

/// Answers from the keyword table and the live dataset.
#[derive(Debug, Clone)]
pub struct KeywordResponder {
    store: DataStore,
    production_target: f64,
}

impl KeywordResponder {
    pub fn new(store: DataStore, production_target: f64) -> Self {
        Self {
            store,
            production_target,
        }
    }

    pub fn reply(&self, question: &str) -> String {
        let intent = detect_intent(question);
        debug!(?intent, "Matched bot intent");
        render(intent, &BotContext::from_store(&self.store), self.production_target)
    }
}

#[async_trait]
impl AnswerProvider for KeywordResponder {
    async fn answer(&self, question: &str) -> Result<String, BotError> {
        Ok(self.reply(question))
    }
}

#[derive(Serialize)]
struct RemoteQuestion<'a> {
    question: &'a str,
}

#[derive(Deserialize)]
struct RemoteAnswer {
    result: String,
}

/// A question-answering service reached over HTTP.
///
/// Posts `{"question": ...}` and expects `{"result": ...}` back.
pub struct HttpAnswerProvider {
    client: reqwest::Client,
    url: String,
}

impl HttpAnswerProvider {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl AnswerProvider for HttpAnswerProvider {
    async fn answer(&self, question: &str) -> Result<String, BotError> {
        let resp = self
            .client
            .post(&self.url)
            .json(&RemoteQuestion { question })
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(BotError::Status {
                status: resp.status().as_u16(),
            });
        }

        let body: RemoteAnswer = resp.json().await?;
        if body.result.trim().is_empty() {
            return Err(BotError::EmptyAnswer);
        }
        Ok(body.result)
    }
}

/// The chatbot as served: remote provider first when configured, keyword
/// responder otherwise or on any remote failure.
#[derive(Clone)]
pub struct Bot {
    local: KeywordResponder,
    remote: Option<Arc<dyn AnswerProvider>>,
    timeout: Duration,
}

impl Bot {
    pub fn new(local: KeywordResponder) -> Self {
        Self {
            local,
            remote: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_remote(mut self, remote: Arc<dyn AnswerProvider>, timeout: Duration) -> Self {
        self.remote = Some(remote);
        self.timeout = timeout;
        self
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    async fn ask_remote(&self, remote: &dyn AnswerProvider, question: &str) -> Result<String, BotError> {
        tokio::time::timeout(self.timeout, remote.answer(question))
            .await
            .map_err(|_| BotError::Timeout {
                secs: self.timeout.as_secs(),
            })?
    }

    pub async fn reply(&self, question: &str) -> String {
        if let Some(remote) = &self.remote {
            match self.ask_remote(remote.as_ref(), question).await {
                Ok(answer) => return answer,
                Err(e) => warn!(error = %e, "Remote answer provider failed, using keyword responder"),
            }
        }
        self.local.reply(question)
    }
}
