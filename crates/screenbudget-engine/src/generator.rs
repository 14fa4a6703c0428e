use crate::adaptive;
use crate::bank;
use crate::textgen::TextGenerator;
use screenbudget_common::{
    Challenge, ChallengeSource, Clock, Error, Result, SubmissionResult, Tier,
};
use screenbudget_db::queries::ChallengeQueries;
use screenbudget_db::{Database, DbChallenge, NewChallenge};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

const SYSTEM_PROMPT: &str = "You are a math challenge generator for a brain training app. \
Generate a single arithmetic problem for the requested difficulty.\n\
Difficulty guidelines:\n\
- easy: single digit operations, basic addition/subtraction (reward: 5-6 minutes)\n\
- medium: two digit operations, multiplication/division (reward: 8-9 minutes)\n\
- hard: multi-digit operations, complex calculations (reward: 12-15 minutes)\n\
Respond with ONLY a JSON object in this exact format:\n\
{\"question\": \"12 + 8 = ?\", \"answer\": 20, \"reward\": 8}\n\
The answer must be a whole number.";

/// Challenge generation and submission. Generation prefers the configured
/// text upstream and falls back to the curated bank on any failure; either
/// way the challenge is persisted before it is returned, so submission can
/// always find it.
pub struct ChallengeService {
    db: Arc<Database>,
    clock: Arc<dyn Clock>,
    textgen: Option<Arc<dyn TextGenerator>>,
}

/// Validated shape of an upstream reply.
#[derive(Debug, PartialEq, Eq)]
struct GeneratedChallenge {
    question: String,
    answer: i64,
    reward_minutes: i64,
}

impl ChallengeService {
    pub fn new(
        db: Arc<Database>,
        clock: Arc<dyn Clock>,
        textgen: Option<Arc<dyn TextGenerator>>,
    ) -> Self {
        Self { db, clock, textgen }
    }

    /// Produce a new challenge for the requested tier (`easy`, `medium`,
    /// `hard`, `auto`, or anything else, which resolves to medium) given
    /// recent answer outcomes, most-recent-last.
    pub async fn generate(&self, requested_tier: &str, outcomes: &[bool]) -> Result<Challenge> {
        let tier = adaptive::resolve_tier(requested_tier, outcomes);
        let rate = adaptive::success_rate(outcomes);

        let generated = match &self.textgen {
            Some(gen) => match self.generate_upstream(gen.as_ref(), tier, rate).await {
                Ok(challenge) => Some(challenge),
                Err(e) => {
                    warn!("Challenge generation fell back to the bank: {}", e);
                    None
                }
            },
            None => None,
        };

        let new = match generated {
            Some(g) => NewChallenge {
                id: Uuid::new_v4().to_string(),
                question: g.question,
                answer: g.answer,
                difficulty: tier.as_str().to_string(),
                reward_minutes: g.reward_minutes,
                source: ChallengeSource::Generated.as_str().to_string(),
                created_at: self.clock.now(),
            },
            None => {
                let entry = bank::draw(tier);
                NewChallenge {
                    id: Uuid::new_v4().to_string(),
                    question: entry.question.to_string(),
                    answer: entry.answer,
                    difficulty: tier.as_str().to_string(),
                    reward_minutes: entry.reward_minutes,
                    source: ChallengeSource::Bank.as_str().to_string(),
                    created_at: self.clock.now(),
                }
            }
        };

        let row = ChallengeQueries::create(&self.db, new).await?;
        challenge_from_row(row)
    }

    /// One-shot upstream call. No retry: any failure routes straight to
    /// the bank.
    async fn generate_upstream(
        &self,
        gen: &dyn TextGenerator,
        tier: Tier,
        success_rate: f64,
    ) -> Result<GeneratedChallenge> {
        let prompt = format!(
            "Generate a {} math challenge. The user's recent success rate is {:.0}%.",
            tier,
            success_rate * 100.0
        );

        let raw = gen.complete(SYSTEM_PROMPT, &prompt).await?;
        debug!("Upstream reply: {}", raw);

        parse_reply(&raw)
    }

    /// Grade an answer against the stored challenge. The first submission
    /// records the outcome; repeats return it unchanged.
    pub async fn submit(&self, challenge_id: Uuid, answer: i64) -> Result<SubmissionResult> {
        let row = ChallengeQueries::get_by_id(&self.db, &challenge_id.to_string()).await?;

        if row.completed {
            return Ok(result_from_row(&row));
        }

        let correct = answer == row.answer;
        let first =
            ChallengeQueries::mark_submitted(&self.db, &row.id, correct, self.clock.now()).await?;
        if !first {
            // Lost a submission race; the recorded outcome wins.
            let row = ChallengeQueries::get_by_id(&self.db, &row.id).await?;
            return Ok(result_from_row(&row));
        }

        Ok(SubmissionResult {
            correct,
            reward_minutes: if correct { row.reward_minutes } else { 0 },
            correct_answer: row.answer,
        })
    }

    pub async fn get(&self, challenge_id: Uuid) -> Result<Challenge> {
        let row = ChallengeQueries::get_by_id(&self.db, &challenge_id.to_string()).await?;
        challenge_from_row(row)
    }
}

fn result_from_row(row: &DbChallenge) -> SubmissionResult {
    let correct = row.correct.unwrap_or(false);
    SubmissionResult {
        correct,
        reward_minutes: if correct { row.reward_minutes } else { 0 },
        correct_answer: row.answer,
    }
}

fn challenge_from_row(row: DbChallenge) -> Result<Challenge> {
    let id = Uuid::parse_str(&row.id)
        .map_err(|e| Error::Storage(format!("challenge {} has a bad id: {}", row.id, e)))?;

    let source = match row.source.as_str() {
        "generated" => ChallengeSource::Generated,
        _ => ChallengeSource::Bank,
    };

    Ok(Challenge {
        id,
        question: row.question,
        answer: row.answer,
        difficulty: Tier::from_key(&row.difficulty),
        reward_minutes: row.reward_minutes,
        completed: row.completed,
        correct: row.correct,
        source,
        created_at: row.created_at,
        submitted_at: row.submitted_at,
    })
}

/// Parse an untrusted upstream reply into a validated challenge. Strict on
/// structure: a JSON object with a non-empty question, an integer-coercible
/// answer and a positive integer-coercible reward. Anything else is an
/// upstream failure.
fn parse_reply(raw: &str) -> Result<GeneratedChallenge> {
    let trimmed = strip_code_fence(raw.trim());

    let value: serde_json::Value = serde_json::from_str(trimmed)
        .map_err(|e| Error::Upstream(format!("reply is not valid JSON: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| Error::Upstream("reply is not a JSON object".to_string()))?;

    let question = object
        .get("question")
        .and_then(|q| q.as_str())
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .ok_or_else(|| Error::Upstream("reply has no usable question".to_string()))?;

    let answer = object
        .get("answer")
        .and_then(coerce_int)
        .ok_or_else(|| Error::Upstream("reply answer is not an integer".to_string()))?;

    let reward_minutes = object
        .get("reward")
        .and_then(coerce_int)
        .filter(|&r| r > 0)
        .ok_or_else(|| Error::Upstream("reply reward is not a positive integer".to_string()))?;

    Ok(GeneratedChallenge { question: question.to_string(), answer, reward_minutes })
}

/// Accept integers, whole floats, and numeric strings; reject the rest.
fn coerce_int(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)
            }
        }
        serde_json::Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Models wrap JSON in markdown fences often enough that stripping one
/// outer fence is worth doing before the strict parse.
fn strip_code_fence(raw: &str) -> &str {
    let Some(rest) = raw.strip_prefix("```") else {
        return raw;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim().strip_suffix("```").unwrap_or(rest).trim()
}
