//! Fallback controller — ordered strategy cascade with one guarantee:
//! the caller always gets an answer string back, never an error.
//!
//! Tiers are tried in fixed priority (autonomous → smart pipeline →
//! strict pipeline); the first acceptable response wins and a failed
//! tier is never retried. The autonomous tier additionally passes a
//! quality gate on its response text; the deterministic tiers are
//! trusted to have degraded internally.

use std::sync::Arc;

use async_trait::async_trait;
use groundcrew_core::Error;
use tracing::{info, warn};

/// Returned when every tier has failed.
pub const FINAL_APOLOGY: &str = "I apologize, but I'm having trouble processing your request. \
     Please try rephrasing your question.";

/// Gated responses must exceed this length.
const MIN_ACCEPTED_CHARS: usize = 20;

/// One answer-producing strategy.
///
/// Implementations should recover internally wherever a safe default
/// exists; an `Err` here means the strategy has nothing to offer and
/// the controller moves on.
#[async_trait]
pub trait AnswerStrategy: Send + Sync {
    /// A short name for logging.
    fn name(&self) -> &str;

    /// Produce an answer for one turn.
    async fn answer(&self, turn: &str) -> Result<String, Error>;
}

struct Tier {
    strategy: Arc<dyn AnswerStrategy>,
    /// Whether the response quality gate applies.
    gated: bool,
}

/// Tries strategies in priority order; re-entrant per turn.
pub struct FallbackController {
    tiers: Vec<Tier>,
}

impl FallbackController {
    /// The standard cascade: autonomous (gated), then the smart
    /// pipeline, then the strict pipeline.
    pub fn new(
        autonomous: Arc<dyn AnswerStrategy>,
        smart: Arc<dyn AnswerStrategy>,
        strict: Arc<dyn AnswerStrategy>,
    ) -> Self {
        Self {
            tiers: vec![
                Tier {
                    strategy: autonomous,
                    gated: true,
                },
                Tier {
                    strategy: smart,
                    gated: false,
                },
                Tier {
                    strategy: strict,
                    gated: false,
                },
            ],
        }
    }

    /// An arbitrary cascade, mostly for tests.
    pub fn from_tiers(tiers: Vec<(Arc<dyn AnswerStrategy>, bool)>) -> Self {
        Self {
            tiers: tiers
                .into_iter()
                .map(|(strategy, gated)| Tier { strategy, gated })
                .collect(),
        }
    }

    /// Resolve one turn into an answer. Never fails.
    pub async fn handle(&self, turn: &str) -> String {
        for (i, tier) in self.tiers.iter().enumerate() {
            let name = tier.strategy.name().to_string();

            info!(
                strategy = %name,
                attempt = i + 1,
                total = self.tiers.len(),
                "Fallback: trying strategy"
            );

            match tier.strategy.answer(turn).await {
                Ok(response) if Self::acceptable(tier.gated, &response) => {
                    info!(strategy = %name, "Fallback: strategy succeeded");
                    return response;
                }
                Ok(_) => {
                    warn!(strategy = %name, "Fallback: response rejected by quality gate, trying next");
                }
                Err(e) => {
                    warn!(strategy = %name, error = %e, "Fallback: strategy failed, trying next");
                }
            }
        }

        warn!("Fallback: all strategies exhausted");
        FINAL_APOLOGY.to_string()
    }

    /// Acceptance test. Every tier must produce non-empty text; a gated
    /// tier must additionally clear the length bar and avoid the
    /// failure markers ("error", "maximum iterations") that a degraded
    /// reasoning loop leaks into its output.
    fn acceptable(gated: bool, response: &str) -> bool {
        let trimmed = response.trim();
        if trimmed.is_empty() {
            return false;
        }
        if !gated {
            return true;
        }

        let lower = trimmed.to_lowercase();
        trimmed.chars().count() > MIN_ACCEPTED_CHARS
            && !lower.contains("error")
            && !lower.contains("maximum iterations")
    }
}
