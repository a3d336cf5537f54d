//! Ring-buffer similarity sidecar: approximate matching over the raw
//! request fields rather than an exact fingerprint (§4.6).

use crate::config::SimilarityConfig;
use crate::events::SimilarityEvent;
use crate::jaccard::jaccard;
use llmcache_core::events::{EventListener, EventListeners};
use llmcache_core::Fingerprint;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Instant;

/// The request fields the sidecar compares. Distinct from
/// [`llmcache_core::FingerprintKey`]: the fingerprint is for exact-match
/// lookups, this is for approximate ones.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyFields {
    pub command: String,
    pub stderr: String,
    pub exit_code: i32,
    pub prompt: String,
    pub request_kind: String,
}

/// A single entry held by the sidecar's ring buffer.
#[derive(Debug, Clone)]
pub struct SimilarityEntry {
    pub fingerprint_of_key: Fingerprint,
    pub key_fields: KeyFields,
    pub response_payload: String,
    pub added_at: Instant,
}

/// Approximate-match cache keyed on weighted field similarity rather than an
/// exact fingerprint.
///
/// Bounded to `max_entries`; the oldest entry is evicted when a new one
/// arrives at capacity (§4.6).
pub struct SimilaritySidecar {
    entries: Mutex<VecDeque<SimilarityEntry>>,
    config: SimilarityConfig,
    event_listeners: EventListeners<SimilarityEvent>,
}

impl SimilaritySidecar {
    pub fn new(config: SimilarityConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(config.max_entries.max(1))),
            config,
            event_listeners: EventListeners::new(),
        }
    }

    pub fn add_listener<L>(&mut self, listener: L)
    where
        L: EventListener<SimilarityEvent> + 'static,
    {
        self.event_listeners.add(listener);
    }

    /// Records a new entry, evicting the oldest one if at capacity.
    pub fn add(&self, fingerprint_of_key: Fingerprint, key_fields: KeyFields, response_payload: String) {
        if !self.config.enabled || self.config.max_entries == 0 {
            return;
        }
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.config.max_entries {
            entries.pop_front();
            self.event_listeners.emit(&SimilarityEvent::Overflow {
                name: self.config.name.clone(),
                timestamp: Instant::now(),
            });
        }
        entries.push_back(SimilarityEntry {
            fingerprint_of_key,
            key_fields,
            response_payload,
            added_at: Instant::now(),
        });
    }

    /// Finds the best-scoring entry matching `query`, restricted to entries
    /// whose `request_kind` equals the query's, and returns its payload if
    /// the weighted score meets the configured threshold.
    ///
    /// `0.3·Jaccard(cmd) + 0.4·Jaccard(stderr) + 0.2·[exit codes equal] +
    /// 0.1·Jaccard(prompt)` (default weights; see [`SimilarityConfig`]).
    pub fn get_similar(&self, query: &KeyFields) -> Option<String> {
        if !self.config.enabled {
            return None;
        }
        let entries = self.entries.lock().unwrap();
        let best = entries
            .iter()
            .filter(|entry| entry.key_fields.request_kind == query.request_kind)
            .map(|entry| (self.score(&entry.key_fields, query), entry))
            .filter(|(score, _)| *score >= self.config.threshold)
            .max_by(|(a, _), (b, _)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        match best {
            Some((score, entry)) => {
                self.event_listeners.emit(&SimilarityEvent::ApproximateHit {
                    name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    score,
                });
                Some(entry.response_payload.clone())
            }
            None => {
                self.event_listeners.emit(&SimilarityEvent::ApproximateMiss {
                    name: self.config.name.clone(),
                    timestamp: Instant::now(),
                });
                None
            }
        }
    }

    fn score(&self, a: &KeyFields, b: &KeyFields) -> f64 {
        let weights = &self.config.weights;
        weights.command * jaccard(&a.command, &b.command)
            + weights.stderr * jaccard(&a.stderr, &b.stderr)
            + weights.exit_code * if a.exit_code == b.exit_code { 1.0 } else { 0.0 }
            + weights.prompt * jaccard(&a.prompt, &b.prompt)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }

    /// Drops every entry whose `request_kind` equals `kind`.
    pub fn remove_by_kind(&self, kind: &str) {
        self.entries
            .lock()
            .unwrap()
            .retain(|entry| entry.key_fields.request_kind != kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimilarityConfigBuilder;
    use llmcache_core::FingerprintKey;

    fn fp(tag: &str) -> Fingerprint {
        Fingerprint::of(&FingerprintKey {
            backend_id: "openai".into(),
            model_id: "gpt-x".into(),
            captured_context: tag.into(),
            language: "en".into(),
            request_kind: "suggestion".into(),
            prompt: None,
        })
        .unwrap()
    }

    fn fields(command: &str, stderr: &str, exit_code: i32, prompt: &str, kind: &str) -> KeyFields {
        KeyFields {
            command: command.to_string(),
            stderr: stderr.to_string(),
            exit_code,
            prompt: prompt.to_string(),
            request_kind: kind.to_string(),
        }
    }

    /// Matches the rejected-push regression scenario: a near-miss stderr
    /// message should score around 0.8, clearing a 0.7 threshold but not a
    /// 0.85 one.
    #[test]
    fn rejected_push_scenario_thresholds() {
        let sidecar = SimilaritySidecar::new(
            SimilarityConfigBuilder::new().threshold(0.7).build(),
        );
        sidecar.add(
            fp("p1"),
            fields("git push", "rejected", 1, "", "suggestion"),
            "use --force-with-lease".to_string(),
        );

        let query = fields("git push", "rejected non-fast-forward", 1, "", "suggestion");
        assert_eq!(
            sidecar.get_similar(&query),
            Some("use --force-with-lease".to_string())
        );

        let strict = SimilaritySidecar::new(
            SimilarityConfigBuilder::new().threshold(0.85).build(),
        );
        strict.add(
            fp("p1"),
            fields("git push", "rejected", 1, "", "suggestion"),
            "use --force-with-lease".to_string(),
        );
        assert_eq!(strict.get_similar(&query), None);
    }

    #[test]
    fn different_request_kind_is_skipped() {
        let sidecar = SimilaritySidecar::new(SimilarityConfigBuilder::new().threshold(0.1).build());
        sidecar.add(
            fp("p1"),
            fields("git push", "rejected", 1, "", "command-generation"),
            "payload".to_string(),
        );
        let query = fields("git push", "rejected", 1, "", "suggestion");
        assert_eq!(sidecar.get_similar(&query), None);
    }

    #[test]
    fn overflow_evicts_oldest() {
        // Threshold just below an exact match (1.0) so only the identical
        // "a" entry would ever satisfy it; once evicted, nothing else does.
        let sidecar = SimilaritySidecar::new(
            SimilarityConfigBuilder::new().max_entries(2).threshold(0.99).build(),
        );
        sidecar.add(fp("a"), fields("a", "", 0, "", "suggestion"), "A".to_string());
        sidecar.add(fp("b"), fields("b", "", 0, "", "suggestion"), "B".to_string());
        sidecar.add(fp("c"), fields("c", "", 0, "", "suggestion"), "C".to_string());
        assert_eq!(sidecar.len(), 2);

        let query = fields("a", "", 0, "", "suggestion");
        assert_eq!(sidecar.get_similar(&query), None);
    }

    #[test]
    fn remove_by_kind_drops_only_matching_entries() {
        let sidecar = SimilaritySidecar::new(SimilarityConfigBuilder::new().threshold(0.99).build());
        sidecar.add(fp("a"), fields("a", "", 0, "", "suggestion"), "A".to_string());
        sidecar.add(fp("b"), fields("b", "", 0, "", "command-generation"), "B".to_string());
        sidecar.remove_by_kind("suggestion");
        assert_eq!(sidecar.len(), 1);
        assert_eq!(
            sidecar.get_similar(&fields("b", "", 0, "", "command-generation")),
            Some("B".to_string())
        );
    }

    #[test]
    fn disabled_sidecar_never_matches() {
        let sidecar = SimilaritySidecar::new(SimilarityConfigBuilder::new().enabled(false).build());
        sidecar.add(fp("a"), fields("a", "", 0, "", "suggestion"), "A".to_string());
        assert_eq!(sidecar.get_similar(&fields("a", "", 0, "", "suggestion")), None);
    }
}
