//! Question enrichment: named-entity spans are replaced by their resource IRIs.

use crate::types::NamedEntity;
use tracing::{debug, info, warn};

/// Rewrites questions so the QA service sees resource IRIs instead of surface forms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityEnricher {
    threshold: f64,
}

impl EntityEnricher {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn enrich(&self, question: &str, entities: &[NamedEntity]) -> String {
        enrich(question, entities, self.threshold)
    }
}

/// Replaces every entity with `score >= threshold` (or no score) by its resource.
///
/// Spans are processed rightmost first so pending offsets stay valid. When the
/// character after a replaced span is not whitespace, one space is inserted.
/// Spans that are inverted, out of bounds or overlap an already replaced span are
/// skipped.
pub fn enrich(question: &str, entities: &[NamedEntity], threshold: f64) -> String {
    let mut retained: Vec<&NamedEntity> = entities
        .iter()
        .filter(|e| {
            let keep = e.passes(threshold);
            if !keep {
                debug!(resource = %e.resource, score = ?e.score, threshold, "entity below threshold");
            }
            keep
        })
        .collect();
    // stable: equal starts keep input order
    retained.sort_by(|a, b| b.start.cmp(&a.start));

    let mut chars: Vec<char> = question.chars().collect();
    let original_len = chars.len();
    // Everything at or after `limit` has already been rewritten.
    let mut limit = original_len;

    for (run, entity) in retained.into_iter().enumerate() {
        if entity.start > entity.end || entity.end > original_len {
            warn!(
                start = entity.start,
                end = entity.end,
                len = original_len,
                "entity span outside question, skipped"
            );
            continue;
        }
        if entity.end > limit {
            warn!(
                start = entity.start,
                end = entity.end,
                "entity span overlaps a replaced span, skipped"
            );
            continue;
        }

        let needs_space = chars
            .get(entity.end)
            .map(|c| !c.is_whitespace())
            .unwrap_or(false);
        let mut replacement: Vec<char> = entity.resource.chars().collect();
        if needs_space {
            replacement.push(' ');
        }
        let surface: String = chars[entity.start..entity.end].iter().collect();
        chars.splice(entity.start..entity.end, replacement);
        limit = entity.start;

        debug!(
            run,
            surface = %surface,
            start = entity.start,
            end = entity.end,
            resource = %entity.resource,
            "replaced entity"
        );
    }

    let enriched: String = chars.into_iter().collect();
    info!(original = %question, changed = %enriched, "question enriched");
    enriched
}

#[cfg(test)]
mod tests {
    use super::*;

    const Q: &str = "What is the capital of Germany?";

    #[test]
    fn test_replaces_entities_at_or_above_threshold() {
        let entities = vec![
            NamedEntity::new("http://www.wikidata.org/entity/Q183", 23, 30).with_score(0.9),
            NamedEntity::new("http://www.wikidata.org/entity/Q5119", 12, 19).with_score(0.5),
        ];
        assert_eq!(
            enrich(Q, &entities, 0.5),
            "What is the http://www.wikidata.org/entity/Q5119 of http://www.wikidata.org/entity/Q183 ?"
        );
    }

    #[test]
    fn test_entities_below_threshold_are_untouched() {
        let entities = vec![
            NamedEntity::new("http://www.wikidata.org/entity/Q183", 23, 30).with_score(0.9),
            NamedEntity::new("http://www.wikidata.org/entity/Q5119", 12, 19).with_score(0.3),
        ];
        assert_eq!(
            enrich(Q, &entities, 0.5),
            "What is the capital of http://www.wikidata.org/entity/Q183 ?"
        );
    }

    #[test]
    fn test_entity_without_score_is_kept() {
        let entities = vec![NamedEntity::new("dbr:Germany", 23, 30)];
        assert_eq!(enrich(Q, &entities, 0.99), "What is the capital of dbr:Germany ?");
    }

    #[test]
    fn test_no_space_added_before_whitespace_or_at_end() {
        let entities = vec![
            NamedEntity::new("dbr:Berlin", 0, 6).with_score(1.0),
            NamedEntity::new("dbr:Germany", 10, 17).with_score(1.0),
        ];
        assert_eq!(enrich("Berlin in Germany", &entities, 0.5), "dbr:Berlin in dbr:Germany");
    }

    #[test]
    fn test_input_order_does_not_matter() {
        let forward = vec![NamedEntity::new("A", 0, 3), NamedEntity::new("B", 4, 7)];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(enrich("foo bar", &forward, 0.0), enrich("foo bar", &backward, 0.0));
        assert_eq!(enrich("foo bar", &forward, 0.0), "A B");
    }

    #[test]
    fn test_adjacent_spans_get_exactly_one_space() {
        let entities = vec![NamedEntity::new("A", 0, 3), NamedEntity::new("B", 3, 6)];
        assert_eq!(enrich("foobar", &entities, 0.0), "A B");
    }

    #[test]
    fn test_offsets_are_characters_not_bytes() {
        let entities = vec![NamedEntity::new("dbr:Köln", 9, 13)];
        assert_eq!(enrich("Wo liegt Köln?", &entities, 0.0), "Wo liegt dbr:Köln ?");
    }

    #[test]
    fn test_invalid_and_overlapping_spans_are_skipped() {
        let entities = vec![
            NamedEntity::new("X", 5, 99),
            NamedEntity::new("Y", 4, 2),
            NamedEntity::new("B", 4, 7),
            NamedEntity::new("C", 2, 5),
        ];
        assert_eq!(enrich("foo bar", &entities, 0.0), "foo B");
    }

    #[test]
    fn test_enricher_uses_configured_threshold() {
        let enricher = EntityEnricher::new(0.8);
        let entities = vec![NamedEntity::new("dbr:Germany", 23, 30).with_score(0.7)];
        assert_eq!(enricher.enrich(Q, &entities), Q);
    }
}
