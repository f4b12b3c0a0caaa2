use std::sync::Arc;

use lexis_dispatch::{Anything, Yield};
use lexis_ecs::patterns::{IsAggregate, IsEntity, IsNoun, IsNounPhrase, IsVerb, IsVerbPhrase};
use lexis_ecs::ConstructRef;

use crate::synonyms::SynonymProvider;

/// Two noun phrases are similar when their noun overlap ratio exceeds this.
pub const NOUN_PHRASE_SIMILARITY_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityResult {
    pub matched: bool,
    /// Degree of similarity in `[0, 1]`.
    pub ratio: f64,
}

impl SimilarityResult {
    pub const IDENTICAL: SimilarityResult = SimilarityResult { matched: true, ratio: 1.0 };
    pub const UNRELATED: SimilarityResult = SimilarityResult { matched: false, ratio: 0.0 };

    pub fn from_match(matched: bool) -> Self {
        if matched {
            Self::IDENTICAL
        } else {
            Self::UNRELATED
        }
    }
}

/// Decides whether two constructs denote the same kind of thing.
///
/// Comparisons are dispatched on the concrete kinds of both sides, first arm wins.
/// Pairs without an arm are unrelated.
#[derive(Clone, Copy)]
pub struct SimilarityEngine<'s> {
    synonyms: &'s dyn SynonymProvider,
}

impl<'s> SimilarityEngine<'s> {
    pub fn new(synonyms: &'s dyn SynonymProvider) -> Self {
        Self { synonyms }
    }

    pub fn compare(&self, a: ConstructRef<'_>, b: ConstructRef<'_>) -> SimilarityResult {
        let same_text = match (a.folded(), b.folded()) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        };

        Yield::on((a, b))
            .when::<(Anything, Anything)>(|_| same_text)
            .then_value(SimilarityResult::IDENTICAL)
            .case::<(IsAggregate, IsAggregate)>(|(x, y)| self.aggregates(x, y))
            .case::<(IsAggregate, IsEntity)>(|(x, y)| self.aggregate_member(x, y))
            .case::<(IsEntity, IsAggregate)>(|(x, y)| self.aggregate_member(y, x))
            .case::<(IsNoun, IsNoun)>(|(x, y)| SimilarityResult::from_match(self.words_synonymous(x, y)))
            .case::<(IsNoun, IsNounPhrase)>(|(x, y)| self.noun_to_phrase(x, y))
            .case::<(IsNounPhrase, IsNoun)>(|(x, y)| self.noun_to_phrase(y, x))
            .case::<(IsNounPhrase, IsNounPhrase)>(|(x, y)| self.phrase_overlap(x, y))
            .case::<(IsVerb, IsVerb)>(|(x, y)| SimilarityResult::from_match(self.words_synonymous(x, y)))
            .case::<(IsVerbPhrase, IsVerbPhrase)>(|(x, y)| self.head_verbs(x, y))
            .or_default(SimilarityResult::UNRELATED)
    }

    /// Synonymy in either direction; the provider is not trusted to be symmetric.
    pub fn synonymous(&self, a: &str, b: &str) -> bool {
        a == b || self.synonyms.is_synonym_for(a, b) || self.synonyms.is_synonym_for(b, a)
    }

    fn words_synonymous(&self, a: ConstructRef<'_>, b: ConstructRef<'_>) -> bool {
        match (a.folded(), b.folded()) {
            (Some(x), Some(y)) => self.synonymous(&x, &y),
            _ => false,
        }
    }

    // Majority of the member pairs.
    fn aggregates(&self, a: ConstructRef<'_>, b: ConstructRef<'_>) -> SimilarityResult {
        let (left, right) = (a.aggregate_members(), b.aggregate_members());
        let total = left.len() * right.len();
        if total == 0 {
            return SimilarityResult::UNRELATED;
        }
        let matching = left
            .iter()
            .flat_map(|x| right.iter().map(move |y| (*x, *y)))
            .filter(|(x, y)| self.compare(a.at(*x), b.at(*y)).matched)
            .count();

        SimilarityResult {
            matched: matching * 2 > total,
            ratio: matching as f64 / total as f64,
        }
    }

    fn aggregate_member(&self, aggregate: ConstructRef<'_>, entity: ConstructRef<'_>) -> SimilarityResult {
        aggregate
            .aggregate_members()
            .into_iter()
            .map(|member| self.compare(aggregate.at(member), entity))
            .fold(SimilarityResult::UNRELATED, |best, next| SimilarityResult {
                matched: best.matched || next.matched,
                ratio: best.ratio.max(next.ratio),
            })
    }

    fn noun_to_phrase(&self, noun: ConstructRef<'_>, phrase: ConstructRef<'_>) -> SimilarityResult {
        match phrase.nouns().as_slice() {
            [only] => SimilarityResult::from_match(self.words_synonymous(noun, *only)),
            _ => SimilarityResult::UNRELATED,
        }
    }

    /// `(matched(A→B) + matched(B→A)) / (|A| + |B|)` over the nouns of both phrases,
    /// where a noun is matched when it has a synonym among the other phrase's nouns.
    fn phrase_overlap(&self, a: ConstructRef<'_>, b: ConstructRef<'_>) -> SimilarityResult {
        let left = folded_nouns(a);
        let right = folded_nouns(b);
        if left.is_empty() || right.is_empty() {
            return SimilarityResult::UNRELATED;
        }

        let matched_in = |from: &[Arc<str>], to: &[Arc<str>]| {
            from.iter()
                .filter(|x| to.iter().any(|y| self.synonymous(x, y)))
                .count()
        };
        let matched = matched_in(&left, &right) + matched_in(&right, &left);
        let ratio = matched as f64 / (left.len() + right.len()) as f64;

        SimilarityResult {
            matched: ratio > NOUN_PHRASE_SIMILARITY_THRESHOLD,
            ratio,
        }
    }

    fn head_verbs(&self, a: ConstructRef<'_>, b: ConstructRef<'_>) -> SimilarityResult {
        match (a.head_verb(), b.head_verb()) {
            (Some(x), Some(y)) => SimilarityResult::from_match(self.words_synonymous(x, y)),
            _ => SimilarityResult::UNRELATED,
        }
    }
}

fn folded_nouns(phrase: ConstructRef<'_>) -> Vec<Arc<str>> {
    phrase.nouns().iter().filter_map(|noun| noun.folded()).collect()
}
