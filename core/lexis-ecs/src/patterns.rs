use std::fmt;
use std::sync::Arc;

use hecs::{Component, Entity, World};
use lexis_dispatch::Pattern;
use lexis_protocol::{PhraseKind, WordFlags, WordKind};

use crate::components::{Aggregate, EntityRoles, Phrase, Text, VerbalRoles, Word};

/// A read-only handle on one construct of a document, the value every
/// construct pattern is matched against.
#[derive(Clone, Copy)]
pub struct ConstructRef<'w> {
    world: &'w World,
    entity: Entity,
}

impl<'w> ConstructRef<'w> {
    pub fn new(world: &'w World, entity: Entity) -> Self {
        Self { world, entity }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    /// Another construct of the same document.
    pub fn at(&self, entity: Entity) -> ConstructRef<'w> {
        ConstructRef::new(self.world, entity)
    }

    pub fn has<T: Component>(&self) -> bool {
        self.world.get::<&T>(self.entity).is_ok()
    }

    pub fn word(&self) -> Option<Word> {
        self.world.get::<&Word>(self.entity).ok().map(|word| *word)
    }

    pub fn phrase_kind(&self) -> Option<PhraseKind> {
        self.world.get::<&Phrase>(self.entity).ok().map(|phrase| phrase.kind)
    }

    pub fn phrase_words(&self) -> Vec<Entity> {
        self.world
            .get::<&Phrase>(self.entity)
            .map(|phrase| phrase.words.clone())
            .unwrap_or_default()
    }

    pub fn aggregate_members(&self) -> Vec<Entity> {
        self.world
            .get::<&Aggregate>(self.entity)
            .map(|aggregate| aggregate.members.clone())
            .unwrap_or_default()
    }

    pub fn text(&self) -> Option<Arc<str>> {
        self.world.get::<&Text>(self.entity).ok().map(|text| text.raw.clone())
    }

    pub fn folded(&self) -> Option<Arc<str>> {
        self.world.get::<&Text>(self.entity).ok().map(|text| text.folded.clone())
    }

    pub fn entity_roles(&self) -> Option<EntityRoles> {
        self.world.get::<&EntityRoles>(self.entity).ok().map(|roles| (*roles).clone())
    }

    pub fn verbal_roles(&self) -> Option<VerbalRoles> {
        self.world.get::<&VerbalRoles>(self.entity).ok().map(|roles| (*roles).clone())
    }

    /// Words of this phrase accepted by `keep`, or the construct itself when it is an accepted word.
    pub fn words_where(&self, mut keep: impl FnMut(Word) -> bool) -> Vec<ConstructRef<'w>> {
        if let Some(word) = self.word() {
            return if keep(word) { vec![*self] } else { Vec::new() };
        }
        self.phrase_words()
            .into_iter()
            .map(|entity| self.at(entity))
            .filter(|word| word.word().map_or(false, &mut keep))
            .collect()
    }

    pub fn nouns(&self) -> Vec<ConstructRef<'w>> {
        self.words_where(|word| word.kind.is_noun())
    }

    /// The last non-modal verb of a verb phrase, or the verb itself.
    pub fn head_verb(&self) -> Option<ConstructRef<'w>> {
        let verbs = self.words_where(|word| word.kind == WordKind::Verb);
        verbs
            .iter()
            .rev()
            .find(|verb| verb.word().map_or(false, |w| !w.flags.contains(WordFlags::MODAL)))
            .or_else(|| verbs.last())
            .copied()
    }

    /// `NounPhrase "the budget"`, for diagnostics.
    pub fn describe(&self) -> String {
        let category = match (self.word(), self.phrase_kind()) {
            (Some(word), _) => format!("{:?}", word.kind),
            (None, Some(kind)) => format!("{:?}", kind),
            (None, None) if self.has::<Aggregate>() => "Aggregate".to_string(),
            (None, None) => "Construct".to_string(),
        };
        match self.text() {
            Some(text) => format!("{} {:?}", category, text),
            None => category,
        }
    }
}

impl fmt::Debug for ConstructRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.entity, self.describe())
    }
}

macro_rules! construct_pattern {
    ($(#[$doc:meta])* $name:ident, |$c:ident| $test:expr) => {
        $(#[$doc])*
        pub struct $name;

        impl<'w> Pattern<ConstructRef<'w>> for $name {
            type View = ConstructRef<'w>;

            fn project(value: &ConstructRef<'w>) -> Option<ConstructRef<'w>> {
                let $c = value;
                if $test {
                    Some(*value)
                } else {
                    None
                }
            }
        }
    };
}

construct_pattern!(
    /// Common or proper noun.
    IsNoun,
    |c| c.word().map_or(false, |w| w.kind.is_noun())
);
construct_pattern!(IsVerb, |c| c.word().map_or(false, |w| w.kind == WordKind::Verb));
construct_pattern!(IsNounPhrase, |c| c.phrase_kind() == Some(PhraseKind::NounPhrase));
construct_pattern!(IsVerbPhrase, |c| c.phrase_kind() == Some(PhraseKind::VerbPhrase));
construct_pattern!(IsAdjectivePhrase, |c| c.phrase_kind() == Some(PhraseKind::AdjectivePhrase));
construct_pattern!(IsAdverbPhrase, |c| c.phrase_kind() == Some(PhraseKind::AdverbPhrase));
construct_pattern!(IsPrepositionalPhrase, |c| c.phrase_kind() == Some(PhraseKind::PrepositionalPhrase));
construct_pattern!(IsConjunctionPhrase, |c| c.phrase_kind() == Some(PhraseKind::ConjunctionPhrase));
construct_pattern!(
    IsSubordinateClauseBegin,
    |c| c.phrase_kind() == Some(PhraseKind::SubordinateClauseBeginPhrase)
);
construct_pattern!(
    /// Anything that can fill a subject/object slot, aggregates included.
    IsEntity,
    |c| c.has::<EntityRoles>()
);
construct_pattern!(IsAggregate, |c| c.has::<Aggregate>());
