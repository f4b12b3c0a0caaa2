pub mod components;
pub mod error;
pub mod notation;
pub mod patterns;

use std::sync::Arc;

use hecs::{Component, Entity, World};
use lexis_protocol::{EntityKind, PhraseKind, TaggedDocument, TaggedWord, WordKind};

use components::{
    Aggregate, Clause, EntityRoles, Paragraph, Phrase, Role, Sentence, Text, VerbalRoles, Weight, Word,
};
pub use error::{NotationError, WorldError};
pub use patterns::ConstructRef;

/// One document: every word, phrase, clause, sentence and paragraph is an entity.
pub struct DocumentWorld {
    world: World,
    words: Vec<Entity>,
    phrases: Vec<Entity>,
    sentences: Vec<Entity>,
    paragraphs: Vec<Entity>,
}

impl Default for DocumentWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWorld {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            words: Vec::new(),
            phrases: Vec::new(),
            sentences: Vec::new(),
            paragraphs: Vec::new(),
        }
    }

    pub fn from_tagged(document: &TaggedDocument) -> Self {
        let mut world = Self::new();
        for paragraph in &document.paragraphs {
            let mut sentences = Vec::with_capacity(paragraph.sentences.len());
            for sentence in &paragraph.sentences {
                let mut clauses = Vec::with_capacity(sentence.clauses.len());
                for clause in &sentence.clauses {
                    let mut phrases = Vec::with_capacity(clause.phrases.len());
                    for phrase in &clause.phrases {
                        let words = phrase.words.iter().map(|word| world.add_word(word)).collect();
                        phrases.push(world.add_phrase(phrase.kind, words));
                    }
                    clauses.push(phrases);
                }
                sentences.push(world.add_sentence(clauses));
            }
            world.add_paragraph(sentences);
        }
        world
    }

    /// Builds a document from bracketed chunk notation (see [`notation`]).
    pub fn from_notation(input: &str) -> Result<Self, NotationError> {
        notation::parse_document(input).map(|document| Self::from_tagged(&document))
    }

    pub fn add_word(&mut self, word: &TaggedWord) -> Entity {
        let entity = self.world.spawn((
            Text::new(&word.text),
            Word { kind: word.kind, flags: word.flags },
            Weight::default(),
        ));
        if word.kind.is_nominal() {
            let _ = self.world.insert_one(entity, EntityRoles::new(word.entity_kind));
        } else if word.kind == WordKind::Verb {
            let _ = self.world.insert_one(entity, VerbalRoles::default());
        }
        self.words.push(entity);
        entity
    }

    pub fn add_phrase(&mut self, kind: PhraseKind, words: Vec<Entity>) -> Entity {
        let text = words
            .iter()
            .filter_map(|word| self.world.get::<&Text>(*word).ok().map(|text| text.raw.clone()))
            .collect::<Vec<_>>()
            .join(" ");

        let entity_kind = match kind {
            PhraseKind::NounPhrase => Some(self.head_entity_kind(&words)),
            _ => None,
        };

        let entity = self.world.spawn((Text::new(&text), Phrase { kind, words }, Weight::default()));
        match (kind, entity_kind) {
            (PhraseKind::NounPhrase, Some(entity_kind)) => {
                let _ = self.world.insert_one(entity, EntityRoles::new(entity_kind));
            }
            (PhraseKind::VerbPhrase, _) => {
                let _ = self.world.insert_one(entity, VerbalRoles::default());
            }
            _ => {}
        }
        self.phrases.push(entity);
        entity
    }

    /// Adds a sentence from its clauses' phrases.
    pub fn add_sentence(&mut self, clauses: Vec<Vec<Entity>>) -> Entity {
        let phrases = clauses.iter().flatten().copied().collect();
        let clauses = clauses
            .into_iter()
            .map(|phrases| self.world.spawn((Clause { phrases },)))
            .collect();
        let entity = self.world.spawn((Sentence { clauses, phrases },));
        self.sentences.push(entity);
        entity
    }

    pub fn add_paragraph(&mut self, sentences: Vec<Entity>) -> Entity {
        let entity = self.world.spawn((Paragraph { sentences },));
        self.paragraphs.push(entity);
        entity
    }

    /// Builds an aggregate entity, flattening any aggregate among `members`.
    pub fn spawn_aggregate(&mut self, members: impl IntoIterator<Item = Entity>) -> Result<Entity, WorldError> {
        let mut flat = Vec::new();
        for member in members {
            if let Ok(aggregate) = self.world.get::<&Aggregate>(member) {
                flat.extend(aggregate.members.iter().copied());
                continue;
            }
            if self.world.get::<&EntityRoles>(member).is_err() {
                return Err(self.missing(member, "Entity"));
            }
            flat.push(member);
        }

        let mut kinds = flat
            .iter()
            .filter_map(|member| self.world.get::<&EntityRoles>(*member).ok().map(|roles| roles.kind));
        let kind = match kinds.next() {
            Some(first) if kinds.all(|kind| kind == first) => first,
            _ => EntityKind::Unknown,
        };

        Ok(self.world.spawn((Aggregate { members: flat }, EntityRoles::new(kind))))
    }

    pub fn words(&self) -> &[Entity] {
        &self.words
    }

    pub fn phrases(&self) -> &[Entity] {
        &self.phrases
    }

    pub fn sentences(&self) -> &[Entity] {
        &self.sentences
    }

    pub fn paragraphs(&self) -> &[Entity] {
        &self.paragraphs
    }

    pub fn sentence_phrases(&self, sentence: Entity) -> Result<Vec<Entity>, WorldError> {
        self.world
            .get::<&Sentence>(sentence)
            .map(|sentence| sentence.phrases.clone())
            .map_err(|_| self.missing(sentence, "Sentence"))
    }

    pub fn construct(&self, entity: Entity) -> ConstructRef<'_> {
        ConstructRef::new(&self.world, entity)
    }

    pub fn text(&self, entity: Entity) -> Option<Arc<str>> {
        self.construct(entity).text()
    }

    pub fn entity_roles(&self, entity: Entity) -> Option<EntityRoles> {
        self.construct(entity).entity_roles()
    }

    pub fn verbal_roles(&self, entity: Entity) -> Option<VerbalRoles> {
        self.construct(entity).verbal_roles()
    }

    // Weights

    /// Zero for constructs without a weight.
    pub fn weight(&self, entity: Entity) -> f64 {
        self.world.get::<&Weight>(entity).map(|weight| weight.0).unwrap_or(0.0)
    }

    pub fn set_weight(&mut self, entity: Entity, value: f64) {
        if let Ok(weight) = self.world.query_one_mut::<&mut Weight>(entity) {
            weight.0 = value;
        }
    }

    pub fn add_weight(&mut self, entity: Entity, delta: f64) {
        if let Ok(weight) = self.world.query_one_mut::<&mut Weight>(entity) {
            weight.0 += delta;
        }
    }

    pub fn scale_weight(&mut self, entity: Entity, factor: f64) {
        if let Ok(weight) = self.world.query_one_mut::<&mut Weight>(entity) {
            weight.0 *= factor;
        }
    }

    // Role binding. Bindings on a phrase cascade to the words carrying the same capability.

    /// Binds `entity` into `role` of `verbal`. The entity's slot is overwritten.
    pub fn bind(&mut self, role: Role, verbal: Entity, entity: Entity) -> Result<(), WorldError> {
        self.require::<EntityRoles>(entity, "Entity")?;
        for target in self.cascade::<VerbalRoles>(verbal, "Verbal")? {
            let roles = self.verbal_mut(target)?;
            match role {
                Role::Subject => roles.subjects.push(entity),
                Role::DirectObject => roles.direct_objects.push(entity),
                Role::IndirectObject => roles.indirect_objects.push(entity),
            }
        }
        for target in self.cascade::<EntityRoles>(entity, "Entity")? {
            let roles = self.entity_mut(target)?;
            match role {
                Role::Subject => roles.subject_of = Some(verbal),
                Role::DirectObject => roles.direct_object_of = Some(verbal),
                Role::IndirectObject => roles.indirect_object_of = Some(verbal),
            }
        }
        Ok(())
    }

    /// Spawns an aggregate for a multi-member role group and binds it as a whole.
    pub fn bind_group(&mut self, role: Role, verbal: Entity, members: &[Entity]) -> Result<Entity, WorldError> {
        let aggregate = self.spawn_aggregate(members.iter().copied())?;
        let roles = self.entity_mut(aggregate)?;
        match role {
            Role::Subject => roles.subject_of = Some(verbal),
            Role::DirectObject => roles.direct_object_of = Some(verbal),
            Role::IndirectObject => roles.indirect_object_of = Some(verbal),
        }
        self.verbal_mut(verbal)?.aggregates.push((role, aggregate));
        Ok(aggregate)
    }

    pub fn add_modifier(&mut self, verbal: Entity, modifier: Entity) -> Result<(), WorldError> {
        self.verbal_mut(verbal)?.adverbial_modifiers.push(modifier);
        Ok(())
    }

    pub fn set_modality(&mut self, verbal: Entity, modal: Entity) -> Result<(), WorldError> {
        self.verbal_mut(verbal)?.modality = Some(modal);
        Ok(())
    }

    pub fn set_postpositive(&mut self, verbal: Entity, describer: Entity) -> Result<(), WorldError> {
        self.verbal_mut(verbal)?.postpositive_descriptor = Some(describer);
        Ok(())
    }

    pub fn describe(&mut self, describer: Entity, entity: Entity) -> Result<(), WorldError> {
        self.entity_mut(entity)?.described_by.push(describer);
        Ok(())
    }

    pub fn attach_preposition(&mut self, verbal: Entity, preposition: Entity, object: Entity) -> Result<(), WorldError> {
        let roles = self.verbal_mut(verbal)?;
        roles.prepositional_attachments.push((preposition, object));
        roles.object_of_preposition = Some(object);
        if let Ok(entity) = self.world.query_one_mut::<&mut EntityRoles>(object) {
            entity.object_of_preposition = Some(preposition);
        }
        Ok(())
    }

    pub fn conjoin(&mut self, left: Entity, right: Entity) -> Result<(), WorldError> {
        self.require::<EntityRoles>(right, "Entity")?;
        self.entity_mut(left)?.conjoined_with.push(right);
        self.entity_mut(right)?.conjoined_with.push(left);
        Ok(())
    }

    pub fn possess(&mut self, possessor: Entity, possessed: Entity) -> Result<(), WorldError> {
        self.require::<EntityRoles>(possessed, "Entity")?;
        self.entity_mut(possessor)?.possessed.push(possessed);
        self.entity_mut(possessed)?.possessor = Some(possessor);
        Ok(())
    }

    /// Classifier relation: `entity` is a kind of `alias`.
    pub fn alias(&mut self, entity: Entity, alias: Entity) -> Result<(), WorldError> {
        self.require::<EntityRoles>(alias, "Entity")?;
        self.entity_mut(entity)?.aliases.push(alias);
        self.entity_mut(alias)?.aliases.push(entity);
        Ok(())
    }

    fn cascade<T: Component>(&self, entity: Entity, capability: &'static str) -> Result<Vec<Entity>, WorldError> {
        self.require::<T>(entity, capability)?;
        let construct = self.construct(entity);
        let mut targets = vec![entity];
        targets.extend(
            construct
                .phrase_words()
                .into_iter()
                .filter(|word| construct.at(*word).has::<T>()),
        );
        Ok(targets)
    }

    fn require<T: Component>(&self, entity: Entity, capability: &'static str) -> Result<(), WorldError> {
        if !self.world.contains(entity) {
            return Err(WorldError::NoSuchConstruct(entity));
        }
        if self.world.get::<&T>(entity).is_err() {
            return Err(WorldError::MissingCapability { entity, capability });
        }
        Ok(())
    }

    fn entity_mut(&mut self, entity: Entity) -> Result<&mut EntityRoles, WorldError> {
        let err = self.missing(entity, "Entity");
        self.world.query_one_mut::<&mut EntityRoles>(entity).map_err(|_| err)
    }

    fn verbal_mut(&mut self, entity: Entity) -> Result<&mut VerbalRoles, WorldError> {
        let err = self.missing(entity, "Verbal");
        self.world.query_one_mut::<&mut VerbalRoles>(entity).map_err(|_| err)
    }

    fn missing(&self, entity: Entity, capability: &'static str) -> WorldError {
        if self.world.contains(entity) {
            WorldError::MissingCapability { entity, capability }
        } else {
            WorldError::NoSuchConstruct(entity)
        }
    }

    fn head_entity_kind(&self, words: &[Entity]) -> EntityKind {
        words
            .iter()
            .rev()
            .find_map(|word| self.world.get::<&EntityRoles>(*word).ok().map(|roles| roles.kind))
            .unwrap_or_default()
    }
}
