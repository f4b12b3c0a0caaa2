use std::sync::Arc;

use hecs::Entity;
use lexis_protocol::{EntityKind, PhraseKind, WordFlags, WordKind};

/// Surface text, plus a case-folded copy used for every comparison.
#[derive(Debug, Clone)]
pub struct Text {
    pub raw: Arc<str>,
    pub folded: Arc<str>,
}

impl Text {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: Arc::from(raw),
            folded: Arc::from(raw.to_lowercase()),
        }
    }
}

/// Document-local salience. Starts at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Weight(pub f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Word {
    pub kind: WordKind,
    pub flags: WordFlags,
}

impl Word {
    pub fn is_proper(&self) -> bool {
        self.kind == WordKind::ProperNoun || self.flags.contains(WordFlags::PROPER)
    }
}

#[derive(Debug, Clone)]
pub struct Phrase {
    pub kind: PhraseKind,
    pub words: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct Clause {
    pub phrases: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct Sentence {
    pub clauses: Vec<Entity>,
    /// All phrases of all clauses, in reading order.
    pub phrases: Vec<Entity>,
}

#[derive(Debug, Clone)]
pub struct Paragraph {
    pub sentences: Vec<Entity>,
}

/// Conjunction-joined entities acting as one. Never contains another aggregate.
#[derive(Debug, Clone)]
pub struct Aggregate {
    pub members: Vec<Entity>,
}

/// The role slots a verbal exposes to its entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Subject,
    DirectObject,
    IndirectObject,
}

/// Entity capability: the slots of a construct that can act on or be acted on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRoles {
    pub kind: EntityKind,
    pub subject_of: Option<Entity>,
    pub direct_object_of: Option<Entity>,
    pub indirect_object_of: Option<Entity>,
    pub object_of_preposition: Option<Entity>,
    pub possessor: Option<Entity>,
    pub possessed: Vec<Entity>,
    pub described_by: Vec<Entity>,
    /// Classifier relation ("A is a B"), recorded on both sides.
    pub aliases: Vec<Entity>,
    pub conjoined_with: Vec<Entity>,
}

impl EntityRoles {
    pub fn new(kind: EntityKind) -> Self {
        Self { kind, ..Self::default() }
    }

    pub fn slot(&self, role: Role) -> Option<Entity> {
        match role {
            Role::Subject => self.subject_of,
            Role::DirectObject => self.direct_object_of,
            Role::IndirectObject => self.indirect_object_of,
        }
    }

    pub fn in_subject_or_object_role(&self) -> bool {
        self.subject_of.is_some() || self.direct_object_of.is_some() || self.indirect_object_of.is_some()
    }
}

/// Verbal capability.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerbalRoles {
    pub subjects: Vec<Entity>,
    pub direct_objects: Vec<Entity>,
    pub indirect_objects: Vec<Entity>,
    pub adverbial_modifiers: Vec<Entity>,
    pub modality: Option<Entity>,
    pub object_of_preposition: Option<Entity>,
    /// (preposition, object) pairs in the order they were attached.
    pub prepositional_attachments: Vec<(Entity, Entity)>,
    pub postpositive_descriptor: Option<Entity>,
    /// Aggregates spawned for multi-member role groups.
    pub aggregates: Vec<(Role, Entity)>,
}

impl VerbalRoles {
    pub fn slot(&self, role: Role) -> &[Entity] {
        match role {
            Role::Subject => &self.subjects,
            Role::DirectObject => &self.direct_objects,
            Role::IndirectObject => &self.indirect_objects,
        }
    }

    pub fn has_subject_or_object(&self) -> bool {
        !self.subjects.is_empty() || !self.direct_objects.is_empty() || !self.indirect_objects.is_empty()
    }
}
