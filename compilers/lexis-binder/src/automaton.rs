//! Pushdown automaton binding the phrases that follow a verb phrase.
//!
//! The phrases after the verb are pushed in reverse, so popping yields them left
//! to right. Entities accumulate in an open group until a phrase decides whether
//! that group is the direct or the indirect object.

use std::fmt;

use hecs::Entity;
use lexis_dispatch::Yield;
use lexis_ecs::components::Role;
use lexis_ecs::patterns::{
    IsAdjectivePhrase, IsAdverbPhrase, IsConjunctionPhrase, IsNounPhrase, IsPrepositionalPhrase,
    IsSubordinateClauseBegin, IsVerbPhrase,
};
use lexis_ecs::{ConstructRef, DocumentWorld};
use lexis_protocol::WordFlags;

use crate::bindings::Binding;
use crate::error::BindError;
use crate::lexicon::VerbClass;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// S0: expecting a phrase that introduces an object.
    ExpectObject,
    /// S1: describers buffered, waiting for their noun.
    AfterDescriber,
    /// S2: at least one entity in the open group.
    HaveEntity,
    /// S4: a conjunction followed an entity.
    AfterConjunction,
    /// S5: describers buffered inside a conjunction chain.
    ChainedDescriber,
    /// S6: a conjunction between chained describers.
    DescriberConjunction,
}

impl State {
    pub fn code(self) -> &'static str {
        match self {
            State::ExpectObject => "S0",
            State::AfterDescriber => "S1",
            State::HaveEntity => "S2",
            State::AfterConjunction => "S4",
            State::ChainedDescriber => "S5",
            State::DescriberConjunction => "S6",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?})", self.code(), self)
    }
}

/// The automaton's input alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Noun,
    Verb,
    Adjective,
    Adverb,
    Preposition,
    Conjunction,
    SubordinateClause,
}

impl Symbol {
    pub fn classify(phrase: ConstructRef<'_>) -> Option<Symbol> {
        Yield::on(phrase)
            .case_value::<IsNounPhrase>(Symbol::Noun)
            .case_value::<IsVerbPhrase>(Symbol::Verb)
            .case_value::<IsAdjectivePhrase>(Symbol::Adjective)
            .case_value::<IsAdverbPhrase>(Symbol::Adverb)
            .case_value::<IsPrepositionalPhrase>(Symbol::Preposition)
            .case_value::<IsConjunctionPhrase>(Symbol::Conjunction)
            .case_value::<IsSubordinateClauseBegin>(Symbol::SubordinateClause)
            .result()
    }
}

enum Flow {
    Continue,
    Stop,
}

pub struct Automaton<'w> {
    doc: &'w DocumentWorld,
    verbal: Entity,
    subjects: Vec<Entity>,
    state: State,
    remaining: Vec<Entity>,
    pending_preposition: Option<Entity>,
    left_conjunct: Option<Entity>,
    describers: Vec<Entity>,
    group: Vec<Entity>,
    direct_objects: Vec<Entity>,
    postpositives: Vec<Entity>,
    out: Vec<Binding>,
}

impl<'w> Automaton<'w> {
    pub fn new(doc: &'w DocumentWorld, verbal: Entity, subjects: Vec<Entity>, following: &[Entity]) -> Self {
        Self {
            doc,
            verbal,
            subjects,
            state: State::ExpectObject,
            remaining: following.iter().rev().copied().collect(),
            pending_preposition: None,
            left_conjunct: None,
            describers: Vec::new(),
            group: Vec::new(),
            direct_objects: Vec::new(),
            postpositives: Vec::new(),
            out: Vec::new(),
        }
    }

    pub fn run(mut self) -> Result<Vec<Binding>, BindError> {
        self.bind_subjects();
        self.bind_modality();

        while let Some(phrase) = self.remaining.pop() {
            if let Flow::Stop = self.step(phrase)? {
                break;
            }
        }

        self.flush();
        self.apply_verb_class();
        Ok(self.out)
    }

    fn step(&mut self, phrase: Entity) -> Result<Flow, BindError> {
        let construct = self.doc.construct(phrase);
        let symbol = Symbol::classify(construct).ok_or_else(|| self.structural(phrase))?;
        let exhausted = self.remaining.is_empty();
        tracing::trace!(state = %self.state, ?symbol, phrase = %construct.describe(), "binder transition");

        use State::*;
        use Symbol::*;
        let next = match (self.state, symbol) {
            (ExpectObject, Preposition) => {
                self.pending_preposition = Some(phrase);
                ExpectObject
            }
            (ExpectObject, Adverb) => {
                self.modifier(phrase);
                ExpectObject
            }
            (ExpectObject, Adjective) => {
                self.describers.push(phrase);
                AfterDescriber
            }
            (ExpectObject, Noun) => {
                self.push_entity(phrase);
                if exhausted {
                    self.resolve(Role::DirectObject);
                    return Ok(Flow::Stop);
                }
                HaveEntity
            }
            (ExpectObject, Verb) => {
                self.rebind_remainder(phrase)?;
                return Ok(Flow::Stop);
            }

            (AfterDescriber, Noun) => {
                self.push_entity(phrase);
                self.chain(phrase);
                HaveEntity
            }
            // Left side is the entity still open before the describers, if any.
            (AfterDescriber, Conjunction) => {
                self.left_conjunct = self.group.last().copied();
                AfterDescriber
            }

            (HaveEntity, Conjunction) => {
                self.left_conjunct = self.group.last().copied();
                AfterConjunction
            }
            (HaveEntity, Adjective) => {
                self.resolve(Role::IndirectObject);
                self.describers.push(phrase);
                AfterConjunction
            }
            (HaveEntity, Preposition) => {
                self.resolve(Role::DirectObject);
                self.pending_preposition = Some(phrase);
                ExpectObject
            }
            (HaveEntity, Noun) => {
                self.resolve(Role::IndirectObject);
                self.push_entity(phrase);
                if exhausted {
                    self.resolve(Role::DirectObject);
                    return Ok(Flow::Stop);
                }
                ExpectObject
            }
            (HaveEntity, SubordinateClause) => return Ok(Flow::Stop),
            (HaveEntity, Adverb) => {
                self.modifier(phrase);
                self.resolve(Role::DirectObject);
                ExpectObject
            }

            (AfterConjunction, Noun) => {
                self.push_entity(phrase);
                self.chain(phrase);
                HaveEntity
            }
            (AfterConjunction, Adjective) => {
                self.describers.push(phrase);
                ChainedDescriber
            }

            (ChainedDescriber, Noun) => {
                self.push_entity(phrase);
                self.chain(phrase);
                HaveEntity
            }
            (ChainedDescriber, Conjunction) => {
                if self.left_conjunct.is_none() {
                    self.left_conjunct = self.group.last().copied();
                }
                DescriberConjunction
            }

            (DescriberConjunction, Adjective) => {
                self.describers.push(phrase);
                ChainedDescriber
            }
            (DescriberConjunction, Noun) => {
                self.push_entity(phrase);
                self.chain(phrase);
                HaveEntity
            }

            _ => return Err(self.structural(phrase)),
        };

        self.state = next;
        Ok(Flow::Continue)
    }

    /// A second verb phrase starts a new sentence over the rest of the input,
    /// sharing this verbal's subjects.
    fn rebind_remainder(&mut self, verbal: Entity) -> Result<(), BindError> {
        self.flush();
        let rest: Vec<Entity> = self.remaining.drain(..).rev().collect();
        let nested = Automaton::new(self.doc, verbal, self.subjects.clone(), &rest);
        self.out.extend(nested.run()?);
        Ok(())
    }

    fn push_entity(&mut self, entity: Entity) {
        if let Some(preposition) = self.pending_preposition.take() {
            self.out.push(Binding::Preposition { verbal: self.verbal, preposition, object: entity });
        }
        for describer in self.describers.drain(..) {
            self.out.push(Binding::Describes { describer, entity });
        }
        self.group.push(entity);
    }

    fn chain(&mut self, right: Entity) {
        if let Some(left) = self.left_conjunct.take() {
            self.out.push(Binding::Conjoined { left, right });
        }
    }

    fn modifier(&mut self, modifier: Entity) {
        self.out.push(Binding::Modifier { verbal: self.verbal, modifier });
    }

    /// Binds the open group into `role` and clears it.
    fn resolve(&mut self, role: Role) {
        if self.group.is_empty() {
            return;
        }
        let members = std::mem::take(&mut self.group);
        self.out.extend(members.iter().map(|entity| Binding::Role { role, verbal: self.verbal, entity: *entity }));
        if role == Role::DirectObject {
            self.direct_objects.extend(members.iter().copied());
        }
        if members.len() > 1 {
            self.out.push(Binding::Group { role, verbal: self.verbal, members });
        }
    }

    /// Resolves whatever is still pending at the end of the input.
    fn flush(&mut self) {
        self.resolve(Role::DirectObject);
        for describer in self.describers.drain(..) {
            self.out.push(Binding::Postpositive { verbal: self.verbal, describer });
            self.postpositives.push(describer);
        }
    }

    fn bind_subjects(&mut self) {
        for subject in &self.subjects {
            self.out.push(Binding::Role { role: Role::Subject, verbal: self.verbal, entity: *subject });
        }
        if self.subjects.len() > 1 {
            self.out.push(Binding::Group { role: Role::Subject, verbal: self.verbal, members: self.subjects.clone() });
        }
    }

    fn bind_modality(&mut self) {
        let modal = self
            .doc
            .construct(self.verbal)
            .words_where(|word| word.flags.contains(WordFlags::MODAL))
            .first()
            .map(|word| word.entity());
        if let Some(modal) = modal {
            self.out.push(Binding::Modality { verbal: self.verbal, modal });
        }
    }

    fn apply_verb_class(&mut self) {
        match VerbClass::of(self.doc.construct(self.verbal)) {
            VerbClass::Copula => {
                for subject in &self.subjects {
                    for object in &self.direct_objects {
                        self.out.push(Binding::Alias { entity: *subject, alias: *object });
                    }
                    for describer in &self.postpositives {
                        self.out.push(Binding::Describes { describer: *describer, entity: *subject });
                    }
                }
            }
            VerbClass::Possessive => {
                for subject in &self.subjects {
                    for object in &self.direct_objects {
                        self.out.push(Binding::Possession { possessor: *subject, possessed: *object });
                    }
                }
            }
            VerbClass::Action => {}
        }
    }

    fn structural(&self, phrase: Entity) -> BindError {
        BindError::Structural { state: self.state, phrase: self.doc.construct(phrase).describe() }
    }
}
