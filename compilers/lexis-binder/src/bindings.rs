use hecs::Entity;
use lexis_ecs::components::Role;
use lexis_ecs::{DocumentWorld, WorldError};

/// One relation decided by the binder, not yet written to the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Binding {
    Role { role: Role, verbal: Entity, entity: Entity },
    /// A role filled by several conjoined entities at once.
    Group { role: Role, verbal: Entity, members: Vec<Entity> },
    Modifier { verbal: Entity, modifier: Entity },
    Modality { verbal: Entity, modal: Entity },
    Describes { describer: Entity, entity: Entity },
    Postpositive { verbal: Entity, describer: Entity },
    Preposition { verbal: Entity, preposition: Entity, object: Entity },
    Conjoined { left: Entity, right: Entity },
    Possession { possessor: Entity, possessed: Entity },
    Alias { entity: Entity, alias: Entity },
}

/// Everything decided for one sentence, in decision order.
#[derive(Debug, Clone, PartialEq)]
pub struct BindingSet {
    pub sentence: Entity,
    bindings: Vec<Binding>,
}

impl BindingSet {
    pub fn new(sentence: Entity, bindings: Vec<Binding>) -> Self {
        Self { sentence, bindings }
    }

    /// Entities bound into `role` of `verbal`.
    pub fn filling(&self, role: Role, verbal: Entity) -> Vec<Entity> {
        self.bindings
            .iter()
            .filter_map(|binding| match binding {
                Binding::Role { role: r, verbal: v, entity } if *r == role && *v == verbal => Some(*entity),
                _ => None,
            })
            .collect()
    }

    /// Writes the bindings in order; later role bindings overwrite earlier slots.
    pub fn apply(&self, doc: &mut DocumentWorld) -> Result<(), WorldError> {
        for binding in &self.bindings {
            match binding {
                Binding::Role { role, verbal, entity } => doc.bind(*role, *verbal, *entity)?,
                Binding::Group { role, verbal, members } => {
                    doc.bind_group(*role, *verbal, members)?;
                }
                Binding::Modifier { verbal, modifier } => doc.add_modifier(*verbal, *modifier)?,
                Binding::Modality { verbal, modal } => doc.set_modality(*verbal, *modal)?,
                Binding::Describes { describer, entity } => doc.describe(*describer, *entity)?,
                Binding::Postpositive { verbal, describer } => doc.set_postpositive(*verbal, *describer)?,
                Binding::Preposition { verbal, preposition, object } => {
                    doc.attach_preposition(*verbal, *preposition, *object)?
                }
                Binding::Conjoined { left, right } => doc.conjoin(*left, *right)?,
                Binding::Possession { possessor, possessed } => doc.possess(*possessor, *possessed)?,
                Binding::Alias { entity, alias } => doc.alias(*entity, *alias)?,
            }
        }
        Ok(())
    }
}
