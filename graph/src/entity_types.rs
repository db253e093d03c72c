//! Entity-type manager: dense ids for atomic type names, interned composite
//! types, and subtype queries by set containment.
//!
//! Grounded on `original_source`'s `EntityTypeManager` (see
//! `libkatana_python_native/src/EntityTypeManager.cpp`): atomic types are
//! added by name and get a dense id; a composite type is the set of atomic
//! ids it contains, interned so that two requests for the same set return
//! the same id; `is_subtype_of` is set containment.

use hashbrown::HashMap;
use shared::{Error, Result, TypeT};

/// The atomic-id set backing a single entity type. Atomic types are
/// singleton sets; composite types may contain any number of atomic ids.
/// Stored sorted so that equality and containment are linear scans, which
/// is fine for the small sets (`<= 256` per spec.md §4.2) this manager is
/// meant for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AtomicIdSet(Vec<TypeT>);

impl AtomicIdSet {
    fn singleton(id: TypeT) -> Self {
        AtomicIdSet(vec![id])
    }

    fn from_unsorted(mut ids: Vec<TypeT>) -> Self {
        ids.sort_unstable();
        ids.dedup();
        AtomicIdSet(ids)
    }

    fn is_subset_of(&self, other: &AtomicIdSet) -> bool {
        self.0.iter().all(|id| other.0.binary_search(id).is_ok())
    }
}

/// Assigns dense ids to atomic type names, interns composite types (sets of
/// atomic ids), and answers subtype/supertype queries by set containment.
///
/// One manager exists per entity kind (nodes get their own, edges get
/// their own); the graph owns both.
#[derive(Debug, Default)]
pub struct EntityTypeManager {
    name_to_id: HashMap<String, TypeT>,
    sets: Vec<AtomicIdSet>,
    names: Vec<Option<String>>,
}

impl EntityTypeManager {
    pub fn new() -> Self {
        EntityTypeManager::default()
    }

    pub fn num_atomic_types(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn num_entity_types(&self) -> usize {
        self.sets.len()
    }

    /// Returns the id for `name`, creating it if absent. Idempotent on the
    /// name: calling this twice with the same name returns the same id.
    pub fn add_atomic_type(&mut self, name: &str) -> TypeT {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = self.sets.len() as TypeT;
        self.sets.push(AtomicIdSet::singleton(id));
        self.names.push(Some(name.to_string()));
        self.name_to_id.insert(name.to_string(), id);
        id
    }

    /// Returns the id of an existing composite with this exact atomic-id
    /// set, or interns a new one.
    pub fn get_or_add_composite(&mut self, atomic_ids: &[TypeT]) -> Result<TypeT> {
        for &id in atomic_ids {
            self.check_id(id)?;
        }
        let set = AtomicIdSet::from_unsorted(atomic_ids.to_vec());
        if let Some(id) = self.sets.iter().position(|s| *s == set) {
            return Ok(id as TypeT);
        }
        let id = self.sets.len() as TypeT;
        self.sets.push(set);
        self.names.push(None);
        Ok(id)
    }

    fn check_id(&self, t: TypeT) -> Result<()> {
        if (t as usize) >= self.sets.len() {
            return Err(Error::invalid_argument(format!(
                "entity type id {} does not belong to this manager",
                t
            )));
        }
        Ok(())
    }

    /// True iff `a`'s atomic-id set is a subset of `b`'s. An atomic type is
    /// a subtype only of itself and of composites that include it.
    pub fn is_subtype_of(&self, a: TypeT, b: TypeT) -> Result<bool> {
        self.check_id(a)?;
        self.check_id(b)?;
        Ok(self.sets[a as usize].is_subset_of(&self.sets[b as usize]))
    }

    pub fn get_atomic_subtypes(&self, t: TypeT) -> Result<Vec<TypeT>> {
        self.check_id(t)?;
        Ok(self.sets[t as usize].0.clone())
    }

    /// Composite types (including `t` itself, if composite) whose atomic-id
    /// set contains `t`'s atomic-id set. Atomic types never appear in the
    /// result.
    pub fn get_supertypes(&self, t: TypeT) -> Result<Vec<TypeT>> {
        self.check_id(t)?;
        let target = &self.sets[t as usize];
        Ok((0..self.sets.len())
            .filter(|&id| self.names[id].is_none() && target.is_subset_of(&self.sets[id]))
            .map(|id| id as TypeT)
            .collect())
    }

    pub fn name_of(&self, t: TypeT) -> Result<Option<&str>> {
        self.check_id(t)?;
        Ok(self.names[t as usize].as_deref())
    }
}
