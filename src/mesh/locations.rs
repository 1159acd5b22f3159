//! Maps source attribute elements to the output vertices populated from them.

use alloc::{collections::TryReserveError, vec::Vec};

use crate::AttributeKind;

/// Initial capacity of a slot list once an element feeds more than one vertex.
const MANY_CAPACITY: usize = 3;

/// The output slots populated from one source element.
///
/// Most elements feed one or two vertices, so the single-slot case is kept
/// inline.
#[derive(Clone, Debug, Default)]
enum Slots {
    #[default]
    Vacant,
    One(u32),
    Many(Vec<u32>),
}

impl Slots {
    fn as_slice(&self) -> &[u32] {
        match self {
            Slots::Vacant => &[],
            Slots::One(slot) => core::slice::from_ref(slot),
            Slots::Many(slots) => slots,
        }
    }

    fn push(&mut self, slot: u32) -> Result<(), TryReserveError> {
        match self {
            Slots::Vacant => *self = Slots::One(slot),
            Slots::One(first) => {
                let mut slots = Vec::new();
                slots.try_reserve_exact(MANY_CAPACITY)?;
                slots.push(*first);
                slots.push(slot);
                *self = Slots::Many(slots);
            }
            Slots::Many(slots) => {
                // `Vec` doubles its capacity when full.
                slots.try_reserve(1)?;
                slots.push(slot);
            }
        }
        Ok(())
    }
}

/// Element-to-slots mapping for a single attribute kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct LocationIndex {
    entries: Vec<Slots>,
}

impl LocationIndex {
    fn clear(&mut self) {
        self.entries.clear();
    }

    fn register(&mut self, element: u32, slot: u32) -> Result<(), TryReserveError> {
        let element = element as usize;
        if element >= self.entries.len() {
            self.entries.try_reserve(element + 1 - self.entries.len())?;
            self.entries.resize_with(element + 1, Slots::default);
        }
        self.entries[element].push(slot)
    }

    fn slots(&self, element: usize) -> &[u32] {
        self.entries
            .get(element)
            .map(Slots::as_slice)
            .unwrap_or_default()
    }

    /// Number of elements with at least one registered slot.
    #[cfg(any(test, mesh_weld_more_assertions))]
    pub(crate) fn registered_elements(&self) -> usize {
        self.entries
            .iter()
            .filter(|slots| !matches!(slots, Slots::Vacant))
            .count()
    }
}

/// One [`LocationIndex`] per [`AttributeKind`].
///
/// Rebuilt from scratch by every full build, and consulted by incremental
/// updates to find which output vertices a changed element feeds.
#[derive(Clone, Debug, Default)]
pub(crate) struct ComponentLocations {
    indices: [LocationIndex; 4],
}

impl ComponentLocations {
    #[inline]
    fn index(kind: AttributeKind) -> usize {
        match kind {
            AttributeKind::Position => 0,
            AttributeKind::TexCoord => 1,
            AttributeKind::Normal => 2,
            AttributeKind::Color => 3,
        }
    }

    pub(crate) fn clear(&mut self) {
        for index in &mut self.indices {
            index.clear();
        }
    }

    /// Records that output vertex `slot` was populated from `element` of
    /// `kind`.
    pub(crate) fn register(
        &mut self,
        kind: AttributeKind,
        element: u32,
        slot: u32,
    ) -> Result<(), TryReserveError> {
        self.indices[Self::index(kind)].register(element, slot)
    }

    /// Returns the output vertices populated from `element` of `kind`.
    ///
    /// # Panics
    ///
    /// Panics if no vertex was populated from `element`, meaning the caller
    /// flagged an element as changed which no face references.
    pub(crate) fn slots(&self, kind: AttributeKind, element: usize) -> &[u32] {
        let slots = self.indices[Self::index(kind)].slots(element);
        assert!(
            !slots.is_empty(),
            "{kind:?} element {element} was flagged as changed, but no vertex was built from it"
        );
        slots
    }

    #[cfg(any(test, mesh_weld_more_assertions))]
    pub(crate) fn get(&self, kind: AttributeKind) -> &LocationIndex {
        &self.indices[Self::index(kind)]
    }
}
