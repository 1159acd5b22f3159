//! Partitioning of face corners into shared output vertices.
//!
//! Every face corner becomes a [`WeldNode`] in one flat pool. Nodes at the
//! same position are chained into a singly linked list through their `next`
//! field, starting from a per-position head, with [`NONE`] marking the end of
//! a list or an unused position.

use alloc::{collections::TryReserveError, vec::Vec};

use crate::{
    SmoothingMode, TangentFrame, attributes::FaceCorner, math::has_direction,
    smoothing::SmoothingClass,
};

/// Marks the absence of a node.
pub(crate) const NONE: u32 = u32::MAX;

/// One face corner awaiting welding.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WeldNode {
    /// Frame of the face this corner belongs to.
    pub(crate) frame: TangentFrame,
    /// Smoothing group of the face.
    pub(crate) group: u32,
    /// Face the corner belongs to.
    pub(crate) face: u32,
    pub(crate) corner: FaceCorner,
    /// Next node at the same position.
    next: u32,
    /// Output vertex this node was welded into, or [`NONE`].
    pub(crate) class: u32,
}

/// A set of welded nodes, emitted as one output vertex.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WeldClass {
    /// First node of the class, which provides its non-frame attributes.
    pub(crate) representative: u32,
    /// Sum of the members' frames.
    pub(crate) frame: TangentFrame,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct WeldPool {
    nodes: Vec<WeldNode>,
    heads: Vec<u32>,
    classes: Vec<WeldClass>,
}

impl WeldPool {
    /// Empties the pool, readying it for a mesh with `positions` positions and
    /// `corners` face corners.
    pub(crate) fn reset(&mut self, positions: usize, corners: usize) -> Result<(), TryReserveError> {
        self.nodes.clear();
        self.classes.clear();
        self.heads.clear();

        self.nodes.try_reserve(corners)?;
        self.heads.try_reserve(positions)?;
        self.heads.resize(positions, NONE);

        Ok(())
    }

    /// Adds a node for `corner` of `face`, returning its index.
    ///
    /// Nodes are numbered in the order they are attached.
    ///
    /// # Panics
    ///
    /// Panics if the position of `corner` is outside the range given to
    /// [`reset`](WeldPool::reset).
    pub(crate) fn attach(
        &mut self,
        face: u32,
        corner: FaceCorner,
        frame: TangentFrame,
        group: u32,
    ) -> Result<u32, TryReserveError> {
        let position = corner.position as usize;
        assert!(
            position < self.heads.len(),
            "face references position {position}, but only {} positions exist",
            self.heads.len(),
        );

        let node = self.nodes.len() as u32;
        self.nodes.try_reserve(1)?;
        self.nodes.push(WeldNode {
            frame,
            group,
            face,
            corner,
            next: self.heads[position],
            class: NONE,
        });
        self.heads[position] = node;

        Ok(node)
    }

    /// Welds all attached nodes according to `mode`, returning the number of
    /// resulting classes.
    ///
    /// Classes are numbered by walking positions in order, and each position's
    /// nodes from its head; a class gets its number when its first node is
    /// reached.
    pub(crate) fn weld(&mut self, mode: SmoothingMode) -> Result<usize, TryReserveError> {
        for position in 0..self.heads.len() {
            let head = self.heads[position];
            match mode {
                SmoothingMode::AllHard => {
                    let mut node = head;
                    while node != NONE {
                        self.open_class(node)?;
                        node = self.nodes[node as usize].next;
                    }
                }
                SmoothingMode::AllSmooth => {
                    if head == NONE {
                        continue;
                    }
                    let class = self.open_class(head)?;
                    let mut node = self.nodes[head as usize].next;
                    while node != NONE {
                        self.join(node, class);
                        node = self.nodes[node as usize].next;
                    }
                }
                SmoothingMode::Mixed => self.weld_mixed(head)?,
            }
        }

        for class in &mut self.classes {
            // Opposed faces can cancel out; keep the first face's frame then.
            if !has_direction(class.frame.normal) {
                class.frame = self.nodes[class.representative as usize].frame;
            }
        }

        Ok(self.classes.len())
    }

    /// Welds the list starting at `head` by smoothing group compatibility.
    ///
    /// Each class is seeded by the first unwelded node and grows until no
    /// remaining node is admitted, so compatibility is closed transitively.
    fn weld_mixed(&mut self, head: u32) -> Result<(), TryReserveError> {
        let mut seed = head;
        while seed != NONE {
            if self.nodes[seed as usize].class != NONE {
                seed = self.nodes[seed as usize].next;
                continue;
            }

            let class = self.open_class(seed)?;
            let mut smoothing = SmoothingClass::new(self.nodes[seed as usize].group);

            let mut grown = true;
            while grown {
                grown = false;
                let mut node = self.nodes[seed as usize].next;
                while node != NONE {
                    let candidate = self.nodes[node as usize];
                    if candidate.class == NONE && smoothing.admits(candidate.group) {
                        smoothing.absorb(candidate.group);
                        self.join(node, class);
                        grown = true;
                    }
                    node = candidate.next;
                }
            }

            seed = self.nodes[seed as usize].next;
        }

        Ok(())
    }

    fn open_class(&mut self, node: u32) -> Result<u32, TryReserveError> {
        let class = self.classes.len() as u32;
        self.classes.try_reserve(1)?;

        let node_data = &mut self.nodes[node as usize];
        node_data.class = class;
        self.classes.push(WeldClass {
            representative: node,
            frame: node_data.frame,
        });

        Ok(class)
    }

    fn join(&mut self, node: u32, class: u32) {
        let node = &mut self.nodes[node as usize];
        node.class = class;

        let class = &mut self.classes[class as usize];
        class.frame = class.frame + node.frame;
    }

    #[inline]
    pub(crate) fn nodes(&self) -> &[WeldNode] {
        &self.nodes
    }

    #[inline]
    pub(crate) fn classes(&self) -> &[WeldClass] {
        &self.classes
    }

    /// Returns the first node at `position`, or [`NONE`].
    #[cfg(test)]
    pub(crate) fn head(&self, position: usize) -> u32 {
        self.heads.get(position).copied().unwrap_or(NONE)
    }

    /// Returns the node following `node` at the same position, or [`NONE`].
    #[cfg(test)]
    pub(crate) fn next(&self, node: u32) -> u32 {
        self.nodes[node as usize].next
    }

    /// Releases all memory held by the pool.
    pub(crate) fn release(&mut self) {
        *self = Self::default();
    }
}
