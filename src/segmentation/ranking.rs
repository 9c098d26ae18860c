// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Ordering of components by population

use crate::geometry::ReferenceCloud;
use rayon::prelude::*;
use std::collections::TryReserveError;

/// Component position in discovery order and its point count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentIndexAndSize {
    pub index: usize,
    pub size: usize,
}

impl ComponentIndexAndSize {
    pub fn new(index: usize, size: usize) -> Self {
        Self { index, size }
    }
}

/// Processing order of a component set
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ranking {
    /// Largest first, ties in discovery order
    BySize(Vec<ComponentIndexAndSize>),
    /// Components as the labeler found them
    DiscoveryOrder(usize),
}

impl Ranking {
    /// Rank components largest first.
    ///
    /// Falls back to discovery order when ranking is disabled or the sort
    /// scratch cannot be allocated.
    pub fn of(components: &[ReferenceCloud], sort_by_size: bool) -> Self {
        if !sort_by_size {
            return Ranking::DiscoveryOrder(components.len());
        }
        let mut scratch = Vec::new();
        let reserved = scratch.try_reserve_exact(components.len());
        Self::from_scratch(components, scratch, reserved)
    }

    pub(crate) fn from_scratch(
        components: &[ReferenceCloud],
        mut scratch: Vec<ComponentIndexAndSize>,
        reserved: std::result::Result<(), TryReserveError>,
    ) -> Self {
        if let Err(e) = reserved {
            log::warn!("Not enough memory to sort components by size ({}), keeping discovery order", e);
            return Ranking::DiscoveryOrder(components.len());
        }

        scratch.extend(
            components
                .iter()
                .enumerate()
                .map(|(i, c)| ComponentIndexAndSize::new(i, c.size())),
        );
        // par_sort_by is stable: equal sizes keep discovery order
        scratch.par_sort_by(|a, b| b.size.cmp(&a.size));
        Ranking::BySize(scratch)
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Ranking::DiscoveryOrder(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Ranking::BySize(sorted) => sorted.len(),
            Ranking::DiscoveryOrder(n) => *n,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Component indices in processing order
    pub fn order(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            Ranking::BySize(sorted) => Box::new(sorted.iter().map(|c| c.index)),
            Ranking::DiscoveryOrder(n) => Box::new(0..*n),
        }
    }
}
