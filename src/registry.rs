// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The gradient registry: the catalog of named gradients a caller can
//! pick from by index.  It starts with the built-ins and only ever
//! grows.  One registry is created by whoever owns the process (the
//! binary, a server) and handed by reference to anything that needs
//! lookup; there is no global instance.

use rand::Rng;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

use crate::error::Result;
use crate::gradient::{Gradient, GradientDef};
use crate::palette::random_gradient_def;

/// Append-only, index-addressed catalog of gradients.  A single
/// reader-writer lock covers the whole list.
#[derive(Debug)]
pub struct GradientRegistry {
    defs: RwLock<Vec<GradientDef>>,
}

impl Default for GradientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GradientRegistry {
    /// A registry holding the built-in gradients.
    pub fn new() -> Self {
        GradientRegistry {
            defs: RwLock::new(GradientDef::builtins()),
        }
    }

    // The list is only ever pushed to, so a writer that panicked
    // cannot have left it half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Vec<GradientDef>> {
        self.defs.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<GradientDef>> {
        self.defs.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// A snapshot of every definition, in index order.
    pub fn list(&self) -> Vec<GradientDef> {
        self.read().clone()
    }

    /// The definition at `index`, if any.
    pub fn get_def(&self, index: usize) -> Option<GradientDef> {
        self.read().get(index).cloned()
    }

    /// An evaluator for the gradient at `index`, if any.
    pub fn get(&self, index: usize) -> Option<Gradient> {
        let defs = self.read();
        let def = defs.get(index)?;
        // Everything in the registry was validated on the way in.
        def.to_gradient().ok()
    }

    /// Number of gradients held.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Never true for a registry built with `new`.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Add a gradient and return the index it was given.  Definitions
    /// with unsorted or non-finite stops are refused.
    pub fn append(&self, def: GradientDef) -> Result<usize> {
        def.to_gradient()?;
        let mut defs = self.write();
        defs.push(def);
        let index = defs.len() - 1;
        info!(index, name = %defs[index].name, "palette added");
        Ok(index)
    }

    /// Generate a random palette, add it, and return it with its index.
    pub fn append_random<R: Rng + ?Sized>(&self, rng: &mut R) -> (usize, GradientDef) {
        let def = random_gradient_def(rng);
        let mut defs = self.write();
        defs.push(def.clone());
        let index = defs.len() - 1;
        info!(index, name = %def.name, "random palette added");
        (index, def)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::gradient::Stop;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::Arc;

    #[test]
    fn starts_with_the_builtins() {
        let registry = GradientRegistry::new();
        let names: Vec<String> = registry.list().into_iter().map(|d| d.name).collect();
        assert_eq!(
            names,
            vec!["Deep Ocean", "Inferno Ember", "Magenta Storm", "Frostfire", "Verdant"]
        );
        assert!(registry.get(0).is_some());
        assert!(registry.get(5).is_none());
    }

    #[test]
    fn append_hands_out_consecutive_indices() {
        let registry = GradientRegistry::new();
        let mut rng = StdRng::seed_from_u64(3);
        let (first, def) = registry.append_random(&mut rng);
        assert_eq!(first, 5);
        assert_eq!(registry.get_def(first), Some(def));

        let custom = GradientDef {
            name: "Two tone".to_string(),
            stops: vec![Stop::rgb(0.0, 1, 2, 3), Stop::rgb(1.0, 4, 5, 6)],
        };
        assert_eq!(registry.append(custom.clone()).unwrap(), 6);
        assert_eq!(registry.list()[6], custom);
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn bad_definitions_do_not_grow_the_registry() {
        let registry = GradientRegistry::new();
        let bad = GradientDef {
            name: "Backwards".to_string(),
            stops: vec![Stop::rgb(1.0, 0, 0, 0), Stop::rgb(0.0, 0, 0, 0)],
        };
        match registry.append(bad) {
            Err(Error::UnsortedStops { .. }) => {}
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(registry.len(), 5);
    }

    #[test]
    fn concurrent_readers_and_appenders_agree_on_length() {
        let registry = Arc::new(GradientRegistry::new());
        crossbeam::scope(|spawner| {
            for seed in 0..4 {
                let registry = registry.clone();
                spawner.spawn(move |_| {
                    let mut rng = StdRng::seed_from_u64(seed);
                    for _ in 0..25 {
                        registry.append_random(&mut rng);
                        let listed = registry.list();
                        assert!(listed.len() >= 5);
                        assert!(registry.get(listed.len() - 1).is_some());
                    }
                });
            }
        })
        .unwrap();
        assert_eq!(registry.len(), 105);
    }
}
