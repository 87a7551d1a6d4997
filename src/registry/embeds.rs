use super::store::Registry;
use super::types::TypeInfo;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

impl Registry {
    /// True if `ty` has `target` at any level of embedding depth, including
    /// if `ty` is `target` itself.
    ///
    /// The first call for a given type compiles its full embedding closure
    /// and caches it on the type, so subsequent calls are a map lookup. A
    /// type that declares no embeds never populates the cache; the query
    /// degrades to an identity comparison.
    pub fn has_embed(&self, ty: &Arc<TypeInfo>, target: &Arc<TypeInfo>) -> bool {
        if ty.id == target.id {
            return true;
        }
        if ty.embeds.is_empty() {
            return false;
        }
        self.embed_closure(ty).contains_key(&target.id)
    }

    /// The transitive embedding closure of `ty`, keyed by type id.
    ///
    /// Computed on first use and cached for the type's lifetime. The
    /// computation is pure given a stable registry, so a redundant
    /// recomputation under concurrent first queries converges to the same
    /// value; `OnceCell` keeps exactly one result.
    pub fn embed_closure<'a>(&self, ty: &'a Arc<TypeInfo>) -> &'a BTreeMap<u64, Arc<TypeInfo>> {
        ty.all_embeds.get_or_init(|| {
            let mut closure = BTreeMap::new();
            let mut visiting = HashSet::new();
            visiting.insert(ty.id);
            self.collect_embeds(ty, &mut visiting, &mut closure);
            closure
        })
    }

    // DFS over declared embeds. `visiting` holds every type already seen in
    // this computation (root included) so mutually-embedding types terminate
    // instead of recursing forever.
    fn collect_embeds(
        &self,
        ty: &TypeInfo,
        visiting: &mut HashSet<u64>,
        closure: &mut BTreeMap<u64, Arc<TypeInfo>>,
    ) {
        for embed in ty.embeds.values() {
            let Some(resolved) = self.type_by_name(&embed.type_name) else {
                // An unregistered or external embed is silently excluded
                // from the closure; sibling embeds still resolve.
                tracing::debug!(embed = %embed.type_name, owner = %ty.name, "unresolved embed skipped");
                continue;
            };
            if !visiting.insert(resolved.id) {
                continue;
            }
            closure.insert(resolved.id, Arc::clone(&resolved));
            if let Some(cached) = resolved.all_embeds.get() {
                // Merge the already-compiled closure wholesale.
                for (id, t) in cached {
                    if visiting.insert(*id) {
                        closure.insert(*id, Arc::clone(t));
                    }
                }
            } else {
                self.collect_embeds(&resolved, visiting, closure);
            }
        }
    }
}
