//! Name identity for the linker.
//!
//! Every identifier the backend emits is a [`NameId`] into a [`NameArena`].
//! Identity is the handle, never the rendered text: two names minted with the
//! same text are different names, and nothing in the linker compares texts to
//! decide whether two references mean the same thing. A fresh mint can be
//! *temporary* (a placeholder such as `tmp$0` that the resolver will replace
//! with a collision-free final spelling) or stable (spelled exactly as minted,
//! e.g. a user-visible export).

use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Handle to a name in a [`NameArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NameId(u32);

impl NameId {
    /// Position of this name in its arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Payload carried by a name, opaque to identity.
///
/// Metadata survives resolution: when the resolver manufactures a replacement
/// for a temporary, the replacement gets a copy of the original's metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameMetadata {
    /// Set on canonical names introduced by import deduplication.
    pub imported: bool,
    /// Paired name for lowering bookkeeping, e.g. a suspend-lowered function
    /// and its state-machine controller.
    pub companion: Option<NameId>,
}

/// One name's record inside the arena.
#[derive(Debug, Clone, Serialize)]
pub struct NameData {
    text: String,
    temporary: bool,
    metadata: NameMetadata,
}

impl NameData {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_temporary(&self) -> bool {
        self.temporary
    }
}

/// Fragment-independent identity of a linked entity.
///
/// Fragments never share `NameId`s directly; they agree on keys. Two
/// fragments that bind the same key are talking about the same declaration
/// and get one canonical name in the merged output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct FqName(String);

impl FqName {
    pub fn new(key: impl Into<String>) -> Self {
        FqName(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Owner of every name in one linked program.
///
/// All mutation goes through `&mut NameArena`; handles stay valid for the
/// arena's lifetime and are never reused.
#[derive(Debug, Default, Serialize)]
pub struct NameArena {
    names: Vec<NameData>,
}

impl NameArena {
    pub fn new() -> Self {
        NameArena { names: Vec::new() }
    }

    /// Mint a stable name. Its text is final; the resolver only records it
    /// as occupying its scopes.
    pub fn declare(&mut self, text: impl Into<String>) -> NameId {
        self.push(text.into(), false)
    }

    /// Mint a temporary name. The text is a placeholder; the resolver
    /// assigns the final spelling during linking.
    pub fn declare_temporary(&mut self, text: impl Into<String>) -> NameId {
        self.push(text.into(), true)
    }

    fn push(&mut self, text: String, temporary: bool) -> NameId {
        let id = NameId(self.names.len() as u32);
        self.names.push(NameData {
            text,
            temporary,
            metadata: NameMetadata::default(),
        });
        id
    }

    pub fn text(&self, name: NameId) -> &str {
        &self.names[name.index()].text
    }

    pub fn is_temporary(&self, name: NameId) -> bool {
        self.names[name.index()].temporary
    }

    pub fn metadata(&self, name: NameId) -> &NameMetadata {
        &self.names[name.index()].metadata
    }

    pub fn metadata_mut(&mut self, name: NameId) -> &mut NameMetadata {
        &mut self.names[name.index()].metadata
    }

    /// Copy `from`'s metadata onto `to`. Used when a replacement name is
    /// manufactured for a temporary.
    pub fn copy_metadata(&mut self, to: NameId, from: NameId) {
        let metadata = self.names[from.index()].metadata.clone();
        self.names[to.index()].metadata = metadata;
    }

    /// Redirect companion links through a replacement map.
    ///
    /// After a rename pass, a companion that pointed at a replaced temporary
    /// would dangle; this keeps the pairing aimed at the surviving name.
    pub fn remap_companions(&mut self, replacements: &FxHashMap<NameId, NameId>) {
        for data in &mut self.names {
            if let Some(companion) = data.metadata.companion {
                if let Some(&renamed) = replacements.get(&companion) {
                    data.metadata.companion = Some(renamed);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterate all names in mint order.
    pub fn iter(&self) -> impl Iterator<Item = (NameId, &NameData)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, data)| (NameId(i as u32), data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_by_handle_not_text() {
        let mut names = NameArena::new();
        let a = names.declare("x");
        let b = names.declare("x");
        assert_ne!(a, b);
        assert_eq!(names.text(a), names.text(b));
    }

    #[test]
    fn temporary_flag_is_preserved() {
        let mut names = NameArena::new();
        let stable = names.declare("result");
        let tmp = names.declare_temporary("tmp$0");
        assert!(!names.is_temporary(stable));
        assert!(names.is_temporary(tmp));
    }

    #[test]
    fn arena_iterates_in_mint_order() {
        let mut names = NameArena::new();
        assert!(names.is_empty());
        let result = names.declare("result");
        let tmp = names.declare_temporary("tmp$0");
        assert_eq!(names.len(), 2);

        let entries: Vec<(NameId, &str, bool)> = names
            .iter()
            .map(|(id, data)| (id, data.text(), data.is_temporary()))
            .collect();
        assert_eq!(entries, vec![(result, "result", false), (tmp, "tmp$0", true)]);
    }

    #[test]
    fn copy_metadata_clones_the_payload() {
        let mut names = NameArena::new();
        let controller = names.declare_temporary("coroutine$0");
        let original = names.declare_temporary("doResume");
        names.metadata_mut(original).companion = Some(controller);

        let replacement = names.declare("doResume");
        names.copy_metadata(replacement, original);
        assert_eq!(names.metadata(replacement).companion, Some(controller));
        // The original keeps its own copy.
        assert_eq!(names.metadata(original).companion, Some(controller));
    }

    #[test]
    fn remap_companions_follows_replacements() {
        let mut names = NameArena::new();
        let controller = names.declare_temporary("coroutine$0");
        let func = names.declare("run");
        names.metadata_mut(func).companion = Some(controller);

        let final_controller = names.declare("coroutine");
        let mut map = FxHashMap::default();
        map.insert(controller, final_controller);
        names.remap_companions(&map);

        assert_eq!(names.metadata(func).companion, Some(final_controller));
    }

    #[test]
    fn fq_name_compares_by_content() {
        assert_eq!(FqName::new("pkg:Util"), FqName::new("pkg:Util"));
        assert_ne!(FqName::new("pkg:Util"), FqName::new("pkg:util"));
        assert_eq!(FqName::new("pkg:Util").as_str(), "pkg:Util");
        assert_eq!(FqName::new("pkg:Util").to_string(), "pkg:Util");
    }
}
