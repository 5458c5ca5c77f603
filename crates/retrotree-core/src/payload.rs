//! Mode-specific payloads and their tagging recipes.

use crate::level_index::LevelIndex;
use crate::matcher::{AlternatingTags, TagMap, mark_alternating, mark_simple, mark_tagged};
use crate::mode::{PathTag, RenderMode};
use crate::tree::{Tree, TreeBuildOptions};
use crate::{Error, Result};
use serde_json::Value;

/// The trees of one payload. `son` also holds the `smallTree` of a `double` payload.
#[derive(Debug, Clone, PartialEq)]
pub struct TreePayload {
    pub mode: RenderMode,
    pub main: Tree,
    pub son: Option<Tree>,
    pub path1: Option<Tree>,
    pub path2: Option<Tree>,
    pub black_tree: Option<Tree>,
}

impl TreePayload {
    pub fn from_value(value: &Value, mode: RenderMode) -> Result<Self> {
        let main_options = TreeBuildOptions {
            sort_children_by_name: mode.style().sort_children_by_name,
        };

        if mode == RenderMode::Single {
            return Ok(Self {
                mode,
                main: Tree::from_value_with(value, main_options)?,
                son: None,
                path1: None,
                path2: None,
                black_tree: None,
            });
        }

        let keys = mode.tree_keys();
        let tree_at = |i: usize| -> Result<Option<Tree>> {
            let Some(key) = keys.get(i) else {
                return Ok(None);
            };
            let raw = value.get(*key).ok_or(Error::MissingTree {
                mode: mode.as_str(),
                key: *key,
            })?;
            let options = if i == 0 {
                main_options
            } else {
                TreeBuildOptions::default()
            };
            Tree::from_value_with(raw, options).map(Some)
        };

        let main = tree_at(0)?.ok_or(Error::MissingTree {
            mode: mode.as_str(),
            key: "main",
        })?;
        let payload = Self {
            mode,
            main,
            son: tree_at(1)?,
            path1: tree_at(2)?,
            path2: tree_at(3)?,
            black_tree: tree_at(4)?,
        };

        tracing::debug!(
            mode = %mode,
            main_nodes = payload.main.len(),
            son_nodes = payload.son.as_ref().map_or(0, Tree::len),
            "payload parsed"
        );
        Ok(payload)
    }

    /// Runs the mode's marker passes over the main tree.
    pub fn tag(&self) -> TagMap<PathTag> {
        let mut tags: TagMap<PathTag> = TagMap::new(&self.main);
        match self.mode {
            RenderMode::Single => {}
            RenderMode::Double => {
                if let Some(small) = &self.son {
                    let marked = mark_simple(&self.main, &LevelIndex::build(small));
                    for (id, on) in marked.iter() {
                        if on {
                            tags.set(id, PathTag::SonTree);
                        }
                    }
                }
            }
            RenderMode::Three | RenderMode::Quad => {
                self.tag_with(&self.son, &mut tags, |main, index, tags| {
                    mark_tagged(main, index, tags, PathTag::SonTree)
                });
                self.tag_with(&self.path1, &mut tags, |main, index, tags| {
                    mark_alternating(
                        main,
                        index,
                        tags,
                        AlternatingTags {
                            value: PathTag::Path1Forward,
                            neg_value: PathTag::Path1Back,
                            superior_value: PathTag::SonTree,
                        },
                    )
                });
                if self.mode == RenderMode::Quad {
                    self.tag_with(&self.path2, &mut tags, |main, index, tags| {
                        mark_alternating(
                            main,
                            index,
                            tags,
                            AlternatingTags {
                                value: PathTag::Path2Forward,
                                neg_value: PathTag::Path2Back,
                                superior_value: PathTag::SonTree,
                            },
                        )
                    });
                }
            }
            RenderMode::Five => {
                for (tree, tag) in [
                    (&self.son, PathTag::SonTree),
                    (&self.path1, PathTag::Path1Forward),
                    (&self.path2, PathTag::Path2Forward),
                ] {
                    self.tag_with(tree, &mut tags, |main, index, tags| {
                        mark_tagged(main, index, tags, tag)
                    });
                }
            }
        }
        tags
    }

    fn tag_with(
        &self,
        secondary: &Option<Tree>,
        tags: &mut TagMap<PathTag>,
        pass: impl FnOnce(&Tree, &LevelIndex<'_>, &mut TagMap<PathTag>),
    ) {
        if let Some(secondary) = secondary {
            pass(&self.main, &LevelIndex::build(secondary), tags);
        }
    }
}
