mod arena;
mod handle;
mod node;
mod raw_rank_tree;
mod shift;
mod structure;
mod transplant;

pub(crate) use arena::Arena;
pub(crate) use handle::Handle;
pub(crate) use node::{Node, Side, Walk, step};
pub(crate) use raw_rank_tree::{RawRankTree, Search, Slot};
