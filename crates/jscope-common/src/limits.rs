//! Centralized limits and thresholds for the jscope toolkit.
//!
//! Centralizing these values prevents duplicate definitions with
//! inconsistent values and documents the rationale for each limit.

/// Maximum number of parent links followed when walking from a node toward
/// the tree root (scope lookup, ancestor tests, key-path construction).
///
/// Well-formed trees are nowhere near this deep; the cap turns a corrupted
/// parent cycle into a terminated walk instead of an infinite loop.
pub const MAX_PARENT_WALK: usize = 4096;

/// Maximum pre-allocation for node arenas, to avoid capacity overflow when
/// callers pass an estimate derived from a huge file.
pub const MAX_NODE_PREALLOC: usize = 5_000_000;

/// Maximum numeric suffix tried during uid generation before giving up.
///
/// Reaching this means the caller generated millions of colliding names in
/// one scope chain; treat it as a logic error rather than looping forever.
pub const MAX_UID_ATTEMPTS: u32 = 10_000_000;
