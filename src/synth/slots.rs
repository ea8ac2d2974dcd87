//! Slot conventions for the hidden layers. A slot keeps the meaning given
//! here for every configuration; slots not named are left at zero.

/// Layer 1: equality half-terms and pass-through values.
pub mod equality {
    pub const KEY1_OVER_QUERY: usize = 0;
    pub const QUERY_OVER_KEY1: usize = 1;
    pub const KEY2_OVER_QUERY: usize = 2;
    pub const QUERY_OVER_KEY2: usize = 3;
    pub const VALUE1: usize = 4;
    pub const VALUE2: usize = 5;
    pub const WIDTH: usize = 6;
}

/// Layer 2: masked per-branch contributions.
pub mod selection {
    pub const CONTRIBUTION1: usize = 0;
    pub const CONTRIBUTION2: usize = 1;
    pub const WIDTH: usize = 2;
}

/// Layer 3 slot holding `sum - class` for value class `1..=V`.
pub fn above(class: u32) -> usize {
    2 * (class as usize - 1)
}

/// Layer 3 slot holding `class - sum`.
pub fn below(class: u32) -> usize {
    above(class) + 1
}

/// Layer 4 (and every padding layer) slot holding the indicator for `class`.
pub fn indicator(class: u32) -> usize {
    class as usize - 1
}

/// Widest gadget layer for `value_count` classes.
pub fn min_width(value_count: usize) -> usize {
    equality::WIDTH.max(selection::WIDTH).max(2 * value_count)
}
