pub mod participant;
pub mod resource;

/// The auction contract keeps buyers and sellers in fixed 100 slot
/// arrays, so a larger population cannot be submitted to it.
pub const MAX_PARTICIPANTS: usize = 100;
