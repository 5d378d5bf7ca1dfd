//! Game system rule tables.
//!
//! Only Pathfinder 2nd Edition is modelled: the level-up wizard augments one
//! game system's character sheet.

pub mod pf2e;
