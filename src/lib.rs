//! **mazes** generates perfect mazes, mazes with exactly one path between any two cells, on
//! rectangular grids and on grids shaped by a mask, and finds distances and paths through them.
//!
//! Build a grid with `grids::build`, carve a maze into it with one of the `generators`, then
//! measure it with `pathing::Distances`. A grid renders as box drawing text through its
//! `Display` impl (see `grid_displays`) or as an image with `renderers`.
//!
//! All randomness comes from the `rand::Rng` passed in, so a seeded generator reproduces a maze.
//! Grids are single threaded; sharing one between threads needs external synchronisation.

#[macro_use]
extern crate error_chain;

pub mod cells;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod grids;
pub mod masks;
pub mod pathing;
pub mod renderers;
pub mod units;
mod utils;
