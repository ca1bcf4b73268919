//! Deck file fixtures.

use std::fs;
use std::path::{Path, PathBuf};

/// Two GABEKILE fixes six hours apart, southern hemisphere.
pub const GABEKILE_DECK: &str = "\
SH, 16, 2020091500,   , BEST,   0, 200S,  800E,  45,  990, TS,  34, NEQ,  100,  100,   80,   90, 1010,  150,  30,  55,   0,   L,   0,    ,   0,   0, GABEKILE, D,
SH, 16, 2020091506,   , BEST,   0, 205S,  810E,  50,  985, TS,  34, NEQ,  110,  110,   90,  100, 1010,  150,  30,  60,   0,   L,   0,    ,   0,   0, GABEKILE, D,
";

/// Write deck content under `dir` and return the path.
pub fn write_sample_deck(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).expect("failed to write sample deck");
    path
}
