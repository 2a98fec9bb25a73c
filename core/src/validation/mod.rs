//! Input checks and brute-force verification of computed trees

pub mod input;
pub mod correctness;

pub use self::input::validate_matrix;
pub use self::correctness::{all_pairs_min_cut, verify_tree, AllPairsMinCut, CorrectnessViolation};
