//! Flow, contraction and Gomory-Hu tree construction
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

pub mod max_flow;
pub mod contraction;
pub mod gomory_hu;

pub use self::max_flow::{Flow, FlowError, MaxFlowSolver, MinCut};
pub use self::contraction::{contract, Branch, ContractedNetwork};
pub use self::gomory_hu::{
    export_tree, GomoryHuBuilder, GomoryHuConfig, GomoryHuTree, GroupSelection, PairSelection,
    TreeEdge,
};
