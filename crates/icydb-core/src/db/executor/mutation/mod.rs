pub(super) mod commit_window;
pub(super) mod save;

pub(super) use commit_window::{
    OpenCommitWindow, apply_prepared_row_ops, emit_index_delta_metrics, open_commit_window,
};
