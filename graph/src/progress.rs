//! Progress bars for long-running phases, per the teacher's
//! `get_loading_bar` helper (`graph/src/constructors.rs`,
//! `graph/src/centrality.rs`): hidden unless the caller opts in, so a
//! library consumer never sees terminal output by default.

use indicatif::{ProgressBar, ProgressStyle};

pub fn get_loading_bar(verbose: bool, desc: &str, total: u64) -> ProgressBar {
    if !verbose {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(total);
    bar.set_style(ProgressStyle::default_bar().template(&format!(
        "{desc} {{spinner:.green}} [{{elapsed_precise}}] [{{wide_bar:40.cyan/blue}}] ({{pos}}/{{len}}, ETA {{eta_precise}})",
        desc = desc
    )));
    bar
}
