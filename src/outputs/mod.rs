//! Output generation for rendered pages and snapshots.
//!
//! # Submodules
//!
//! - [`html`]: renders one schedule table per day from `templates/day.html`
//! - [`json`]: writes the grouped records as a JSON snapshot (optional)
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── day1.html
//! ├── day2.html
//! ├── day3.html
//! ├── day4.html
//! └── schedule.json   # only with --snapshot
//! ```

pub mod html;
pub mod json;
