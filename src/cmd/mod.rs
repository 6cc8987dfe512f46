//! CLI command implementations.
//!
//! | Module   | Commands handled |
//! |----------|------------------|
//! | `serve`  | `Serve`          |
//! | `report` | `Report`         |
//! | `ask`    | `Ask`            |
//! | `config` | `Config`         |

pub mod ask;
pub mod config;
pub mod report;
pub mod serve;

pub use ask::cmd_ask;
pub use config::cmd_config;
pub use report::{ReportSection, cmd_report};
pub use serve::cmd_serve;
