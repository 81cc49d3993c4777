//! Startup banner and session summary display.

use crate::consts::{AUTHOR, HOMEPAGE};

/// Session configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub endpoint: &'a str,
    pub endpoint_source: &'a str,
    pub session: &'a str,
    pub config: &'a str,
}

/// Print the startup banner with session info.
pub fn print_banner(info: &BannerInfo) {
    println!(
        r#"
   ╔═══════════════════════════════════════╗
   ║               P E T L                 ║
   ║      type a script, /run to send      ║
   ╚═══════════════════════════════════════╝

   version   {}
   by        {}
   home      {}
   endpoint  {} ({})
   session   {}
   config    {}

   /help lists commands
"#,
        env!("CARGO_PKG_VERSION"),
        AUTHOR,
        HOMEPAGE,
        info.endpoint,
        info.endpoint_source,
        info.session,
        info.config,
    );
}

/// Print the session summary (runs submitted + farewell).
pub fn print_session_summary(runs: usize) {
    if runs > 0 {
        let noun = if runs == 1 { "run" } else { "runs" };
        println!("session: {runs} {noun}");
    }
    println!("goodbye.");
}
