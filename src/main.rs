mod app;
mod logging;
mod model;
mod payload;
mod router;
mod schema;
mod services;
mod theme;
mod ui;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    let _log_guard = logging::init();
    let route = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());
    ui::run(&route)
}
