use std::time::Duration;

use anyhow::Result;

use crate::config::Config;
use crate::layout::Orientation;
use crate::tui::app::{self, ViewOptions};

pub fn run(source: String, post: Option<String>, vertical: bool, config: &Config) -> Result<()> {
    let orientation = if vertical {
        Orientation::Vertical
    } else {
        config.orientation
    };
    app::run(ViewOptions {
        source,
        initial_post: post,
        orientation,
        show_names: config.show_names,
        transition: Duration::from_millis(config.transition_ms),
    })
}
