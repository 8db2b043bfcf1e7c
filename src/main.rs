mod app;
mod cli;
mod input;
mod render;

use anyhow::Result;

fn main() -> Result<()> {
    cli::run()
}
