mod command;
mod config;
mod util;
mod world;

fn main() -> anyhow::Result<()> {
    command::run()
}
