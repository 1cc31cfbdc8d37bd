mod config;
mod core;
mod data;
mod domain;
mod render;
mod session;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    core::app::run()
}
