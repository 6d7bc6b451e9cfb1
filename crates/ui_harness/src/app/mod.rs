mod bootstrap;
mod game_stub;
mod loop_runner;
mod session;

pub(crate) use bootstrap::build_app;
pub(crate) use loop_runner::run;
