mod config_parse;
mod expand;
mod job_script;
mod run;
mod scheduler;
mod sweep_config;
mod workdir;

pub use self::run::run;
