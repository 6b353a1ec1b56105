mod report;
mod run;
mod table;

pub use self::report::report_path;
pub use self::run::run;
pub use self::table::SUMMARY_FILE_NAME;
