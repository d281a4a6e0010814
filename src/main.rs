use std::process::ExitCode;

fn main() -> ExitCode {
    redmine_today_lib::run()
}
