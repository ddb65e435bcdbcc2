use taskboard::cli::error::internal_error;
use taskboard::cli::run;

fn main() {
    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    if let Err(e) = run() {
        // User errors exit from inside the command handlers; anything that
        // reaches here is a storage or I/O failure.
        let mut message = e.to_string();
        let mut source = e.source();
        if source.is_some() {
            message.push_str("\n\nCaused by:");
            let mut indent = 1;
            while let Some(err) = source {
                message.push_str(&format!("\n{:indent$}  {}", "", err));
                source = err.source();
                indent += 1;
            }
        }
        internal_error(&message);
    }
}
