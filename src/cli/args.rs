use clap::Parser;
use std::path::PathBuf;

/// sledge – WordPress login probing tool
#[derive(Parser, Debug)]
#[command(
    name = "sledge",
    version = "0.1.0",
    about = "Remotely test password strength of a WordPress login",
    long_about = r#"
sledge bruteforces a WordPress login form to test password strength.

It supports concurrent workers, wordlist files, WordPress version
fingerprinting, plugin discovery from a slug list, and basic username
detection through author-archive enumeration. The wordlist is extended
with the target's domain name and with frequent keywords scraped from
the target's content, which catches a surprising number of weak
passwords at no extra cost.

Only run it against installations you are authorized to test."#,
    after_help = r#"EXAMPLES:
  sledge http://blog.example.com/
  sledge http://blog.example.com/ -w rockyou.txt -u editor -t 10
  sledge http://blog.example.com/ --enumerate-users
  sledge http://blog.example.com/ --plugin-list plugins.txt --proxy http://localhost:8080/"#
)]
pub struct Cli {
    /// Base URL where WordPress is installed
    pub url: String,

    /// Wordlist file, one candidate password per line
    #[arg(short, long, default_value = "wordlist.txt")]
    pub wordlist: PathBuf,

    /// Username to test
    #[arg(short, long, default_value = "admin")]
    pub username: String,

    /// Path to the login form, relative to the base URL
    #[arg(short, long, default_value = "wp-login.php")]
    pub script_path: String,

    /// How many concurrent workers to run
    #[arg(short, long, default_value_t = 5)]
    pub threads: usize,

    /// HTTP proxy (e.g. http://localhost:8080/)
    #[arg(short, long)]
    pub proxy: Option<String>,

    /// Maximum requests per second across all workers (0 = unlimited)
    #[arg(long, default_value_t = 0, help_heading = "TUNING")]
    pub rate: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30, help_heading = "TUNING")]
    pub timeout: u64,

    /// Progress report interval in seconds
    #[arg(long = "poll-interval", default_value_t = 10, help_heading = "TUNING")]
    pub poll_interval: u64,

    /// Don't search keywords in the target content to extend the wordlist
    #[arg(long = "no-keywords", help_heading = "FEATURES")]
    pub no_keywords: bool,

    /// Don't fingerprint the WordPress version
    #[arg(long = "no-fingerprint", help_heading = "FEATURES")]
    pub no_fingerprint: bool,

    /// Only enumerate users, without bruteforcing
    #[arg(long = "enumerate-users", help_heading = "FEATURES")]
    pub enumerate_users: bool,

    /// User ID gap tolerance for username enumeration
    #[arg(long = "gap-tolerance", default_value_t = 3, help_heading = "FEATURES")]
    pub gap_tolerance: u32,

    /// Consecutive transport errors before enumeration gives up
    #[arg(
        long = "max-transport-errors",
        default_value_t = 5,
        help_heading = "FEATURES"
    )]
    pub max_transport_errors: u32,

    /// Probe plugins from a slug list file, one per line
    #[arg(long = "plugin-list", help_heading = "FEATURES")]
    pub plugin_list: Option<PathBuf>,

    /// Stop the whole run at the first valid credential
    #[arg(long = "stop-on-success", help_heading = "FEATURES")]
    pub stop_on_success: bool,

    /// Minimum length for extracted keywords
    #[arg(
        long = "min-keyword-length",
        default_value_t = 4,
        help_heading = "TUNING"
    )]
    pub min_keyword_length: usize,

    /// Minimum frequency for extracted keywords
    #[arg(
        long = "min-keyword-frequency",
        default_value_t = 2,
        help_heading = "TUNING"
    )]
    pub min_keyword_frequency: usize,

    /// Quiet mode (warnings and findings only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose output (debug level)
    #[arg(short, long)]
    pub verbose: bool,
}
