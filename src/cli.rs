use clap::Parser;

fn get_version() -> &'static str {
    const BASE_VERSION: &str = env!("CARGO_PKG_VERSION");

    // If there's a git tag at HEAD, use just the tag (release build)
    if let Some(tag) = option_env!("UPDATE_RPM_GITHUB_GIT_TAG") {
        return tag;
    }

    // Not on a tag - include commit hash and branch (dev build)
    let commit = option_env!("UPDATE_RPM_GITHUB_GIT_COMMIT").unwrap_or("unknown");
    let branch = option_env!("UPDATE_RPM_GITHUB_GIT_BRANCH").unwrap_or("unknown");

    // Leaked once at startup to satisfy clap's 'static requirement
    let version = format!("v{}-{} ({})", BASE_VERSION, commit, branch);
    Box::leak(version.into_boxed_str())
}

#[derive(Parser, Debug)]
#[command(name = "update-rpm-github")]
#[command(
    about = "Fetch the latest release RPM of a package from Github. Install it.",
    after_help = "Examples:\n  update-rpm-github lapce/lapce\n  update-rpm-github -f x86_64.rpm -i zed-industries/zed\n  update-rpm-github -v --dry-run https://github.com/owner/repo"
)]
#[command(version = get_version())]
pub struct Cli {
    /// Owner and repository name. Example: 'lapce/lapce'
    pub repo: String,

    /// A substring to be found in the release file name
    #[arg(short = 'f', long = "file_selector", visible_alias = "file-selector", default_value = ".rpm")]
    pub file_selector: String,

    /// Whether to redownload the RPM if it is already downloaded
    #[arg(short = 'd', long)]
    pub redownload: bool,

    /// Whether to reinstall if the same package version is already installed
    #[arg(short = 'i', long)]
    pub reinstall: bool,

    /// Decide whether to install, but do not run the package manager
    #[arg(short = 'n', long)]
    pub dry_run: bool,

    /// Increase verbosity (use multiple times for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output to errors only
    #[arg(short, long)]
    pub quiet: bool,
}
