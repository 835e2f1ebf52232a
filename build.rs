use std::process::Command;

const ENV_PREFIX: &str = "UPDATE_RPM_GITHUB_GIT";

/// First non-empty line of a successful git invocation.
fn git(args: &[&str]) -> Option<String> {
    let output = Command::new("git").args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()?
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn main() {
    let commit = git(&["rev-parse", "--short", "HEAD"]).unwrap_or_else(|| "unknown".into());
    let branch = git(&["branch", "--show-current"]).unwrap_or_else(|| "detached".into());

    println!("cargo:rustc-env={}_COMMIT={}", ENV_PREFIX, commit);
    println!("cargo:rustc-env={}_BRANCH={}", ENV_PREFIX, branch);

    // Release builds are cut from a tagged commit
    if let Some(tag) = git(&["describe", "--tags", "--exact-match", "HEAD"]) {
        println!("cargo:rustc-env={}_TAG={}", ENV_PREFIX, tag);
    }

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}
