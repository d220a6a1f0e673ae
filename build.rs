use std::process::Command;

const DEFAULT_VERSION: &str = "???";

fn main() {
    println!("cargo:rustc-env=GIT_HASH={}", determine_git_version());
}

/// Asks git for the short hash of HEAD so the site footer can show which
/// revision is deployed. Any failure falls back to a placeholder version
/// rather than failing the build.
fn determine_git_version() -> String {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output();

    match output {
        Ok(out) if out.status.success() => match String::from_utf8(out.stdout) {
            Ok(hash) => {
                let cleaned = hash.trim().to_ascii_lowercase();
                if cleaned.is_empty() {
                    warning("git returned an empty hash");
                } else {
                    return cleaned;
                }
            }
            Err(err) => warning(&format!("git output was not utf8... {:?}", err)),
        },
        Ok(out) => warning(&format!("git exited with non-0 status... {}", out.status)),
        Err(err) => warning(&format!("unable to execute git... {:?}", err)),
    }

    warning(&format!(
        "unable to determine version... using default version '{}'",
        DEFAULT_VERSION
    ));
    DEFAULT_VERSION.to_string()
}

fn warning(msg: &str) {
    println!("cargo:warning={}", msg)
}
