use std::fs;
use std::io::{self, Write};
use std::process::Command;
use toml_edit::DocumentMut;
use toml_edit::Item;

const CHANGELOG: &str = "CHANGELOG.md";

fn latest_tag() -> Result<String, Box<dyn std::error::Error>> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--abbrev=0"])
        .output()?;

    if !output.status.success() {
        // No tags exist yet, fall back to the initial commit
        let initial_output = Command::new("git")
            .args(["rev-list", "--max-parents=0", "HEAD"])
            .output()?;

        if initial_output.status.success() {
            return Ok(String::from_utf8(initial_output.stdout)?.trim().to_string());
        }

        return Ok(String::new());
    }

    Ok(String::from_utf8(output.stdout)?.trim().to_string())
}

fn commits_since(previous_tag: &str) -> Result<String, Box<dyn std::error::Error>> {
    let range;
    let mut args = vec!["log", "--pretty=format:- %s"];
    if !previous_tag.is_empty() {
        range = format!("{}..HEAD", previous_tag);
        args.push(&range);
    }

    let output = Command::new("git").args(&args).output()?;
    Ok(String::from_utf8(output.stdout)?)
}

fn today() -> String {
    let output = Command::new("date").args(["+%Y-%m-%d"]).output();
    match output {
        Ok(out) if out.status.success() => String::from_utf8_lossy(&out.stdout).trim().to_string(),
        _ => String::from("unreleased"),
    }
}

fn stamp_changelog(version: &str, notes: &str) -> io::Result<()> {
    let existing = fs::read_to_string(CHANGELOG).unwrap_or_default();
    let body = existing
        .strip_prefix("# Changelog\n")
        .unwrap_or(existing.as_str())
        .trim_start();

    let mut updated = format!("# Changelog\n\n## {} - {}\n\n", version, today());
    if notes.is_empty() {
        updated.push_str("- No recorded changes\n");
    } else {
        updated.push_str(notes);
        updated.push('\n');
    }
    if !body.is_empty() {
        updated.push('\n');
        updated.push_str(body);
    }

    fs::write(CHANGELOG, updated)
}

fn looks_like_version(version: &str) -> bool {
    let mut parts = version.split('.');
    let numeric = |part: Option<&str>| {
        part.is_some_and(|p| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit()))
    };
    numeric(parts.next()) && numeric(parts.next()) && numeric(parts.next()) && parts.next().is_none()
}

fn confirm(message: &str) -> Result<bool, io::Error> {
    print!("{} (y/n): ", message);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(input.trim().to_lowercase() == "y")
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Read current Cargo.toml
    let cargo_content = fs::read_to_string("Cargo.toml")?;
    let mut doc = cargo_content.parse::<DocumentMut>()?;

    let current_version = doc["package"]["version"]
        .as_str()
        .expect("Could not find version in Cargo.toml");

    // Ask for new version
    println!("Current version is: {}", current_version);
    println!("Enter new version:");
    let mut new_version = String::new();
    io::stdin().read_line(&mut new_version)?;
    let new_version = new_version.trim();

    if !looks_like_version(new_version) {
        return Err(format!("`{}` is not a MAJOR.MINOR.PATCH version", new_version).into());
    }

    if !confirm(&format!("Ready to release version {}?", new_version))? {
        println!("Release aborted.");
        return Ok(());
    }

    // Update Cargo.toml
    doc["package"]["version"] = Item::from(new_version);
    fs::write("Cargo.toml", doc.to_string())?;
    println!("Updated Cargo.toml with new version: {}", new_version);

    // Update Cargo.lock to match the new version
    println!("Updating Cargo.lock...");
    let status = Command::new("cargo").arg("check").status()?;
    if !status.success() {
        return Err("Failed to update Cargo.lock".into());
    }

    // Collect release notes from the commit history
    let previous_tag = latest_tag()?;
    println!(
        "Previous tag: {}",
        if previous_tag.is_empty() {
            "None"
        } else {
            &previous_tag
        }
    );

    let notes = commits_since(&previous_tag)?;
    if notes.is_empty() {
        println!("Warning: No commit history found between previous tag and HEAD.");
        if !confirm("Continue with empty release notes?")? {
            println!("Release aborted.");
            return Ok(());
        }
    } else {
        println!("Release notes:");
        println!("{}", notes);
    }

    // Prepend the new section to the changelog
    stamp_changelog(new_version, &notes)?;
    println!("Stamped {} section into {}", new_version, CHANGELOG);

    // Git commands
    let commands = [
        (
            format!("git add Cargo.toml Cargo.lock {}", CHANGELOG),
            "Failed to stage release files",
        ),
        (
            format!("git commit -m \"Bump version to {}\"", new_version),
            "Failed to commit version bump",
        ),
        (
            format!("git tag -a v{} -m \"Version {}\"", new_version, new_version),
            "Failed to create tag",
        ),
        (String::from("git push"), "Failed to push commits"),
        (String::from("git push --tags"), "Failed to push tags"),
    ];

    for (cmd, error_msg) in commands.iter() {
        println!("Executing: {}", cmd);
        let status = Command::new("sh").arg("-c").arg(cmd).status()?;

        if !status.success() {
            return Err(error_msg.to_string().into());
        }
    }

    // Confirm publishing to crates.io
    if confirm("Publish to crates.io?")? {
        println!("Publishing to crates.io...");
        let status = Command::new("cargo").arg("publish").status()?;

        if !status.success() {
            return Err("Failed to publish to crates.io".into());
        }
    } else {
        println!("Skipping crates.io publishing.");
    }

    println!("Successfully released version {}", new_version);
    Ok(())
}
