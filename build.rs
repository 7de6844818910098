// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Optional positional release version
fn version_arg(help: &'static str) -> Arg {
    Arg::new("version").value_name("VERSION").help(help)
}

fn build_cli() -> Command {
    Command::new("godot-installer")
        .version(env!("CARGO_PKG_VERSION"))
        .author("Godot Installer Contributors")
        .about("Install and manage Godot engine releases for the current user")
        .subcommand_required(false)
        .subcommand(
            Command::new("install")
                .about("Install a Godot release and make it the active version")
                .arg(version_arg(
                    "Release to install, e.g. 4.3 or 4.2.1 (default: latest stable)",
                )),
        )
        .subcommand(
            Command::new("uninstall")
                .alias("remove")
                .about("Remove an installed version (all versions and desktop files if omitted)")
                .arg(version_arg("Installed version to remove")),
        )
        .subcommand(
            Command::new("clean").about("Remove every installed version except the active one"),
        )
        .subcommand(
            Command::new("list")
                .about("List published stable releases, marking installed and active ones"),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // CARGO_MANIFEST_DIR is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("godot-installer.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
