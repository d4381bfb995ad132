//! Implementations the CLI subcommands dispatch into.
//!
//! One function per verb, taking a `&Config` and doing the filesystem work,
//! so `main.rs` stays thin. Everything here is built exclusively from the
//! public `Archive`/`Skimmer` interface -- the CLI is a client of that
//! interface, not part of the archive format itself.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::archive::{Archive, ROOT_HANDLE};
use crate::cli::Command;
use crate::config::Config;
use crate::entry::EntryPayload;
use crate::skimmer::Skimmer;
use crate::vlog;

#[derive(Debug, serde::Serialize)]
struct TreeNode {
    handle: i32,
    name: String,
    kind: &'static str,
    children: Vec<TreeNode>,
}

fn open_skimmer(config: &Config, path: &Path) -> anyhow::Result<Skimmer> {
    match config.rng_seed {
        Some(seed) => Ok(Skimmer::open_seeded(path, seed)?),
        None => Ok(Skimmer::open(path)?),
    }
}

fn kind_name(payload: &EntryPayload) -> &'static str {
    match payload {
        EntryPayload::File(_) => "file",
        EntryPayload::CompressedFile { .. } => "compressed_file",
        EntryPayload::Directory(_) => "directory",
        EntryPayload::Symlink(_) => "symlink",
    }
}

fn build_tree(skimmer: &Skimmer, handle: i32, visited: &mut std::collections::HashSet<i32>) -> anyhow::Result<TreeNode> {
    let entry = skimmer
        .fetch(handle)?
        .ok_or_else(|| anyhow::anyhow!("handle {handle} is not indexed"))?;
    let name = String::from_utf8_lossy(&entry.name).into_owned();
    let kind = kind_name(&entry.payload);

    // Directory graph cycles are data-level and undefined; bail rather than
    // recurse forever if one is present.
    if !visited.insert(handle) {
        anyhow::bail!("cycle detected at handle {handle} while building tree");
    }

    let children = match &entry.payload {
        EntryPayload::Directory(child_handles) => child_handles
            .iter()
            .map(|&child| build_tree(skimmer, child, visited))
            .collect::<anyhow::Result<Vec<_>>>()?,
        _ => Vec::new(),
    };

    Ok(TreeNode {
        handle,
        name,
        kind,
        children,
    })
}

pub fn create(config: &Config) -> anyhow::Result<()> {
    let Command::Create {
        path,
        capacity,
        disk_name,
    } = &config.command
    else {
        unreachable!("create() called with non-Create command");
    };

    let archive = Archive::new(*capacity, disk_name.clone().unwrap_or_default());
    let bytes = archive.save()?;
    fs::write(path, &bytes)?;
    vlog!(config.verbose, 1, "wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}

pub fn tree(config: &Config) -> anyhow::Result<()> {
    let Command::Tree { path } = &config.command else {
        unreachable!("tree() called with non-Tree command");
    };

    let skimmer = open_skimmer(config, path)?;
    let mut visited = std::collections::HashSet::new();
    let root = build_tree(&skimmer, ROOT_HANDLE, &mut visited)?;
    println!("{}", serde_json::to_string_pretty(&root)?);
    Ok(())
}

pub fn cat(config: &Config) -> anyhow::Result<()> {
    let Command::Cat { path, handle } = &config.command else {
        unreachable!("cat() called with non-Cat command");
    };

    let skimmer = open_skimmer(config, path)?;
    let entry = skimmer
        .fetch(*handle)?
        .ok_or_else(|| anyhow::anyhow!("no such handle: {handle}"))?;

    let bytes: &[u8] = match &entry.payload {
        EntryPayload::File(bytes) => bytes,
        EntryPayload::CompressedFile { stored, .. } => stored,
        other => anyhow::bail!("handle {handle} is not a file (kind {})", kind_name(other)),
    };

    std::io::stdout().write_all(bytes)?;
    Ok(())
}

pub fn add(config: &Config) -> anyhow::Result<()> {
    let Command::Add {
        path,
        dest_path,
        source_file,
        overwrite,
    } = &config.command
    else {
        unreachable!("add() called with non-Add command");
    };

    let bytes = fs::read(source_file)?;
    let mut skimmer = open_skimmer(config, path)?;
    let handle = skimmer.create_path(dest_path, bytes, *overwrite)?;
    vlog!(config.verbose, 1, "created handle {handle} at {dest_path}");
    println!("{handle}");
    Ok(())
}

pub fn rm(config: &Config) -> anyhow::Result<()> {
    let Command::Rm { path, handle } = &config.command else {
        unreachable!("rm() called with non-Rm command");
    };

    let mut skimmer = open_skimmer(config, path)?;
    let ok = skimmer.delete(&[*handle])?;
    if !ok {
        anyhow::bail!("delete of handle {handle} failed");
    }
    Ok(())
}

pub fn verify(config: &Config) -> anyhow::Result<()> {
    let Command::Verify { path } = &config.command else {
        unreachable!("verify() called with non-Verify command");
    };

    let bytes = fs::read(path)?;
    match Archive::load(&bytes) {
        Ok(archive) => {
            println!("ok: {} entries, {} bytes used", archive.len(), archive.used_bytes()?);
            Ok(())
        }
        Err(err) => anyhow::bail!("corrupt archive: {err}"),
    }
}

/// Dispatches `config.command` to its handler.
pub fn dispatch(config: &Config) -> anyhow::Result<()> {
    match &config.command {
        Command::Create { .. } => create(config),
        Command::Tree { .. } => tree(config),
        Command::Cat { .. } => cat(config),
        Command::Add { .. } => add(config),
        Command::Rm { .. } => rm(config),
        Command::Verify { .. } => verify(config),
    }
}
