//! `texprep folders`: the remembered folder list.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use texprep_core::folders::{clear_folders, FolderList};

pub fn list(list_path: &Path) -> anyhow::Result<()> {
    let list = FolderList::load(list_path)?;
    if list.is_empty() {
        println!("no folders in {}", list_path.display());
    }
    for folder in list.folders() {
        println!("{}", folder.display());
    }
    Ok(())
}

pub fn add(list_path: &Path, folders: &[PathBuf]) -> anyhow::Result<()> {
    let mut list = FolderList::load(list_path)?;
    for folder in folders {
        if !folder.is_dir() {
            anyhow::bail!("{} is not a directory", folder.display());
        }
        if list.add(folder) {
            println!("added {}", folder.display());
        } else {
            println!("already listed: {}", folder.display());
        }
    }
    list.save(list_path)?;
    Ok(())
}

pub fn remove(list_path: &Path, folders: &[PathBuf]) -> anyhow::Result<()> {
    let mut list = FolderList::load(list_path)?;
    let removed = list.remove(folders);
    list.save(list_path)?;
    println!("removed {removed} folders");
    Ok(())
}

pub fn clear(list_path: &Path, yes: bool) -> anyhow::Result<()> {
    let list = FolderList::load(list_path)?;
    if list.is_empty() {
        println!("no folders in {}", list_path.display());
        return Ok(());
    }

    println!("The contents of these folders will be deleted permanently:");
    for folder in list.folders() {
        println!("  {}", folder.display());
    }
    if !yes && !confirm("Continue? [y/N] ")? {
        println!("cancelled");
        return Ok(());
    }

    let report = clear_folders(list.folders());
    for folder in &report.cleared {
        println!("cleared {}", folder.display());
    }
    for (path, reason) in &report.failed {
        eprintln!("failed {}: {reason}", path.display());
    }
    Ok(())
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .context("reading confirmation")?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
