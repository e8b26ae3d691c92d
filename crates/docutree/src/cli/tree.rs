//! Read-only commands: `tree`, `ls`, `discover`, `templates`, `config`

use std::path::PathBuf;

use docutree_core::config::PROJECT_CONFIG_FILE;
use docutree_core::tree::format_tree;

use super::CliWorkspace;
use super::util::{lookup, print_json, resolve_path};

pub fn handle_tree(ws: &mut CliWorkspace, json: bool) -> bool {
    let tree = ws.refresh();
    if json {
        return print_json(&tree);
    }
    if tree.is_empty() {
        println!("No content found in {}", ws.project_root().display());
    } else {
        print!("{}", format_tree(&tree));
    }
    true
}

pub fn handle_ls(ws: &CliWorkspace, path: Option<PathBuf>, json: bool) -> bool {
    let children = match path {
        None => ws.get_children(None),
        Some(path) => {
            let path = resolve_path(&path);
            let tree = ws.tree();
            let Some(node) = lookup(&tree, &path) else {
                eprintln!("✗ '{}' is not part of the content tree", path.display());
                return false;
            };
            ws.get_children(Some(&node))
        }
    };

    if json {
        return print_json(&children);
    }
    for child in &children {
        let marker = if child.is_folder() { "/" } else { "" };
        match child.position {
            Some(position) => println!("{:>4}  {}{}", position, child.label, marker),
            None => println!("   -  {}{}", child.label, marker),
        }
    }
    true
}

pub fn handle_discover(ws: &CliWorkspace, json: bool) -> bool {
    let roots = ws.discovered();
    if json {
        return print_json(roots);
    }
    for root in roots.iter() {
        let relative = root
            .path
            .strip_prefix(ws.project_root())
            .unwrap_or(&root.path);
        print!("{:<5} {:<20} {}", root.kind.to_string(), root.label, relative.display());
        if let Some(id) = &root.id {
            print!("  id={}", id);
        }
        if let Some(base) = &root.route_base_path {
            print!("  route={}", base);
        }
        println!("  ({:?})", root.source);
    }
    true
}

pub fn handle_templates(ws: &CliWorkspace) -> bool {
    for info in ws.templates().list() {
        match &info.path {
            Some(path) => println!(
                "{:<12} {:<9} {}",
                info.name,
                info.source.to_string(),
                path.display()
            ),
            None => println!("{:<12} {}", info.name, info.source),
        }
    }
    true
}

pub fn handle_config(ws: &CliWorkspace) -> bool {
    let project_file = ws.project_root().join(PROJECT_CONFIG_FILE);
    if project_file.is_file() {
        println!("# {}", project_file.display());
    } else if let Some(path) = docutree_core::config::Config::config_path()
        && path.is_file()
    {
        println!("# {}", path.display());
    } else {
        println!("# defaults");
    }

    match ws.config().to_toml() {
        Ok(toml) => {
            print!("{}", toml);
            true
        }
        Err(e) => {
            eprintln!("✗ Could not render config: {}", e);
            false
        }
    }
}
