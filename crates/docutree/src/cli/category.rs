//! `category create|edit|delete`

use std::path::PathBuf;

use docutree_core::category::CategoryData;

use super::CliWorkspace;
use super::args::CategoryCommands;
use super::util::{StdinConfirm, prompt_confirm, prompt_value, report_error, resolve_path};

pub fn handle_category_command(command: CategoryCommands, ws: &CliWorkspace, yes: bool) -> bool {
    match command {
        CategoryCommands::Create {
            parent,
            name,
            label,
            position,
            description,
        } => handle_create(ws, parent, &name, label, position, description, yes),
        CategoryCommands::Edit {
            path,
            label,
            position,
            description,
        } => handle_edit(ws, path, label, position, description),
        CategoryCommands::Delete { path } => handle_delete(ws, path, yes),
    }
}

fn handle_create(
    ws: &CliWorkspace,
    parent: PathBuf,
    name: &str,
    label: Option<String>,
    position: Option<i64>,
    description: Option<String>,
    yes: bool,
) -> bool {
    let mut draft = match ws.begin_category(&resolve_path(&parent), name) {
        Ok(draft) => draft,
        Err(e) => return report_error(&e),
    };
    let proposed = draft.proposed().clone();
    let interactive = !yes;

    let data = CategoryData {
        label: label.unwrap_or_else(|| {
            if interactive {
                prompt_value("Label", &proposed.label)
            } else {
                proposed.label.clone()
            }
        }),
        position: position.unwrap_or(proposed.position),
        description: description.unwrap_or_else(|| {
            if interactive {
                prompt_value("Description", &proposed.description)
            } else {
                proposed.description.clone()
            }
        }),
    };

    if interactive
        && !prompt_confirm(&format!(
            "Create category '{}' at position {}?",
            data.label, data.position
        ))
    {
        return match draft.cancel() {
            Ok(_) => {
                println!("Cancelled.");
                true
            }
            Err(e) => report_error(&e),
        };
    }

    match draft.commit(data) {
        Ok(path) => {
            println!("✓ Created category {}", path.display());
            true
        }
        Err(e) => {
            let ok = report_error(&e);
            if let Err(cleanup) = draft.cancel() {
                log::warn!("Could not remove {}: {}", draft.path().display(), cleanup);
            }
            ok
        }
    }
}

fn handle_edit(
    ws: &CliWorkspace,
    path: PathBuf,
    label: Option<String>,
    position: Option<i64>,
    description: Option<String>,
) -> bool {
    let path = resolve_path(&path);
    let current = match ws.load_category(&path) {
        Ok(data) => data,
        Err(e) => return report_error(&e),
    };

    let data = CategoryData {
        label: label.unwrap_or(current.label),
        position: position.unwrap_or(current.position),
        description: description.unwrap_or(current.description),
    };
    match ws.edit_category(&path, &data) {
        Ok(()) => {
            println!("✓ Updated {}", path.display());
            true
        }
        Err(e) => report_error(&e),
    }
}

fn handle_delete(ws: &CliWorkspace, path: PathBuf, yes: bool) -> bool {
    let path = resolve_path(&path);
    let plan = match ws.plan_category_delete(&path) {
        Ok(plan) => plan,
        Err(e) => return report_error(&e),
    };
    if plan.document_count > 0 {
        println!(
            "{} contains {} document(s)",
            path.display(),
            plan.document_count
        );
    }

    match ws.delete_category(&plan, &mut StdinConfirm { yes }) {
        Ok(()) => {
            println!("✓ Deleted {}", path.display());
            true
        }
        Err(e) => report_error(&e),
    }
}
