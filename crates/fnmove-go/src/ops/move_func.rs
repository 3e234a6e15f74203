//! The `relocate_function` operation.
//!
//! Validation happens before anything is mutated. The program is then
//! backed up, mutated by the [`Relocator`], rendered, optionally previewed
//! and committed. Any failure after mutation, and a declined preview,
//! restores the backup so the in-memory program matches the files again.

use std::path::PathBuf;

use fnmove_core::changeset::ChangeSet;
use fnmove_core::error::{FnMoveError, FnMoveResult};
use fnmove_core::interaction::{PreviewSink, Prompt};
use fnmove_core::store::FileStore;
use serde::Serialize;
use tracing::info;

use crate::ast::{Decl, ImportName};
use crate::ops::locate::{locate, Located};
use crate::ops::references::{find_references, find_value_references, Reference};
use crate::ops::relocate::{export_name, Relocator};
use crate::ops::scope::visible_locals;
use crate::printer::{PrintError, Printer};
use crate::program::{CompilationUnit, Program, UnitId};

/// What to move and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRequest {
    pub package: String,
    pub function: String,
    /// Destination unit, absolute or relative to the program root.
    pub destination: PathBuf,
    /// Show diffs and ask before writing.
    pub preview: bool,
    pub confirm_attempts: u32,
}

impl MoveRequest {
    pub fn new(
        package: impl Into<String>,
        function: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        MoveRequest {
            package: package.into(),
            function: function.into(),
            destination: destination.into(),
            preview: true,
            confirm_attempts: 5,
        }
    }

    pub fn without_preview(mut self) -> Self {
        self.preview = false;
        self
    }
}

/// Collaborators of one move.
pub struct Ports<'a> {
    pub printer: &'a dyn Printer,
    pub store: &'a mut dyn FileStore,
    pub prompt: &'a mut dyn Prompt,
    pub sink: &'a mut dyn PreviewSink,
}

/// Summary of a completed move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub function: String,
    pub renamed_to: Option<String>,
    pub source: String,
    pub destination: String,
    pub files_changed: Vec<String>,
    pub call_sites_rewritten: usize,
    pub value_uses_rewritten: usize,
    pub imports_added: Vec<String>,
    pub imports_removed: Vec<String>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Moved(MoveReport),
    /// The operator declined the preview. Nothing was written.
    Declined,
}

/// Move `request.function` out of package `request.package` into the unit
/// at `request.destination`.
pub fn relocate_function(
    program: &mut Program,
    request: &MoveRequest,
    ports: Ports<'_>,
) -> FnMoveResult<Outcome> {
    let located = locate(program, &request.package, &request.function)?;
    let dest = program
        .unit_by_path(&request.destination)
        .ok_or_else(|| FnMoveError::NoSuchUnit {
            path: request.destination.display().to_string(),
        })?;
    if dest == located.unit {
        return Err(FnMoveError::NoOp {
            function: request.function.clone(),
            path: program.unit(dest).rel_path.clone(),
        });
    }

    let new_name = if program.unit_package(dest) != located.package {
        export_name(&request.function)?
    } else {
        request.function.clone()
    };
    check_collision(program, &located, dest, &new_name)?;

    let calls = find_references(program, located.symbol);
    let values = find_value_references(program, located.symbol);
    for reference in calls.iter().chain(&values) {
        check_capture(program, &located, dest, &new_name, reference)?;
    }
    info!(
        function = %request.function,
        calls = calls.len(),
        values = values.len(),
        "relocating function"
    );

    let backup = program.clone();
    let plan = Plan {
        located,
        dest,
        new_name,
        calls,
        values,
    };
    let result = apply(program, &backup, request, plan, ports);
    if !matches!(result, Ok(Outcome::Moved(_))) {
        *program = backup;
    }
    result
}

struct Plan {
    located: Located,
    dest: UnitId,
    new_name: String,
    calls: Vec<Reference>,
    values: Vec<Reference>,
}

fn check_collision(
    program: &Program,
    located: &Located,
    dest: UnitId,
    name: &str,
) -> FnMoveResult<()> {
    let package = program.package(program.unit_package(dest));
    let collision = |path: &str| FnMoveError::Collision {
        name: name.to_string(),
        package: package.name.clone(),
        path: path.to_string(),
    };
    if let Some(existing) = package.scope.get(name) {
        if *existing != located.symbol {
            let path = program
                .symbol(*existing)
                .unit
                .map(|u| program.unit(u).rel_path.clone())
                .unwrap_or_default();
            return Err(collision(&path));
        }
    }
    if program.unit(dest).imports.contains_key(name) {
        return Err(collision(&program.unit(dest).rel_path));
    }
    Ok(())
}

/// A reference rewritten to a bare name must not be captured by a local
/// of the same name in scope at the reference.
fn check_capture(
    program: &Program,
    located: &Located,
    dest: UnitId,
    name: &str,
    reference: &Reference,
) -> FnMoveResult<()> {
    let dest_package = program.package(program.unit_package(dest));
    let decl_span = program
        .unit(located.unit)
        .file
        .decls
        .get(located.index)
        .map(Decl::span)
        .ok_or_else(|| FnMoveError::internal("located declaration index out of range"))?;
    let unit = program.unit(reference.unit);
    let bare = (reference.unit == located.unit && decl_span.contains(&reference.span))
        || program.package(unit.package).import_path == dest_package.import_path
        || unit
            .file
            .imports
            .iter()
            .any(|spec| spec.path == dest_package.import_path && spec.name == ImportName::Dot);
    if bare && visible_locals(program, reference.unit, reference.target).contains(name) {
        return Err(FnMoveError::Collision {
            name: name.to_string(),
            package: dest_package.name.clone(),
            path: unit.rel_path.clone(),
        });
    }
    Ok(())
}

fn structural(unit: &CompilationUnit, err: PrintError) -> FnMoveError {
    FnMoveError::Structural {
        path: unit.rel_path.clone(),
        message: err.to_string(),
    }
}

fn apply(
    program: &mut Program,
    backup: &Program,
    request: &MoveRequest,
    plan: Plan,
    ports: Ports<'_>,
) -> FnMoveResult<Outcome> {
    let mut references = plan.calls.clone();
    references.extend(plan.values.iter().cloned());
    let relocation =
        Relocator::new(program, plan.located, plan.dest, plan.new_name).run(&references)?;

    let mut changes = ChangeSet::new();
    for unit in &relocation.touched {
        let before = backup.unit(*unit);
        let baseline = ports
            .printer
            .print(before)
            .map_err(|e| structural(before, e))?;
        changes.track(
            before.path.clone(),
            before.rel_path.clone(),
            before.contents.clone().into_bytes(),
            baseline,
        )?;
    }

    let printer = ports.printer;
    changes.render(|record| {
        let unit = program
            .unit_by_path(&record.path)
            .map(|id| program.unit(id))
            .ok_or_else(|| {
                FnMoveError::internal(format!("{} is not a loaded unit", record.display))
            })?;
        printer.print(unit).map_err(|e| structural(unit, e))
    })?;

    if request.preview {
        if !changes.preview(ports.sink, ports.prompt, request.confirm_attempts)? {
            return Ok(Outcome::Declined);
        }
    } else {
        changes.skip_preview()?;
    }
    let summary = changes.commit(ports.store)?;

    for record in changes.records() {
        let Some(rendered) = &record.rendered else {
            continue;
        };
        if let Some(unit) = program.unit_by_path(&record.path) {
            program.unit_mut(unit).contents = rendered.clone();
        }
    }

    let report = MoveReport {
        function: request.function.clone(),
        renamed_to: relocation.renamed_to,
        source: backup.unit(plan.located.unit).rel_path.clone(),
        destination: program.unit(plan.dest).rel_path.clone(),
        files_changed: summary.written,
        call_sites_rewritten: plan.calls.len(),
        value_uses_rewritten: plan.values.len(),
        imports_added: relocation.imports_added,
        imports_removed: relocation.imports_removed,
        warnings: relocation.warnings,
    };
    info!(
        function = %report.function,
        files = report.files_changed.len(),
        "move committed"
    );
    Ok(Outcome::Moved(report))
}
