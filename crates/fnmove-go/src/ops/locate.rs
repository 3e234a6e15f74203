//! Finding a function declaration by package and name.

use fnmove_core::error::{FnMoveError, FnMoveResult};
use tracing::warn;

use crate::ast::Decl;
use crate::program::{PackageId, Program, SymbolId, UnitId};

/// A located top-level function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    pub package: PackageId,
    pub unit: UnitId,
    /// Index into the unit's declarations.
    pub index: usize,
    pub symbol: SymbolId,
}

/// Find the top-level function `function` in the package named `package`.
///
/// Packages are searched in load order and units in path order; the first
/// plain function found wins. A method of that name is only reported when
/// no plain function exists.
pub fn locate(program: &Program, package: &str, function: &str) -> FnMoveResult<Located> {
    let packages: Vec<PackageId> = program.packages_named(package).collect();
    if packages.is_empty() {
        return Err(FnMoveError::NoSuchPackage {
            package: package.to_string(),
        });
    }

    let mut found: Vec<(PackageId, UnitId, usize)> = Vec::new();
    let mut method: Option<String> = None;
    for pkg in &packages {
        for unit in &program.package(*pkg).units {
            for (index, decl) in program.unit(*unit).file.decls.iter().enumerate() {
                let Decl::Func(func) = decl else {
                    continue;
                };
                if func.name.name != function {
                    continue;
                }
                match func.receiver_type() {
                    Some(receiver) => {
                        method.get_or_insert(receiver);
                    }
                    None => found.push((*pkg, *unit, index)),
                }
            }
        }
    }

    let Some(&(pkg, unit, index)) = found.first() else {
        return Err(match method {
            Some(receiver) => FnMoveError::UnsupportedReceiver {
                function: function.to_string(),
                receiver,
            },
            None => FnMoveError::NoSuchFunction {
                package: package.to_string(),
                function: function.to_string(),
            },
        });
    };

    if found.len() > 1 {
        let others: Vec<&str> = found[1..]
            .iter()
            .map(|(_, u, _)| program.unit(*u).rel_path.as_str())
            .collect();
        warn!(
            function,
            chosen = %program.unit(unit).rel_path,
            others = ?others,
            "function declared more than once, using the first"
        );
    }

    let name = program
        .unit(unit)
        .func(index)
        .map(|f| f.name.id)
        .ok_or_else(|| FnMoveError::internal("located declaration is not a function"))?;
    let symbol = program
        .def_of(name)
        .ok_or_else(|| FnMoveError::internal(format!("function {function} has no symbol")))?;

    Ok(Located {
        package: pkg,
        unit,
        index,
        symbol,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::program_from;
    use std::path::Path;

    fn fixture() -> Program {
        program_from(&[
            ("go.mod", "module example.com/m\n"),
            ("mathutil/a.go", "package mathutil\n\ntype V struct{}\n\nfunc (v V) Len() int {\n\treturn 0\n}\n"),
            ("mathutil/ops.go", "package mathutil\n\nfunc sum(a, b int) int {\n\treturn a + b\n}\n"),
            ("other/mathutil/x.go", "package mathutil\n\nfunc sum() {}\n"),
        ])
    }

    #[test]
    fn finds_first_declaration_in_load_order() {
        let program = fixture();
        let located = locate(&program, "mathutil", "sum").unwrap();
        assert_eq!(
            located.unit,
            program.unit_by_path(Path::new("mathutil/ops.go")).unwrap()
        );
        assert_eq!(located.index, 0);
        assert_eq!(program.symbol(located.symbol).name, "sum");
    }

    #[test]
    fn unknown_package_and_function() {
        let program = fixture();
        assert!(matches!(
            locate(&program, "nope", "sum"),
            Err(FnMoveError::NoSuchPackage { .. })
        ));
        assert!(matches!(
            locate(&program, "mathutil", "missing"),
            Err(FnMoveError::NoSuchFunction { .. })
        ));
    }

    #[test]
    fn methods_are_rejected() {
        let program = fixture();
        let err = locate(&program, "mathutil", "Len").unwrap_err();
        match err {
            FnMoveError::UnsupportedReceiver { function, receiver } => {
                assert_eq!(function, "Len");
                assert_eq!(receiver, "V");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
