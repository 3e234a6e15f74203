//! End-to-end tests: load a project from disk, move a function, and check
//! what ends up in the files.

use std::fs;
use std::path::Path;

use fnmove::changeset::CONFIRM_QUESTION;
use fnmove::cli::{run_move, MoveArgs};
use fnmove::error::{FnMoveError, FnMoveResult};
use fnmove::go::ops::{Outcome, Ports};
use fnmove::go::CanonicalPrinter;
use fnmove::interaction::{CollectingSink, ScriptedPrompt};
use fnmove::store::{FaultyFileStore, FileStore, OsFileStore};
use tempfile::TempDir;

const GO_MOD: &str = "module example.com/demo\n";

const OPS: &str = "package mathutil

// sum adds a and b. sum is used by main; see the summary below.
func sum(a, b int) int {
\treturn a + b
}

// summary is not the function above.
func summary() string {
\treturn \"sum\"
}
";

const MAIN: &str = "package main

import \"example.com/demo/mathutil\"

func main() {
\tmathutil.sum(1, 2)
}
";

/// A throw-away project on disk.
struct Project {
    dir: TempDir,
}

impl Project {
    fn new(files: &[(&str, &str)]) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        fs::write(dir.path().join("go.mod"), GO_MOD).expect("failed to write go.mod");
        for (path, content) in files {
            let full = dir.path().join(path);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, content).unwrap();
        }
        Project { dir }
    }

    fn demo() -> Self {
        Project::new(&[("mathutil/ops.go", OPS), ("app/main.go", MAIN)])
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn read(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path)).unwrap()
    }

    fn args(&self, qualified: &str, destination: &str, no_preview: bool) -> MoveArgs {
        MoveArgs {
            root: self.root().to_path_buf(),
            qualified: qualified.to_string(),
            destination: destination.into(),
            no_preview,
        }
    }
}

/// Drive a move with scripted answers and the given store.
fn drive(
    args: &MoveArgs,
    answers: &[&str],
    store: &mut dyn FileStore,
) -> (FnMoveResult<Outcome>, ScriptedPrompt, CollectingSink) {
    let mut prompt = ScriptedPrompt::new(answers.iter().copied());
    let mut sink = CollectingSink::default();
    let result = run_move(
        args,
        Ports {
            printer: &CanonicalPrinter,
            store,
            prompt: &mut prompt,
            sink: &mut sink,
        },
    );
    (result, prompt, sink)
}

fn apply(args: &MoveArgs) -> FnMoveResult<Outcome> {
    drive(args, &[], &mut OsFileStore).0
}

mod scenarios {
    use super::*;

    #[test]
    fn cross_package_move_with_confirmation() {
        let project = Project::demo();
        let args = project.args("mathutil.sum", "app/main.go", false);
        let (result, prompt, sink) = drive(&args, &["y"], &mut OsFileStore);

        let Outcome::Moved(report) = result.unwrap() else {
            panic!("expected the move to be applied");
        };
        assert_eq!(report.renamed_to.as_deref(), Some("Sum"));
        assert_eq!(report.call_sites_rewritten, 1);
        assert_eq!(prompt.questions(), &[CONFIRM_QUESTION.to_string()]);
        assert_eq!(sink.diffs.len(), 2);

        assert_eq!(
            project.read("app/main.go"),
            "package main

func main() {
\tSum(1, 2)
}

// Sum adds a and b. Sum is used by main; see the summary below.
func Sum(a, b int) int {
\treturn a + b
}
"
        );
        assert_eq!(
            project.read("mathutil/ops.go"),
            "package mathutil

// summary is not the function above.
func summary() string {
\treturn \"sum\"
}
"
        );
    }

    #[test]
    fn declining_writes_nothing() {
        let project = Project::demo();
        let args = project.args("mathutil.sum", "app/main.go", false);
        let (result, _, _) = drive(&args, &["no"], &mut OsFileStore);

        assert!(matches!(result, Ok(Outcome::Declined)));
        assert_eq!(project.read("mathutil/ops.go"), OPS);
        assert_eq!(project.read("app/main.go"), MAIN);
    }

    #[test]
    fn exhausted_confirmation_declines() {
        let project = Project::demo();
        let args = project.args("mathutil.sum", "app/main.go", false);
        let (result, prompt, _) = drive(&args, &["?", "", "maybe"], &mut OsFileStore);

        assert!(matches!(result, Ok(Outcome::Declined)));
        assert_eq!(prompt.questions().len(), 5);
        assert_eq!(project.read("app/main.go"), MAIN);
    }

    #[test]
    fn config_can_disable_preview() {
        let project = Project::demo();
        fs::write(
            project.root().join(".fnmove.toml"),
            "[relocate]\npreview = false\n",
        )
        .unwrap();
        let args = project.args("mathutil.sum", "app/main.go", false);
        let (result, prompt, sink) = drive(&args, &[], &mut OsFileStore);

        assert!(matches!(result, Ok(Outcome::Moved(_))));
        assert!(prompt.questions().is_empty());
        assert!(sink.diffs.is_empty());
    }

    #[test]
    fn unrelated_files_are_not_rewritten() {
        let odd = "package main\n\nfunc  other()   {\n}\n";
        let project = Project::new(&[
            ("mathutil/ops.go", OPS),
            ("app/main.go", MAIN),
            ("app/other.go", odd),
        ]);
        let result = apply(&project.args("mathutil.sum", "app/main.go", true));

        let Ok(Outcome::Moved(report)) = result else {
            panic!("expected a move, got {result:?}");
        };
        assert!(!report.files_changed.contains(&"app/other.go".to_string()));
        assert_eq!(project.read("app/other.go"), odd);
    }
}

mod guards {
    use super::*;

    fn assert_untouched(project: &Project) {
        assert_eq!(project.read("mathutil/ops.go"), OPS);
        assert_eq!(project.read("app/main.go"), MAIN);
    }

    #[test]
    fn same_file_is_rejected_and_bytes_stay_identical() {
        let project = Project::demo();
        let result = apply(&project.args("mathutil.sum", "mathutil/ops.go", true));
        assert!(matches!(result, Err(FnMoveError::NoOp { .. })));
        assert_untouched(&project);
    }

    #[test]
    fn methods_are_rejected() {
        let project = Project::new(&[
            (
                "counter/counter.go",
                "package counter\n\ntype Counter int\n\nfunc (c Counter) Double() Counter {\n\treturn c * 2\n}\n",
            ),
            ("app/main.go", "package main\n"),
        ]);
        let result = apply(&project.args("counter.Double", "app/main.go", true));
        assert!(matches!(result, Err(FnMoveError::UnsupportedReceiver { .. })));
    }

    #[test]
    fn malformed_name_is_a_usage_error() {
        let project = Project::demo();
        let result = apply(&project.args("mathutil", "app/main.go", true));
        let err = result.unwrap_err();
        assert!(matches!(err, FnMoveError::Usage { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn unknown_package_and_function() {
        let project = Project::demo();
        let result = apply(&project.args("nope.sum", "app/main.go", true));
        assert!(matches!(result, Err(FnMoveError::NoSuchPackage { .. })));

        let result = apply(&project.args("mathutil.product", "app/main.go", true));
        assert!(matches!(result, Err(FnMoveError::NoSuchFunction { .. })));
        assert_untouched(&project);
    }

    #[test]
    fn collision_leaves_everything_in_place() {
        let project = Project::new(&[
            ("mathutil/ops.go", OPS),
            ("app/main.go", MAIN),
            ("app/sum.go", "package main\n\nfunc Sum() {}\n"),
        ]);
        let result = apply(&project.args("mathutil.sum", "app/main.go", true));
        assert!(matches!(result, Err(FnMoveError::Collision { .. })));
        assert_untouched(&project);
    }
}

mod rollback {
    use super::*;

    #[test]
    fn failed_second_write_restores_the_first() {
        let project = Project::demo();
        let args = project.args("mathutil.sum", "app/main.go", true);
        let mut store = FaultyFileStore::new(OsFileStore, 2);
        let (result, _, _) = drive(&args, &[], &mut store);

        match result {
            Err(FnMoveError::Io {
                path,
                rollback_failures,
                ..
            }) => {
                assert_eq!(path, "mathutil/ops.go");
                assert!(rollback_failures.is_empty());
            }
            other => panic!("expected a write failure, got {other:?}"),
        }
        assert_eq!(project.read("mathutil/ops.go"), OPS);
        assert_eq!(project.read("app/main.go"), MAIN);
    }

    #[test]
    fn failed_first_write_changes_nothing() {
        let project = Project::demo();
        let args = project.args("mathutil.sum", "app/main.go", true);
        let mut store = FaultyFileStore::new(OsFileStore, 1);
        let (result, _, _) = drive(&args, &[], &mut store);

        assert!(matches!(result, Err(FnMoveError::Io { .. })));
        // The failed write, then its restore.
        assert_eq!(store.attempts(), 2);
        assert_eq!(project.read("app/main.go"), MAIN);
        assert_eq!(project.read("mathutil/ops.go"), OPS);
    }
}
