//! End-to-end packaging runs.
//!
//! Most runs use an in-memory filesystem so reads, writes and directory
//! creation can be counted; one run goes through the real filesystem.

mod common;

use common::{module_manifest, MemoryFs};
use esmpack_core::error::{codes, Error};
use esmpack_core::package::{is_relative_specifier, DestinationMapper, JS_EXTENSION};
use esmpack_core::{
    package_esm, package_esm_with, ImportKind, ImportReference, ImportScanner, PackageOptions,
    StaticScanner,
};
use esmpack_util::path::normalize;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

fn options() -> PackageOptions {
    PackageOptions::new("/repo", "src", "out").entry("a.js")
}

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn scenario_a_alias_and_relative_import() {
    let fs = MemoryFs::new()
        .with_file(
            "/repo/src/a.js",
            "import { b } from './b';\nimport lib from 'lib';\nexport { b, lib };\n",
        )
        .with_file("/repo/src/b.js", "export const b = 1;\n")
        .with_file("/alias/lib.js", "export default 'lib';\n");

    let options = options().alias("lib", "/alias/lib.js");
    let summary = package_esm_with(&options, &fs, &StaticScanner).unwrap();

    assert_eq!(summary.files.len(), 3);
    let a = fs.file("/repo/out/a.js").unwrap();
    assert!(a.contains("from './b';"), "relative import kept: {a}");
    assert!(
        a.contains("from './alias/lib';"),
        "alias rewritten to destination: {a}"
    );
    assert_eq!(
        fs.file("/repo/out/alias/lib.js").as_deref(),
        Some("export default 'lib';\n")
    );
    assert!(fs.file("/repo/out/b.js").is_some());
}

#[test]
fn scenario_b_unresolvable_bare_specifier_aborts() {
    let fs = MemoryFs::new().with_file("/repo/src/a.js", "import dep from 'dep';\n");

    let err = package_esm_with(&options(), &fs, &StaticScanner).unwrap_err();
    assert_eq!(err.code(), codes::MODULE_NOT_FOUND);
    match &err {
        Error::ModuleNotFound {
            specifier,
            importer,
        } => {
            assert_eq!(specifier, "dep");
            assert_eq!(importer, Path::new("/repo/src/a.js"));
        }
        other => panic!("unexpected error: {other}"),
    }
    let msg = err.to_string();
    assert!(msg.contains("dep") && msg.contains("/repo/src/a.js"), "{msg}");
    assert!(fs.writes().is_empty(), "nothing written on failure");
}

#[test]
fn scenario_c_skipped_import_is_untouched() {
    let source = "import * as vscode from 'vscode';\nimport { x } from 'vscode/sub';\n";
    let fs = MemoryFs::new().with_file("/repo/src/a.js", source);

    let options = options().skip("vscode");
    package_esm_with(&options, &fs, &StaticScanner).unwrap();

    assert_eq!(fs.file("/repo/out/a.js").as_deref(), Some(source));
    assert_eq!(fs.reads(), vec![PathBuf::from("/repo/src/a.js")]);
    assert_eq!(fs.writes(), vec![PathBuf::from("/repo/out/a.js")]);
}

#[test]
fn scenario_d_simplified_third_party_destination() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import foo from 'foo';\n")
        .with_file("/repo/src/sub/c.js", "import { util } from 'foo';\n")
        .with_file(
            "/repo/node_modules/foo/package.json",
            &module_manifest("dist/index.js"),
        )
        .with_file(
            "/repo/node_modules/foo/dist/index.js",
            "export * from './util';\nexport default 1;\n",
        )
        .with_file("/repo/node_modules/foo/dist/util.js", "export const util = 2;\n");

    let options = options()
        .entry("sub/c.js")
        .simplify("node_modules/foo/dist", "foo");
    package_esm_with(&options, &fs, &StaticScanner).unwrap();

    assert_eq!(
        fs.file("/repo/out/a.js").as_deref(),
        Some("import foo from './foo/index';\n")
    );
    assert_eq!(
        fs.file("/repo/out/sub/c.js").as_deref(),
        Some("import { util } from '../foo/index';\n")
    );
    // Relative imports inside the package follow it to the simplified location
    assert_eq!(
        fs.file("/repo/out/foo/index.js").as_deref(),
        Some("export * from './util';\nexport default 1;\n")
    );
    assert!(fs.file("/repo/out/foo/util.js").is_some());
    assert!(fs.file("/repo/out/node_modules/foo/dist/index.js").is_none());
}

#[test]
fn simplification_leaves_root_prefix_alone() {
    let fs = MemoryFs::new()
        .with_file("/home/node_modules/repo/src/a.js", "import dep from 'dep';\n")
        .with_file(
            "/home/node_modules/repo/node_modules/dep/package.json",
            &module_manifest("lib/index.js"),
        )
        .with_file(
            "/home/node_modules/repo/node_modules/dep/lib/index.js",
            "import './util';\n",
        )
        .with_file(
            "/home/node_modules/repo/node_modules/dep/lib/util.js",
            "export {};\n",
        );

    let options = PackageOptions::new("/home/node_modules/repo", "src", "out")
        .entry("a.js")
        .simplify("node_modules/", "");
    let summary = package_esm_with(&options, &fs, &StaticScanner).unwrap();

    let destination_dir = options.normalized().unwrap().destination_dir();
    assert_eq!(summary.files.len(), 3);
    for file in &summary.files {
        assert!(
            file.destination.starts_with(&destination_dir),
            "{} escaped {}",
            file.destination.display(),
            destination_dir.display()
        );
    }
    assert_eq!(
        fs.file("/home/node_modules/repo/out/a.js").as_deref(),
        Some("import dep from './dep/lib/index';\n")
    );
    assert!(fs
        .file("/home/node_modules/repo/out/dep/lib/util.js")
        .is_some());
    assert!(fs.writes().iter().all(|w| w.starts_with(&destination_dir)));
}

#[test]
fn reachability_closure_writes_only_reachable_files() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import './b';\n")
        .with_file("/repo/src/b.js", "import './nested/c';\n")
        .with_file("/repo/src/nested/c.js", "export {};\n")
        .with_file("/repo/src/unreachable.js", "import './b';\n")
        .with_file(
            "/repo/node_modules/unused/package.json",
            &module_manifest("index.js"),
        )
        .with_file("/repo/node_modules/unused/index.js", "export {};\n");

    package_esm_with(&options(), &fs, &StaticScanner).unwrap();

    let written: BTreeSet<PathBuf> = fs.writes().into_iter().collect();
    assert_eq!(
        written,
        paths(&["/repo/out/a.js", "/repo/out/b.js", "/repo/out/nested/c.js"])
    );
    assert_eq!(fs.read_count("/repo/src/unreachable.js"), 0);
    assert_eq!(fs.read_count("/repo/node_modules/unused/index.js"), 0);
}

#[test]
fn diamond_and_cycle_are_processed_once() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import './b';\nimport './c';\nimport 'shared';\n")
        .with_file("/repo/src/b.js", "import './d';\nimport 'shared';\n")
        .with_file("/repo/src/c.js", "import './d';\n")
        .with_file("/repo/src/d.js", "import './a';\nimport 'shared';\n")
        .with_file(
            "/repo/node_modules/shared/package.json",
            &module_manifest("index.js"),
        )
        .with_file("/repo/node_modules/shared/index.js", "export {};\n");

    let summary = package_esm_with(&options(), &fs, &StaticScanner).unwrap();

    let expected = [
        "/repo/src/a.js",
        "/repo/src/b.js",
        "/repo/src/c.js",
        "/repo/src/d.js",
        "/repo/node_modules/shared/index.js",
    ];
    for file in expected {
        assert_eq!(fs.read_count(file), 1, "{file} read once");
    }
    assert_eq!(summary.files.len(), expected.len());

    let writes = fs.writes();
    let unique: HashSet<&PathBuf> = writes.iter().collect();
    assert_eq!(unique.len(), writes.len(), "no file written twice");
}

#[test]
fn directory_creation_is_attempted_once_per_directory() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import './x/one';\nimport './x/two';\n")
        .with_file("/repo/src/x/one.js", "import './deep/three';\n")
        .with_file("/repo/src/x/two.js", "export {};\n")
        .with_file("/repo/src/x/deep/three.js", "export {};\n");

    let summary = package_esm_with(&options(), &fs, &StaticScanner).unwrap();

    let calls = fs.create_dir_calls();
    let unique: HashSet<&PathBuf> = calls.iter().collect();
    assert_eq!(unique.len(), calls.len(), "duplicate create_dir: {calls:?}");
    assert_eq!(summary.directories, calls.len());

    // Ancestors before descendants
    let position = |p: &str| calls.iter().position(|c| c == Path::new(p)).unwrap();
    assert!(position("/repo/out") < position("/repo/out/x"));
    assert!(position("/repo/out/x") < position("/repo/out/x/deep"));
}

#[test]
fn rewritten_specifiers_resolve_back_to_targets() {
    let fs = MemoryFs::new()
        .with_file(
            "/repo/src/vs/base/a.js",
            "import one from 'one';\nimport two from 'two';\nimport lib from 'lib';\n",
        )
        .with_file("/repo/node_modules/one/package.json", &module_manifest("esm/one.js"))
        .with_file("/repo/node_modules/one/esm/one.js", "export default 1;\n")
        .with_file("/repo/node_modules/two/package.json", &module_manifest("dist/two.js"))
        .with_file("/repo/node_modules/two/dist/two.js", "export default 2;\n")
        .with_file("/repo/vendor/lib.js", "export default 3;\n");

    let options = PackageOptions::new("/repo", "src", "out")
        .entry("vs/base/a.js")
        .alias("lib", "/repo/vendor/lib.js")
        .simplify("node_modules/two/dist", "two");
    package_esm_with(&options, &fs, &StaticScanner).unwrap();

    let mapper = DestinationMapper::new(&options.normalized().unwrap());
    let importer_dest = mapper.destination(Path::new("/repo/src/vs/base/a.js"));
    let output = fs.file(importer_dest.to_str().unwrap()).unwrap();

    let targets = [
        "/repo/node_modules/one/esm/one.js",
        "/repo/node_modules/two/dist/two.js",
        "/repo/vendor/lib.js",
    ];
    let references = StaticScanner.scan(&output);
    assert_eq!(references.len(), targets.len());

    for (reference, target) in references.iter().zip(targets) {
        assert!(is_relative_specifier(&reference.specifier), "{reference:?}");
        let resolved = normalize(
            &importer_dest
                .parent()
                .unwrap()
                .join(format!("{}{JS_EXTENSION}", reference.specifier)),
        );
        assert_eq!(resolved, mapper.destination(Path::new(target)));
        assert!(fs.file(resolved.to_str().unwrap()).is_some());
    }
}

#[test]
fn many_rewrites_in_one_file_keep_surrounding_text() {
    let fs = MemoryFs::new()
        .with_file(
            "/repo/src/a.js",
            "import a from 'pa'; /* keep */ import b from \"pb\";\nexport * from 'pa';\nconst c = import('pb');\n",
        )
        .with_file("/repo/node_modules/pa/package.json", &module_manifest("a.js"))
        .with_file("/repo/node_modules/pa/a.js", "export default 'a';\n")
        .with_file("/repo/node_modules/pb/package.json", &module_manifest("b.js"))
        .with_file("/repo/node_modules/pb/b.js", "export default 'b';\n");

    let summary = package_esm_with(&options(), &fs, &StaticScanner).unwrap();

    assert_eq!(
        fs.file("/repo/out/a.js").as_deref(),
        Some(
            "import a from './node_modules/pa/a'; /* keep */ import b from \"./node_modules/pb/b\";\nexport * from './node_modules/pa/a';\nconst c = import('./node_modules/pb/b');\n"
        )
    );
    assert_eq!(summary.files[0].rewritten, 4);
}

#[test]
fn nested_dependency_resolves_from_its_own_location() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import host from 'host';\n")
        .with_file("/repo/node_modules/host/package.json", &module_manifest("index.js"))
        .with_file("/repo/node_modules/host/index.js", "import dep from 'dep';\n")
        .with_file(
            "/repo/node_modules/host/node_modules/dep/package.json",
            &module_manifest("index.js"),
        )
        .with_file("/repo/node_modules/host/node_modules/dep/index.js", "export {};\n")
        .with_file("/repo/node_modules/dep/package.json", &module_manifest("index.js"))
        .with_file("/repo/node_modules/dep/index.js", "export {};\n");

    package_esm_with(&options(), &fs, &StaticScanner).unwrap();

    assert_eq!(
        fs.file("/repo/out/node_modules/host/index.js").as_deref(),
        Some("import dep from './node_modules/dep/index';\n")
    );
    assert!(fs
        .file("/repo/out/node_modules/host/node_modules/dep/index.js")
        .is_some());
    assert_eq!(fs.read_count("/repo/node_modules/dep/index.js"), 0);
}

#[test]
fn missing_entry_point_is_a_read_error() {
    let fs = MemoryFs::new();
    let err = package_esm_with(&options(), &fs, &StaticScanner).unwrap_err();
    assert_eq!(err.code(), codes::READ_FAILED);
    assert!(err.to_string().contains("/repo/src/a.js"));
}

struct BogusScanner;

impl ImportScanner for BogusScanner {
    fn scan(&self, source: &str) -> Vec<ImportReference> {
        vec![ImportReference {
            specifier: "lib".to_string(),
            start: 0,
            end: source.len() + 10,
            quote: '\'',
            kind: ImportKind::Static,
        }]
    }
}

#[test]
fn scanner_spans_outside_the_text_are_rejected() {
    let fs = MemoryFs::new()
        .with_file("/repo/src/a.js", "import lib from 'lib';\n")
        .with_file("/repo/lib.js", "export {};\n");

    let options = options().alias("lib", "/repo/lib.js");
    let scanner: &dyn ImportScanner = &BogusScanner;
    let err = package_esm_with(&options, &fs, scanner).unwrap_err();
    assert_eq!(err.code(), codes::INVALID_IMPORT_SPAN);
}

#[test]
fn real_filesystem_run_produces_expected_tree() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    let write = |rel: &str, contents: &str| {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    };
    write("src/main.js", "import { h } from './util/h';\nimport dep from 'dep';\n");
    write("src/util/h.js", "export const h = 1;\n");
    write("src/unused.js", "export {};\n");
    write("node_modules/dep/package.json", &module_manifest("esm/index.js"));
    write("node_modules/dep/esm/index.js", "export default 1;\n");

    let options = PackageOptions::new(root, "src", "out").entry("main.js");
    let summary = package_esm(&options).unwrap();
    assert_eq!(summary.files.len(), 3);

    let out = root.join("out");
    let files: BTreeSet<PathBuf> = walkdir::WalkDir::new(&out)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path().strip_prefix(&out).unwrap().to_path_buf())
        .collect();
    let expected: BTreeSet<PathBuf> = [
        Path::new("main.js").to_path_buf(),
        Path::new("util").join("h.js"),
        Path::new("node_modules").join("dep").join("esm").join("index.js"),
    ]
    .into_iter()
    .collect();
    assert_eq!(files, expected);

    let main = std::fs::read_to_string(out.join("main.js")).unwrap();
    assert_eq!(
        main,
        "import { h } from './util/h';\nimport dep from './node_modules/dep/esm/index';\n"
    );
}
