use assert_cmd::Command;
use test_support::FileTree;

fn fsenum() -> Command {
    Command::new(env!("CARGO_BIN_EXE_fsenum"))
}

fn sorted_lines(output: &[u8], separator: u8) -> Vec<String> {
    let mut lines: Vec<String> = output
        .split(|&byte| byte == separator)
        .filter(|line| !line.is_empty())
        .map(|line| String::from_utf8_lossy(line).into_owned())
        .collect();
    lines.sort();
    lines
}

fn display(tree: &FileTree, relative: &str) -> String {
    tree.join(relative).display().to_string()
}

#[test]
fn help_exits_successfully() {
    let output = fsenum().arg("--help").output().expect("run fsenum");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("--recurse"));
}

#[test]
fn lists_immediate_children_by_default() {
    let tree = FileTree::new().file("a.txt", "").file("sub/b.txt", "");
    let output = fsenum().arg(tree.path()).output().expect("run fsenum");
    assert!(output.status.success());
    assert_eq!(
        sorted_lines(&output.stdout, b'\n'),
        [display(&tree, "a.txt"), display(&tree, "sub")]
    );
}

#[test]
fn recursive_file_listing_with_nul_terminators() {
    let tree = FileTree::new().file("a.txt", "").file("sub/b.txt", "");
    let output = fsenum()
        .arg(tree.path())
        .args(["*", "--recurse", "--type", "f", "-0"])
        .output()
        .expect("run fsenum");
    assert!(output.status.success());
    assert_eq!(output.stdout.iter().filter(|&&byte| byte == 0).count(), 2);
    assert_eq!(
        sorted_lines(&output.stdout, 0),
        [display(&tree, "a.txt"), display(&tree, "sub/b.txt")]
    );
}

#[test]
fn dos_dialect_requires_an_extension() {
    let tree = FileTree::new().file("foo", "").file("foo.txt", "");
    let output = fsenum()
        .arg(tree.path())
        .args(["foo*.", "--match", "dos"])
        .output()
        .expect("run fsenum");
    assert!(output.status.success());
    assert_eq!(sorted_lines(&output.stdout, b'\n'), [display(&tree, "foo")]);
}

#[test]
fn pattern_directory_prefix_narrows_the_root() {
    let tree = FileTree::new().file("a.txt", "").file("sub/b.txt", "");
    let output = fsenum()
        .arg(tree.path())
        .arg("sub/*.txt")
        .output()
        .expect("run fsenum");
    assert!(output.status.success());
    assert_eq!(sorted_lines(&output.stdout, b'\n'), [display(&tree, "sub/b.txt")]);
}

#[test]
fn missing_directory_exits_with_failure() {
    let tree = FileTree::new();
    fsenum()
        .arg(tree.join("absent"))
        .assert()
        .code(1)
        .stdout("");
}

#[test]
fn rooted_pattern_is_rejected() {
    let tree = FileTree::new();
    let output = fsenum()
        .arg(tree.path())
        .arg("/etc/*")
        .output()
        .expect("run fsenum");
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid search pattern"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    fsenum().arg("--definitely-invalid").assert().code(2);
}

#[cfg(unix)]
#[test]
fn ignore_inaccessible_skips_locked_directories() {
    if test_support::running_as_root() {
        return;
    }
    let tree = FileTree::new().file("open/a", "").file("closed/b", "");
    let _guard = tree.lock("closed");

    fsenum().arg(tree.path()).arg("--recurse").assert().code(1);

    let output = fsenum()
        .arg(tree.path())
        .args(["--recurse", "--ignore-inaccessible"])
        .output()
        .expect("run fsenum");
    assert!(output.status.success());
    assert_eq!(
        sorted_lines(&output.stdout, b'\n'),
        [display(&tree, "closed"), display(&tree, "open"), display(&tree, "open/a")]
    );
}
