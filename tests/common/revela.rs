//! Shell-script decompiler stand-ins.

use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script named `name` into `dir`.
#[cfg(unix)]
pub fn fake_revela(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).expect("write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

/// Succeeds on every module except those whose bytecode file is `<fail>.bytecode`.
#[cfg(unix)]
pub fn revela_failing_on(dir: &Path, fail: &str) -> PathBuf {
    fake_revela(
        dir,
        "revela",
        &format!(
            r#"[ "$1" = "--help" ] && {{ echo usage; exit 0; }}
case "$2" in
  */{fail}.bytecode) echo "unsupported bytecode version" >&2; exit 2 ;;
esac
name=$(basename "$2" .bytecode)
echo "module 0x1::$name {{}}""#
        ),
    )
}
