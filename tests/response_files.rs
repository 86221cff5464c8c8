use argv_expand::{ExpandError, ExpandOptions, HostFs, expand, expand_with};
use std::borrow::Cow;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::os::unix::ffi::{OsStrExt, OsStringExt};
use std::path::Path;

fn argv(items: &[&str]) -> Vec<OsString> {
    items.iter().map(OsString::from).collect()
}

fn reference(path: &Path) -> OsString {
    let mut arg = OsString::from("@");
    arg.push(path);
    arg
}

#[test]
fn expands_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let resp = dir.path().join("resp");
    fs::write(&resp, "-a -b").unwrap();

    let args = vec!["prog".into(), "-x".into(), reference(&resp), "-y".into()];
    let out = expand(&args).unwrap();

    assert_eq!(&*out, argv(&["prog", "-x", "-a", "-b", "-y"]).as_slice());
    assert_eq!(out.len(), args.len() + 1);
}

#[test]
fn blank_file_on_disk_drops_reference() {
    let dir = tempfile::tempdir().unwrap();
    let resp = dir.path().join("resp");
    fs::write(&resp, "  \n\t\n").unwrap();

    let args = vec!["prog".into(), "-x".into(), reference(&resp), "-y".into()];
    let out = expand(&args).unwrap();

    assert_eq!(&*out, argv(&["prog", "-x", "-y"]).as_slice());
    assert_eq!(out.len(), args.len() - 1);
}

#[test]
fn multi_line_file_with_quotes() {
    let dir = tempfile::tempdir().unwrap();
    let resp = dir.path().join("opts.rsp");
    fs::write(&resp, "-o 'out file'\n-D NAME=\"a b\"\n-I\\ dir\n").unwrap();

    let args = vec!["cc".into(), reference(&resp)];
    let out = expand(&args).unwrap();

    assert_eq!(
        &*out,
        argv(&["cc", "-o", "out file", "-D", "NAME=a b", "-I dir"]).as_slice()
    );
}

#[test]
fn missing_file_is_left_alone() {
    let dir = tempfile::tempdir().unwrap();
    let args = vec!["prog".into(), reference(&dir.path().join("absent"))];

    let out = expand(&args).unwrap();

    assert!(matches!(out, Cow::Borrowed(_)));
    assert_eq!(&*out, args.as_slice());
}

#[test]
fn nested_files_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let inner = dir.path().join("inner");
    let outer = dir.path().join("outer");
    fs::write(&inner, "-b").unwrap();
    fs::write(&outer, format!("-a '@{}' -c", inner.display())).unwrap();

    let args = vec!["prog".into(), reference(&outer)];
    let out = expand(&args).unwrap();

    assert_eq!(&*out, argv(&["prog", "-a", "-b", "-c"]).as_slice());
}

#[test]
fn directory_reference_is_fatal_at_any_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    for position in 1..4 {
        let mut args = argv(&["prog", "a", "b", "c"]);
        args[position] = reference(path);

        let err = expand(&args).unwrap_err();
        assert_eq!(
            err,
            ExpandError::Directory {
                program: "prog".into(),
                path: path.to_path_buf()
            }
        );
        assert!(err.to_string().contains(&path.display().to_string()));
    }
}

#[test]
fn file_referencing_itself_hits_limit() {
    let dir = tempfile::tempdir().unwrap();
    let resp = dir.path().join("loop");
    fs::write(&resp, format!("x '@{}'", resp.display())).unwrap();

    let args = vec!["prog".into(), reference(&resp)];
    let options = ExpandOptions {
        max_response_files: 50,
    };
    let err = expand_with(&args, &HostFs, &options).unwrap_err();

    assert_eq!(err.to_string(), "prog: error: too many @-files encountered");
}

#[test]
fn latin1_bytes_survive_expansion() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join(OsStr::from_bytes(b"caf\xe9.rsp"));
    fs::write(&nested, b"-L\xe9").unwrap();

    let resp = dir.path().join("resp");
    let mut contents = b"-Dname=caf\xe9 @".to_vec();
    contents.extend_from_slice(nested.as_os_str().as_bytes());
    fs::write(&resp, contents).unwrap();

    let args = vec!["prog".into(), reference(&resp)];
    let out = expand(&args).unwrap().into_owned();

    let out: Vec<Vec<u8>> = out.into_iter().map(OsString::into_vec).collect();
    assert_eq!(
        out,
        vec![b"prog".to_vec(), b"-Dname=caf\xe9".to_vec(), b"-L\xe9".to_vec()]
    );
}
