//! Redirection parsing through the full grammar

use das_parse::{
    CommandNode, ErrorKind, FdRole, OpenMode, Parsed, Parser, Redir, SourceBuilder,
};
use pretty_assertions::assert_eq;

fn parse(builder: SourceBuilder) -> das_parse::Result<Parsed> {
    let (text, source) = builder.into_source();
    Parser::new("redir.das").parse(&text, source)
}

fn command(builder: SourceBuilder) -> CommandNode {
    let parsed = parse(builder).unwrap();
    assert_eq!(parsed.root.len(), 1);
    parsed.root.commands().next().unwrap().clone()
}

fn target_text(redir: &Redir) -> String {
    match redir {
        Redir::Filename { target, .. } => target.to_string(),
        other => panic!("expected filename redirection, got {other:?}"),
    }
}

#[test]
fn input_defaults_to_fd_zero() {
    let cmd = command(
        SourceBuilder::new()
            .bare("cat")
            .space(" ")
            .redir("<")
            .space(" ")
            .bare("f"),
    );
    assert_eq!(cmd.redirs.len(), 1);
    let redir = &cmd.redirs[0];
    assert!(matches!(
        redir,
        Redir::Filename {
            fd: 0,
            mode: OpenMode::ReadOnly,
            ..
        }
    ));
    assert_eq!(target_text(redir), "f");
}

#[test]
fn append_with_fd_qualifier() {
    let cmd = command(
        SourceBuilder::new()
            .bare("make")
            .space(" ")
            .redir(">>[2]")
            .bare("g"),
    );
    let redir = &cmd.redirs[0];
    assert!(matches!(
        redir,
        Redir::Filename {
            fd: 2,
            mode: OpenMode::WriteCreateAppend,
            ..
        }
    ));
    assert_eq!(target_text(redir), "g");
}

#[test]
fn read_write_and_write() {
    let cmd = command(
        SourceBuilder::new()
            .bare("x")
            .redir("<>")
            .bare("a")
            .space(" ")
            .redir(">")
            .bare("b"),
    );
    let modes: Vec<(u32, OpenMode)> = cmd
        .redirs
        .iter()
        .map(|r| match r {
            Redir::Filename { fd, mode, .. } => (*fd, *mode),
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        modes,
        vec![(0, OpenMode::ReadWriteCreate), (1, OpenMode::WriteCreate)]
    );
}

#[test]
fn fd_duplication_takes_no_target() {
    let cmd = command(
        SourceBuilder::new()
            .bare("cmd")
            .space(" ")
            .redir(">[2=1]"),
    );
    assert_eq!(cmd.redirs, vec![Redir::Fd { fd: 2, old_fd: 1 }]);
}

#[test]
fn close_takes_no_target() {
    let cmd = command(
        SourceBuilder::new()
            .bare("cmd")
            .space(" ")
            .redir(">[3=]")
            .space(" ")
            .redir("<[=]"),
    );
    assert_eq!(
        cmd.redirs,
        vec![Redir::Close { fd: 3 }, Redir::Close { fd: 0 }]
    );
}

#[test]
fn redirections_keep_source_order() {
    let cmd = command(
        SourceBuilder::new()
            .bare("cmd")
            .space(" ")
            .redir(">")
            .bare("out")
            .space(" ")
            .redir(">[2=1]")
            .space(" ")
            .redir("<")
            .bare("in"),
    );
    let fds: Vec<u32> = cmd.redirs.iter().map(Redir::fd).collect();
    assert_eq!(fds, vec![1, 2, 0]);
    assert_eq!(cmd.to_string(), "cmd > out >[2=1] < in");
}

#[test]
fn target_is_a_full_term() {
    let cmd = command(
        SourceBuilder::new()
            .bare("cmd")
            .redir(">")
            .dollar()
            .bare("dir")
            .caret()
            .single("'/log'"),
    );
    assert_eq!(target_text(&cmd.redirs[0]), "$dir^'/log'");
}

#[test]
fn redirection_in_pipeline() {
    let parsed = parse(
        SourceBuilder::new()
            .bare("a")
            .redir("<")
            .bare("in")
            .pipe()
            .bare("b")
            .redir(">")
            .bare("out"),
    )
    .unwrap();
    let counts: Vec<usize> = parsed.root.commands().map(|c| c.redirs.len()).collect();
    assert_eq!(counts, vec![1, 1]);
}

#[test]
fn missing_target_is_an_error() {
    let err = parse(SourceBuilder::new().bare("cmd").redir(">")).unwrap_err();
    assert_eq!(err.message(), "unexpected end of input in factor");
    assert_eq!(err.offset, 4);
}

#[test]
fn term_after_redirection_ends_pipeline() {
    let err = parse(
        SourceBuilder::new()
            .bare("cmd")
            .redir(">[2=1]")
            .space(" ")
            .bare("more"),
    )
    .unwrap_err();
    assert_eq!(err.message(), "unexpected `more` in end of pipeline");
}

#[test]
fn invalid_direction_reports_leader() {
    let err = parse(
        SourceBuilder::new()
            .bare("cmd")
            .space(" ")
            .redir("<<")
            .bare("EOF"),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidRedirectionDirection("<<".to_string())
    );
    assert_eq!(err.offset, 4);
}

#[test]
fn invalid_fd_reports_leader() {
    let err = parse(
        SourceBuilder::new()
            .bare("cmd")
            .space(" ")
            .redir(">[1=x]"),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidFdNumber {
            role: FdRole::Old,
            text: "x".to_string()
        }
    );
    assert_eq!(err.offset, 4);

    let err = parse(
        SourceBuilder::new()
            .bare("cmd")
            .redir(">[one]")
            .bare("f"),
    )
    .unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::InvalidFdNumber {
            role: FdRole::New,
            text: "one".to_string()
        }
    );
}
